// [tests/mirror/libs/infra/rpc/retry_semantics.test.rs]
/**
 * =================================================================
 * APARATO: RETRY SEMANTICS TEST (V4.3)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL CONTRATO DE REINTENTOS DEL ARNÉS
 * =================================================================
 */

use std::sync::atomic::{AtomicU32, Ordering};

use sequoia_infra_rpc::{RpcError, RpcHarness, RpcPolicy};

fn immediate_policy(max_retries: u32) -> RpcPolicy {
    RpcPolicy {
        max_retries,
        backoff_base_seconds: 0.0,
        backoff_max_seconds: 0.0,
        rate_limit_seconds: 0.0,
    }
}

fn throttled() -> RpcError {
    RpcError::Status { code: 429, message: "rateLimitExceeded".into(), retry_after_seconds: None }
}

#[tokio::test]
async fn certify_transient_429_recovers_on_nth_attempt() {
    println!("\n🔁 [PROVING_GROUNDS]: Auditing 429 recovery path...");

    let calls = AtomicU32::new(0);
    let harness = RpcHarness::new(immediate_policy(5));

    let outcome = harness
        .execute("sheets.values.get(media)", || {
            let observed = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if observed < 2 {
                    Err(throttled())
                } else {
                    Ok("payload")
                }
            }
        })
        .await;

    assert_eq!(outcome.unwrap(), "payload");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    println!("   ✅ [SUCCESS]: Two throttles absorbed, third attempt crystallized.");
}

#[tokio::test]
async fn certify_exhaustion_raises_exactly_once() {
    let calls = AtomicU32::new(0);
    let harness = RpcHarness::new(immediate_policy(3));

    let outcome: Result<&str, RpcError> = harness
        .execute("sheets.values.update(voyages)", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(throttled()) }
        })
        .await;

    assert!(matches!(outcome, Err(RpcError::Status { code: 429, .. })));
    // Intento inicial + 3 reintentos, ni uno más.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn certify_server_retry_after_is_honored() {
    let calls = AtomicU32::new(0);
    let harness = RpcHarness::new(immediate_policy(2));

    let started = std::time::Instant::now();
    let outcome = harness
        .execute("sheets.values.append(ingest_log)", || {
            let observed = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if observed == 0 {
                    Err(RpcError::Status {
                        code: 429,
                        message: "rateLimitExceeded".into(),
                        retry_after_seconds: Some(1),
                    })
                } else {
                    Ok(())
                }
            }
        })
        .await;

    assert!(outcome.is_ok());
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
}
