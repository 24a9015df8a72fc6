// [libs/infra/rpc/src/harness.rs]
/*!
 * =================================================================
 * APARATO: RETRY & THROTTLE ENGINE (V4.3)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: EJECUCIÓN RESILIENTE DE LLAMADAS REMOTAS
 * =================================================================
 */

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Catálogo de fallos remotos observables por el arnés.
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    /// Respuesta HTTP no exitosa, con el eventual Retry-After del servidor.
    #[error("[L3_RPC_STATUS_FAULT]: HTTP_{code} -> {message}")]
    Status {
        code: u16,
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Fallo de transporte (DNS, TLS, timeout, conexión cortada).
    #[error("[L3_RPC_TRANSPORT_FAULT]: UPLINK_SEVERED -> {0}")]
    Transport(String),

    /// Cuerpo ilegible o esquema inesperado en la respuesta.
    #[error("[L3_RPC_PAYLOAD_FAULT]: SCHEMA_DRIFT -> {0}")]
    Payload(String),
}

impl RpcError {
    /// Clasificación de reintentabilidad, centralizada en el arnés.
    ///
    /// 429/500/502/503/504 y los mensajes de cuota (`ratelimit`,
    /// `rate limit`, `userlimit`) reintentan; el transporte siempre
    /// reintenta; cualquier otro status propaga de inmediato.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { code, message, .. } => {
                if matches!(code, 429 | 500 | 502 | 503 | 504) {
                    return true;
                }
                let lowered = message.to_lowercase();
                lowered.contains("ratelimit") || lowered.contains("rate limit") || lowered.contains("userlimit")
            }
            Self::Transport(_) => true,
            Self::Payload(_) => false,
        }
    }

    fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Status { retry_after_seconds, .. } => *retry_after_seconds,
            _ => None,
        }
    }
}

/// Parámetros sintonizables del arnés (ver configuración GAPI_*).
#[derive(Debug, Clone, Copy)]
pub struct RpcPolicy {
    pub max_retries: u32,
    pub backoff_base_seconds: f64,
    pub backoff_max_seconds: f64,
    pub rate_limit_seconds: f64,
}

impl Default for RpcPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            backoff_base_seconds: 0.8,
            backoff_max_seconds: 30.0,
            rate_limit_seconds: 0.0,
        }
    }
}

/// Arnés compartido por todos los escritores remotos de la sesión.
pub struct RpcHarness {
    policy: RpcPolicy,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RpcHarness {
    pub fn new(policy: RpcPolicy) -> Self {
        Self { policy, last_dispatch: Mutex::new(None) }
    }

    pub fn policy(&self) -> &RpcPolicy {
        &self.policy
    }

    /// Espacia las salidas según el intervalo mínimo configurado.
    async fn throttle(&self) {
        if self.policy.rate_limit_seconds <= 0.0 {
            return;
        }
        let minimum_gap = Duration::from_secs_f64(self.policy.rate_limit_seconds);
        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < minimum_gap {
                tokio::time::sleep(minimum_gap - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn backoff_delay(&self, attempt: u32, fault: &RpcError) -> Duration {
        if let Some(server_seconds) = fault.retry_after() {
            return Duration::from_secs(server_seconds);
        }
        let jitter = 0.5 + rand::random::<f64>();
        let computed = self.policy.backoff_base_seconds * 2f64.powi(attempt as i32) * jitter;
        Duration::from_secs_f64(computed.min(self.policy.backoff_max_seconds))
    }

    /// Ejecuta `operation` con throttle, reintentos y backoff acotado.
    ///
    /// # Errors:
    /// Propaga el fallo original cuando no es reintetable o cuando el
    /// presupuesto de reintentos se agota.
    pub async fn execute<T, F, Fut>(&self, label: &str, operation: F) -> Result<T, RpcError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RpcError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            self.throttle().await;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(fault) => {
                    if !fault.is_retryable() || attempt >= self.policy.max_retries {
                        error!("❌ [RPC]: {label} failed with no retries left: {fault}");
                        return Err(fault);
                    }
                    let delay = self.backoff_delay(attempt, &fault);
                    warn!(
                        "🔁 [RPC]: {label} throttled ({fault}). Retry {}/{} in {:.2}s",
                        attempt + 1,
                        self.policy.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate_policy() -> RpcPolicy {
        RpcPolicy {
            max_retries: 3,
            backoff_base_seconds: 0.0,
            backoff_max_seconds: 0.0,
            rate_limit_seconds: 0.0,
        }
    }

    #[test]
    fn certify_retryability_classification() {
        for code in [429u16, 500, 502, 503, 504] {
            let fault = RpcError::Status { code, message: String::new(), retry_after_seconds: None };
            assert!(fault.is_retryable(), "HTTP_{code} must retry");
        }
        let quota = RpcError::Status { code: 403, message: "userLimitExceeded".into(), retry_after_seconds: None };
        assert!(quota.is_retryable());

        let forbidden = RpcError::Status { code: 403, message: "forbidden".into(), retry_after_seconds: None };
        assert!(!forbidden.is_retryable());
        assert!(RpcError::Transport("reset".into()).is_retryable());
        assert!(!RpcError::Payload("drift".into()).is_retryable());
    }

    #[tokio::test]
    async fn certify_non_retryable_propagates_immediately() {
        use std::sync::atomic::{AtomicU32, Ordering};
        let calls = AtomicU32::new(0);
        let harness = RpcHarness::new(immediate_policy());

        let outcome: Result<(), RpcError> = harness
            .execute("probe", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RpcError::Status { code: 404, message: "missing".into(), retry_after_seconds: None }) }
            })
            .await;

        assert!(outcome.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
