// [tests/mirror/libs/infra/db/president_reset_safety.test.rs]
/**
 * =================================================================
 * APARATO: PRESIDENT RESET SAFETY TEST (V4.8)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL RESET SIN TRUNCATE (S4)
 * =================================================================
 */

use std::collections::HashSet;

use sequoia_domain_models::{MediaLinkSet, President, Voyage, VoyageBundle};
use sequoia_infra_db::repositories::{PresidentRepository, ReconcileRepository, VoyageRepository};
use sequoia_infra_db::SequoiaDbClient;

fn president(slug: &str, name: &str) -> President {
    President {
        president_slug: slug.into(),
        full_name: name.into(),
        party: None,
        term_start: None,
        term_end: None,
        wikipedia_url: None,
        tags: None,
    }
}

fn voyage_bundle(voyage_slug: &str, president_slug: &str) -> VoyageBundle {
    VoyageBundle {
        voyage: Voyage {
            voyage_slug: voyage_slug.into(),
            title: "Fishing Trip".into(),
            start_date: "1933-04-23".into(),
            president: "Franklin D. Roosevelt".into(),
            president_slug: president_slug.into(),
            ..Voyage::default()
        },
        passengers: Vec::new(),
        media: Vec::new(),
    }
}

async fn president_slugs(client: &SequoiaDbClient) -> Vec<String> {
    let connection = client.connection().unwrap();
    let mut rows = connection
        .query("SELECT president_slug FROM presidents ORDER BY president_slug", ())
        .await
        .unwrap();
    let mut slugs = Vec::new();
    while let Some(row) = rows.next().await.unwrap() {
        slugs.push(row.get::<String>(0).unwrap());
    }
    slugs
}

#[tokio::test]
async fn certify_referenced_president_survives_reset() {
    println!("\n🏛️ [PROVING_GROUNDS]: Auditing safe president reset (S4)...");

    let client = SequoiaDbClient::connect("file::mem_pres_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let presidents = PresidentRepository::new(client.clone());
    let voyages = VoyageRepository::new(client.clone());
    let reconcile = ReconcileRepository::new(client.clone());

    // 1. Registro inicial con FDR y un voyage que lo referencia
    presidents
        .safe_reset(&[president("roosevelt-franklin", "Franklin D. Roosevelt")], false)
        .await
        .unwrap();
    voyages
        .upsert_bundle(
            &voyage_bundle("1933-04-23-roosevelt-franklin-fishing-trip", "roosevelt-franklin"),
            &MediaLinkSet::new(),
        )
        .await
        .unwrap();

    // 2. El documento ya no trae a FDR: el DELETE queda suprimido por el guard
    let stats = presidents.safe_reset(&[president("truman", "Harry S. Truman")], false).await.unwrap();
    assert_eq!(stats.pruned, 0);
    assert_eq!(president_slugs(&client).await, vec!["roosevelt-franklin".to_string(), "truman".to_string()]);

    // 3. El voyage desaparece del documento: la siguiente corrida sí poda
    let desired: HashSet<String> = HashSet::new();
    reconcile.prune_missing_voyages(&desired, false).await.unwrap();
    let stats = presidents.safe_reset(&[president("truman", "Harry S. Truman")], false).await.unwrap();
    assert_eq!(stats.pruned, 1);
    assert_eq!(president_slugs(&client).await, vec!["truman".to_string()]);

    println!("   ✅ [SUCCESS]: Guarded delete never strands a referenced president.");
}

#[tokio::test]
async fn certify_empty_incoming_set_only_prunes_unreferenced() {
    let client = SequoiaDbClient::connect("file::mem_pres_empty_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let presidents = PresidentRepository::new(client.clone());
    let voyages = VoyageRepository::new(client.clone());

    presidents
        .safe_reset(
            &[
                president("roosevelt-franklin", "Franklin D. Roosevelt"),
                president("hoover-herbert", "Herbert Hoover"),
            ],
            false,
        )
        .await
        .unwrap();
    voyages
        .upsert_bundle(
            &voyage_bundle("1933-04-23-roosevelt-franklin-fishing-trip", "roosevelt-franklin"),
            &MediaLinkSet::new(),
        )
        .await
        .unwrap();

    let stats = presidents.safe_reset(&[], false).await.unwrap();
    assert_eq!(stats.pruned, 1);
    assert_eq!(president_slugs(&client).await, vec!["roosevelt-franklin".to_string()]);
}
