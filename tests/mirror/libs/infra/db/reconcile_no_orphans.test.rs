// [tests/mirror/libs/infra/db/reconcile_no_orphans.test.rs]
/**
 * =================================================================
 * APARATO: RECONCILE NO-ORPHANS TEST (V4.8)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE PODA SIN MAESTROS HUÉRFANOS (P4/P6)
 * =================================================================
 */

use std::collections::HashSet;

use sequoia_domain_models::{MediaItem, MediaLinkSet, Voyage, VoyageBundle};
use sequoia_infra_db::repositories::{ReconcileRepository, VoyageRepository};
use sequoia_infra_db::SequoiaDbClient;

fn bundle_with_media(voyage_slug: &str, media_slugs: &[&str]) -> VoyageBundle {
    VoyageBundle {
        voyage: Voyage {
            voyage_slug: voyage_slug.into(),
            title: "Crossing".into(),
            start_date: "1933-04-23".into(),
            president: "Franklin D. Roosevelt".into(),
            president_slug: "roosevelt-franklin".into(),
            ..Voyage::default()
        },
        passengers: Vec::new(),
        media: media_slugs
            .iter()
            .map(|slug| MediaItem {
                media_slug: slug.to_string(),
                credit: "White House".into(),
                date: "1933-04-23".into(),
                google_drive_link: "https://drive.google.com/file/d/x/view".into(),
                ..MediaItem::default()
            })
            .collect(),
    }
}

async fn count(client: &SequoiaDbClient, sql: &str) -> i64 {
    let connection = client.connection().unwrap();
    let mut rows = connection.query(sql, ()).await.unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

#[tokio::test]
async fn certify_shared_master_survives_single_voyage_prune() {
    println!("\n🧹 [PROVING_GROUNDS]: Auditing master-guarded join prune (P6)...");

    let client = SequoiaDbClient::connect("file::mem_rec_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let voyages = VoyageRepository::new(client.clone());
    let reconcile = ReconcileRepository::new(client.clone());

    // El mismo maestro 'shared-01' referenciado por dos voyages
    voyages
        .upsert_bundle(&bundle_with_media("1933-04-23-fdr-alpha", &["shared-01"]), &MediaLinkSet::new())
        .await
        .unwrap();
    voyages
        .upsert_bundle(&bundle_with_media("1933-05-10-fdr-beta", &["shared-01"]), &MediaLinkSet::new())
        .await
        .unwrap();

    // El documento retira el ítem del primer voyage
    let stats = reconcile
        .prune_voyage_joins("1933-04-23-fdr-alpha", &HashSet::new(), &HashSet::new(), true, false)
        .await
        .unwrap();
    assert_eq!(stats.deleted_voyage_media, 1);
    // El guard NOT EXISTS suprime el borrado del maestro aún referenciado
    assert_eq!(stats.deleted_media, 0);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM media WHERE media_slug = 'shared-01'").await, 1);

    // Retirado del segundo voyage, el maestro queda sin referencias y cae
    let stats = reconcile
        .prune_voyage_joins("1933-05-10-fdr-beta", &HashSet::new(), &HashSet::new(), true, false)
        .await
        .unwrap();
    assert_eq!(stats.deleted_voyage_media, 1);
    assert_eq!(stats.deleted_media, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM media").await, 0);

    // Invariante final: todo join apunta a un maestro existente
    assert_eq!(
        count(
            &client,
            "SELECT COUNT(*) FROM voyage_media vm WHERE NOT EXISTS (SELECT 1 FROM media m WHERE m.media_slug = vm.media_slug)"
        )
        .await,
        0
    );

    println!("   ✅ [SUCCESS]: No join row ever points at a missing master.");
}

#[tokio::test]
async fn certify_global_prune_follows_the_document() {
    let client = SequoiaDbClient::connect("file::mem_global_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let voyages = VoyageRepository::new(client.clone());
    let reconcile = ReconcileRepository::new(client.clone());

    voyages
        .upsert_bundle(&bundle_with_media("1933-04-23-fdr-alpha", &["a-01"]), &MediaLinkSet::new())
        .await
        .unwrap();
    voyages
        .upsert_bundle(&bundle_with_media("1933-05-10-fdr-beta", &["b-01"]), &MediaLinkSet::new())
        .await
        .unwrap();

    // El documento solo conserva beta
    let desired: HashSet<String> = ["1933-05-10-fdr-beta".to_string()].into_iter().collect();
    let stats = reconcile.prune_missing_voyages(&desired, false).await.unwrap();

    assert_eq!(stats.deleted_voyages, 1);
    assert_eq!(stats.deleted_voyage_media, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyages").await, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyage_media").await, 1);
}

#[tokio::test]
async fn certify_dry_run_counts_without_mutation() {
    let client = SequoiaDbClient::connect("file::mem_dry_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let voyages = VoyageRepository::new(client.clone());
    let reconcile = ReconcileRepository::new(client.clone());

    voyages
        .upsert_bundle(&bundle_with_media("1933-04-23-fdr-alpha", &["a-01"]), &MediaLinkSet::new())
        .await
        .unwrap();

    let stats = reconcile
        .prune_voyage_joins("1933-04-23-fdr-alpha", &HashSet::new(), &HashSet::new(), true, true)
        .await
        .unwrap();
    assert_eq!(stats.deleted_voyage_media, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyage_media").await, 1);

    let stats = reconcile.prune_missing_voyages(&HashSet::new(), true).await.unwrap();
    assert_eq!(stats.deleted_voyages, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyages").await, 1);
}
