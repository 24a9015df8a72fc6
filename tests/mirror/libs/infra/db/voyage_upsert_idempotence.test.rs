// [tests/mirror/libs/infra/db/voyage_upsert_idempotence.test.rs]
/**
 * =================================================================
 * APARATO: VOYAGE UPSERT IDEMPOTENCE TEST (V4.8)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE RE-UPSERT SIN CAMBIOS NETOS
 * =================================================================
 */

use sequoia_domain_models::{MediaItem, MediaLinkSet, MediaUploadOutcome, Person, Voyage, VoyageBundle};
use sequoia_infra_db::repositories::VoyageRepository;
use sequoia_infra_db::SequoiaDbClient;

fn fishing_trip_bundle() -> VoyageBundle {
    let voyage_slug = "1933-04-23-roosevelt-franklin-fishing-trip".to_string();
    VoyageBundle {
        voyage: Voyage {
            voyage_slug: voyage_slug.clone(),
            title: "Fishing Trip".into(),
            start_date: "1933-04-23".into(),
            voyage_type: Some("private".into()),
            source_urls: vec!["https://archives.example/log".into()],
            president: "Franklin D. Roosevelt".into(),
            president_slug: "roosevelt-franklin".into(),
            ..Voyage::default()
        },
        passengers: vec![Person {
            person_slug: "hopkins-harry".into(),
            full_name: Some("Harry Hopkins".into()),
            birth_year: Some("1890".into()),
            capacity_role: Some("advisor".into()),
            ..Person::default()
        }],
        media: vec![
            MediaItem {
                media_slug: format!("1933-04-23-white-house-{voyage_slug}-01"),
                title: Some("Deck photo".into()),
                media_type: Some("image".into()),
                credit: "White House".into(),
                date: "1933-04-23".into(),
                google_drive_link: "https://drive.google.com/file/d/abc/view".into(),
                ..MediaItem::default()
            },
            MediaItem {
                media_slug: "legacy-slug-without-sequence".into(),
                title: Some("Legacy reel".into()),
                media_type: Some("video".into()),
                credit: "CBS News".into(),
                date: "1933-04-23".into(),
                google_drive_link: "https://www.dropbox.com/s/q/reel.mp4?dl=0".into(),
                ..MediaItem::default()
            },
        ],
    }
}

fn link_set(bundle: &VoyageBundle) -> MediaLinkSet {
    let mut links = MediaLinkSet::new();
    links.insert(
        bundle.media[0].media_slug.clone(),
        MediaUploadOutcome {
            s3_url: Some("s3://sequoia-canonical/media/x/y-01.jpg".into()),
            public_derivative_url: Some("https://sequoia-public.s3.amazonaws.com/media/x/y-01_preview.jpg".into()),
        },
    );
    links
}

async fn count(client: &SequoiaDbClient, sql: &str) -> i64 {
    let connection = client.connection().unwrap();
    let mut rows = connection.query(sql, ()).await.unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

#[tokio::test]
async fn certify_double_upsert_produces_zero_net_changes() {
    println!("\n💾 [PROVING_GROUNDS]: Auditing per-voyage upsert idempotence...");

    let client = SequoiaDbClient::connect("file::mem_upsert_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let repository = VoyageRepository::new(client.clone());

    let bundle = fishing_trip_bundle();
    let links = link_set(&bundle);

    repository.upsert_bundle(&bundle, &links).await.expect("primer upsert");
    repository.upsert_bundle(&bundle, &links).await.expect("segundo upsert");

    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyages").await, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM people").await, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM media").await, 2);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyage_passengers").await, 1);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyage_media").await, 2);

    println!("   ✅ [SUCCESS]: Re-run is a pure no-op update.");
}

#[tokio::test]
async fn certify_sort_order_and_null_media_urls() {
    let client = SequoiaDbClient::connect("file::mem_sort_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let repository = VoyageRepository::new(client.clone());

    let bundle = fishing_trip_bundle();
    // El segundo ítem no tiene desenlace de subida: columnas S3 nulas.
    let links = link_set(&bundle);
    repository.upsert_bundle(&bundle, &links).await.unwrap();

    let connection = client.connection().unwrap();

    // sort_order derivado de los dígitos finales del media_slug
    let mut rows = connection
        .query(
            "SELECT sort_order FROM voyage_media WHERE media_slug LIKE '%-01' LIMIT 1",
            (),
        )
        .await
        .unwrap();
    let row = rows.next().await.unwrap().unwrap();
    assert_eq!(row.get::<i64>(0).unwrap(), 1);

    // Slug sin secuencia -NN: sort_order NULL
    let mut rows = connection
        .query(
            "SELECT COUNT(*) FROM voyage_media WHERE media_slug = 'legacy-slug-without-sequence' AND sort_order IS NULL",
            (),
        )
        .await
        .unwrap();
    assert_eq!(rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap(), 1);

    // Ítem sin bytes utilizables: fila presente con URLs nulas (S5)
    let mut rows = connection
        .query(
            "SELECT COUNT(*) FROM media WHERE media_slug = 'legacy-slug-without-sequence' AND s3_url IS NULL AND public_derivative_url IS NULL",
            (),
        )
        .await
        .unwrap();
    assert_eq!(rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap(), 1);
}

#[tokio::test]
async fn certify_malformed_dates_collapse_the_transaction() {
    let client = SequoiaDbClient::connect("file::mem_rollback_v48?mode=memory&cache=shared", None)
        .await
        .unwrap();
    let repository = VoyageRepository::new(client.clone());

    let mut bundle = fishing_trip_bundle();
    bundle.voyage.end_date = Some("April 1933".into());

    let fault = repository.upsert_bundle(&bundle, &MediaLinkSet::new()).await.unwrap_err();
    // El fallo aflora con el voyage_slug a bordo y nada queda escrito.
    assert!(fault.to_string().contains("1933-04-23-roosevelt-franklin-fishing-trip"));
    assert_eq!(count(&client, "SELECT COUNT(*) FROM voyages").await, 0);
    assert_eq!(count(&client, "SELECT COUNT(*) FROM people").await, 0);
}
