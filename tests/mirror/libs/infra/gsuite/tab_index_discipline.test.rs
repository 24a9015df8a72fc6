// [tests/mirror/libs/infra/gsuite/tab_index_discipline.test.rs]
/**
 * =================================================================
 * APARATO: TAB INDEX DISCIPLINE TEST (V4.5)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL ÍNDICE POR CLAVE Y PODA BOTTOM-UP
 * =================================================================
 */

use std::collections::HashSet;

use sequoia_infra_gsuite::index_cache::{compose_key, TabIndexCache, UpsertDisposition};
use sequoia_infra_gsuite::tabs;

fn voyage_media_grid() -> Vec<Vec<String>> {
    vec![
        vec!["voyage_slug".into(), "media_slug".into(), "sort_order".into(), "notes".into()],
        vec!["1933-04-23-fdr-trip".into(), "a-01".into(), "1".into(), String::new()],
        vec!["1933-04-23-fdr-trip".into(), "a-02".into(), "2".into(), String::new()],
        vec!["1935-06-01-fdr-review".into(), "b-01".into(), "1".into(), String::new()],
        vec!["1935-06-01-fdr-review".into(), "b-02".into(), "2".into(), String::new()],
    ]
}

#[test]
fn certify_idempotent_reupsert_touches_same_row() {
    println!("\n🗂️ [PROVING_GROUNDS]: Auditing single-read keyed upsert...");

    let mut cache = TabIndexCache::from_grid(voyage_media_grid(), tabs::key_columns(tabs::VOYAGE_MEDIA_TAB));

    let record = vec![
        ("voyage_slug", "1933-04-23-fdr-trip".to_string()),
        ("media_slug", "a-02".to_string()),
        ("sort_order", "2".to_string()),
    ];
    let (first_disposition, first_row, _) = cache.upsert(&record);
    let (second_disposition, second_row, _) = cache.upsert(&record);

    assert_eq!(first_disposition, UpsertDisposition::Updated);
    assert_eq!(second_disposition, UpsertDisposition::Updated);
    assert_eq!(first_row, second_row);
    assert_eq!(cache.rows().len(), 4);

    println!("   ✅ [SUCCESS]: Re-upsert is a no-op update against the cached index.");
}

#[test]
fn certify_bottom_up_prune_keeps_remaining_indices_valid() {
    let mut cache = TabIndexCache::from_grid(voyage_media_grid(), tabs::key_columns(tabs::VOYAGE_MEDIA_TAB));

    // Se retiran la primera y la última fila; los índices llegan en orden
    // descendente para que el batch remoto no desplace filas pendientes.
    let doomed_keys: HashSet<String> = [
        compose_key(&["1933-04-23-fdr-trip".to_string(), "a-01".to_string()]),
        compose_key(&["1935-06-01-fdr-review".to_string(), "b-02".to_string()]),
    ]
    .into_iter()
    .collect();

    let indices = cache.remove_keys(&doomed_keys);
    assert_eq!(indices, vec![3, 0]);

    // Tras la poda el índice se reconstruye y el upsert reencuentra su fila.
    let (disposition, _, _) = cache.upsert(&[
        ("voyage_slug", "1935-06-01-fdr-review".to_string()),
        ("media_slug", "b-01".to_string()),
    ]);
    assert_eq!(disposition, UpsertDisposition::Updated);
}

#[test]
fn certify_managed_tab_schemas_expose_their_keys() {
    for logical in tabs::MANAGED_TABS {
        let headers = tabs::expected_headers(logical);
        assert!(!headers.is_empty(), "tab '{logical}' sin cabecera canónica");
        for key in tabs::key_columns(logical) {
            assert!(headers.contains(key), "tab '{logical}' no expone su columna clave '{key}'");
        }
    }
}
