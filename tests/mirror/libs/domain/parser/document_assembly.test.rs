// [tests/mirror/libs/domain/parser/document_assembly.test.rs]
/**
 * =================================================================
 * APARATO: DOCUMENT ASSEMBLY TEST (V4.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN END-TO-END DEL DOCUMENTO MULTI-VOYAGE
 * =================================================================
 */

use sequoia_domain_models::PresidentRegistry;
use sequoia_domain_parser::parse_document;
use sequoia_domain_validator::validate_bundle;

const MULTI_VOYAGE_DOC: &str = "\
## President
full_name: Franklin D. Roosevelt
president_slug: roosevelt-franklin
party: Democratic
term_start: 1933-03-04

## Voyage
title: Fishing Trip
start_date: 1933-04-23
start_time: 09:30
voyage_type: private
summary_markdown: |
  Un fin de semana tranquilo
  sobre el Potomac.
source_urls: https://archives.example/a, https://archives.example/b

## Passengers
- slug: hopkins-harry
  full_name: Harry Hopkins
  capacity_role: advisor
  birth_year: 1890

## Media
- title: Deck photo
  credit: White House Photographer
  date: 1933-04-23
  google_drive_link: https://drive.google.com/file/d/abc123/view
- title: Second deck photo
  credit: White House
  date: 1933-04-23
  google_drive_link: https://drive.google.com/file/d/def456/view

---

## President
full_name: Harry S. Truman
president_slug: truman

## Voyage
title: Williamsburg Shakedown
start_date: 1945-11-09

## Media
- title: Hull inspection reel
  credit: National Archives
  date: 1945-11-09
  google_drive_link: https://www.dropbox.com/s/x/reel.mp4?dl=0
- title: Clipping scan
  credit: National Archives
  date: 1945-11-09
  google_drive_link: https://example.com/x.jpg
";

#[test]
fn certify_multi_voyage_document_assembly() {
    println!("\n📜 [PROVING_GROUNDS]: Auditing multi-voyage assembly with president context...");

    let outcome = parse_document(MULTI_VOYAGE_DOC);
    assert_eq!(outcome.presidents.len(), 2);
    assert_eq!(outcome.bundles.len(), 2);
    assert!(outcome.warnings.is_empty(), "unexpected warnings: {:?}", outcome.warnings);

    // Primer paquete: contexto FDR, slugs de media secuenciados por fuente
    let fdr = &outcome.bundles[0];
    assert_eq!(fdr.voyage.voyage_slug, "1933-04-23-roosevelt-franklin-fishing-trip");
    assert_eq!(fdr.voyage.summary_markdown.as_deref(), Some("Un fin de semana tranquilo\nsobre el Potomac."));
    assert_eq!(fdr.voyage.source_urls.len(), 2);
    // El alias white-house-photographer colapsa a white-house: contador compartido
    assert_eq!(
        fdr.media[0].media_slug,
        "1933-04-23-white-house-1933-04-23-roosevelt-franklin-fishing-trip-01"
    );
    assert_eq!(
        fdr.media[1].media_slug,
        "1933-04-23-white-house-1933-04-23-roosevelt-franklin-fishing-trip-02"
    );

    // Segundo paquete: el contexto presidencial cambió con la sección President
    let truman = &outcome.bundles[1];
    assert_eq!(truman.voyage.president_slug, "truman");
    assert_eq!(truman.voyage.voyage_slug, "1945-11-09-truman-williamsburg-shakedown");

    println!("   ✅ [SUCCESS]: Context switching and slug derivation certified.");
}

#[test]
fn certify_parsed_bundles_pass_validation() {
    let outcome = parse_document(MULTI_VOYAGE_DOC);
    let registry = PresidentRegistry::from_presidents(&outcome.presidents);

    for bundle in &outcome.bundles {
        let report = validate_bundle(bundle, &registry);
        assert!(
            report.is_valid(),
            "bundle {} failed validation: {:?}",
            bundle.voyage.voyage_slug,
            report.errors
        );
    }
}

#[test]
fn certify_unsupported_link_keeps_the_voyage_valid() {
    println!("\n🔗 [PROVING_GROUNDS]: Auditing S5 degradation through parse + validate...");

    let outcome = parse_document(MULTI_VOYAGE_DOC);
    let registry = PresidentRegistry::from_presidents(&outcome.presidents);

    // El segundo paquete carga el enlace no soportado (example.com).
    let truman = &outcome.bundles[1];
    assert!(truman.media.iter().any(|m| m.google_drive_link == "https://example.com/x.jpg"));

    let report = validate_bundle(truman, &registry);
    // S5: el voyage prosigue; el enlace degrada a warning y el fetcher
    // dejará la fila del ítem con s3_url y public_derivative_url nulos.
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert!(
        report.warnings.iter().any(|w| w.contains("Drive") && w.contains("Dropbox")),
        "missing unsupported-link warning: {:?}",
        report.warnings
    );

    println!("   ✅ [SUCCESS]: Unsupported link degrades to a warning, voyage stays valid.");
}
