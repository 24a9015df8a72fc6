// [tests/mirror/libs/infra/media/canonical_key_discipline.test.rs]
/**
 * =================================================================
 * APARATO: CANONICAL KEY DISCIPLINE TEST (V4.7)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE CLAVES CANÓNICAS Y CLASIFICACIÓN
 * =================================================================
 */

use sequoia_infra_media::detect::guess_extension;
use sequoia_infra_media::keys::{
    derivative_key, derivative_keys_from_original, original_key, DerivativeKind,
};
use sequoia_infra_media::links::{classify_link, SourceLink};

#[test]
fn certify_fresh_ingest_key_layout() {
    println!("\n🗝️ [PROVING_GROUNDS]: Auditing S1 canonical key expectations...");

    let registry = vec!["roosevelt-franklin".to_string()];
    let voyage_slug = "1933-04-23-roosevelt-franklin-fishing-trip";
    let media_slug = "1933-04-23-white-house-1933-04-23-roosevelt-franklin-fishing-trip-01";

    let key = original_key(voyage_slug, media_slug, "jpg", "White House", &registry);
    assert_eq!(
        key,
        format!("media/roosevelt-franklin/white-house/{voyage_slug}/jpg/{media_slug}.jpg")
    );

    println!("   ✅ [SUCCESS]: Private key matches the canonical scheme.");
}

#[test]
fn certify_rename_produces_relocated_derivatives() {
    let registry = vec!["roosevelt-franklin".to_string()];
    let old_voyage = "1933-04-23-roosevelt-franklin-fishing-trip";
    let new_voyage = "1933-04-23-roosevelt-franklin-fishing-trip-on-potomac";

    let old_original = original_key(old_voyage, "m-01", "jpg", "White House", &registry);
    let (old_preview, old_thumb) = derivative_keys_from_original(&old_original).unwrap();
    assert!(old_preview.contains(old_voyage) && old_preview.ends_with("m-01_preview.jpg"));
    assert!(old_thumb.ends_with("m-01_thumb.jpg"));

    let new_preview =
        derivative_key(new_voyage, "m-01", "jpg", "White House", &registry, DerivativeKind::Preview);
    assert!(new_preview.contains(new_voyage));
    assert_ne!(old_preview, new_preview);
}

#[test]
fn certify_link_classification_matrix() {
    assert!(matches!(
        classify_link("https://drive.google.com/file/d/1AbC/view"),
        SourceLink::Drive { .. }
    ));
    assert!(matches!(
        classify_link("https://www.dropbox.com/s/q/x.png?dl=0"),
        SourceLink::Dropbox { .. }
    ));
    // S5: un enlace arbitrario no es procesable y degrada a warning
    assert_eq!(classify_link("https://example.com/x.jpg"), SourceLink::Unsupported);
}

#[test]
fn certify_extension_pipeline_for_untitled_binaries() {
    assert_eq!(guess_extension("image/jpeg", ""), "jpg");
    assert_eq!(guess_extension("application/octet-stream", "scan.jpe"), "jpg");
    assert_eq!(guess_extension("application/x-unknown", ""), "bin");
}
