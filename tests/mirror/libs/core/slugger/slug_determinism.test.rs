// [tests/mirror/libs/core/slugger/slug_determinism.test.rs]
/**
 * =================================================================
 * APARATO: SLUG DETERMINISM TEST (V3.2)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L1-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE PUREZA E IDEMPOTENCIA DEL SLUGGER
 * =================================================================
 */

use proptest::prelude::*;
use sequoia_core_slugger::{normalize_source, president_from_voyage_slug, slugify, tokenize_date};

proptest! {
    /// slugify es pura: dos invocaciones sobre la misma entrada coinciden,
    /// y la salida vive siempre en el lenguaje [a-z0-9-]+.
    #[test]
    fn certify_slugify_purity_and_alphabet(input in ".{0,64}") {
        let first = slugify(&input);
        let second = slugify(&input);
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.is_empty());
        prop_assert!(first.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!first.starts_with('-') && !first.ends_with('-'));
        prop_assert!(!first.contains("--"));
    }

    /// slugify es idempotente: re-slugificar un slug no lo altera.
    #[test]
    fn certify_slugify_idempotence(input in ".{0,64}") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once);
    }

    /// normalize_source y tokenize_date heredan el alfabeto del slugger.
    #[test]
    fn certify_derived_tokens_alphabet(input in ".{0,48}") {
        for token in [normalize_source(&input), tokenize_date(&input)] {
            prop_assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}

#[test]
fn certify_president_resolution_is_stable_across_calls() {
    println!("\n🧭 [PROVING_GROUNDS]: Auditing president prefix resolution...");

    let registry = vec![
        "roosevelt-franklin".to_string(),
        "roosevelt-theodore".to_string(),
        "truman".to_string(),
    ];
    let slug = "1945-08-18-roosevelt-franklin-final-crossing";

    let first = president_from_voyage_slug(slug, &registry);
    let second = president_from_voyage_slug(slug, &registry);

    assert_eq!(first, "roosevelt-franklin");
    assert_eq!(first, second);

    println!("   ✅ [SUCCESS]: Longest-prefix resolution certified stable.");
}
