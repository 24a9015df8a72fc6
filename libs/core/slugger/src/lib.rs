// [libs/core/slugger/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN SLUG ENGINE (V3.2 - REGISTRY AWARE)
 * CLASIFICACIÓN: CORE COMPUTE (ESTRATO L1)
 * RESPONSABILIDAD: DERIVACIÓN DETERMINISTA DE IDENTIFICADORES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PURE COMPUTE: Cero I/O. Toda función es determinista y libre de
 *    estado de proceso, apta para el barrido de propiedades.
 * 2. LONGEST-PREFIX RESOLUTION: La extracción del presidente desde un
 *    voyage_slug resuelve por prefijo conocido más largo, dado que los
 *    slugs presidenciales contienen guiones internos.
 * 3. SCOPED COUNTERS: Los sufijos -NN de media se acotan por la tripleta
 *    (date_token, source_slug, voyage_slug) dentro de una misma corrida.
 *
 * # Mathematical Proof (Slug Determinism):
 * slugify es una función total sobre UTF-8: colapsa toda ráfaga no
 * [a-z0-9] a un único '-', por lo que slugify(slugify(x)) == slugify(x)
 * (idempotencia) y la salida pertenece siempre al lenguaje [a-z0-9-]+.
 * =================================================================
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Ráfagas de caracteres fuera del alfabeto de slug.
static NON_SLUG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("regex estática inválida"));

/// Prefijo de fecha canónica de un voyage_slug (YYYY-MM-DD-).
static VOYAGE_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("regex estática inválida"));

/// Sufijo secuencial de un media_slug (-NN).
static MEDIA_SEQ_CAPTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d+)$").expect("regex estática inválida"));

/// Slug nominal cuando la entrada queda vacía tras la normalización.
pub const UNKNOWN_SLUG: &str = "unknown";
/// Slug nominal para créditos de media ausentes.
pub const UNKNOWN_SOURCE_SLUG: &str = "unknown-source";
/// Slug nominal cuando el voyage_slug no expone un presidente parseable.
pub const UNKNOWN_PRESIDENT_SLUG: &str = "unknown-president";
/// Token de fecha para media sin fecha declarada.
pub const UNDATED_TOKEN: &str = "undated";

/// Normaliza texto libre al lenguaje de slugs `[a-z0-9-]+`.
///
/// Colapsa toda ráfaga no alfanumérica a un único guion, recorta guiones
/// en los extremos y colapsa repeticiones. Entrada vacía produce `unknown`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = NON_SLUG_RUN.replace_all(&lowered, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        return UNKNOWN_SLUG.to_string();
    }
    trimmed.to_string()
}

/// Mapea un crédito humano a su slug de fuente canónico.
///
/// La tabla de alias captura las variantes de redacción observadas en los
/// documentos curatoriales; toda fuente desconocida pasa por `slugify`.
pub fn normalize_source(credit: &str) -> String {
    let raw = credit.trim();
    if raw.is_empty() {
        return UNKNOWN_SOURCE_SLUG.to_string();
    }
    let slug = slugify(raw);
    match slug.as_str() {
        "white-house-photographer" => "white-house".to_string(),
        "natl-archives" => "national-archives".to_string(),
        _ => slug,
    }
}

/// Tokeniza una fecha en texto libre para su uso en slugs de media.
///
/// `"April 1933"` -> `april-1933`; `"1933-04-23"` -> `1933-04-23`;
/// vacío -> `undated`.
pub fn tokenize_date(free_text: &str) -> String {
    let raw = free_text.trim();
    if raw.is_empty() {
        return UNDATED_TOKEN.to_string();
    }
    slugify(raw)
}

/// Contrato mínimo que el slugger exige a un ítem de media.
///
/// El parser de documentos posee los registros concretos; este trait evita
/// una dependencia invertida del estrato L1 hacia el dominio L2.
pub trait MediaSluggable {
    /// Slug ya asignado (compatibilidad con documentos legados).
    fn slug(&self) -> Option<&str>;
    /// Fecha declarada del ítem.
    fn date(&self) -> &str;
    /// Crédito declarado del ítem.
    fn credit(&self) -> &str;
    /// Persiste el slug y la fuente derivados sobre el ítem.
    fn assign(&mut self, slug: String, source_slug: String);
}

/// Genera slugs de media `{date_token}-{source}-{voyage_slug}-NN` in-place.
///
/// El contador NN arranca en 01 y se acota por la tripleta
/// `(date_token, source_slug, voyage_slug)` dentro de la corrida. Ítems con
/// slug preexistente se respetan sin consumir contador.
pub fn generate_media_slugs<M: MediaSluggable>(items: &mut [M], voyage_slug: &str) {
    let mut counters: HashMap<(String, String), u32> = HashMap::new();
    for item in items.iter_mut() {
        if item.slug().is_some_and(|s| !s.is_empty()) {
            continue;
        }
        let date_token = tokenize_date(item.date());
        let source_slug = normalize_source(item.credit());
        let counter_key = (date_token.clone(), source_slug.clone());
        let sequence = counters.entry(counter_key).or_insert(0);
        *sequence += 1;
        let media_slug = format!("{date_token}-{source_slug}-{voyage_slug}-{:02}", sequence);
        item.assign(media_slug, source_slug);
    }
}

/// Extrae el slug presidencial de un `voyage_slug` con registro conocido.
///
/// Dado `YYYY-MM-DD-<resto>`, retorna el slug presidencial conocido MÁS
/// LARGO que prefija `<resto>` (los slugs presidenciales contienen guiones,
/// p.ej. `roosevelt-franklin`). Sin coincidencia, degrada al primer token
/// delimitado por guion; sin prefijo de fecha, a `unknown-president`.
pub fn president_from_voyage_slug(voyage_slug: &str, known_presidents: &[String]) -> String {
    let trimmed = voyage_slug.trim();
    let Some(date_match) = VOYAGE_DATE_PREFIX.find(trimmed) else {
        return UNKNOWN_PRESIDENT_SLUG.to_string();
    };
    let rest = &trimmed[date_match.end()..];
    if rest.is_empty() {
        return UNKNOWN_PRESIDENT_SLUG.to_string();
    }

    let mut best: Option<&str> = None;
    for candidate in known_presidents {
        let is_prefix = rest == candidate.as_str()
            || rest
                .strip_prefix(candidate.as_str())
                .is_some_and(|tail| tail.starts_with('-'));
        if is_prefix && best.is_none_or(|current| candidate.len() > current.len()) {
            best = Some(candidate.as_str());
        }
    }
    if let Some(slug) = best {
        return slug.to_string();
    }

    // Degradación nominal: primer token del resto.
    rest.split('-')
        .find(|token| !token.is_empty())
        .map_or_else(|| UNKNOWN_PRESIDENT_SLUG.to_string(), |t| t.to_string())
}

/// Orden de clasificación de un ítem join `voyage_media`: los dígitos
/// finales del media_slug, `None` si el slug no termina en `-NN`.
pub fn media_sort_order(media_slug: &str) -> Option<i64> {
    MEDIA_SEQ_CAPTURE
        .captures(media_slug.trim())
        .and_then(|captures| captures[1].parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ProbeMedia {
        slug: Option<String>,
        date: String,
        credit: String,
        source_slug: Option<String>,
    }

    impl ProbeMedia {
        fn new(date: &str, credit: &str) -> Self {
            Self { slug: None, date: date.into(), credit: credit.into(), source_slug: None }
        }
    }

    impl MediaSluggable for ProbeMedia {
        fn slug(&self) -> Option<&str> {
            self.slug.as_deref()
        }
        fn date(&self) -> &str {
            &self.date
        }
        fn credit(&self) -> &str {
            &self.credit
        }
        fn assign(&mut self, slug: String, source_slug: String) {
            self.slug = Some(slug);
            self.source_slug = Some(source_slug);
        }
    }

    #[test]
    fn certify_slugify_normalization_rules() {
        assert_eq!(slugify("Fishing Trip on Potomac"), "fishing-trip-on-potomac");
        assert_eq!(slugify("  --USS Sequoia!!  "), "uss-sequoia");
        assert_eq!(slugify("A  B   C"), "a-b-c");
        assert_eq!(slugify(""), "unknown");
        assert_eq!(slugify("!!!"), "unknown");
    }

    #[test]
    fn certify_source_alias_table() {
        assert_eq!(normalize_source("White House Photographer"), "white-house");
        assert_eq!(normalize_source("White House"), "white-house");
        assert_eq!(normalize_source("Natl. Archives"), "national-archives");
        assert_eq!(normalize_source("CBS News"), "cbs-news");
        assert_eq!(normalize_source("   "), "unknown-source");
    }

    #[test]
    fn certify_date_tokenization() {
        assert_eq!(tokenize_date("April 1933"), "april-1933");
        assert_eq!(tokenize_date("1933-04-23"), "1933-04-23");
        assert_eq!(tokenize_date(""), "undated");
    }

    #[test]
    fn certify_media_counters_scoped_by_triplet() {
        let vslug = "1933-04-23-roosevelt-franklin-fishing-trip";
        let mut items = vec![
            ProbeMedia::new("1933-04-23", "White House"),
            ProbeMedia::new("1933-04-23", "White House"),
            ProbeMedia::new("1933-04-23", "CBS News"),
        ];
        generate_media_slugs(&mut items, vslug);

        assert_eq!(
            items[0].slug.as_deref().unwrap(),
            "1933-04-23-white-house-1933-04-23-roosevelt-franklin-fishing-trip-01"
        );
        assert_eq!(
            items[1].slug.as_deref().unwrap(),
            "1933-04-23-white-house-1933-04-23-roosevelt-franklin-fishing-trip-02"
        );
        // Fuente distinta -> contador independiente
        assert_eq!(
            items[2].slug.as_deref().unwrap(),
            "1933-04-23-cbs-news-1933-04-23-roosevelt-franklin-fishing-trip-01"
        );
        assert_eq!(items[0].source_slug.as_deref().unwrap(), "white-house");
    }

    #[test]
    fn certify_preexisting_slugs_are_preserved() {
        let mut items = vec![ProbeMedia::new("1933-04-23", "White House")];
        items[0].slug = Some("legacy-slug-01".into());
        generate_media_slugs(&mut items, "1933-04-23-roosevelt-franklin-trip");
        assert_eq!(items[0].slug.as_deref().unwrap(), "legacy-slug-01");
        assert!(items[0].source_slug.is_none());
    }

    #[test]
    fn certify_longest_known_prefix_wins() {
        let registry = vec!["roosevelt".to_string(), "roosevelt-franklin".to_string()];
        assert_eq!(
            president_from_voyage_slug("1933-04-23-roosevelt-franklin-fishing-trip", &registry),
            "roosevelt-franklin"
        );
    }

    #[test]
    fn certify_sort_order_extraction() {
        assert_eq!(media_sort_order("1933-04-23-white-house-x-01"), Some(1));
        assert_eq!(media_sort_order("1933-04-23-white-house-x-12"), Some(12));
        assert_eq!(media_sort_order("slug-without-sequence"), None);
        assert_eq!(media_sort_order(""), None);
    }

    #[test]
    fn certify_president_fallback_paths() {
        // Sin registro: primer token del resto
        assert_eq!(president_from_voyage_slug("1933-04-23-roosevelt-franklin-trip", &[]), "roosevelt");
        // Sin prefijo de fecha: degradación nominal
        assert_eq!(president_from_voyage_slug("not-a-voyage-slug", &[]), "unknown-president");
        assert_eq!(president_from_voyage_slug("", &[]), "unknown-president");
    }
}
