// [libs/infra/media/src/keys.rs]
/*!
 * =================================================================
 * APARATO: CANONICAL KEY DERIVATION (V4.6)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CLAVES CANÓNICAS DE ORIGINALES Y DERIVADOS
 *
 * # Mathematical Proof (Key Canonicity):
 * La clave privada es función pura de (registro, voyage_slug, credit,
 * ext, media_slug). Toda divergencia entre la clave almacenada y la
 * recomputada dispara el protocolo move-on-rename, por lo que el
 * almacén converge a un único punto por ítem.
 * =================================================================
 */

use sequoia_core_slugger::{normalize_source, president_from_voyage_slug};

/// Variante de derivado JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeKind {
    Preview,
    Thumb,
}

impl DerivativeKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Preview => "_preview.jpg",
            Self::Thumb => "_thumb.jpg",
        }
    }
}

/// Clave canónica del original privado:
/// `media/{president}/{source}/{voyage}/{ext}/{slug}.{ext}`.
pub fn original_key(
    voyage_slug: &str,
    media_slug: &str,
    ext: &str,
    credit: &str,
    known_presidents: &[String],
) -> String {
    let president_slug = president_from_voyage_slug(voyage_slug, known_presidents);
    let source_slug = normalize_source(credit);
    format!("media/{president_slug}/{source_slug}/{voyage_slug}/{ext}/{media_slug}.{ext}")
}

/// Clave canónica de un derivado público, mismo prefijo que el original.
pub fn derivative_key(
    voyage_slug: &str,
    media_slug: &str,
    ext: &str,
    credit: &str,
    known_presidents: &[String],
    kind: DerivativeKind,
) -> String {
    let president_slug = president_from_voyage_slug(voyage_slug, known_presidents);
    let source_slug = normalize_source(credit);
    format!("media/{president_slug}/{source_slug}/{voyage_slug}/{ext}/{media_slug}{}", kind.suffix())
}

/// Claves de derivado correspondientes a un ORIGINAL ya almacenado:
/// se reemplaza la extensión final por el sufijo del derivado.
pub fn derivative_keys_from_original(original_key: &str) -> Option<(String, String)> {
    let (stem, _ext) = original_key.rsplit_once('.')?;
    Some((
        format!("{stem}{}", DerivativeKind::Preview.suffix()),
        format!("{stem}{}", DerivativeKind::Thumb.suffix()),
    ))
}

/// Extensión física embebida en una clave de objeto.
pub fn extension_of_key(key: &str) -> Option<String> {
    key.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}
