// [libs/domain/models/src/media.rs]
/*!
 * =================================================================
 * APARATO: MEDIA DOMAIN MODELS (V4.1 - EXT TAXONOMY)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO MAESTRO DE MEDIA Y TAXONOMÍA POR EXTENSIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. EXT-FIRST TYPING: El tipo de media se deriva de la extensión física
 *    del binario mediante tablas cerradas, no del mime declarado.
 * 2. SLUGGABLE SYNAPSE: Implementa el contrato L1 MediaSluggable para la
 *    generación in-place de slugs secuenciados.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use sequoia_core_slugger::MediaSluggable;

/// Taxonomía cerrada del tipo de media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Pdf,
    Other,
}

/// Extensiones reconocidas como imagen.
const IMAGE_EXTS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "tiff"];
/// Extensiones reconocidas como video.
const VIDEO_EXTS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];
/// Extensiones reconocidas como audio.
const AUDIO_EXTS: [&str; 4] = ["mp3", "wav", "aac", "ogg"];

impl MediaType {
    /// Forma canónica en minúsculas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Other => "other",
        }
    }

    /// Deriva el tipo desde la extensión física del binario.
    pub fn from_extension(ext: &str) -> Self {
        let e = ext.trim().to_lowercase();
        if IMAGE_EXTS.contains(&e.as_str()) {
            Self::Image
        } else if VIDEO_EXTS.contains(&e.as_str()) {
            Self::Video
        } else if AUDIO_EXTS.contains(&e.as_str()) {
            Self::Audio
        } else if e == "pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// Ítem de media declarado en el documento, enriquecido por el slugger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Slug derivado `{date_token}-{source_slug}-{voyage_slug}-NN`.
    pub media_slug: String,
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub credit: String,
    pub date: String,
    pub description_markdown: Option<String>,
    pub tags: Option<String>,
    /// URL fuente (Drive o Dropbox), retenida por procedencia.
    pub google_drive_link: String,
    /// Slug de fuente canónico persistido por el slugger.
    pub source_slug: String,
    /// Restricción curatorial proyectada solo a la planilla.
    pub copyright_restrictions: Option<String>,
}

impl MediaSluggable for MediaItem {
    fn slug(&self) -> Option<&str> {
        if self.media_slug.is_empty() {
            None
        } else {
            Some(&self.media_slug)
        }
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn credit(&self) -> &str {
        &self.credit
    }

    fn assign(&mut self, slug: String, source_slug: String) {
        self.media_slug = slug;
        self.source_slug = source_slug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_extension_taxonomy_tables() {
        assert_eq!(MediaType::from_extension("jpg"), MediaType::Image);
        assert_eq!(MediaType::from_extension("TIFF"), MediaType::Image);
        assert_eq!(MediaType::from_extension("mov"), MediaType::Video);
        assert_eq!(MediaType::from_extension("ogg"), MediaType::Audio);
        assert_eq!(MediaType::from_extension("pdf"), MediaType::Pdf);
        assert_eq!(MediaType::from_extension("bin"), MediaType::Other);
        assert_eq!(MediaType::from_extension(""), MediaType::Other);
    }
}
