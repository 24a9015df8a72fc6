// [libs/domain/models/src/voyage.rs]
/*!
 * =================================================================
 * APARATO: VOYAGE DOMAIN MODELS (V4.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATO MAESTRO DEL VOYAGE Y SU TAXONOMÍA
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Taxonomía cerrada del propósito de un voyage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoyageType {
    Official,
    Private,
    Maintenance,
    Other,
}

impl VoyageType {
    /// Forma canónica en minúsculas usada por el documento y los almacenes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Private => "private",
            Self::Maintenance => "maintenance",
            Self::Other => "other",
        }
    }

    /// Parseo leniente: desconocido -> `None` (el validador reporta).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "official" => Some(Self::Official),
            "private" => Some(Self::Private),
            "maintenance" => Some(Self::Maintenance),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Valores admitidos, para mensajes de validación.
    pub const ALLOWED: [&'static str; 4] = ["official", "private", "maintenance", "other"];
}

/// Fila maestra de un voyage, con el slug presidencial derivado a bordo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voyage {
    pub voyage_slug: String,
    pub title: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub vessel_name: Option<String>,
    pub voyage_type: Option<String>,
    pub summary_markdown: Option<String>,
    /// Secuencia ordenada de URLs fuente (separadas por comas o espacios en el documento).
    pub source_urls: Vec<String>,
    pub tags: Option<String>,
    /// Nombre completo del presidente tal como lo declara el documento.
    pub president: String,
    /// Slug presidencial derivado; referencia al registro.
    pub president_slug: String,
}
