// [libs/infra/media/src/links.rs]
/*!
 * =================================================================
 * APARATO: SOURCE LINK CLASSIFIER (V4.6)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CLASIFICACIÓN DRIVE/DROPBOX Y SANEADO DE ENLACES
 * =================================================================
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Identificador de archivo dentro de un enlace Drive.
static DRIVE_FILE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/file/d/([A-Za-z0-9_\-]+)/").expect("regex estática inválida"));

/// Extensión embebida en un Content-Disposition.
static DISPOSITION_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"filename\*?=.*?\.([A-Za-z0-9]{1,8})").expect("regex estática inválida"));

/// Proveedor reconocido del enlace fuente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLink {
    /// Enlace Drive con su file id extraído.
    Drive { file_id: String },
    /// Enlace compartido de Dropbox, tal como llegó.
    Dropbox { shared_url: String },
    /// Proveedor no soportado.
    Unsupported,
}

/// Clasifica el enlace fuente de un ítem de media.
pub fn classify_link(link: &str) -> SourceLink {
    let trimmed = link.trim();
    if trimmed.contains("/file/d/") {
        if let Some(captures) = DRIVE_FILE_ID.captures(trimmed) {
            return SourceLink::Drive { file_id: captures[1].to_string() };
        }
        return SourceLink::Unsupported;
    }
    if trimmed.to_lowercase().contains("dropbox.com") {
        return SourceLink::Dropbox { shared_url: trimmed.to_string() };
    }
    SourceLink::Unsupported
}

/// Reescribe un enlace compartido de Dropbox forzando la descarga directa.
pub fn force_dropbox_download(shared_url: &str) -> String {
    if shared_url.contains("dl=0") {
        shared_url.replace("dl=0", "dl=1")
    } else if shared_url.contains("dl=1") {
        shared_url.to_string()
    } else if shared_url.contains('?') {
        format!("{shared_url}&dl=1")
    } else {
        format!("{shared_url}?dl=1")
    }
}

/// Extrae la extensión sugerida por un Content-Disposition, en minúsculas.
pub fn extension_from_disposition(disposition: &str) -> Option<String> {
    DISPOSITION_EXT
        .captures(disposition)
        .map(|captures| captures[1].to_lowercase())
}
