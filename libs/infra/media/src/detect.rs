// [libs/infra/media/src/detect.rs]
/*!
 * =================================================================
 * APARATO: EXTENSION & MIME DETECTOR (V4.6)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: DERIVACIÓN DE EXTENSIÓN FÍSICA DEL BINARIO
 *
 * # Logic:
 * La extensión se toma primero del nombre de archivo; a falta de ella,
 * del mapeo mime->ext. `jpe` se normaliza a `jpg`; lo irreconocible
 * cae a `bin`. La extensión gobierna el segmento {ext} de la clave
 * canónica y la taxonomía del tipo de media.
 * =================================================================
 */

/// Extensión canónica del binario: nombre de archivo primero, mime después.
pub fn guess_extension(mime: &str, filename_hint: &str) -> String {
    let from_name = filename_hint
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    let ext = from_name.or_else(|| extension_for_mime(mime)).unwrap_or_default();
    match ext.as_str() {
        "jpe" => "jpg".to_string(),
        "" => "bin".to_string(),
        _ => ext,
    }
}

/// Mapeo cerrado mime->extensión para las familias soportadas.
fn extension_for_mime(mime: &str) -> Option<String> {
    let canonical = mime.trim().to_lowercase();
    let base = canonical.split(';').next().unwrap_or_default().trim();
    let ext = match base {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/x-msvideo" => "avi",
        "video/x-matroska" => "mkv",
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/aac" => "aac",
        "audio/ogg" => "ogg",
        "application/pdf" => "pdf",
        _ => return None,
    };
    Some(ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_filename_extension_wins() {
        assert_eq!(guess_extension("application/octet-stream", "deck_photo.PNG"), "png");
        assert_eq!(guess_extension("image/jpeg", "archivo.tiff"), "tiff");
    }

    #[test]
    fn certify_mime_fallback() {
        assert_eq!(guess_extension("image/jpeg", "sin-extension"), "jpg");
        assert_eq!(guess_extension("video/quicktime", ""), "mov");
        assert_eq!(guess_extension("application/pdf; charset=binary", ""), "pdf");
    }

    #[test]
    fn certify_jpe_normalization_and_bin_default() {
        assert_eq!(guess_extension("", "retrato.jpe"), "jpg");
        assert_eq!(guess_extension("application/octet-stream", ""), "bin");
        assert_eq!(guess_extension("", "nombre.con.puntos.raros..."), "bin");
    }
}
