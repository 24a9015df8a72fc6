// [libs/infra/media/src/derivatives.rs]
/*!
 * =================================================================
 * APARATO: IMAGE DERIVATIVE FORGE (V4.6)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PREVIEW Y THUMB JPEG DESDE EL ORIGINAL
 *
 * # Performance:
 * Trabajo CPU puro (decode, Lanczos3, encode). El motor lo despacha a
 * spawn_blocking para no retener el reactor de I/O.
 * =================================================================
 */

use image::imageops::FilterType;
use image::RgbImage;

use crate::errors::MediaError;

/// Borde largo máximo del preview.
pub const PREVIEW_MAX_LONG_EDGE: u32 = 1600;
/// Cota cuadrada del thumb.
pub const THUMB_BOUND: u32 = 320;
/// Calidad JPEG del preview.
pub const PREVIEW_JPEG_QUALITY: u8 = 88;
/// Calidad JPEG del thumb.
pub const THUMB_JPEG_QUALITY: u8 = 85;

/// Dimensiones del preview: borde largo acotado, jamás se amplía.
fn preview_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width >= height {
        let new_width = width.min(PREVIEW_MAX_LONG_EDGE);
        let new_height = ((height as u64 * new_width as u64) / width.max(1) as u64) as u32;
        (new_width.max(1), new_height.max(1))
    } else {
        let new_height = height.min(PREVIEW_MAX_LONG_EDGE);
        let new_width = ((width as u64 * new_height as u64) / height.max(1) as u64) as u32;
        (new_width.max(1), new_height.max(1))
    }
}

/// Dimensiones del thumb: contenido en 320x320 preservando aspecto.
fn thumb_dimensions(width: u32, height: u32) -> (u32, u32) {
    let long_edge = width.max(height).max(1);
    if long_edge <= THUMB_BOUND {
        return (width.max(1), height.max(1));
    }
    let new_width = ((width as u64 * THUMB_BOUND as u64) / long_edge as u64) as u32;
    let new_height = ((height as u64 * THUMB_BOUND as u64) / long_edge as u64) as u32;
    (new_width.max(1), new_height.max(1))
}

fn encode_jpeg(canvas: &RgbImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(canvas.as_raw(), canvas.width(), canvas.height(), image::ColorType::Rgb8)
        .map_err(|fault| MediaError::Image(format!("JPEG_ENCODE_FAULT: {fault}")))?;
    Ok(buffer)
}

fn scaled(canvas: &RgbImage, width: u32, height: u32) -> RgbImage {
    if (width, height) == canvas.dimensions() {
        canvas.clone()
    } else {
        image::imageops::resize(canvas, width, height, FilterType::Lanczos3)
    }
}

/// Forja ambos derivados JPEG: `(preview_q88, thumb_q85)`.
pub fn make_image_derivatives(original_bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), MediaError> {
    let decoded = image::load_from_memory(original_bytes)
        .map_err(|fault| MediaError::Image(format!("IMAGE_DECODE_FAULT: {fault}")))?;
    let canvas = decoded.to_rgb8();
    let (width, height) = canvas.dimensions();

    let (preview_width, preview_height) = preview_dimensions(width, height);
    let preview = encode_jpeg(&scaled(&canvas, preview_width, preview_height), PREVIEW_JPEG_QUALITY)?;

    let (thumb_width, thumb_height) = thumb_dimensions(width, height);
    let thumb = encode_jpeg(&scaled(&canvas, thumb_width, thumb_height), THUMB_JPEG_QUALITY)?;

    Ok((preview, thumb))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_canvas(width: u32, height: u32) -> Vec<u8> {
        let canvas = RgbImage::from_pixel(width, height, image::Rgb([120u8, 80, 40]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(canvas)
            .write_to(&mut buffer, image::ImageOutputFormat::Png)
            .expect("PNG de prueba");
        buffer.into_inner()
    }

    #[test]
    fn certify_dimension_arithmetic() {
        assert_eq!(preview_dimensions(3200, 1600), (1600, 800));
        assert_eq!(preview_dimensions(1600, 3200), (800, 1600));
        assert_eq!(preview_dimensions(640, 480), (640, 480));
        assert_eq!(thumb_dimensions(640, 480), (320, 240));
        assert_eq!(thumb_dimensions(100, 50), (100, 50));
        assert_eq!(thumb_dimensions(1, 6400), (1, 320));
    }

    #[test]
    fn certify_derivative_forge_bounds() {
        let (preview, thumb) = make_image_derivatives(&png_canvas(1920, 1080)).unwrap();

        let preview_img = image::load_from_memory(&preview).unwrap();
        assert_eq!((preview_img.width(), preview_img.height()), (1600, 900));

        let thumb_img = image::load_from_memory(&thumb).unwrap();
        assert_eq!((thumb_img.width(), thumb_img.height()), (320, 180));
    }

    #[test]
    fn certify_undecodable_bytes_fail_gracefully() {
        assert!(matches!(make_image_derivatives(b"not an image"), Err(MediaError::Image(_))));
    }
}
