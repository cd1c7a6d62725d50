//! Image data-URI utilities
//!
//! Uploaded photos arrive as base64 data URIs and are downsampled to a
//! bounded width before persisting, to keep the stored payload manageable.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

/// Width bound applied to stored photos
pub const MAX_IMAGE_WIDTH: u32 = 400;

/// JPEG quality used when re-encoding a downsampled photo
const JPEG_QUALITY: u8 = 70;

/// Split a `data:<mime>;base64,<payload>` URI into mime type and raw bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidInput("Not a data URI".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput("Malformed data URI: no payload".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidInput("Data URI is not base64-encoded".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidInput(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime.to_string(), bytes))
}

/// Base64-encode raster bytes as a JPEG data URI
fn encode_jpeg_data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}

/// Downsample a data-URI image to fit within `max_width`.
///
/// An image that already fits is returned unchanged (exact identity). A wider
/// image is scaled proportionally and re-encoded as JPEG at fixed quality.
/// Anything that fails to decode (including non-data-URI strings such as the
/// demo seed URLs) passes through unchanged; resizing is best-effort.
pub fn resize_data_uri(uri: &str, max_width: u32) -> String {
    let (_, bytes) = match decode_data_uri(uri) {
        Ok(decoded) => decoded,
        Err(_) => return uri.to_string(),
    };

    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            debug!("Image decode failed, storing original: {}", e);
            return uri.to_string();
        }
    };

    if img.width() <= max_width {
        return uri.to_string();
    }

    // Proportional scale to the width bound (height at least 1)
    let new_height =
        ((img.height() as u64 * max_width as u64) / img.width() as u64).max(1) as u32;
    let scaled = img.resize_exact(max_width, new_height, image::imageops::FilterType::Triangle);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    match rgb.write_with_encoder(encoder) {
        Ok(()) => encode_jpeg_data_uri(&out),
        Err(e) => {
            debug!("JPEG encode failed, storing original: {}", e);
            uri.to_string()
        }
    }
}
