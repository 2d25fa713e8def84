//! Image normalization to baseline JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError, RgbImage};

/// Extensions treated as images and subject to JPEG normalization.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// How one object's bytes are handled during materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlingMode {
    /// Decode and re-encode as JPEG.
    Image,
    /// Copy verbatim.
    Opaque,
}

/// Classifies a key by the extension of its final path segment.
///
/// Total and pure: every key maps to exactly one mode, and the result
/// depends only on the lower-cased extension.
pub fn classify_key(key: &str) -> HandlingMode {
    match key_extension(key) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => HandlingMode::Image,
        _ => HandlingMode::Opaque,
    }
}

/// Extension of the key's final segment, lower-cased.
///
/// `None` when the segment has no `.` past its first character (dotfiles
/// like `.env` have no extension).
pub fn key_extension(key: &str) -> Option<String> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(name[dot + 1..].to_ascii_lowercase())
}

/// Decodes `bytes` and re-encodes the pixels as a baseline JPEG at the
/// given quality.
///
/// Images carrying an alpha channel are composited onto an opaque white
/// background first; everything else is converted to plain RGB. Any decode
/// or encode failure is returned to the caller, which is expected to fall
/// back to the original bytes.
pub fn transcode_to_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = flatten_to_rgb(decoded);

    let mut encoded = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, quality))?;
    Ok(encoded)
}

/// Drops any alpha channel by blending onto white; returns plain RGB pixels.
fn flatten_to_rgb(decoded: DynamicImage) -> RgbImage {
    if !decoded.color().has_alpha() {
        return decoded.into_rgb8();
    }

    let rgba = decoded.into_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (out, pixel) in rgb.pixels_mut().zip(rgba.pixels()) {
        let alpha = pixel[3] as u32;
        for channel in 0..3 {
            let value = pixel[channel] as u32;
            // out = src * a + white * (1 - a), in 0..=255 integer arithmetic
            out[channel] = ((value * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
    }

    rgb
}
