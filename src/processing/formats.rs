//! Image format sniffing and the WebP encode boundary

use image::DynamicImage;
use serde::Serialize;

/// Formats recognised by header sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    WebP,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Get file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }
}

/// Detect image format from file header (magic bytes)
pub fn detect_format_from_header(data: &[u8]) -> Option<ImageFormat> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }

    None
}

/// Encode a decoded image as lossy WebP.
///
/// Images with an alpha channel are encoded as RGBA, everything else as RGB.
/// `quality` is clamped to 0-100.
pub fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let quality = f32::from(quality.min(100));

    let encoded = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, quality)
            .map_err(|e| format!("{:?}", e))?
            .to_vec()
    } else {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, quality)
            .map_err(|e| format!("{:?}", e))?
            .to_vec()
    };

    Ok(encoded)
}
