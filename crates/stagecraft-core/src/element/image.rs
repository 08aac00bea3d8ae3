//! Image sources for image and background elements.

use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Where an image element gets its pixels from.
///
/// `src` is whatever the asset pipeline handed back: usually a `data:` URL,
/// occasionally a remote URL the core cannot decode itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Pixel size of the uploaded original.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<Size>,
}

impl ImageSource {
    /// Aspect ratio (width / height) of the original, if known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.original_size
            .filter(|s| s.width > 0.0 && s.height > 0.0)
            .map(|s| s.width / s.height)
    }
}

/// Decode a base64 `data:` URL into its format and raw bytes.
pub fn decode_data_url(url: &str) -> Option<(ImageFormat, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    let format = ImageFormat::from_mime_type(mime).or_else(|| ImageFormat::from_magic_bytes(&bytes))?;
    Some((format, bytes))
}

/// Encode raw bytes as a base64 `data:` URL.
pub fn encode_data_url(format: ImageFormat, data: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data))
}

/// Scale `source` to fit within `max` while preserving its aspect ratio.
pub fn fit_within(source: Size, max: Size) -> Size {
    if source.width <= 0.0 || source.height <= 0.0 || max.height <= 0.0 {
        return max;
    }
    let aspect = source.width / source.height;
    let target_aspect = max.width / max.height;

    if aspect > target_aspect {
        // Wider than target - fit to width
        Size::new(max.width, max.width / aspect)
    } else {
        // Taller than target - fit to height
        Size::new(max.height * aspect, max.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::from_magic_bytes(&png_header), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime_type("IMAGE/JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime_type("image/gif"), None);
    }

    #[test]
    fn test_data_url_roundtrip() {
        let bytes = vec![1u8, 2, 3, 4, 5];
        let url = encode_data_url(ImageFormat::Png, &bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        let (format, decoded) = decode_data_url(&url).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_remote_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(decode_data_url("data:image/png,notbase64").is_none());
    }

    #[test]
    fn test_fit_within() {
        let fitted = fit_within(Size::new(1000.0, 500.0), Size::new(400.0, 400.0));
        assert!((fitted.width - 400.0).abs() < 0.01);
        assert!((fitted.height - 200.0).abs() < 0.01);

        let fitted = fit_within(Size::new(100.0, 400.0), Size::new(200.0, 200.0));
        assert!((fitted.width - 50.0).abs() < 0.01);
        assert!((fitted.height - 200.0).abs() < 0.01);
    }
}
