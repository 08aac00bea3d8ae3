//! Asset pipeline port.
//!
//! Compression, thumbnailing and upload storage live outside the core. The
//! editor only consumes what an [`AssetPipeline`] hands back.

use crate::element::{ElementId, ImageFormat, encode_data_url};
use crate::storage::BoxFuture;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Asset pipeline errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Result of uploading an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub data_url: String,
    pub thumbnail_data_url: String,
    pub original_size: Size,
}

/// Image upload backend.
#[cfg(not(target_arch = "wasm32"))]
pub trait AssetPipeline: Send + Sync {
    /// Process an image file for an element.
    fn upload_image(&self, element_id: ElementId, bytes: Vec<u8>) -> BoxFuture<'_, Result<UploadedImage, AssetError>>;
}

/// Image upload backend (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait AssetPipeline {
    /// Process an image file for an element.
    fn upload_image(&self, element_id: ElementId, bytes: Vec<u8>) -> BoxFuture<'_, Result<UploadedImage, AssetError>>;
}

/// Pipeline that embeds the original bytes as a `data:` URL.
///
/// The thumbnail is the original. Useful for tests and offline hosts.
#[derive(Debug, Default)]
pub struct InlineAssetPipeline;

impl InlineAssetPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Encode synchronously.
    pub fn encode(bytes: &[u8]) -> Result<UploadedImage, AssetError> {
        let format = ImageFormat::from_magic_bytes(bytes).ok_or(AssetError::UnsupportedFormat)?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AssetError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| AssetError::Decode(e.to_string()))?;
        let data_url = encode_data_url(format, bytes);
        Ok(UploadedImage {
            thumbnail_data_url: data_url.clone(),
            data_url,
            original_size: Size::new(f64::from(width), f64::from(height)),
        })
    }
}

impl AssetPipeline for InlineAssetPipeline {
    fn upload_image(&self, element_id: ElementId, bytes: Vec<u8>) -> BoxFuture<'_, Result<UploadedImage, AssetError>> {
        Box::pin(async move {
            let uploaded = Self::encode(&bytes)?;
            log::debug!(
                "Inlined {}x{} image for {}",
                uploaded.original_size.width,
                uploaded.original_size.height,
                element_id
            );
            Ok(uploaded)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::element::decode_data_url;
    use crate::storage::block_on;
    use image::{ImageBuffer, Rgba, RgbaImage};

    /// Encode a small PNG for tests.
    pub(crate) fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba([255, 0, 0, alpha]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_inline_upload() {
        let pipeline = InlineAssetPipeline::new();
        let uploaded = block_on(pipeline.upload_image(uuid::Uuid::new_v4(), png_bytes(4, 2, 255))).unwrap();
        assert_eq!(uploaded.original_size, Size::new(4.0, 2.0));
        let (format, _) = decode_data_url(&uploaded.data_url).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_rejects_unknown_bytes() {
        let result = InlineAssetPipeline::encode(b"definitely not an image");
        assert!(matches!(result, Err(AssetError::UnsupportedFormat)));
    }
}
