//! Image format detection and upload staging
//!
//! Uploaded outfit photos arrive as raw bytes. They are checked against the
//! accepted formats and written to a temporary file whose path is handed to
//! the caption and mood services.

pub mod staging;

pub use staging::StagedImage;

use crate::{Error, Result};
use image::ImageFormat;

/// Upload formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Sniff the format from magic bytes.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Image data is empty".to_string()));
        }

        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Ok(ImageKind::Png),
            Ok(ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
            Ok(other) => Err(Error::InvalidInput(format!(
                "Unsupported image format {:?}; upload a PNG or JPEG",
                other
            ))),
            Err(_) => {
                tracing::warn!(
                    "Unrecognized image data (first 4 bytes: {:02X?})",
                    &bytes[..bytes.len().min(4)]
                );
                Err(Error::InvalidInput(
                    "Unrecognized image data; upload a PNG or JPEG".to_string(),
                ))
            }
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }
}
