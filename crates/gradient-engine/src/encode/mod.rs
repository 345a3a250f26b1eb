//! Image encoding of rendered pixmaps.

use std::fmt;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageError};

use crate::render::Pixmap;

/// Encoder turning a [`Pixmap`] into a lossless, alpha-capable image file.
pub trait ImageSink {
    fn encode(&self, pixmap: &Pixmap) -> Result<Vec<u8>, EncodeError>;

    /// MIME type of the encoded bytes.
    fn content_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}

/// PNG output through the `image` crate, RGBA8.
#[derive(Debug, Copy, Clone)]
pub struct PngSink {
    compression: CompressionType,
}

impl Default for PngSink {
    fn default() -> Self {
        Self { compression: CompressionType::Best }
    }
}

impl PngSink {
    /// Faster encoding at the cost of larger files.
    pub fn fast() -> Self {
        Self { compression: CompressionType::Fast }
    }
}

impl ImageSink for PngSink {
    fn encode(&self, pixmap: &Pixmap) -> Result<Vec<u8>, EncodeError> {
        let rgba = pixmap.to_rgba8();
        let mut out = Vec::new();

        PngEncoder::new_with_quality(&mut out, self.compression, FilterType::Adaptive)
            .write_image(&rgba, pixmap.width(), pixmap.height(), ExtendedColorType::Rgba8)
            .map_err(EncodeError)?;

        Ok(out)
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}

/// Encoder failure.
#[derive(Debug)]
pub struct EncodeError(pub ImageError);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image encoding failed: {}", self.0)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
