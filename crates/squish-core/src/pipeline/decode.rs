//! Image decoding with content-based format detection.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::DecodeError;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Format detected from the content
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image from an in-memory byte buffer.
    ///
    /// The format is sniffed from the content, so a PNG saved as `.jpg` still
    /// decodes as PNG.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DecodeError::Codec(format!("Cannot detect image format: {}", e)))?;
        let format = reader.format().ok_or(DecodeError::UnrecognizedFormat)?;
        let image = reader
            .decode()
            .map_err(|e| DecodeError::Codec(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(DecodeError::ImageTooLarge {
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
