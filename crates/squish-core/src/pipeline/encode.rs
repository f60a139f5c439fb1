//! The re-encode primitive: bitmap in, encoded bytes out.
//!
//! JPEG goes through the `image` crate's encoder and WebP through libwebp
//! (the `image` crate can only write lossless WebP). Every other format is
//! written with the `image` crate's default settings.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;

use crate::error::EncodeError;
use crate::types::Format;

/// JPEG quality used when no quality is requested.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.92;

/// WebP quality used when no quality is requested.
pub const DEFAULT_WEBP_QUALITY: f32 = 0.80;

/// Encodes a bitmap into a given format.
///
/// `quality` is in `[0, 1]` and only meaningful for formats where
/// [`Format::supports_quality`] is true. `None` means encoder defaults.
pub trait ImageEncode: Send + Sync {
    fn encode(
        &self,
        image: &DynamicImage,
        format: Format,
        quality: Option<f32>,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Encoder backed by the `image` and `webp` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecEncoder;

impl ImageEncode for CodecEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        format: Format,
        quality: Option<f32>,
    ) -> Result<Vec<u8>, EncodeError> {
        let bytes = match format {
            Format::Jpeg => encode_jpeg(image, quality.unwrap_or(DEFAULT_JPEG_QUALITY))?,
            Format::WebP => encode_webp(image, quality.unwrap_or(DEFAULT_WEBP_QUALITY))?,
            other => encode_default(image, other)?,
        };

        if bytes.is_empty() {
            return Err(EncodeError::Empty {
                format: format.label(),
            });
        }
        Ok(bytes)
    }
}

/// Map a `[0, 1]` quality onto the JPEG encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality));
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::Codec {
            format: Format::Jpeg.label(),
            message: e.to_string(),
        })?;
    Ok(buf)
}

fn encode_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(0.0, 1.0) * 100.0;
    // libwebp rejects sides above 16383 px
    let encoded = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        webp::Encoder::from_rgba(&rgba, w, h).encode_simple(false, quality)
    } else {
        let rgb = image.to_rgb8();
        let (w, h) = rgb.dimensions();
        webp::Encoder::from_rgb(&rgb, w, h).encode_simple(false, quality)
    };
    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| EncodeError::Codec {
            format: Format::WebP.label(),
            message: format!("{e:?}"),
        })
}

fn encode_default(image: &DynamicImage, format: Format) -> Result<Vec<u8>, EncodeError> {
    // Normalize to 8-bit RGB(A); not every encoder accepts 16-bit or gray+alpha input.
    let normalized = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let mut buffer = Cursor::new(Vec::new());
    normalized
        .write_to(&mut buffer, format.image_format())
        .map_err(|e| EncodeError::Codec {
            format: format.label(),
            message: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x * y) % 256) as u8])
        }))
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.1), 10);
        assert_eq!(jpeg_quality(0.5), 50);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(1.5), 100);
    }

    #[test]
    fn test_jpeg_output_has_soi_marker() {
        let bytes = CodecEncoder
            .encode(&gradient(64, 64), Format::Jpeg, Some(0.5))
            .unwrap();
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_jpeg_size_grows_with_quality() {
        let img = gradient(128, 128);
        let low = CodecEncoder.encode(&img, Format::Jpeg, Some(0.1)).unwrap();
        let high = CodecEncoder.encode(&img, Format::Jpeg, Some(0.95)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_jpeg_accepts_rgba_input() {
        let img = DynamicImage::new_rgba8(16, 16);
        assert!(CodecEncoder.encode(&img, Format::Jpeg, Some(0.8)).is_ok());
    }

    #[test]
    fn test_webp_output_has_riff_header() {
        let bytes = CodecEncoder
            .encode(&gradient(64, 64), Format::WebP, Some(0.6))
            .unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_webp_oversized_side_is_codec_error() {
        let img = DynamicImage::new_rgb8(17_000, 2);
        let err = CodecEncoder
            .encode(&img, Format::WebP, Some(0.5))
            .unwrap_err();
        assert!(matches!(err, EncodeError::Codec { format: "WEBP", .. }));
    }

    #[test]
    fn test_bmp_default_encode() {
        let bytes = CodecEncoder.encode(&gradient(8, 8), Format::Bmp, None).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
    }

    #[test]
    fn test_png_default_encode_keeps_alpha() {
        let img = DynamicImage::new_rgba8(8, 8);
        let bytes = CodecEncoder.encode(&img, Format::Png, None).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }
}
