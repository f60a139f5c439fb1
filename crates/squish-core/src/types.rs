//! Core data types for the Squish compression pipeline.
//!
//! These types describe what goes into a pipeline run (a [`SelectedFile`]),
//! what the policy decides for it (a [`TargetSpec`]) and what comes out
//! (an [`EncodeResult`] wrapped in a [`CompressionOutcome`]).

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Raster formats the pipeline can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpeg,
    WebP,
    Png,
    Gif,
    Bmp,
    Tiff,
}

impl Format {
    /// Map a MIME-like tag (`image/png`, `IMAGE/JPEG; q=1`) to a format.
    ///
    /// Returns `None` for non-image tags and for image types without an
    /// encoder here (SVG, AVIF, HEIC, ...).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/png" | "image/x-png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/tiff" | "image/tiff-fx" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Parse a short format name as used in the config file (`"jpeg"`, `"jpg"`, `"webp"`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Canonical MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// File extension used for downloads and archive entries.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Short uppercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::WebP => "WEBP",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
        }
    }

    /// Whether the encoder exposes a continuous quality parameter.
    pub fn supports_quality(self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// The matching `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::WebP => ImageFormat::WebP,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }

    /// Map a detected `image` crate format back, if we can emit it.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::WebP),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Whether a MIME type names an image of any kind.
///
/// This is the same coarse test a browser file picker applies: anything under
/// `image/` counts, even if decoding it later fails.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_lowercase().starts_with("image/")
}

/// A file handed over by the host for compression.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// File name as shown to the user (no directories)
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// MIME type reported by the host
    pub mime_type: String,

    /// Raw file contents
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Build a selected file; `size` is taken from the byte length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the host labelled this file as an image.
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// Per-input compression target decided by the format policy.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    /// Longest edge allowed after resizing
    pub max_dimension: u32,

    /// Maximum acceptable output size in bytes
    pub target_byte_budget: u64,

    /// Output format when the native one is overridden
    pub force_format: Option<Format>,

    /// Composite over opaque white before encoding
    pub flatten_transparency: bool,

    /// Format the encoder will actually produce
    pub output_format: Format,
}

/// Bytes produced by one successful pipeline run.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// Encoded image
    pub bytes: Vec<u8>,

    /// Format of `bytes`
    pub format: Format,

    /// Quality in `[0, 1]`, or `None` for a default-settings encode
    pub quality_used: Option<f32>,
}

impl EncodeResult {
    /// Encoded size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// The unit shown to the user and optionally archived.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// Name of the source file
    pub original_name: String,

    /// Size of the source file in bytes
    pub original_size_bytes: u64,

    /// MIME type of the source file
    pub original_mime_type: String,

    /// Source bytes, kept for side-by-side previews
    pub original_bytes: Arc<[u8]>,

    /// Compressed output
    pub encode_result: EncodeResult,

    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Human-readable summary, e.g. `JPEG q=0.84, 182.4 KB (-91%)`
    pub display_label: String,
}

impl CompressionOutcome {
    pub fn new(source: &SelectedFile, encode_result: EncodeResult, width: u32, height: u32) -> Self {
        let display_label = display_label(source.size, &encode_result);
        Self {
            original_name: source.name.clone(),
            original_size_bytes: source.size,
            original_mime_type: source.mime_type.clone(),
            original_bytes: source.bytes.clone(),
            encode_result,
            width,
            height,
            display_label,
        }
    }

    /// Compressed size in bytes.
    pub fn compressed_size_bytes(&self) -> u64 {
        self.encode_result.len()
    }

    /// `<original-basename>.<output-extension>`
    pub fn download_name(&self) -> String {
        format!(
            "{}.{}",
            basename(&self.original_name),
            self.encode_result.format.extension()
        )
    }

    /// Fraction of the original size saved (negative if the output grew).
    pub fn savings(&self) -> f64 {
        if self.original_size_bytes == 0 {
            return 0.0;
        }
        1.0 - self.compressed_size_bytes() as f64 / self.original_size_bytes as f64
    }
}

/// File name without its last extension.
pub fn basename(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Format a byte count as B / KB / MB (decimal units).
pub fn format_size(bytes: u64) -> String {
    if bytes < 1_000 {
        format!("{bytes} B")
    } else if bytes < 1_000_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{:.2} MB", bytes as f64 / 1_000_000.0)
    }
}

fn display_label(original_size: u64, result: &EncodeResult) -> String {
    let quality = match result.quality_used {
        Some(q) => format!(" q={q:.2}"),
        None => String::new(),
    };
    let change = if original_size > 0 {
        let pct = (1.0 - result.len() as f64 / original_size as f64) * 100.0;
        format!(" (-{:.0}%)", pct.max(0.0))
    } else {
        String::new()
    };
    format!(
        "{}{}, {}{}",
        result.format.label(),
        quality,
        format_size(result.len()),
        change
    )
}
