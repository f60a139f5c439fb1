//! Sub-configuration structs with their defaults.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::types::Format;

/// Compression targets and quality-search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Longest edge after resizing, in pixels
    pub max_dimension: u32,

    /// Output budget as a fraction of the original file size
    pub target_ratio: f64,

    /// Number of bisection steps over encoder quality.
    /// 7 steps resolve quality to 1/128.
    pub search_iterations: u32,

    /// Quality used when no searched quality fits the budget
    pub fallback_quality: f32,

    /// Input formats that are always re-encoded as `lossy_format`
    pub force_lossy: Vec<String>,

    /// Lossy format used for forced conversions ("jpeg" or "webp")
    pub lossy_format: String,

    /// Resampling filter: nearest, triangle, catmullrom, gaussian, lanczos3
    pub resize_filter: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1920,
            target_ratio: 0.10,
            search_iterations: 7,
            fallback_quality: 0.1,
            force_lossy: vec!["png".to_string()],
            lossy_format: "jpeg".to_string(),
            resize_filter: "lanczos3".to_string(),
        }
    }
}

impl CompressionConfig {
    /// Resolved lossy output format. Unknown names fall back to JPEG.
    pub fn lossy_format(&self) -> Format {
        Format::parse(&self.lossy_format).unwrap_or(Format::Jpeg)
    }

    /// Resolved list of formats that get forced through the lossy encoder.
    pub fn forced_formats(&self) -> Vec<Format> {
        self.force_lossy
            .iter()
            .filter_map(|name| Format::parse(name))
            .collect()
    }

    /// Resolved resampling filter. Unknown names fall back to Lanczos3.
    pub fn filter(&self) -> FilterType {
        parse_filter(&self.resize_filter).unwrap_or(FilterType::Lanczos3)
    }
}

pub(crate) fn parse_filter(name: &str) -> Option<FilterType> {
    match name.to_lowercase().as_str() {
        "nearest" => Some(FilterType::Nearest),
        "triangle" | "bilinear" => Some(FilterType::Triangle),
        "catmullrom" | "bicubic" => Some(FilterType::CatmullRom),
        "gaussian" => Some(FilterType::Gaussian),
        "lanczos3" => Some(FilterType::Lanczos3),
        _ => None,
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum decoded image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
        }
    }
}

/// Batch coordination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Capacity of the completion mailbox
    pub buffer_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { buffer_size: 64 }
    }
}

/// What to do when two outputs map to the same archive entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep every file: `photo.jpeg`, `photo-1.jpeg`, `photo-2.jpeg`, ...
    #[default]
    Suffix,
    /// Last write wins; earlier entries with the same name are dropped
    Overwrite,
}

/// Archive and download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name of the bulk archive
    pub archive_name: String,

    /// Entry name collision handling
    pub collision: CollisionPolicy,

    /// Directory that compressed files and the archive are written to
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_name: "compressed_images.zip".to_string(),
            collision: CollisionPolicy::Suffix,
            output_dir: "~/Downloads/squish".to_string(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Embed base64 data URLs of original and compressed images
    pub include_previews: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
            include_previews: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_defaults() {
        let config = CompressionConfig::default();
        assert_eq!(config.lossy_format(), Format::Jpeg);
        assert_eq!(config.forced_formats(), vec![Format::Png]);
        assert_eq!(config.filter(), FilterType::Lanczos3);
        assert!((config.fallback_quality - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("Nearest"), Some(FilterType::Nearest));
        assert_eq!(parse_filter("bilinear"), Some(FilterType::Triangle));
        assert_eq!(parse_filter("sinc"), None);
    }

    #[test]
    fn test_collision_policy_serde() {
        let json = serde_json::to_string(&CollisionPolicy::Overwrite).unwrap();
        assert_eq!(json, "\"overwrite\"");
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Suffix);
    }
}
