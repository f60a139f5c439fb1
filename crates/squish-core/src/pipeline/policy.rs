//! Per-format output policy: which format to encode to and with what budget.

use crate::config::CompressionConfig;
use crate::types::{Format, TargetSpec};

/// Decides the compression target for each input.
///
/// Formats in the forced set (PNG by default) are re-encoded with the lossy
/// encoder and flattened onto white, since their own encoders have no
/// quality knob. Everything else keeps its native format.
#[derive(Debug, Clone)]
pub struct FormatPolicy {
    max_dimension: u32,
    target_ratio: f64,
    forced: Vec<Format>,
    lossy_format: Format,
}

impl FormatPolicy {
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            target_ratio: config.target_ratio,
            forced: config.forced_formats(),
            lossy_format: config.lossy_format(),
        }
    }

    /// Byte budget for an input of the given size.
    pub fn budget_for(&self, original_size_bytes: u64) -> u64 {
        (original_size_bytes as f64 * self.target_ratio).floor() as u64
    }

    /// Build the target for an input with the given MIME type and size.
    ///
    /// Image types we cannot emit natively are written as PNG, the same
    /// fallback a browser canvas applies for unsupported types.
    pub fn target_for(&self, mime_type: &str, original_size_bytes: u64) -> TargetSpec {
        let native = Format::from_mime(mime_type).unwrap_or_else(|| {
            tracing::debug!("No native encoder for {:?}, falling back to PNG", mime_type);
            Format::Png
        });
        let force_format = Format::from_mime(mime_type)
            .filter(|format| self.forced.contains(format))
            .map(|_| self.lossy_format);

        TargetSpec {
            max_dimension: self.max_dimension,
            target_byte_budget: self.budget_for(original_size_bytes),
            force_format,
            flatten_transparency: force_format.is_some(),
            output_format: force_format.unwrap_or(native),
        }
    }
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self::new(&CompressionConfig::default())
    }
}
