//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::types::Format;

use super::types::parse_filter;
use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let compression = &self.compression;
        if compression.max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "compression.max_dimension must be > 0".into(),
            ));
        }
        if !(compression.target_ratio > 0.0 && compression.target_ratio <= 1.0) {
            return Err(ConfigError::ValidationError(
                "compression.target_ratio must be in (0.0, 1.0]".into(),
            ));
        }
        if compression.search_iterations == 0 || compression.search_iterations > 24 {
            return Err(ConfigError::ValidationError(
                "compression.search_iterations must be between 1 and 24".into(),
            ));
        }
        if !(0.0..=1.0).contains(&compression.fallback_quality) {
            return Err(ConfigError::ValidationError(
                "compression.fallback_quality must be between 0.0 and 1.0".into(),
            ));
        }
        match Format::parse(&compression.lossy_format) {
            Some(format) if format.supports_quality() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "compression.lossy_format must be \"jpeg\" or \"webp\", got {:?}",
                    compression.lossy_format
                )));
            }
        }
        if let Some(unknown) = compression
            .force_lossy
            .iter()
            .find(|name| Format::parse(name).is_none())
        {
            return Err(ConfigError::ValidationError(format!(
                "compression.force_lossy contains unknown format {unknown:?}"
            )));
        }
        if parse_filter(&compression.resize_filter).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "compression.resize_filter {:?} is not a known filter",
                compression.resize_filter
            )));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.batch.buffer_size == 0 {
            return Err(ConfigError::ValidationError(
                "batch.buffer_size must be > 0".into(),
            ));
        }
        if self.export.archive_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.archive_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}
