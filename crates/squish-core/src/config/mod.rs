//! Configuration management for Squish.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is `#[serde(default)]`, so a config file only has
//! to name the values it changes.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Squish.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compression targets and search settings
    pub compression: CompressionConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Batch coordination settings
    pub batch: BatchConfig,

    /// Archive and download settings
    pub export: ExportConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.squish.squish/config.toml
    /// - Linux: ~/.config/squish/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\squish\config\config.toml
    ///
    /// Falls back to ~/.squish/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "squish", "squish")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".squish").join("config.toml")
            })
    }

    /// Get the resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.export.output_dir);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Format;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.compression.max_dimension, 1920);
        assert_eq!(config.compression.search_iterations, 7);
        assert!((config.compression.target_ratio - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.batch.buffer_size, 64);
        assert_eq!(config.export.archive_name, "compressed_images.zip");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[compression]"));
        assert!(toml.contains("[export]"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [compression]
            max_dimension = 1024
            lossy_format = "webp"
            "#,
        )
        .unwrap();
        assert_eq!(config.compression.max_dimension, 1024);
        assert_eq!(config.compression.lossy_format(), Format::WebP);
        assert_eq!(config.compression.search_iterations, 7);
        assert_eq!(config.limits.max_file_size_mb, 100);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.compression.max_dimension, config.compression.max_dimension);
        assert_eq!(parsed.export.collision, config.export.collision);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\ncollision = \"overwrite\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.export.collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compression]\ntarget_ratio = 0.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("target_ratio"));
    }

    #[test]
    fn test_output_dir_absolute_path() {
        let mut config = Config::default();
        config.export.output_dir = "/tmp/squish-out".to_string();
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/squish-out"));
    }
}
