//! Error types for the Squish compression pipeline.
//!
//! Errors are organized by stage. Every per-image failure is a
//! [`PipelineError`] that names the input it belongs to, so a batch can record
//! it and keep going with the sibling images.

use thiserror::Error;

/// Top-level error type for Squish operations.
#[derive(Error, Debug)]
pub enum SquishError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-image pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Archive packaging errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// The input bytes could not be turned into a bitmap.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Header does not match any supported raster signature
    #[error("unrecognized image signature")]
    UnrecognizedFormat,

    /// Input is larger than the configured limit
    #[error("file too large ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge { size_mb: u64, max_mb: u64 },

    /// Decoded bitmap exceeds the configured dimension limit
    #[error("image too large ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The codec rejected the data
    #[error("{0}")]
    Codec(String),
}

/// The re-encode primitive failed to produce output.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The codec reported an error
    #[error("{format} encoder failed: {message}")]
    Codec {
        format: &'static str,
        message: String,
    },

    /// The codec returned zero bytes
    #[error("{format} encoder produced no data")]
    Empty { format: &'static str },

    /// Every search attempt, including the low-quality fallback, produced nothing
    #[error("no data from {attempts} encode attempts")]
    Exhausted { attempts: u32 },
}

/// A failure attributable to one input image.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Decode stage failed
    #[error("Decode error for {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    /// Encode stage failed
    #[error("Encode error for {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: EncodeError,
    },

    /// The worker running the pipeline panicked or was cancelled
    #[error("Worker for {name} did not finish: {message}")]
    Blocking { name: String, message: String },
}

impl PipelineError {
    /// Name of the input this failure belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Decode { name, .. } | Self::Encode { name, .. } | Self::Blocking { name, .. } => {
                name
            }
        }
    }
}

/// Archive packaging errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to put in the archive
    #[error("no compressed images to export")]
    Empty,

    /// The zip writer failed
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing the archive failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Squish results.
pub type Result<T> = std::result::Result<T, SquishError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_names_file() {
        let err = PipelineError::Decode {
            name: "broken.png".to_string(),
            source: DecodeError::UnrecognizedFormat,
        };
        assert_eq!(err.file_name(), "broken.png");
        assert_eq!(
            err.to_string(),
            "Decode error for broken.png: unrecognized image signature"
        );
    }

    #[test]
    fn test_exhausted_message() {
        let err = EncodeError::Exhausted { attempts: 8 };
        assert_eq!(err.to_string(), "no data from 8 encode attempts");
    }

    #[test]
    fn test_pipeline_error_converts_to_top_level() {
        let err: SquishError = PipelineError::Encode {
            name: "a.jpg".to_string(),
            source: EncodeError::Empty { format: "JPEG" },
        }
        .into();
        assert!(err.to_string().starts_with("Pipeline error: Encode error for a.jpg"));
    }
}
