//! CLI enum types for the compress command.

use clap::ValueEnum;
use squish_core::{CollisionPolicy, OutputFormat as CoreOutputFormat};

/// Supported report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON document with images, failures and a summary
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Archive and output file name collision handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Collision {
    /// Keep every file, appending -1, -2, ... to repeated names
    Suffix,
    /// Later files replace earlier ones with the same name
    Overwrite,
}

impl From<Collision> for CollisionPolicy {
    fn from(collision: Collision) -> Self {
        match collision {
            Collision::Suffix => CollisionPolicy::Suffix,
            Collision::Overwrite => CollisionPolicy::Overwrite,
        }
    }
}
