//! Squish Core - budget-driven image compression.
//!
//! Every image is resized to fit a maximum dimension and re-encoded at the
//! highest quality whose output stays within a byte budget (10% of the
//! original by default). Results can be offered one by one or bundled into a
//! single zip archive.
//!
//! ```text
//! bytes → Validate → Decode → Resize → Policy → Flatten → Quality search → Outcome
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use squish_core::{BatchCoordinator, Config, ExportPackager, FileSelector};
//!
//! #[tokio::main]
//! async fn main() -> squish_core::Result<()> {
//!     let config = Config::load()?;
//!     let files = FileSelector::new(false).select(&["./photos".into()])?;
//!
//!     let mut batch = BatchCoordinator::new(&config);
//!     batch.select(files);
//!     let state = batch.run_to_completion().await;
//!
//!     if state.is_export_ready() {
//!         ExportPackager::new(&config.export).write_to_dir(&config.output_dir(), state.outcomes())?;
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod selection;
pub mod types;

// Re-exports for convenient access
pub use batch::{BatchCoordinator, BatchEvent, BatchPhase, BatchState, FailedImage};
pub use config::{CollisionPolicy, Config};
pub use error::{
    ConfigError, DecodeError, EncodeError, ExportError, PipelineError, PipelineResult, Result,
    SquishError,
};
pub use export::ExportPackager;
pub use output::{BatchReport, BatchSummary, OutputFormat, OutputWriter};
pub use pipeline::{ImageCompressor, ImageEncode, QualitySearch};
pub use preview::PreviewRecord;
pub use selection::FileSelector;
pub use types::{CompressionOutcome, EncodeResult, Format, SelectedFile, TargetSpec};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
