//! Per-image compression pipeline.
//!
//! Stages, in the order a single image moves through them:
//! - **validate**: Size limit and magic-byte check on the raw bytes
//! - **decode**: Content-sniffed decode into a bitmap
//! - **resize**: Fit the bitmap within the maximum dimension
//! - **policy**: Choose output format, budget and flattening
//! - **flatten**: Composite transparency onto white
//! - **search**: Bisect encoder quality against the byte budget
//! - **encode**: The single re-encode primitive the search drives
//! - **processor**: Orchestrates the stages above

pub mod decode;
pub mod encode;
pub mod flatten;
pub mod policy;
pub mod processor;
pub mod resize;
pub mod search;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use encode::{CodecEncoder, ImageEncode};
pub use flatten::flatten_onto_white;
pub use policy::FormatPolicy;
pub use processor::ImageCompressor;
pub use resize::{fit_dimensions, resize_to_fit};
pub use search::QualitySearch;
pub use validate::Validator;
