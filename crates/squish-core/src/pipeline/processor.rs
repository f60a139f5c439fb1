//! Pipeline orchestration - wires together all compression stages.

use image::imageops::FilterType;
use image::GenericImageView;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{DecodeError, EncodeError, PipelineError, PipelineResult};
use crate::types::{CompressionOutcome, Format, SelectedFile};

use super::decode::ImageDecoder;
use super::encode::{CodecEncoder, ImageEncode};
use super::flatten::flatten_onto_white;
use super::policy::FormatPolicy;
use super::resize::resize_to_fit;
use super::search::QualitySearch;
use super::validate::Validator;

/// Compresses one image at a time: validate, decode, resize, apply the
/// format policy, flatten if required, then search for the best quality.
///
/// Holds no per-image state, so one instance can be shared across tasks.
pub struct ImageCompressor {
    validator: Validator,
    decoder: ImageDecoder,
    policy: FormatPolicy,
    search: QualitySearch,
    filter: FilterType,
    encoder: Arc<dyn ImageEncode>,
}

impl ImageCompressor {
    /// Create a compressor backed by the real codecs.
    pub fn new(config: &Config) -> Self {
        Self::with_encoder(config, Arc::new(CodecEncoder))
    }

    /// Create a compressor with a custom re-encode primitive.
    pub fn with_encoder(config: &Config, encoder: Arc<dyn ImageEncode>) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            policy: FormatPolicy::new(&config.compression),
            search: QualitySearch::from_config(&config.compression),
            filter: config.compression.filter(),
            encoder,
        }
    }

    pub fn policy(&self) -> &FormatPolicy {
        &self.policy
    }

    /// Run the full pipeline for one selected file.
    pub fn compress(&self, file: &SelectedFile) -> PipelineResult<CompressionOutcome> {
        let start = std::time::Instant::now();
        tracing::debug!("Compressing: {} ({} bytes)", file.name, file.size);

        self.validator
            .validate(&file.bytes)
            .map_err(|e| decode_error(file, e))?;

        let decode_start = std::time::Instant::now();
        let decoded = self
            .decoder
            .decode(&file.bytes)
            .map_err(|e| decode_error(file, e))?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        if Format::from_image_format(decoded.format) != Format::from_mime(&file.mime_type) {
            tracing::debug!(
                "{}: declared {:?} but content is {:?}",
                file.name,
                file.mime_type,
                decoded.format
            );
        }

        let target = self.policy.target_for(&file.mime_type, file.size);

        let resize_start = std::time::Instant::now();
        let image = resize_to_fit(decoded.image, target.max_dimension, self.filter);
        tracing::trace!("  Resize: {:?}", resize_start.elapsed());

        // JPEG output drops alpha, so composite over white rather than black.
        let image = if target.flatten_transparency || !target.output_format.supports_alpha() {
            flatten_onto_white(image)
        } else {
            image
        };
        let (width, height) = image.dimensions();

        let search_start = std::time::Instant::now();
        let result = self
            .search
            .run(
                self.encoder.as_ref(),
                &image,
                target.output_format,
                target.target_byte_budget,
            )
            .map_err(|e| encode_error(file, e))?;
        tracing::trace!("  Search: {:?}", search_start.elapsed());

        tracing::debug!(
            "Compressed {:?} in {:?}: {}x{} -> {}x{}, {} -> {} bytes as {}",
            file.name,
            start.elapsed(),
            decoded.width,
            decoded.height,
            width,
            height,
            file.size,
            result.len(),
            result.format.label()
        );

        Ok(CompressionOutcome::new(file, result, width, height))
    }
}

fn decode_error(file: &SelectedFile, source: DecodeError) -> PipelineError {
    PipelineError::Decode {
        name: file.name.clone(),
        source,
    }
}

fn encode_error(file: &SelectedFile, source: EncodeError) -> PipelineError {
    PipelineError::Encode {
        name: file.name.clone(),
        source,
    }
}
