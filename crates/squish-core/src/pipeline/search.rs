//! Budget-driven quality search.
//!
//! Encoded size grows monotonically with quality for a given encoder, so a
//! fixed number of bisection steps over `[0, 1]` finds the highest quality
//! that fits the byte budget to within `2^-iterations`. The step count is
//! fixed: there is no early exit, which bounds the number of encodes per
//! image.

use image::DynamicImage;

use crate::config::CompressionConfig;
use crate::error::EncodeError;
use crate::types::{EncodeResult, Format};

use super::encode::ImageEncode;

/// Bisection over encoder quality against a byte budget.
#[derive(Debug, Clone, Copy)]
pub struct QualitySearch {
    iterations: u32,
    fallback_quality: f32,
}

impl QualitySearch {
    pub fn new(iterations: u32, fallback_quality: f32) -> Self {
        Self {
            iterations,
            fallback_quality,
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::new(config.search_iterations, config.fallback_quality)
    }

    /// Number of bisection steps per search.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Encode `image` as `format`, aiming for the highest quality whose
    /// output is at most `budget` bytes.
    ///
    /// - Formats without a quality parameter are encoded once with default
    ///   settings; the budget is not enforced.
    /// - If no searched quality fits, one more encode at the fallback
    ///   quality is returned even though it exceeds the budget. Should that
    ///   encode fail, the smallest over-budget attempt is returned instead.
    pub fn run(
        &self,
        encoder: &dyn ImageEncode,
        image: &DynamicImage,
        format: Format,
        budget: u64,
    ) -> Result<EncodeResult, EncodeError> {
        if !format.supports_quality() {
            let bytes = encoder.encode(image, format, None)?;
            tracing::debug!(
                "{} has no quality parameter, single encode: {} bytes",
                format.label(),
                bytes.len()
            );
            return Ok(EncodeResult {
                bytes,
                format,
                quality_used: None,
            });
        }

        let mut low = 0.0f32;
        let mut high = 1.0f32;
        let mut best: Option<(Vec<u8>, f32)> = None;
        let mut smallest_over: Option<(Vec<u8>, f32)> = None;

        for step in 0..self.iterations {
            let mid = (low + high) / 2.0;
            match encoder.encode(image, format, Some(mid)) {
                Ok(bytes) if bytes.len() as u64 <= budget => {
                    tracing::trace!(
                        "  step {}: q={:.4} -> {} bytes (fits {})",
                        step + 1,
                        mid,
                        bytes.len(),
                        budget
                    );
                    best = Some((bytes, mid));
                    low = mid;
                }
                Ok(bytes) => {
                    tracing::trace!(
                        "  step {}: q={:.4} -> {} bytes (over {})",
                        step + 1,
                        mid,
                        bytes.len(),
                        budget
                    );
                    if smallest_over
                        .as_ref()
                        .map_or(true, |(smallest, _)| bytes.len() < smallest.len())
                    {
                        smallest_over = Some((bytes, mid));
                    }
                    high = mid;
                }
                Err(e) => {
                    tracing::trace!("  step {}: q={:.4} -> {}", step + 1, mid, e);
                    high = mid;
                }
            }
        }

        if let Some((bytes, quality)) = best {
            tracing::debug!(
                "{} converged at q={:.4}: {} bytes (budget {})",
                format.label(),
                quality,
                bytes.len(),
                budget
            );
            return Ok(EncodeResult {
                bytes,
                format,
                quality_used: Some(quality),
            });
        }

        let (bytes, quality) = match encoder.encode(image, format, Some(self.fallback_quality)) {
            Ok(bytes) => (bytes, self.fallback_quality),
            Err(e) => {
                tracing::debug!("Fallback encode failed: {}", e);
                smallest_over.ok_or(EncodeError::Exhausted {
                    attempts: self.iterations + 1,
                })?
            }
        };
        tracing::debug!(
            "{} budget {} unreachable, settled at q={:.4}: {} bytes",
            format.label(),
            budget,
            quality,
            bytes.len()
        );
        Ok(EncodeResult {
            bytes,
            format,
            quality_used: Some(quality),
        })
    }
}

impl Default for QualitySearch {
    fn default() -> Self {
        Self::from_config(&CompressionConfig::default())
    }
}
