//! Input validation before decode.

use crate::config::LimitsConfig;
use crate::error::DecodeError;

/// Validates raw input bytes before they reach the decoder.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - Size is within limits
    /// - Header carries a signature the decoder can sniff
    pub fn validate(&self, bytes: &[u8]) -> Result<(), DecodeError> {
        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if bytes.len() as u64 > max_bytes {
            return Err(DecodeError::FileTooLarge {
                size_mb: bytes.len() as u64 / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        if !Self::is_valid_image_header(bytes) {
            return Err(DecodeError::UnrecognizedFormat);
        }

        Ok(())
    }

    /// Check the header against every signature the `image` crate detects.
    ///
    /// This is the same table `ImageReader::with_guessed_format` consults, so
    /// anything accepted here reaches a decoder (ICO, QOI, PNM, HDR, ... as
    /// well as the common web formats).
    fn is_valid_image_header(header: &[u8]) -> bool {
        image::guess_format(header).is_ok()
    }
}
