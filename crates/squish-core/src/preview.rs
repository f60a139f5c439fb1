//! Per-image preview records for the host to render.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::types::CompressionOutcome;

/// Everything a host needs to show one compressed image next to its original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRecord {
    pub original_name: String,
    pub original_size_bytes: u64,

    /// `data:` URL of the original, when previews are requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_preview: Option<String>,

    /// `data:` URL of the compressed output, when previews are requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_preview: Option<String>,

    pub compressed_size_bytes: u64,

    /// Display label, e.g. `JPEG q=0.84, 182.4 KB (-91%)`
    pub format_label: String,

    pub download_name: String,

    /// Quality used, absent for default-settings encodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,

    pub width: u32,
    pub height: u32,
}

impl PreviewRecord {
    /// Build a record; `with_previews` embeds both images as data URLs.
    pub fn from_outcome(outcome: &CompressionOutcome, with_previews: bool) -> Self {
        let (original_preview, compressed_preview) = if with_previews {
            (
                Some(data_url(&outcome.original_mime_type, &outcome.original_bytes)),
                Some(data_url(
                    outcome.encode_result.mime_type(),
                    &outcome.encode_result.bytes,
                )),
            )
        } else {
            (None, None)
        };

        Self {
            original_name: outcome.original_name.clone(),
            original_size_bytes: outcome.original_size_bytes,
            original_preview,
            compressed_preview,
            compressed_size_bytes: outcome.compressed_size_bytes(),
            format_label: outcome.display_label.clone(),
            download_name: outcome.download_name(),
            quality: outcome.encode_result.quality_used,
            width: outcome.width,
            height: outcome.height,
        }
    }
}

/// Encode bytes as a `data:<mime>;base64,...` URL.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EncodeResult, Format, SelectedFile};

    fn outcome() -> CompressionOutcome {
        let source = SelectedFile::new("photo.png", "image/png", b"original".to_vec());
        let result = EncodeResult {
            bytes: b"hi".to_vec(),
            format: Format::Jpeg,
            quality_used: Some(0.5),
        };
        CompressionOutcome::new(&source, result, 1920, 1280)
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/jpeg", b"hi"), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn test_record_without_previews() {
        let record = PreviewRecord::from_outcome(&outcome(), false);
        assert_eq!(record.download_name, "photo.jpeg");
        assert_eq!(record.original_size_bytes, 8);
        assert_eq!(record.compressed_size_bytes, 2);
        assert_eq!((record.width, record.height), (1920, 1280));
        assert!(record.original_preview.is_none());

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("original_preview"));
        assert!(json.contains("\"quality\":0.5"));
    }

    #[test]
    fn test_record_with_previews() {
        let record = PreviewRecord::from_outcome(&outcome(), true);
        assert_eq!(
            record.compressed_preview.as_deref(),
            Some("data:image/jpeg;base64,aGk=")
        );
        assert!(record
            .original_preview
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }
}
