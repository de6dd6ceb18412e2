use std::path::Path;

use base64::Engine;
use thiserror::Error;

use crate::shared::constants::{MAX_IMAGE_BYTES, SUPPORTED_IMAGE_FORMATS};

/// Client-input violations, the 4xx class of the generation boundary.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("image size {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("base64-encoded image exceeds the {limit} byte limit")]
    EncodedTooLarge { limit: usize },
    #[error("unsupported image format {0:?}; allowed: jpeg, jpg, png, webp")]
    UnsupportedFormat(String),
    #[error("image path has no file extension")]
    MissingExtension,
    #[error("failed to read image: {0}")]
    Read(#[from] std::io::Error),
}

/// A validated image ready for submission to the generation API.
///
/// Enforces the upload contract up front: raw size at most 5 MiB, format
/// one of jpeg/jpg/png/webp (judged by extension, as the upstream relay
/// does), and the base64 data URI re-checked against the same limit.
#[derive(Clone, Debug)]
pub struct ImagePayload {
    format: String,
    data_uri: String,
}

impl ImagePayload {
    pub fn from_path(path: &Path) -> Result<Self, PayloadError> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(PayloadError::MissingExtension)?
            .to_ascii_lowercase();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, &format)
    }

    pub fn from_bytes(bytes: &[u8], format: &str) -> Result<Self, PayloadError> {
        let format = format.to_ascii_lowercase();
        if !SUPPORTED_IMAGE_FORMATS.contains(&format.as_str()) {
            return Err(PayloadError::UnsupportedFormat(format));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(PayloadError::TooLarge {
                size: bytes.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_uri = format!("data:image/{format};base64,{encoded}");
        if data_uri.len() > MAX_IMAGE_BYTES {
            return Err(PayloadError::EncodedTooLarge {
                limit: MAX_IMAGE_BYTES,
            });
        }

        Ok(Self { format, data_uri })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// `data:image/<fmt>;base64,...` string the API consumes.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}
