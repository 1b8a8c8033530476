//! Encoding of boundary arguments and results.
//!
//! Structured values use the same JSON encoding as configuration documents,
//! so every decode goes through [`fileops_config::from_json_str`].

use std::path::PathBuf;

use fileops_commons::{ErrorKind, FileOpsError, Result, display_path};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error payload returned with [`crate::GuestResult::ERR`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BatchFailureDetails>,
}

/// Extra context carried by a failed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailureDetails {
    pub index: usize,
    pub failed: usize,
    pub prepared_files: Vec<String>,
}

impl From<&FileOpsError> for ErrorRecord {
    fn from(error: &FileOpsError) -> Self {
        let details = match error {
            FileOpsError::BatchFailed {
                index,
                failed,
                prepared_files,
                ..
            } => Some(BatchFailureDetails {
                index: *index,
                failed: *failed,
                prepared_files: prepared_files.iter().map(|path| display_path(path)).collect(),
            }),
            _ => None,
        };
        Self {
            kind: error.kind(),
            message: error.to_string(),
            details,
        }
    }
}

impl ErrorRecord {
    /// Record for a panic caught at the boundary.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::IoError,
            message: message.into(),
            details: None,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        // A record of plain strings and integers always serializes.
        serde_json::to_vec(self).unwrap_or_else(|_| self.message.clone().into_bytes())
    }
}

pub fn decode_str(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|error| FileOpsError::schema(format!("argument is not valid UTF-8: {error}")))
}

pub fn decode_path(bytes: &[u8]) -> Result<PathBuf> {
    decode_str(bytes).map(PathBuf::from)
}

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    fileops_config::from_json_str(decode_str(bytes)?)
}

/// A JSON array of strings. An empty argument is an empty list.
pub fn decode_string_list(bytes: &[u8]) -> Result<Vec<String>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    decode_json(bytes)
}

/// An empty argument means "absent".
pub fn decode_optional_str(bytes: &[u8]) -> Result<Option<&str>> {
    decode_str(bytes).map(|text| Some(text).filter(|text| !text.is_empty()))
}

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    fileops_config::to_json_string(value).map(String::into_bytes)
}

pub fn encode_text(text: impl Into<String>) -> Vec<u8> {
    text.into().into_bytes()
}

pub fn encode_error(error: &FileOpsError) -> Vec<u8> {
    ErrorRecord::from(error).encode()
}
