use std::path::Path;

use fileops_commons::{FileOpsError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::batch::BatchConfig;

/// Decode any boundary document. Batch configuration files, boundary
/// arguments and workspace descriptors all go through this single decoder.
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|error| FileOpsError::schema(format!("failed to parse JSON document: {error}")))
}

/// Read and decode a JSON document from disk.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| FileOpsError::io("reading configuration", path, error))?;
    debug!(path = %path.display(), bytes = text.len(), "loaded configuration document");
    from_json_str(&text)
}

/// Encode a document in the same format [`from_json_str`] accepts.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|error| FileOpsError::schema(format!("failed to encode JSON document: {error}")))
}

impl BatchConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        from_json_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json_file(path)
    }
}
