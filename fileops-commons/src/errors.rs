use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias used across the file-operations crates.
pub type Result<T, E = FileOpsError> = std::result::Result<T, E>;

/// Coarse error classes reported across the guest/host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SecurityDenied,
    NotFound,
    IoError,
    SchemaError,
    UnsupportedOperation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SecurityDenied => "security_denied",
            Self::NotFound => "not_found",
            Self::IoError => "io_error",
            Self::SchemaError => "schema_error",
            Self::UnsupportedOperation => "unsupported_operation",
        }
    }
}

/// Errors produced while validating or executing file operations.
#[derive(Debug, Error)]
pub enum FileOpsError {
    #[error("security validation failed: {reason}")]
    SecurityDenied { reason: String },

    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error while {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("invalid document: {0}")]
    Schema(String),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("operation {index} failed: {source}")]
    BatchFailed {
        index: usize,
        failed: usize,
        #[source]
        source: Box<FileOpsError>,
        prepared_files: Vec<PathBuf>,
    },
}

impl FileOpsError {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::SecurityDenied {
            reason: reason.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Wrap an I/O error, promoting `NotFound` to the dedicated variant so the
    /// boundary can report it with its own kind.
    pub fn io(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound { path };
        }
        Self::Io {
            action,
            path,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SecurityDenied { .. } => ErrorKind::SecurityDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } | Self::NotADirectory { .. } | Self::Command { .. } => {
                ErrorKind::IoError
            }
            Self::Schema(_) | Self::InvalidPattern { .. } => ErrorKind::SchemaError,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Self::BatchFailed { source, .. } => source.kind(),
        }
    }

    pub fn is_denied(&self) -> bool {
        self.kind() == ErrorKind::SecurityDenied
    }
}
