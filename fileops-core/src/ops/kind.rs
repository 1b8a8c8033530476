use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// What, if anything, lives at a path. Symbolic links are reported as such
/// rather than followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    NotFound,
    File,
    Directory,
    Symlink,
    Other,
}

impl PathKind {
    pub fn inspect(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Ok(metadata) => {
                let file_type = metadata.file_type();
                if file_type.is_symlink() {
                    Self::Symlink
                } else if file_type.is_dir() {
                    Self::Directory
                } else if file_type.is_file() {
                    Self::File
                } else {
                    Self::Other
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::NotFound,
            Err(_) => Self::Other,
        }
    }

    /// Numeric code used on the wire.
    pub fn code(self) -> u32 {
        match self {
            Self::NotFound => 0,
            Self::File => 1,
            Self::Directory => 2,
            Self::Symlink => 3,
            Self::Other => 4,
        }
    }

    pub fn exists(self) -> bool {
        self != Self::NotFound
    }
}
