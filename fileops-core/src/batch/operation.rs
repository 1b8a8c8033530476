use std::path::{Path, PathBuf};

use crate::command::CommandInvocation;
use crate::security::OperationClass;

/// One step of a batch, with every path already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
        preserve_permissions: bool,
    },
    /// Mirror a directory tree. An `optional` copy whose source is missing
    /// succeeds without doing anything.
    CopyDirectory {
        source: PathBuf,
        destination: PathBuf,
        optional: bool,
    },
    CreateDirectory {
        path: PathBuf,
    },
    RemovePath {
        path: PathBuf,
    },
    ListDirectory {
        path: PathBuf,
        pattern: Option<String>,
    },
    ReadFile {
        path: PathBuf,
    },
    WriteFile {
        path: PathBuf,
        contents: Vec<u8>,
    },
    AppendFile {
        path: PathBuf,
        contents: Vec<u8>,
    },
    ConcatenateFiles {
        sources: Vec<PathBuf>,
        destination: PathBuf,
    },
    /// Run a program in `invocation.working_dir`; stdout goes to
    /// `output_file` when set.
    RunCommand {
        invocation: CommandInvocation,
        output_file: Option<PathBuf>,
    },
}

impl Operation {
    pub fn copy_file(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::CopyFile {
            source: source.into(),
            destination: destination.into(),
            preserve_permissions: false,
        }
    }

    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    pub fn write_file(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self::WriteFile {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn class(&self) -> OperationClass {
        match self {
            Self::CopyFile { .. } => OperationClass::CopyFile,
            Self::CopyDirectory { .. } => OperationClass::CopyDirectory,
            Self::CreateDirectory { .. } => OperationClass::CreateDirectory,
            Self::RemovePath { .. } => OperationClass::RemovePath,
            Self::ListDirectory { .. } => OperationClass::ListDirectory,
            Self::ReadFile { .. } => OperationClass::ReadFile,
            Self::WriteFile { .. } => OperationClass::WriteFile,
            Self::AppendFile { .. } => OperationClass::AppendFile,
            Self::ConcatenateFiles { .. } => OperationClass::ConcatenateFiles,
            Self::RunCommand { .. } => OperationClass::RunCommand,
        }
    }

    pub fn name(&self) -> &'static str {
        self.class().as_str()
    }

    /// Paths in the order the security check for [`Self::class`] expects.
    pub fn security_paths(&self) -> Vec<PathBuf> {
        match self {
            Self::CopyFile {
                source,
                destination,
                ..
            }
            | Self::CopyDirectory {
                source,
                destination,
                ..
            } => vec![source.clone(), destination.clone()],
            Self::CreateDirectory { path }
            | Self::RemovePath { path }
            | Self::ListDirectory { path, .. }
            | Self::ReadFile { path }
            | Self::WriteFile { path, .. }
            | Self::AppendFile { path, .. } => vec![path.clone()],
            Self::ConcatenateFiles {
                sources,
                destination,
            } => sources
                .iter()
                .cloned()
                .chain(std::iter::once(destination.clone()))
                .collect(),
            Self::RunCommand {
                invocation,
                output_file,
            } => std::iter::once(invocation.working_dir.clone())
                .chain(output_file.iter().cloned())
                .collect(),
        }
    }

    /// Paths the operation reads from. These may live anywhere.
    pub fn source_paths(&self) -> Vec<&Path> {
        match self {
            Self::CopyFile { source, .. } | Self::CopyDirectory { source, .. } => {
                vec![source.as_path()]
            }
            Self::ListDirectory { path, .. } | Self::ReadFile { path } => vec![path.as_path()],
            Self::ConcatenateFiles { sources, .. } => {
                sources.iter().map(PathBuf::as_path).collect()
            }
            Self::RunCommand { invocation, .. } => vec![invocation.working_dir.as_path()],
            Self::CreateDirectory { .. }
            | Self::RemovePath { .. }
            | Self::WriteFile { .. }
            | Self::AppendFile { .. } => Vec::new(),
        }
    }

    /// Paths the operation creates or changes. These must stay inside the
    /// workspace root.
    pub fn target_paths(&self) -> Vec<&Path> {
        match self {
            Self::CopyFile { destination, .. }
            | Self::CopyDirectory { destination, .. }
            | Self::ConcatenateFiles { destination, .. } => vec![destination.as_path()],
            Self::CreateDirectory { path }
            | Self::RemovePath { path }
            | Self::WriteFile { path, .. }
            | Self::AppendFile { path, .. } => vec![path.as_path()],
            Self::RunCommand { output_file, .. } => {
                output_file.iter().map(PathBuf::as_path).collect()
            }
            Self::ListDirectory { .. } | Self::ReadFile { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenate_lists_destination_last() {
        let operation = Operation::ConcatenateFiles {
            sources: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            destination: PathBuf::from("/ws/out"),
        };
        assert_eq!(
            operation.security_paths(),
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/b"),
                PathBuf::from("/ws/out")
            ]
        );
        assert_eq!(operation.target_paths(), vec![Path::new("/ws/out")]);
    }

    #[test]
    fn run_command_targets_only_its_output_file() {
        let operation = Operation::RunCommand {
            invocation: CommandInvocation::new("make", "/ws"),
            output_file: None,
        };
        assert!(operation.target_paths().is_empty());
        assert_eq!(operation.name(), "run_command");
    }
}
