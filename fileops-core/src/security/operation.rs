use std::fmt;
use std::path::{Path, PathBuf, is_separator};
use std::str::FromStr;

use fileops_commons::{FileOpsError, Result, display_path};
use fileops_config::SecurityLevel;
use tracing::warn;

use super::context::SecurityContext;
use super::validator::RequestPolicy;

/// Every operation the component can be asked to validate or perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    CopyFile,
    CopyDirectory,
    MovePath,
    CreateDirectory,
    RemovePath,
    ListDirectory,
    ReadFile,
    WriteFile,
    AppendFile,
    ConcatenateFiles,
    PathExists,
    RunCommand,
}

impl OperationClass {
    pub const ALL: [Self; 12] = [
        Self::CopyFile,
        Self::CopyDirectory,
        Self::MovePath,
        Self::CreateDirectory,
        Self::RemovePath,
        Self::ListDirectory,
        Self::ReadFile,
        Self::WriteFile,
        Self::AppendFile,
        Self::ConcatenateFiles,
        Self::PathExists,
        Self::RunCommand,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CopyFile => "copy_file",
            Self::CopyDirectory => "copy_directory",
            Self::MovePath => "move_path",
            Self::CreateDirectory => "create_directory",
            Self::RemovePath => "remove_path",
            Self::ListDirectory => "list_directory",
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::AppendFile => "append_file",
            Self::ConcatenateFiles => "concatenate_files",
            Self::PathExists => "path_exists",
            Self::RunCommand => "run_command",
        }
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationClass {
    type Err = FileOpsError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| FileOpsError::UnsupportedOperation(value.to_string()))
    }
}

impl SecurityContext {
    /// Validate an operation by name. Unknown names are rejected before any
    /// path is looked at.
    pub fn validate_named_operation(&self, name: &str, paths: &[PathBuf]) -> Result<()> {
        let class: OperationClass = name.parse()?;
        self.validate_operation(class, paths)
    }

    /// Validate an operation against the context alone; the accessible
    /// directories act as the allow-list.
    pub fn validate_operation(&self, class: OperationClass, paths: &[PathBuf]) -> Result<()> {
        self.validate_operation_with(class, paths, RequestPolicy::unrestricted())
    }

    /// Validate every path of an operation, then apply the class rules:
    ///
    /// * copy/move: source readable, destination writable (move also needs a
    ///   writable source)
    /// * create: the parent must be writable
    /// * write/append/remove: the target must be writable
    /// * concatenate: inputs readable, the last path writable
    /// * run_command: refused from high upwards
    /// * remove under strict: root-like targets are refused
    ///
    /// Readability and writability only matter from high upwards.
    pub fn validate_operation_with(
        &self,
        class: OperationClass,
        paths: &[PathBuf],
        policy: &RequestPolicy,
    ) -> Result<()> {
        for path in paths {
            self.validate_path_with(path, policy)?;
        }

        let level = self.level();
        if class == OperationClass::RunCommand && level >= SecurityLevel::High {
            warn!(%level, "command execution refused");
            return Err(FileOpsError::denied(format!(
                "command execution restricted in {level} security mode"
            )));
        }
        if class == OperationClass::RemovePath && level >= SecurityLevel::Strict {
            for path in paths {
                self.check_removal_target(path)?;
            }
        }
        if level < SecurityLevel::High {
            return Ok(());
        }

        match class {
            OperationClass::CopyFile | OperationClass::CopyDirectory | OperationClass::MovePath => {
                let [source, destination] = paths else {
                    return Err(FileOpsError::schema(format!(
                        "{class} requires a source and a destination path"
                    )));
                };
                self.require_readable(source, "source")?;
                if class == OperationClass::MovePath {
                    self.require_writable(source, "source")?;
                }
                self.require_writable(destination, "destination")
            }
            OperationClass::CreateDirectory => {
                for path in paths {
                    if self.is_grant_root(path) && self.is_writable(path) {
                        continue;
                    }
                    let parent = path.parent().unwrap_or(path);
                    if !self.is_writable(parent) {
                        return Err(FileOpsError::denied(format!(
                            "parent directory not writable: {}",
                            parent.display()
                        )));
                    }
                }
                Ok(())
            }
            OperationClass::RemovePath | OperationClass::WriteFile | OperationClass::AppendFile => {
                paths
                    .iter()
                    .try_for_each(|path| self.require_writable(path, "target"))
            }
            OperationClass::ListDirectory | OperationClass::ReadFile | OperationClass::PathExists => {
                paths
                    .iter()
                    .try_for_each(|path| self.require_readable(path, "target"))
            }
            OperationClass::ConcatenateFiles => {
                let Some((destination, sources)) = paths.split_last() else {
                    return Err(FileOpsError::schema(
                        "concatenate_files requires a destination path",
                    ));
                };
                sources
                    .iter()
                    .try_for_each(|source| self.require_readable(source, "source"))?;
                self.require_writable(destination, "destination")
            }
            OperationClass::RunCommand => Ok(()),
        }
    }

    fn require_readable(&self, path: &Path, role: &str) -> Result<()> {
        if self.is_readable(path) {
            return Ok(());
        }
        Err(FileOpsError::denied(format!(
            "{role} path not accessible: {}",
            path.display()
        )))
    }

    fn require_writable(&self, path: &Path, role: &str) -> Result<()> {
        if self.is_writable(path) {
            return Ok(());
        }
        Err(FileOpsError::denied(format!(
            "{role} path not writable: {}",
            path.display()
        )))
    }

    fn check_removal_target(&self, path: &Path) -> Result<()> {
        let raw = display_path(path);
        let root_like = matches!(raw.as_str(), "" | "." | ".." | "/")
            || raw.ends_with(is_separator)
            || self.is_grant_root(path);
        if root_like {
            warn!(path = %raw, "removal of a directory root refused");
            return Err(FileOpsError::denied(format!(
                "cannot remove directory root: {raw:?}"
            )));
        }
        Ok(())
    }
}
