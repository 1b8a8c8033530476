//! Validated filesystem primitives.
//!
//! Every method on [`FileOperations`] runs the security checks for its
//! operation class before touching the filesystem; [`FileOperations::path_exists`]
//! is the only unchecked query.

pub(crate) mod fs;
mod kind;

use std::path::{Path, PathBuf};

use fileops_commons::{FileOpsError, Result};
use tracing::debug;

use crate::command::{CommandInvocation, CommandOutput, CommandRunner};
use crate::security::{OperationClass, RequestPolicy, SecurityContext};

pub use kind::PathKind;

/// Filesystem primitives bound to a security context and request policy.
#[derive(Debug, Clone, Copy)]
pub struct FileOperations<'a> {
    context: &'a SecurityContext,
    policy: &'a RequestPolicy,
}

impl<'a> FileOperations<'a> {
    pub fn new(context: &'a SecurityContext) -> Self {
        Self::with_policy(context, RequestPolicy::unrestricted())
    }

    pub fn with_policy(context: &'a SecurityContext, policy: &'a RequestPolicy) -> Self {
        Self { context, policy }
    }

    pub fn context(&self) -> &'a SecurityContext {
        self.context
    }

    fn check(&self, class: OperationClass, paths: &[&Path]) -> Result<()> {
        let owned: Vec<PathBuf> = paths.iter().map(|path| path.to_path_buf()).collect();
        self.context
            .validate_operation_with(class, &owned, self.policy)
    }

    /// Copy one file, creating the destination's parent directories.
    pub fn copy_file(&self, source: &Path, destination: &Path) -> Result<u64> {
        self.copy_file_with(source, destination, false)
    }

    pub fn copy_file_with(
        &self,
        source: &Path,
        destination: &Path,
        preserve_permissions: bool,
    ) -> Result<u64> {
        self.check(OperationClass::CopyFile, &[source, destination])?;
        let bytes = fs::copy_file(source, destination, preserve_permissions)?;
        debug!(source = %source.display(), destination = %destination.display(), bytes, "copy_file");
        Ok(bytes)
    }

    /// Recursively copy a directory, preserving permission bits.
    pub fn copy_directory(&self, source: &Path, destination: &Path) -> Result<()> {
        self.check(OperationClass::CopyDirectory, &[source, destination])?;
        fs::copy_tree(source, destination)?;
        debug!(source = %source.display(), destination = %destination.display(), "copy_directory");
        Ok(())
    }

    /// Create a directory and any missing parents. Existing directories are fine.
    pub fn create_directory(&self, path: &Path) -> Result<()> {
        self.check(OperationClass::CreateDirectory, &[path])?;
        fs::create_dir_all(path)?;
        debug!(path = %path.display(), "create_directory");
        Ok(())
    }

    /// Remove a file or a directory tree. Missing paths are not an error.
    pub fn remove_path(&self, path: &Path) -> Result<()> {
        self.check(OperationClass::RemovePath, &[path])?;
        fs::remove_any(path)?;
        debug!(path = %path.display(), "remove_path");
        Ok(())
    }

    /// Copy then remove the source. When the copy fails the source is
    /// untouched; when the removal fails the copy stays in place and the
    /// error is returned.
    pub fn move_path(&self, source: &Path, destination: &Path) -> Result<()> {
        self.check(OperationClass::MovePath, &[source, destination])?;
        match PathKind::inspect(source) {
            PathKind::NotFound => {
                return Err(FileOpsError::NotFound {
                    path: source.to_path_buf(),
                });
            }
            PathKind::Directory => fs::copy_tree(source, destination)?,
            _ => {
                fs::copy_file(source, destination, true)?;
            }
        }
        fs::remove_any(source)?;
        debug!(source = %source.display(), destination = %destination.display(), "move_path");
        Ok(())
    }

    /// Sorted entry names, optionally filtered by a glob on the name.
    pub fn list_directory(&self, path: &Path, pattern: Option<&str>) -> Result<Vec<String>> {
        self.check(OperationClass::ListDirectory, &[path])?;
        let pattern = pattern
            .filter(|pattern| !pattern.is_empty())
            .map(|raw| {
                glob::Pattern::new(raw).map_err(|err| FileOpsError::InvalidPattern {
                    pattern: raw.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;
        let names = fs::list_names(path, pattern.as_ref())?;
        debug!(path = %path.display(), entries = names.len(), "list_directory");
        Ok(names)
    }

    /// Classify a path without validating it.
    pub fn path_exists(&self, path: &Path) -> PathKind {
        PathKind::inspect(path)
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.check(OperationClass::ReadFile, &[path])?;
        let contents = fs::read_bytes(path)?;
        debug!(path = %path.display(), bytes = contents.len(), "read_file");
        Ok(contents)
    }

    /// Create or truncate, creating parent directories.
    pub fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.check(OperationClass::WriteFile, &[path])?;
        fs::write_bytes(path, contents, false)?;
        debug!(path = %path.display(), bytes = contents.len(), "write_file");
        Ok(())
    }

    /// Create or append, creating parent directories.
    pub fn append_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.check(OperationClass::AppendFile, &[path])?;
        fs::write_bytes(path, contents, true)?;
        debug!(path = %path.display(), bytes = contents.len(), "append_file");
        Ok(())
    }

    /// Write the sources back to back into `destination`, replacing it
    /// atomically.
    pub fn concatenate_files(&self, sources: &[PathBuf], destination: &Path) -> Result<u64> {
        if sources.is_empty() {
            return Err(FileOpsError::schema(
                "concatenate_files requires at least one source",
            ));
        }
        let mut paths: Vec<&Path> = sources.iter().map(PathBuf::as_path).collect();
        paths.push(destination);
        self.check(OperationClass::ConcatenateFiles, &paths)?;
        let bytes = fs::concatenate(sources, destination)?;
        debug!(destination = %destination.display(), sources = sources.len(), bytes, "concatenate_files");
        Ok(bytes)
    }

    /// Run a program through `runner`. A non-zero exit is an error; stdout is
    /// written to `output_file` when one is given.
    pub fn run_command(
        &self,
        runner: &dyn CommandRunner,
        invocation: &CommandInvocation,
        output_file: Option<&Path>,
    ) -> Result<CommandOutput> {
        let mut paths = vec![invocation.working_dir.as_path()];
        paths.extend(output_file);
        self.check(OperationClass::RunCommand, &paths)?;

        let command = invocation.display();
        let output = runner
            .run(invocation)
            .map_err(|err| FileOpsError::Command {
                command: command.clone(),
                message: format!("{err:#}"),
            })?;
        if !output.status.success() {
            let status = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |code| code.to_string());
            return Err(FileOpsError::Command {
                command,
                message: format!("exit status {status}: {}", output.stderr.trim()),
            });
        }
        if let Some(file) = output_file {
            fs::write_bytes(file, &output.stdout, false)?;
        }
        debug!(%command, "run_command");
        Ok(output)
    }
}
