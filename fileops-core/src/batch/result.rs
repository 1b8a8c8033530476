use std::path::PathBuf;
use std::time::Duration;

use fileops_commons::{FileOpsError, Result, display_path};
use fileops_config::{OperationOutcome, WorkspaceInfo};

/// Outcome of an executed batch. `outcomes` is positionally aligned with the
/// request's operations.
#[derive(Debug)]
pub struct BatchResult {
    pub workspace_path: PathBuf,
    pub outcomes: Vec<OperationOutcome>,
    pub duration: Duration,
    pub(crate) produced: Vec<Vec<PathBuf>>,
    pub(crate) first_failure: Option<(usize, FileOpsError)>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.first_failure.is_none()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.success && !outcome.skipped)
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.skipped).count()
    }

    pub fn first_failure(&self) -> Option<(usize, &FileOpsError)> {
        self.first_failure
            .as_ref()
            .map(|(index, error)| (*index, error))
    }

    /// Every path produced by a successful operation, in execution order.
    pub fn prepared_files(&self) -> Vec<PathBuf> {
        self.produced.iter().flatten().cloned().collect()
    }

    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// Summary of the batch, whether or not it succeeded.
    pub fn workspace_info(&self, message: impl Into<String>) -> WorkspaceInfo {
        WorkspaceInfo {
            prepared_files: self
                .prepared_files()
                .iter()
                .map(|path| display_path(path))
                .collect(),
            workspace_path: display_path(&self.workspace_path),
            message: message.into(),
            duration_ms: self.duration_ms(),
            operations: self.outcomes.clone(),
        }
    }

    /// Convert into the boundary result: the summary on success, otherwise a
    /// [`FileOpsError::BatchFailed`] describing the first failure.
    pub fn into_workspace_info(mut self, message: impl Into<String>) -> Result<WorkspaceInfo> {
        match self.first_failure.take() {
            Some((index, source)) => Err(FileOpsError::BatchFailed {
                index,
                failed: self.failed_count(),
                source: Box::new(source),
                prepared_files: self.prepared_files(),
            }),
            None => Ok(self.workspace_info(message)),
        }
    }
}
