use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::operations;

/// Declarative batch document: the configuration-file format and the wire
/// format of the batch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BatchConfig {
    /// Absolute path to the workspace directory.
    pub workspace_dir: String,
    /// Operations executed in order against the workspace.
    pub operations: Vec<OperationSpec>,
    /// What to do with the remaining operations once one fails.
    #[serde(default)]
    pub batch_failure_policy: BatchFailurePolicy,
}

/// Operation type accepted in a batch document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    CopyFile,
    Mkdir,
    CopyDirectoryContents,
    RunCommand,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CopyFile => operations::COPY_FILE,
            Self::Mkdir => operations::MKDIR,
            Self::CopyDirectoryContents => operations::COPY_DIRECTORY_CONTENTS,
            Self::RunCommand => operations::RUN_COMMAND,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of [`BatchConfig::operations`]. Which fields are required
/// depends on `type`; empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OperationSpec {
    #[serde(rename = "type")]
    pub kind: OperationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl OperationSpec {
    pub fn new(kind: OperationType) -> Self {
        Self {
            kind,
            src_path: None,
            dest_path: None,
            path: None,
            command: None,
            args: Vec::new(),
            work_dir: None,
            output_file: None,
        }
    }

    pub fn src_path(&self) -> Option<&str> {
        non_empty(self.src_path.as_deref())
    }

    pub fn dest_path(&self) -> Option<&str> {
        non_empty(self.dest_path.as_deref())
    }

    pub fn path(&self) -> Option<&str> {
        non_empty(self.path.as_deref())
    }

    pub fn command(&self) -> Option<&str> {
        non_empty(self.command.as_deref())
    }

    pub fn work_dir(&self) -> Option<&str> {
        non_empty(self.work_dir.as_deref())
    }

    pub fn output_file(&self) -> Option<&str> {
        non_empty(self.output_file.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|candidate| !candidate.is_empty())
}

/// Behaviour of a batch once one of its operations fails.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Record the failure and report every later operation as skipped.
    #[default]
    StopOnFirstFailure,
    /// Record the failure and keep executing the remaining operations.
    ContinueOnFailure,
}

/// Outcome of one operation, positionally aligned with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OperationOutcome {
    pub operation: String,
    pub success: bool,
    #[serde(default)]
    pub skipped: bool,
    pub message: String,
    #[serde(default)]
    pub produced_paths: Vec<String>,
}

/// Summary returned by batch and workspace preparation calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkspaceInfo {
    pub prepared_files: Vec<String>,
    pub workspace_path: String,
    pub message: String,
    #[serde(alias = "preparation_time_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub operations: Vec<OperationOutcome>,
}
