use std::path::PathBuf;
use std::time::Instant;

use fileops_commons::{FileOpsError, Result, display_path};
use fileops_config::{BatchFailurePolicy, OperationOutcome};
use tracing::{debug, info, warn};

use super::operation::Operation;
use super::request::BatchRequest;
use super::result::BatchResult;
use crate::command::CommandRunner;
use crate::ops::{FileOperations, PathKind, fs};
use crate::security::{OperationClass, SecurityContext};

const SKIPPED_MESSAGE: &str = "skipped after an earlier failure";

struct Executed {
    message: String,
    produced: Vec<PathBuf>,
}

impl Executed {
    fn new(message: String, produced: Vec<PathBuf>) -> Self {
        Self { message, produced }
    }
}

/// Runs batches against a security context.
///
/// A batch is checked as a whole before anything runs: shape, then the
/// security rules for every operation. Any rejection at that stage returns a
/// single error and leaves the filesystem untouched.
pub struct BatchExecutor<'a> {
    context: &'a SecurityContext,
    runner: &'a dyn CommandRunner,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(context: &'a SecurityContext, runner: &'a dyn CommandRunner) -> Self {
        Self { context, runner }
    }

    /// Pre-execution validation of a whole request.
    pub fn validate(&self, request: &BatchRequest) -> Result<()> {
        request.validate_shape()?;
        self.context.validate_operation_with(
            OperationClass::CreateDirectory,
            std::slice::from_ref(&request.workspace_root),
            &request.policy,
        )?;
        for (index, operation) in request.operations.iter().enumerate() {
            self.context
                .validate_operation_with(
                    operation.class(),
                    &operation.security_paths(),
                    &request.policy,
                )
                .inspect_err(|err| {
                    warn!(index, operation = operation.name(), error = %err, "batch rejected");
                })?;
        }
        Ok(())
    }

    /// Validate, create the workspace root, then run every operation in order.
    ///
    /// Individual failures do not abort the call; they are recorded in the
    /// returned [`BatchResult`], and under
    /// [`BatchFailurePolicy::StopOnFirstFailure`] every later operation is
    /// reported as skipped.
    pub fn execute_batch(&self, request: &BatchRequest) -> Result<BatchResult> {
        let started = Instant::now();
        self.validate(request)?;

        let ops = FileOperations::with_policy(self.context, &request.policy);
        ops.create_directory(&request.workspace_root)?;

        let total = request.operations.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut produced = Vec::with_capacity(total);
        let mut first_failure: Option<(usize, FileOpsError)> = None;

        for (index, operation) in request.operations.iter().enumerate() {
            let halted = first_failure.is_some()
                && request.failure_policy == BatchFailurePolicy::StopOnFirstFailure;
            if halted {
                outcomes.push(OperationOutcome {
                    operation: operation.name().to_string(),
                    success: false,
                    skipped: true,
                    message: SKIPPED_MESSAGE.to_string(),
                    produced_paths: Vec::new(),
                });
                produced.push(Vec::new());
                continue;
            }

            match self.execute_one(&ops, operation) {
                Ok(executed) => {
                    debug!(index, operation = operation.name(), message = %executed.message, "operation completed");
                    outcomes.push(OperationOutcome {
                        operation: operation.name().to_string(),
                        success: true,
                        skipped: false,
                        message: executed.message,
                        produced_paths: executed
                            .produced
                            .iter()
                            .map(|path| display_path(path))
                            .collect(),
                    });
                    produced.push(executed.produced);
                }
                Err(err) => {
                    warn!(index, operation = operation.name(), error = %err, "operation failed");
                    outcomes.push(OperationOutcome {
                        operation: operation.name().to_string(),
                        success: false,
                        skipped: false,
                        message: err.to_string(),
                        produced_paths: Vec::new(),
                    });
                    produced.push(Vec::new());
                    if first_failure.is_none() {
                        first_failure = Some((index, err));
                    }
                }
            }
        }

        let result = BatchResult {
            workspace_path: request.workspace_root.clone(),
            outcomes,
            duration: started.elapsed(),
            produced,
            first_failure,
        };
        info!(
            workspace = %request.workspace_root.display(),
            operations = total,
            failed = result.failed_count(),
            skipped = result.skipped_count(),
            duration_ms = result.duration_ms(),
            "batch finished"
        );
        Ok(result)
    }

    fn execute_one(&self, ops: &FileOperations<'_>, operation: &Operation) -> Result<Executed> {
        match operation {
            Operation::CopyFile {
                source,
                destination,
                preserve_permissions,
            } => {
                let bytes = ops.copy_file_with(source, destination, *preserve_permissions)?;
                Ok(Executed::new(
                    format!(
                        "copied {} to {} ({bytes} bytes)",
                        source.display(),
                        destination.display()
                    ),
                    vec![destination.clone()],
                ))
            }
            Operation::CopyDirectory {
                source,
                destination,
                optional,
            } => {
                if *optional && !PathKind::inspect(source).exists() {
                    return Ok(Executed::new(
                        format!("skipped missing directory {}", source.display()),
                        Vec::new(),
                    ));
                }
                ops.copy_directory(source, destination)?;
                let children = fs::child_paths(destination)
                    .ok()
                    .filter(|children| !children.is_empty())
                    .unwrap_or_else(|| vec![destination.clone()]);
                Ok(Executed::new(
                    format!(
                        "copied directory {} to {}",
                        source.display(),
                        destination.display()
                    ),
                    children,
                ))
            }
            Operation::CreateDirectory { path } => {
                ops.create_directory(path)?;
                Ok(Executed::new(
                    format!("created directory {}", path.display()),
                    vec![path.clone()],
                ))
            }
            Operation::RemovePath { path } => {
                ops.remove_path(path)?;
                Ok(Executed::new(format!("removed {}", path.display()), Vec::new()))
            }
            Operation::ListDirectory { path, pattern } => {
                let names = ops.list_directory(path, pattern.as_deref())?;
                Ok(Executed::new(
                    format!("{} entries: {}", names.len(), names.join(", ")),
                    Vec::new(),
                ))
            }
            Operation::ReadFile { path } => {
                let contents = ops.read_file(path)?;
                Ok(Executed::new(
                    format!("read {} bytes from {}", contents.len(), path.display()),
                    Vec::new(),
                ))
            }
            Operation::WriteFile { path, contents } => {
                ops.write_file(path, contents)?;
                Ok(Executed::new(
                    format!("wrote {} bytes to {}", contents.len(), path.display()),
                    vec![path.clone()],
                ))
            }
            Operation::AppendFile { path, contents } => {
                ops.append_file(path, contents)?;
                Ok(Executed::new(
                    format!("appended {} bytes to {}", contents.len(), path.display()),
                    vec![path.clone()],
                ))
            }
            Operation::ConcatenateFiles {
                sources,
                destination,
            } => {
                let bytes = ops.concatenate_files(sources, destination)?;
                Ok(Executed::new(
                    format!(
                        "concatenated {} files into {} ({bytes} bytes)",
                        sources.len(),
                        destination.display()
                    ),
                    vec![destination.clone()],
                ))
            }
            Operation::RunCommand {
                invocation,
                output_file,
            } => {
                let command = invocation.display();
                ops.run_command(self.runner, invocation, output_file.as_deref())?;
                match output_file {
                    Some(file) => Ok(Executed::new(
                        format!("ran '{command}', output written to {}", file.display()),
                        vec![file.clone()],
                    )),
                    None => Ok(Executed::new(format!("ran '{command}'"), Vec::new())),
                }
            }
        }
    }
}
