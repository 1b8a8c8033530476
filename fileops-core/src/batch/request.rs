use std::path::{Path, PathBuf};

use fileops_commons::{FileOpsError, Result, clean_path, contains_traversal, resolve_within};
use fileops_config::{BatchConfig, BatchFailurePolicy, OperationSpec, OperationType};

use super::operation::Operation;
use crate::command::CommandInvocation;
use crate::security::RequestPolicy;

/// A validated-shape batch: an absolute workspace root plus operations whose
/// targets all resolve under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub workspace_root: PathBuf,
    pub operations: Vec<Operation>,
    pub failure_policy: BatchFailurePolicy,
    pub policy: RequestPolicy,
}

impl BatchRequest {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            operations: Vec::new(),
            failure_policy: BatchFailurePolicy::default(),
            policy: RequestPolicy::default(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_failure_policy(mut self, policy: BatchFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_policy(mut self, policy: RequestPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Translate a batch document, resolving every relative path against the
    /// workspace directory.
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        let root = workspace_root(&config.workspace_dir)?;
        let operations = config
            .operations
            .iter()
            .enumerate()
            .map(|(index, spec)| translate(index, spec, &root))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            workspace_root: root,
            operations,
            failure_policy: config.batch_failure_policy,
            policy: RequestPolicy::default(),
        })
    }

    /// Structural checks that need no filesystem access: an absolute root,
    /// absolute sources, and targets inside the root. Traversal is left to
    /// the security validator.
    pub fn validate_shape(&self) -> Result<()> {
        if self.workspace_root.as_os_str().is_empty() {
            return Err(FileOpsError::schema("workspace directory is required"));
        }
        if !self.workspace_root.is_absolute() {
            return Err(FileOpsError::schema(format!(
                "workspace directory must be absolute: {}",
                self.workspace_root.display()
            )));
        }
        let root = clean_path(&self.workspace_root);

        for (index, operation) in self.operations.iter().enumerate() {
            for source in operation.source_paths() {
                if !source.is_absolute() {
                    return Err(FileOpsError::schema(format!(
                        "operation {index} ({}): source path must be absolute: {}",
                        operation.name(),
                        source.display()
                    )));
                }
            }
            for target in operation.target_paths() {
                if contains_traversal(target) {
                    continue;
                }
                if !clean_path(target).starts_with(&root) {
                    return Err(FileOpsError::schema(format!(
                        "operation {index} ({}): {} is outside the workspace {}",
                        operation.name(),
                        target.display(),
                        root.display()
                    )));
                }
            }
            if matches!(operation, Operation::ConcatenateFiles { sources, .. } if sources.is_empty())
            {
                return Err(FileOpsError::schema(format!(
                    "operation {index} (concatenate_files): at least one source is required"
                )));
            }
        }
        Ok(())
    }
}

fn workspace_root(raw: &str) -> Result<PathBuf> {
    if raw.is_empty() {
        return Err(FileOpsError::schema("workspace_dir is required"));
    }
    let path = Path::new(raw);
    if !path.is_absolute() {
        return Err(FileOpsError::schema(format!(
            "workspace_dir must be absolute: {raw}"
        )));
    }
    if contains_traversal(path) {
        return Err(FileOpsError::denied(format!(
            "path contains path traversal attempts: {raw}"
        )));
    }
    Ok(clean_path(path))
}

fn required<'a>(index: usize, spec: &OperationSpec, field: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| {
        FileOpsError::schema(format!(
            "operation {index} ({}): missing {field}",
            spec.kind
        ))
    })
}

fn absolute_source(index: usize, spec: &OperationSpec, raw: &str) -> Result<PathBuf> {
    let path = PathBuf::from(raw);
    if !path.is_absolute() {
        return Err(FileOpsError::schema(format!(
            "operation {index} ({}): src_path must be absolute: {raw}",
            spec.kind
        )));
    }
    Ok(path)
}

fn relative_target(index: usize, spec: &OperationSpec, root: &Path, raw: &str) -> Result<PathBuf> {
    let relative = Path::new(raw);
    if relative.is_absolute() {
        return Err(FileOpsError::schema(format!(
            "operation {index} ({}): expected a workspace-relative path, got {raw}",
            spec.kind
        )));
    }
    resolve_within(root, relative).ok_or_else(|| {
        FileOpsError::denied(format!(
            "operation {index} ({}): path escapes the workspace: {raw}",
            spec.kind
        ))
    })
}

fn translate(index: usize, spec: &OperationSpec, root: &Path) -> Result<Operation> {
    match spec.kind {
        OperationType::CopyFile => {
            let source = required(index, spec, "src_path", spec.src_path())?;
            let destination = required(index, spec, "dest_path", spec.dest_path())?;
            Ok(Operation::CopyFile {
                source: absolute_source(index, spec, source)?,
                destination: relative_target(index, spec, root, destination)?,
                preserve_permissions: false,
            })
        }
        OperationType::Mkdir => {
            let path = required(index, spec, "path", spec.path())?;
            Ok(Operation::CreateDirectory {
                path: relative_target(index, spec, root, path)?,
            })
        }
        OperationType::CopyDirectoryContents => {
            let source = required(index, spec, "src_path", spec.src_path())?;
            let destination = required(index, spec, "dest_path", spec.dest_path())?;
            Ok(Operation::CopyDirectory {
                source: absolute_source(index, spec, source)?,
                destination: relative_target(index, spec, root, destination)?,
                optional: false,
            })
        }
        OperationType::RunCommand => {
            let program = required(index, spec, "command", spec.command())?;
            let working_dir = match spec.work_dir() {
                None => root.to_path_buf(),
                Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
                Some(dir) => relative_target(index, spec, root, dir)?,
            };
            let output_file = spec
                .output_file()
                .map(|file| relative_target(index, spec, root, file))
                .transpose()?;
            Ok(Operation::RunCommand {
                invocation: CommandInvocation::new(program, working_dir)
                    .with_args(spec.args.iter().cloned()),
                output_file,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileops_commons::ErrorKind;
    use pretty_assertions::assert_eq;

    fn config(operations: Vec<OperationSpec>) -> BatchConfig {
        BatchConfig {
            workspace_dir: "/abs/ws".to_string(),
            operations,
            batch_failure_policy: BatchFailurePolicy::default(),
        }
    }

    fn copy(src: &str, dest: &str) -> OperationSpec {
        let mut spec = OperationSpec::new(OperationType::CopyFile);
        spec.src_path = Some(src.to_string());
        spec.dest_path = Some(dest.to_string());
        spec
    }

    #[test]
    fn relative_paths_resolve_under_the_workspace() {
        let mut mkdir = OperationSpec::new(OperationType::Mkdir);
        mkdir.path = Some("include".to_string());
        let request =
            BatchRequest::from_config(&config(vec![mkdir, copy("/src/a.h", "include/a.h")]))
                .unwrap();

        assert_eq!(request.workspace_root, PathBuf::from("/abs/ws"));
        assert_eq!(
            request.operations,
            vec![
                Operation::create_directory("/abs/ws/include"),
                Operation::copy_file("/src/a.h", "/abs/ws/include/a.h"),
            ]
        );
        assert!(request.validate_shape().is_ok());
    }

    #[test]
    fn escaping_destination_is_denied() {
        let error =
            BatchRequest::from_config(&config(vec![copy("/src/a.h", "../outside.h")])).unwrap_err();
        assert!(error.is_denied());
    }

    #[test]
    fn relative_source_and_missing_fields_are_schema_errors() {
        let error = BatchRequest::from_config(&config(vec![copy("src/a.h", "a.h")])).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaError);

        let error = BatchRequest::from_config(&config(vec![OperationSpec::new(
            OperationType::Mkdir,
        )]))
        .unwrap_err();
        assert!(error.to_string().contains("missing path"));
    }

    #[test]
    fn run_command_defaults_to_workspace_root() {
        let mut spec = OperationSpec::new(OperationType::RunCommand);
        spec.command = Some("make".to_string());
        spec.args = vec!["all".to_string()];
        spec.output_file = Some("build.log".to_string());

        let request = BatchRequest::from_config(&config(vec![spec])).unwrap();
        assert_eq!(
            request.operations,
            vec![Operation::RunCommand {
                invocation: CommandInvocation::new("make", "/abs/ws").with_args(["all"]),
                output_file: Some(PathBuf::from("/abs/ws/build.log")),
            }]
        );
    }

    #[test]
    fn relative_workspace_is_rejected() {
        let mut config = config(Vec::new());
        config.workspace_dir = "ws".to_string();
        let error = BatchRequest::from_config(&config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SchemaError);
    }

    #[test]
    fn shape_check_rejects_targets_outside_root() {
        let request = BatchRequest::new("/abs/ws").with_operation(Operation::write_file("/tmp/x", "x"));
        assert_eq!(
            request.validate_shape().unwrap_err().kind(),
            ErrorKind::SchemaError
        );
    }
}
