//! Ordered batches of primitives executed against one workspace root.

mod executor;
mod operation;
mod request;
mod result;

pub use executor::BatchExecutor;
pub use operation::Operation;
pub use request::BatchRequest;
pub use result::BatchResult;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use fileops_commons::{ErrorKind, FileOpsError};
    use fileops_config::{BatchFailurePolicy, SecurityLevel};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::{CommandInvocation, CommandOutput, CommandRunner};
    use crate::security::SecurityContext;

    struct CannedRunner {
        output: CommandOutput,
    }

    impl CommandRunner for CannedRunner {
        fn run(&self, _invocation: &CommandInvocation) -> anyhow::Result<CommandOutput> {
            Ok(self.output.clone())
        }
    }

    fn runner() -> CannedRunner {
        CannedRunner {
            output: CommandOutput::success("built\n"),
        }
    }

    #[test]
    fn stop_policy_skips_everything_after_the_failure() {
        let source = tempfile::tempdir().unwrap();
        let workspace = tempfile::tempdir().unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();
        let root = workspace.path().join("ws");

        let request = BatchRequest::new(&root)
            .with_operation(Operation::copy_file(source.path().join("a.txt"), root.join("a.txt")))
            .with_operation(Operation::copy_file(source.path().join("missing"), root.join("m.txt")))
            .with_operation(Operation::create_directory(root.join("later")));

        let context = SecurityContext::default();
        let runner = runner();
        let result = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap();

        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes[0].success);
        assert!(!result.outcomes[1].success && !result.outcomes[1].skipped);
        assert!(result.outcomes[2].skipped);
        assert!(!root.join("later").exists());
        assert_eq!(result.first_failure().map(|(index, _)| index), Some(1));
        assert_eq!(result.prepared_files(), vec![root.join("a.txt")]);

        let error = result.into_workspace_info("done").unwrap_err();
        match error {
            FileOpsError::BatchFailed {
                index,
                failed,
                prepared_files,
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(failed, 1);
                assert_eq!(prepared_files, vec![root.join("a.txt")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn continue_policy_runs_every_operation() {
        let workspace = tempfile::tempdir().unwrap();
        let root = workspace.path().join("ws");
        let request = BatchRequest::new(&root)
            .with_failure_policy(BatchFailurePolicy::ContinueOnFailure)
            .with_operation(Operation::copy_file("/definitely/missing.txt", root.join("x")))
            .with_operation(Operation::create_directory(root.join("include")));

        let context = SecurityContext::default();
        let runner = runner();
        let result = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap();

        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.skipped_count(), 0);
        assert!(result.outcomes[1].success);
        assert!(root.join("include").is_dir());
    }

    #[test]
    fn denied_operation_aborts_before_anything_runs() {
        let workspace = tempfile::tempdir().unwrap();
        let root = workspace.path().join("ws");
        let request = BatchRequest::new(&root)
            .with_operation(Operation::create_directory(root.join("include")))
            .with_operation(Operation::RunCommand {
                invocation: CommandInvocation::new("make", &root),
                output_file: None,
            });

        let mut context = SecurityContext::default();
        context.set_level(SecurityLevel::High).unwrap();
        let runner = runner();
        let error = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::SecurityDenied);
        assert!(!root.exists());
    }

    #[test]
    fn command_output_lands_in_the_output_file() {
        let workspace = tempfile::tempdir().unwrap();
        let root = workspace.path().to_path_buf();
        let request = BatchRequest::new(&root).with_operation(Operation::RunCommand {
            invocation: CommandInvocation::new("make", &root),
            output_file: Some(root.join("logs/build.log")),
        });

        let context = SecurityContext::default();
        let runner = runner();
        let info = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap()
            .into_workspace_info("ok")
            .unwrap();

        assert_eq!(
            fs::read_to_string(root.join("logs/build.log")).unwrap(),
            "built\n"
        );
        assert_eq!(
            info.operations[0].produced_paths,
            vec![root.join("logs/build.log").display().to_string()]
        );
    }

    #[test]
    fn failing_command_reports_exit_status() {
        let workspace = tempfile::tempdir().unwrap();
        let root = workspace.path().to_path_buf();
        let request = BatchRequest::new(&root).with_operation(Operation::RunCommand {
            invocation: CommandInvocation::new("make", &root),
            output_file: None,
        });

        let context = SecurityContext::default();
        let runner = CannedRunner {
            output: CommandOutput::failure(2, "no rule to make target\n"),
        };
        let result = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(
            result.outcomes[0].message,
            "command 'make' failed: exit status 2: no rule to make target"
        );
    }

    #[test]
    fn copied_directory_reports_its_children() {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("b.h"), "b").unwrap();
        fs::write(source.path().join("a.h"), "a").unwrap();
        let workspace = tempfile::tempdir().unwrap();
        let root = workspace.path().to_path_buf();
        let dest = root.join("bindings");

        let request = BatchRequest::new(&root)
            .with_operation(Operation::CopyDirectory {
                source: source.path().to_path_buf(),
                destination: dest.clone(),
                optional: false,
            })
            .with_operation(Operation::CopyDirectory {
                source: PathBuf::from("/definitely/missing/bindings"),
                destination: root.join("other"),
                optional: true,
            });

        let context = SecurityContext::default();
        let runner = runner();
        let result = BatchExecutor::new(&context, &runner)
            .execute_batch(&request)
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.prepared_files(), vec![dest.join("a.h"), dest.join("b.h")]);
        assert!(result.outcomes[1].message.starts_with("skipped missing directory"));
    }
}
