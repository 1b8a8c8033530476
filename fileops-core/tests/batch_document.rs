use std::fs;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use fileops_commons::{ErrorKind, FileOpsError};
use fileops_config::BatchConfig;
use fileops_core::{BatchExecutor, BatchRequest, FileOpsEngine, ProcessCommandRunner};
use pretty_assertions::assert_eq;
use serde_json::json;

fn document(workspace: &str, operations: serde_json::Value) -> String {
    json!({ "workspace_dir": workspace, "operations": operations }).to_string()
}

#[test]
fn mkdir_and_copy_document_prepares_workspace() {
    let tmp = TempDir::new().unwrap();
    tmp.child("src/main.cpp")
        .write_str("int main(){return 0;}")
        .unwrap();
    let src = tmp.path().join("src/main.cpp");
    let ws = tmp.path().join("ws");

    let text = document(
        &ws.display().to_string(),
        json!([
            { "type": "mkdir", "path": "include" },
            { "type": "copy_file", "src_path": src.display().to_string(), "dest_path": "main.cpp" }
        ]),
    );

    let config = BatchConfig::from_json_str(&text).unwrap();
    let request = BatchRequest::from_config(&config).unwrap();
    let context = fileops_core::SecurityContext::default();
    let runner = ProcessCommandRunner::new();
    let result = BatchExecutor::new(&context, &runner)
        .execute_batch(&request)
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.outcomes.iter().filter(|outcome| outcome.success).count(), 2);
    assert!(ws.join("include").is_dir());
    assert_eq!(
        fs::read_to_string(ws.join("main.cpp")).unwrap(),
        "int main(){return 0;}"
    );

    let info = result.into_workspace_info("done").unwrap();
    assert_eq!(info.workspace_path, ws.display().to_string());
    assert_eq!(
        info.prepared_files,
        vec![
            ws.join("include").display().to_string(),
            ws.join("main.cpp").display().to_string()
        ]
    );
}

#[test]
fn engine_reports_operation_count() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let text = document(
        &ws.display().to_string(),
        json!([{ "type": "mkdir", "path": "a" }, { "type": "mkdir", "path": "b/c" }]),
    );

    let info = FileOpsEngine::new().process_json_config(&text).unwrap();
    assert_eq!(info.message, "Successfully processed 2 operations");
    assert!(ws.join("b/c").is_dir());
}

#[test]
fn invalid_document_executes_nothing() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let text = document(
        &ws.display().to_string(),
        json!([
            { "type": "mkdir", "path": "include" },
            { "type": "copy_file", "src_path": "relative/main.cpp", "dest_path": "main.cpp" }
        ]),
    );

    let error = FileOpsEngine::new().process_json_config(&text).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SchemaError);
    assert!(!ws.exists());
}

#[test]
fn unknown_operation_type_is_a_schema_error() {
    let error = FileOpsEngine::new()
        .validate_json_config(&document("/abs/ws", json!([{ "type": "format_disk" }])))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SchemaError);
}

#[test]
fn validate_only_does_not_touch_the_filesystem() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let text = document(
        &ws.display().to_string(),
        json!([{ "type": "mkdir", "path": "include" }]),
    );

    FileOpsEngine::new().validate_json_config(&text).unwrap();
    assert!(!ws.exists());

    let escaping = document(
        &ws.display().to_string(),
        json!([{ "type": "mkdir", "path": "../escape" }]),
    );
    let error = FileOpsEngine::new()
        .validate_json_config(&escaping)
        .unwrap_err();
    assert!(error.is_denied());
}

#[test]
fn stop_on_first_failure_is_the_default() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let missing = tmp.path().join("missing.c");
    let text = document(
        &ws.display().to_string(),
        json!([
            { "type": "copy_file", "src_path": missing.display().to_string(), "dest_path": "a.c" },
            { "type": "mkdir", "path": "after" }
        ]),
    );

    let error = FileOpsEngine::new().process_json_config(&text).unwrap_err();
    match &error {
        FileOpsError::BatchFailed { index, failed, .. } => {
            assert_eq!((*index, *failed), (0, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(ws.is_dir());
    assert!(!ws.join("after").exists());
}

#[test]
fn continue_on_failure_runs_the_rest() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let missing = tmp.path().join("missing.c");
    let text = json!({
        "workspace_dir": ws.display().to_string(),
        "batch_failure_policy": "continue_on_failure",
        "operations": [
            { "type": "copy_file", "src_path": missing.display().to_string(), "dest_path": "a.c" },
            { "type": "mkdir", "path": "after" }
        ]
    })
    .to_string();

    let error = FileOpsEngine::new().process_json_config(&text).unwrap_err();
    match error {
        FileOpsError::BatchFailed {
            index,
            prepared_files,
            ..
        } => {
            assert_eq!(index, 0);
            assert_eq!(prepared_files, vec![ws.join("after")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ws.join("after").is_dir());
}

#[test]
fn copy_directory_contents_document() {
    let tmp = TempDir::new().unwrap();
    tmp.child("gen/bindings.h").write_str("// generated").unwrap();
    tmp.child("gen/bindings.c").write_str("/* generated */").unwrap();
    let ws = tmp.path().join("ws");
    let text = document(
        &ws.display().to_string(),
        json!([{
            "type": "copy_directory_contents",
            "src_path": tmp.path().join("gen").display().to_string(),
            "dest_path": "bindings"
        }]),
    );

    let info = FileOpsEngine::new().process_json_config(&text).unwrap();
    assert_eq!(
        info.prepared_files,
        vec![
            ws.join("bindings/bindings.c").display().to_string(),
            ws.join("bindings/bindings.h").display().to_string()
        ]
    );
}
