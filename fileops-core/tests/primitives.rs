use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use fileops_commons::ErrorKind;
use fileops_core::{FileOperations, PathKind, SecurityContext};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

fn tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.unwrap())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let contents = if entry.file_type().is_file() {
                fs::read(entry.path()).unwrap()
            } else {
                Vec::new()
            };
            (relative, contents)
        })
        .collect()
}

#[test]
fn write_then_read_returns_identical_bytes() {
    let tmp = TempDir::new().unwrap();
    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);

    for (name, contents) in [
        ("empty.bin", Vec::new()),
        ("text.txt", b"hello\nworld".to_vec()),
        ("binary.bin", vec![0u8, 255, 10, 13, 0]),
    ] {
        let path = tmp.path().join("nested").join(name);
        ops.write_file(&path, &contents).unwrap();
        assert_eq!(ops.read_file(&path).unwrap(), contents);
    }
}

#[test]
fn remove_path_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    tmp.child("dir/file.txt").write_str("x").unwrap();
    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);

    let target = tmp.path().join("dir");
    ops.remove_path(&target).unwrap();
    ops.remove_path(&target).unwrap();
    assert_eq!(ops.path_exists(&target), PathKind::NotFound);
}

#[test]
fn copy_directory_mirrors_the_tree() {
    let tmp = TempDir::new().unwrap();
    tmp.child("src/a.txt").write_str("a").unwrap();
    tmp.child("src/sub/b.txt").write_str("b").unwrap();
    tmp.child("src/sub/deeper/c.bin").write_binary(&[1, 2, 3]).unwrap();
    tmp.child("src/empty").create_dir_all().unwrap();

    let context = SecurityContext::default();
    let source = tmp.path().join("src");
    let destination = tmp.path().join("out/copy");
    FileOperations::new(&context)
        .copy_directory(&source, &destination)
        .unwrap();

    assert_eq!(tree(&destination), tree(&source));
}

#[cfg(unix)]
#[test]
fn copy_directory_keeps_permission_bits() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    tmp.child("src/run.sh").write_str("#!/bin/sh\n").unwrap();
    let script = tmp.path().join("src/run.sh");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let context = SecurityContext::default();
    FileOperations::new(&context)
        .copy_directory(&tmp.path().join("src"), &tmp.path().join("dst"))
        .unwrap();

    let mode = fs::metadata(tmp.path().join("dst/run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn copy_directory_rejects_files() {
    let tmp = TempDir::new().unwrap();
    tmp.child("file.txt").write_str("x").unwrap();
    let context = SecurityContext::default();
    let error = FileOperations::new(&context)
        .copy_directory(&tmp.path().join("file.txt"), &tmp.path().join("out"))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IoError);
}

#[test]
fn concatenate_joins_in_order_and_requires_sources() {
    let tmp = TempDir::new().unwrap();
    tmp.child("a").write_str("alpha,").unwrap();
    tmp.child("b").write_str("").unwrap();
    tmp.child("c").write_str("gamma").unwrap();

    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);
    let destination = tmp.path().join("joined/out.txt");
    let sources: Vec<PathBuf> = ["a", "b", "c"]
        .iter()
        .map(|name| tmp.path().join(name))
        .collect();

    let bytes = ops.concatenate_files(&sources, &destination).unwrap();
    assert_eq!(bytes, 11);
    assert_eq!(fs::read_to_string(&destination).unwrap(), "alpha,gamma");

    let error = ops.concatenate_files(&[], &destination).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SchemaError);
    assert_eq!(fs::read_to_string(&destination).unwrap(), "alpha,gamma");
}

#[test]
fn concatenate_with_missing_input_leaves_destination_untouched() {
    let tmp = TempDir::new().unwrap();
    tmp.child("a").write_str("a").unwrap();
    tmp.child("out").write_str("previous").unwrap();

    let context = SecurityContext::default();
    let error = FileOperations::new(&context)
        .concatenate_files(
            &[tmp.path().join("a"), tmp.path().join("missing")],
            &tmp.path().join("out"),
        )
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    tmp.child("out").assert("previous");
}

#[test]
fn move_path_relocates_files_and_directories() {
    let tmp = TempDir::new().unwrap();
    tmp.child("file.txt").write_str("moved").unwrap();
    tmp.child("dir/inner.txt").write_str("inner").unwrap();

    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);
    ops.move_path(&tmp.path().join("file.txt"), &tmp.path().join("new/file.txt"))
        .unwrap();
    ops.move_path(&tmp.path().join("dir"), &tmp.path().join("moved_dir"))
        .unwrap();

    tmp.child("new/file.txt").assert("moved");
    tmp.child("moved_dir/inner.txt").assert("inner");
    assert_eq!(ops.path_exists(&tmp.path().join("file.txt")), PathKind::NotFound);
    assert_eq!(ops.path_exists(&tmp.path().join("dir")), PathKind::NotFound);
}

#[test]
fn move_onto_itself_fails_and_keeps_the_source() {
    let tmp = TempDir::new().unwrap();
    tmp.child("precious.txt").write_str("precious").unwrap();
    tmp.child("dir/inner.txt").write_str("inner").unwrap();
    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);

    let file = tmp.path().join("precious.txt");
    let error = ops.move_path(&file, &file).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IoError);
    tmp.child("precious.txt").assert("precious");

    let copy_error = ops.copy_file(&file, &file).unwrap_err();
    assert_eq!(copy_error.kind(), ErrorKind::IoError);
    tmp.child("precious.txt").assert("precious");

    let dir = tmp.path().join("dir");
    assert!(ops.move_path(&dir, &dir).is_err());
    tmp.child("dir/inner.txt").assert("inner");
}

#[test]
fn append_creates_then_extends() {
    let tmp = TempDir::new().unwrap();
    let context = SecurityContext::default();
    let ops = FileOperations::new(&context);
    let log = tmp.path().join("logs/build.log");

    ops.append_file(&log, b"first\n").unwrap();
    ops.append_file(&log, b"second\n").unwrap();
    tmp.child("logs/build.log").assert("first\nsecond\n");
}

#[test]
fn copy_file_of_missing_source_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let context = SecurityContext::default();
    let error = FileOperations::new(&context)
        .copy_file(&tmp.path().join("missing.c"), &tmp.path().join("out.c"))
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}
