//! `file-operations` interface.

use std::panic::{self, AssertUnwindSafe};

use fileops_core::PathKind;

use super::{COMPONENT, argument, done, respond};
use crate::arena::GuestResult;
use crate::codec;
use crate::logging;

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#copy-file")]
pub unsafe extern "C" fn copy_file(
    src_ptr: *const u8,
    src_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let source = unsafe { argument(src_ptr, src_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("copy-file", |component| {
        let source = codec::decode_path(source?)?;
        let destination = codec::decode_path(destination?)?;
        component.copy_file(&source, &destination)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#copy-directory")]
pub unsafe extern "C" fn copy_directory(
    src_ptr: *const u8,
    src_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let source = unsafe { argument(src_ptr, src_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("copy-directory", |component| {
        let source = codec::decode_path(source?)?;
        let destination = codec::decode_path(destination?)?;
        component.copy_directory(&source, &destination)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#create-directory")]
pub unsafe extern "C" fn create_directory(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("create-directory", |component| {
        component.create_directory(&codec::decode_path(path?)?)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#remove-path")]
pub unsafe extern "C" fn remove_path(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("remove-path", |component| {
        component.remove_path(&codec::decode_path(path?)?)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#move-path")]
pub unsafe extern "C" fn move_path(
    src_ptr: *const u8,
    src_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let source = unsafe { argument(src_ptr, src_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("move-path", |component| {
        let source = codec::decode_path(source?)?;
        let destination = codec::decode_path(destination?)?;
        component.move_path(&source, &destination)?;
        done()
    })
}

/// Returns the [`PathKind`] code directly. An undecodable path reports
/// `NotFound`; a panic reports `Other`.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#path-exists")]
pub unsafe extern "C" fn path_exists(path_ptr: *const u8, path_len: usize) -> u32 {
    logging::init();
    let path = unsafe { argument(path_ptr, path_len) };
    panic::catch_unwind(AssertUnwindSafe(|| match path.and_then(codec::decode_path) {
        Ok(path) => COMPONENT.lock().path_exists(&path).code(),
        Err(_) => PathKind::NotFound.code(),
    }))
    .unwrap_or_else(|_| PathKind::Other.code())
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#resolve-absolute-path")]
pub unsafe extern "C" fn resolve_absolute_path(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("resolve-absolute-path", |component| {
        let resolved = component.resolve_absolute_path(&codec::decode_path(path?)?)?;
        Ok(codec::encode_text(resolved))
    })
}

/// Takes a JSON array of segments and returns the joined path as text.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#join-paths")]
pub unsafe extern "C" fn join_paths(list_ptr: *const u8, list_len: usize) -> GuestResult {
    let segments = unsafe { argument(list_ptr, list_len) };
    respond("join-paths", |component| {
        let segments = codec::decode_string_list(segments?)?;
        Ok(codec::encode_text(component.join_paths(&segments)))
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#get-dirname")]
pub unsafe extern "C" fn get_dirname(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("get-dirname", |component| {
        Ok(codec::encode_text(component.dirname(codec::decode_str(path?)?)))
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#get-basename")]
pub unsafe extern "C" fn get_basename(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("get-basename", |component| {
        Ok(codec::encode_text(component.basename(codec::decode_str(path?)?)))
    })
}

/// Returns a JSON array of child names. An empty pattern lists everything.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#list-directory")]
pub unsafe extern "C" fn list_directory(
    path_ptr: *const u8,
    path_len: usize,
    pattern_ptr: *const u8,
    pattern_len: usize,
) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    let pattern = unsafe { argument(pattern_ptr, pattern_len) };
    respond("list-directory", |component| {
        let path = codec::decode_path(path?)?;
        let pattern = codec::decode_optional_str(pattern?)?;
        codec::encode_json(&component.list_directory(&path, pattern)?)
    })
}

/// `allowed` is a JSON array of directories; empty means the preopened
/// directories.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#validate-path")]
pub unsafe extern "C" fn validate_path(
    path_ptr: *const u8,
    path_len: usize,
    allowed_ptr: *const u8,
    allowed_len: usize,
) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    let allowed = unsafe { argument(allowed_ptr, allowed_len) };
    respond("validate-path", |component| {
        let path = codec::decode_path(path?)?;
        let allowed = codec::decode_string_list(allowed?)?;
        component.validate_path(&path, &allowed)?;
        done()
    })
}

/// Returns the raw file contents.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#read-file")]
pub unsafe extern "C" fn read_file(path_ptr: *const u8, path_len: usize) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    respond("read-file", |component| {
        component.read_file(&codec::decode_path(path?)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#write-file")]
pub unsafe extern "C" fn write_file(
    path_ptr: *const u8,
    path_len: usize,
    data_ptr: *const u8,
    data_len: usize,
) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    let data = unsafe { argument(data_ptr, data_len) };
    respond("write-file", |component| {
        component.write_file(&codec::decode_path(path?)?, data?)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#append-file")]
pub unsafe extern "C" fn append_file(
    path_ptr: *const u8,
    path_len: usize,
    data_ptr: *const u8,
    data_len: usize,
) -> GuestResult {
    let path = unsafe { argument(path_ptr, path_len) };
    let data = unsafe { argument(data_ptr, data_len) };
    respond("append-file", |component| {
        component.append_file(&codec::decode_path(path?)?, data?)?;
        done()
    })
}

/// `sources` is a JSON array of paths.
#[cfg_attr(target_arch = "wasm32", export_name = "file-operations#concatenate-files")]
pub unsafe extern "C" fn concatenate_files(
    sources_ptr: *const u8,
    sources_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let sources = unsafe { argument(sources_ptr, sources_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("concatenate-files", |component| {
        let sources = codec::decode_string_list(sources?)?;
        let destination = codec::decode_path(destination?)?;
        component.concatenate_files(&sources, &destination)?;
        done()
    })
}
