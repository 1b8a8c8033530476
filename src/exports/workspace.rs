//! `workspace-management` interface. Every call returns a JSON
//! `WorkspaceInfo`.

use fileops_config::{CppWorkspaceConfig, FileSpec, GoModuleConfig, PackageConfig, WorkspaceDescriptor};

use super::{argument, respond};
use crate::arena::GuestResult;
use crate::codec;

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#prepare-workspace")]
pub unsafe extern "C" fn prepare_workspace(desc_ptr: *const u8, desc_len: usize) -> GuestResult {
    let descriptor = unsafe { argument(desc_ptr, desc_len) };
    respond("prepare-workspace", |component| {
        let descriptor: WorkspaceDescriptor = codec::decode_json(descriptor?)?;
        codec::encode_json(&component.prepare_workspace(&descriptor)?)
    })
}

/// `sources` is a JSON array of file specs.
#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#copy-sources")]
pub unsafe extern "C" fn copy_sources(
    specs_ptr: *const u8,
    specs_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let specs = unsafe { argument(specs_ptr, specs_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("copy-sources", |component| {
        let specs: Vec<FileSpec> = codec::decode_json(specs?)?;
        let destination = codec::decode_str(destination?)?;
        codec::encode_json(&component.copy_sources(&specs, destination)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#copy-headers")]
pub unsafe extern "C" fn copy_headers(
    specs_ptr: *const u8,
    specs_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let specs = unsafe { argument(specs_ptr, specs_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("copy-headers", |component| {
        let specs: Vec<FileSpec> = codec::decode_json(specs?)?;
        let destination = codec::decode_str(destination?)?;
        codec::encode_json(&component.copy_headers(&specs, destination)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#copy-bindings")]
pub unsafe extern "C" fn copy_bindings(
    bindings_ptr: *const u8,
    bindings_len: usize,
    dest_ptr: *const u8,
    dest_len: usize,
) -> GuestResult {
    let bindings = unsafe { argument(bindings_ptr, bindings_len) };
    let destination = unsafe { argument(dest_ptr, dest_len) };
    respond("copy-bindings", |component| {
        let bindings = codec::decode_str(bindings?)?;
        let destination = codec::decode_str(destination?)?;
        codec::encode_json(&component.copy_bindings(bindings, destination)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#setup-package-json")]
pub unsafe extern "C" fn setup_package_json(
    config_ptr: *const u8,
    config_len: usize,
    work_ptr: *const u8,
    work_len: usize,
) -> GuestResult {
    let config = unsafe { argument(config_ptr, config_len) };
    let work_dir = unsafe { argument(work_ptr, work_len) };
    respond("setup-package-json", |component| {
        let config: PackageConfig = codec::decode_json(config?)?;
        let work_dir = codec::decode_str(work_dir?)?;
        codec::encode_json(&component.setup_package_json(&config, work_dir)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#setup-go-module")]
pub unsafe extern "C" fn setup_go_module(
    config_ptr: *const u8,
    config_len: usize,
    work_ptr: *const u8,
    work_len: usize,
) -> GuestResult {
    let config = unsafe { argument(config_ptr, config_len) };
    let work_dir = unsafe { argument(work_ptr, work_len) };
    respond("setup-go-module", |component| {
        let config: GoModuleConfig = codec::decode_json(config?)?;
        let work_dir = codec::decode_str(work_dir?)?;
        codec::encode_json(&component.setup_go_module(&config, work_dir)?)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "workspace-management#setup-cpp-workspace")]
pub unsafe extern "C" fn setup_cpp_workspace(
    config_ptr: *const u8,
    config_len: usize,
    work_ptr: *const u8,
    work_len: usize,
) -> GuestResult {
    let config = unsafe { argument(config_ptr, config_len) };
    let work_dir = unsafe { argument(work_ptr, work_len) };
    respond("setup-cpp-workspace", |component| {
        let config: CppWorkspaceConfig = codec::decode_json(config?)?;
        let work_dir = codec::decode_str(work_dir?)?;
        codec::encode_json(&component.setup_cpp_workspace(&config, work_dir)?)
    })
}
