//! `security-operations` interface.

use fileops_config::PreopenDirConfig;

use super::{argument, done, respond};
use crate::arena::GuestResult;
use crate::codec;

/// `configs` is a JSON array of `{host_path, virtual_path, permission}`.
#[cfg_attr(target_arch = "wasm32", export_name = "security-operations#configure-preopen-dirs")]
pub unsafe extern "C" fn configure_preopen_dirs(configs_ptr: *const u8, configs_len: usize) -> GuestResult {
    let configs = unsafe { argument(configs_ptr, configs_len) };
    respond("configure-preopen-dirs", |component| {
        let configs: Vec<PreopenDirConfig> = codec::decode_json(configs?)?;
        component.configure_preopen_dirs(&configs)?;
        done()
    })
}

/// `paths` is a JSON array in the order the operation class expects.
#[cfg_attr(target_arch = "wasm32", export_name = "security-operations#validate-operation")]
pub unsafe extern "C" fn validate_operation(
    name_ptr: *const u8,
    name_len: usize,
    paths_ptr: *const u8,
    paths_len: usize,
) -> GuestResult {
    let name = unsafe { argument(name_ptr, name_len) };
    let paths = unsafe { argument(paths_ptr, paths_len) };
    respond("validate-operation", |component| {
        let name = codec::decode_str(name?)?;
        let paths = codec::decode_string_list(paths?)?;
        component.validate_operation(name, &paths)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "security-operations#get-security-context")]
pub extern "C" fn get_security_context() -> GuestResult {
    respond("get-security-context", |component| {
        codec::encode_json(&component.security_context())
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "security-operations#set-security-level")]
pub unsafe extern "C" fn set_security_level(level_ptr: *const u8, level_len: usize) -> GuestResult {
    let level = unsafe { argument(level_ptr, level_len) };
    respond("set-security-level", |component| {
        component.set_security_level(codec::decode_str(level?)?)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "security-operations#reconfigure-security-level")]
pub unsafe extern "C" fn reconfigure_security_level(level_ptr: *const u8, level_len: usize) -> GuestResult {
    let level = unsafe { argument(level_ptr, level_len) };
    respond("reconfigure-security-level", |component| {
        component.reconfigure_security_level(codec::decode_str(level?)?)?;
        done()
    })
}
