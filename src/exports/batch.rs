//! `json-batch-operations` interface.

use super::{argument, done, respond};
use crate::arena::GuestResult;
use crate::codec;

/// Execute a batch document; the payload is a JSON `WorkspaceInfo`.
#[cfg_attr(target_arch = "wasm32", export_name = "json-batch-operations#process-json-config")]
pub unsafe extern "C" fn process_json_config(config_ptr: *const u8, config_len: usize) -> GuestResult {
    let config = unsafe { argument(config_ptr, config_len) };
    respond("process-json-config", |component| {
        let info = component.process_json_config(codec::decode_str(config?)?)?;
        codec::encode_json(&info)
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "json-batch-operations#validate-json-config")]
pub unsafe extern "C" fn validate_json_config(config_ptr: *const u8, config_len: usize) -> GuestResult {
    let config = unsafe { argument(config_ptr, config_len) };
    respond("validate-json-config", |component| {
        component.validate_json_config(codec::decode_str(config?)?)?;
        done()
    })
}

#[cfg_attr(target_arch = "wasm32", export_name = "json-batch-operations#get-json-schema")]
pub extern "C" fn get_json_schema() -> GuestResult {
    respond("get-json-schema", |component| {
        component.json_schema().map(codec::encode_text)
    })
}
