//! C ABI entry points.
//!
//! Every argument is a `(ptr, len)` pair that must describe a readable buffer
//! for the duration of the call; an empty argument may pass a null pointer.
//! Hosts without their own allocator obtain argument buffers through
//! [`fileops_alloc`]. Results are [`GuestResult`] records whose buffers belong
//! to the host until handed back through [`fileops_free`].
//!
//! Calls are serialized on the component lock. Panics are caught and reported
//! as `io_error` records.

#![allow(unsafe_code, clippy::missing_safety_doc)]

pub mod batch;
pub mod file_ops;
pub mod security;
pub mod workspace;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use fileops_commons::{FileOpsError, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::arena::{BufferArena, GuestResult};
use crate::codec::{self, ErrorRecord};
use crate::component::FileOpsComponent;
use crate::logging;

static COMPONENT: Lazy<Mutex<FileOpsComponent>> =
    Lazy::new(|| Mutex::new(FileOpsComponent::new()));
static ARENA: Lazy<Mutex<BufferArena>> = Lazy::new(|| Mutex::new(BufferArena::new()));

/// Reserve `len` zeroed bytes for an argument. Zero-length requests return
/// null.
#[no_mangle]
pub extern "C" fn fileops_alloc(len: usize) -> *mut u8 {
    ARENA.lock().allocate(len)
}

/// Hand a buffer back. Returns 1 when it was released, 0 for an unknown
/// address or a mismatched length.
#[no_mangle]
pub extern "C" fn fileops_free(ptr: *mut u8, len: usize) -> u32 {
    u32::from(ARENA.lock().release(ptr, len))
}

/// Buffers currently owned by the host.
pub fn live_buffers() -> usize {
    ARENA.lock().live_buffers()
}

/// Replace the shared component with a fresh one: standard level, no grants.
/// Buffers already handed out are unaffected.
pub fn reset_component() {
    *COMPONENT.lock() = FileOpsComponent::new();
}

unsafe fn argument<'a>(ptr: *const u8, len: usize) -> Result<&'a [u8]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(FileOpsError::schema(format!(
            "null argument buffer with length {len}"
        )));
    }
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Run one entry point against the shared component and package its outcome.
fn respond(entry: &'static str, call: impl FnOnce(&mut FileOpsComponent) -> Result<Vec<u8>>) -> GuestResult {
    logging::init();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut component = COMPONENT.lock();
        call(&mut component)
    }));

    let (status, payload) = match outcome {
        Ok(Ok(payload)) => {
            debug!(entry, bytes = payload.len(), "entry point succeeded");
            (GuestResult::OK, payload)
        }
        Ok(Err(err)) => {
            debug!(entry, kind = err.kind().as_str(), error = %err, "entry point failed");
            (GuestResult::ERR, codec::encode_error(&err))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(entry, panic = message, "entry point panicked");
            let record = ErrorRecord::internal(format!("internal error in {entry}: {message}"));
            (GuestResult::ERR, record.encode())
        }
    };
    ARENA.lock().result(status, payload)
}

fn done() -> Result<Vec<u8>> {
    Ok(Vec::new())
}
