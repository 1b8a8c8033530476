use std::ptr;

use hashbrown::HashMap;
use tracing::{trace, warn};

/// Result record returned by every exported entry point except
/// `path-exists`.
///
/// `status` is [`GuestResult::OK`] with the success payload in `ptr`/`len`,
/// or [`GuestResult::ERR`] with a JSON error record. A zero-length payload
/// uses a null pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestResult {
    pub status: u32,
    pub ptr: *mut u8,
    pub len: usize,
}

impl GuestResult {
    pub const OK: u32 = 0;
    pub const ERR: u32 = 1;

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Buffers handed across the boundary, keyed by address.
///
/// Every buffer returned to the host stays alive until the host releases it
/// with `fileops_free`; the same applies to input buffers obtained through
/// `fileops_alloc`.
#[derive(Debug, Default)]
pub struct BufferArena {
    buffers: HashMap<usize, Box<[u8]>>,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-filled buffer of `len` bytes. Zero-length requests return null
    /// and store nothing.
    pub fn allocate(&mut self, len: usize) -> *mut u8 {
        self.store(vec![0u8; len])
    }

    /// Take ownership of `bytes` and return the address the host reads from.
    pub fn store(&mut self, bytes: Vec<u8>) -> *mut u8 {
        if bytes.is_empty() {
            return ptr::null_mut();
        }
        let mut buffer = bytes.into_boxed_slice();
        let address = buffer.as_mut_ptr();
        trace!(address = address as usize, len = buffer.len(), "buffer stored");
        self.buffers.insert(address as usize, buffer);
        address
    }

    /// Package `bytes` as a result record with the given status.
    pub fn result(&mut self, status: u32, bytes: Vec<u8>) -> GuestResult {
        let len = bytes.len();
        GuestResult {
            status,
            ptr: self.store(bytes),
            len,
        }
    }

    /// Release a buffer previously handed out. Returns `false` for unknown
    /// addresses or a length that does not match the allocation.
    pub fn release(&mut self, address: *mut u8, len: usize) -> bool {
        if address.is_null() {
            return len == 0;
        }
        let key = address as usize;
        match self.buffers.get(&key) {
            Some(buffer) if buffer.len() == len => {
                self.buffers.remove(&key);
                true
            }
            Some(buffer) => {
                warn!(address = key, expected = buffer.len(), len, "buffer release with wrong length");
                false
            }
            None => {
                warn!(address = key, len, "release of unknown buffer");
                false
            }
        }
    }

    /// Contents of a live buffer, if `address`/`len` describe one exactly.
    pub fn get(&self, address: *const u8, len: usize) -> Option<&[u8]> {
        if address.is_null() {
            let empty: &[u8] = &[];
            return (len == 0).then_some(empty);
        }
        self.buffers
            .get(&(address as usize))
            .map(Box::as_ref)
            .filter(|buffer| buffer.len() == len)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_bytes(&self) -> usize {
        self.buffers.values().map(|buffer| buffer.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_buffers_live_until_released() {
        let mut arena = BufferArena::new();
        let result = arena.result(GuestResult::OK, b"payload".to_vec());
        assert!(result.is_ok());
        assert_eq!(arena.get(result.ptr, result.len), Some(&b"payload"[..]));
        assert_eq!(arena.live_bytes(), 7);

        assert!(!arena.release(result.ptr, 3));
        assert!(arena.release(result.ptr, result.len));
        assert!(!arena.release(result.ptr, result.len));
        assert_eq!(arena.live_buffers(), 0);
    }

    #[test]
    fn empty_payloads_use_null() {
        let mut arena = BufferArena::new();
        let result = arena.result(GuestResult::OK, Vec::new());
        assert!(result.ptr.is_null());
        assert_eq!(result.len, 0);
        assert_eq!(arena.live_buffers(), 0);
        assert!(arena.release(result.ptr, 0));
        assert_eq!(arena.get(result.ptr, 0), Some(&[][..]));
    }

    #[test]
    fn allocations_are_zeroed_and_distinct() {
        let mut arena = BufferArena::new();
        let first = arena.allocate(4);
        let second = arena.allocate(4);
        assert_ne!(first, second);
        assert_eq!(arena.get(first, 4), Some(&[0u8; 4][..]));
        assert_eq!(arena.live_buffers(), 2);
    }
}
