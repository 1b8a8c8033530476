//! Shared building blocks for the sandboxed file-operations crates: the
//! error taxonomy reported across the guest/host boundary and the lexical
//! path helpers every policy decision is built on.
//!
//! Nothing in this crate touches the filesystem except
//! [`paths::resolve_absolute`], which consults the current directory.

pub mod errors;
pub mod paths;

pub use errors::{ErrorKind, FileOpsError, Result};
pub use paths::{
    basename, clean_path, contains_traversal, dirname, display_path, join_paths,
    resolve_absolute, resolve_within,
};
