//! # fileops-component
//!
//! A sandboxed file-operations component for build pipelines. The host loads
//! it as a guest module and drives it through fixed-arity `(ptr, len)`
//! entry points; every decision about whether a path may be touched is made
//! by [`fileops_core::SecurityContext`] before any filesystem call.
//!
//! ## Highlights
//!
//! - **Validated primitives**: copy, move, create, remove, list, read, write
//!   and concatenate, each checked against the active security level and the
//!   preopened directory grants.
//! - **Batch documents**: a JSON document describes a workspace root and an
//!   ordered list of operations; the whole document is validated before
//!   anything runs.
//! - **Workspace preparation**: ecosystem-aware descriptors for Rust, Go,
//!   C++, JavaScript and generic builds expand into batches, including
//!   `package.json` and `go.mod` emission.
//! - **Explicit buffer ownership**: results live in a [`BufferArena`] until
//!   the host hands them back through `fileops_free`.
//!
//! ## Embedding
//!
//! Hosts linking the crate directly can skip the buffer protocol and use
//! [`FileOpsComponent`]:
//!
//! ```rust
//! use fileops_component::FileOpsComponent;
//!
//! let component = FileOpsComponent::new();
//! let joined = component.join_paths(&["/ws".to_string(), "src/main.rs".to_string()]);
//! assert_eq!(joined, "/ws/src/main.rs");
//! ```
//!
//! ## Logging
//!
//! Tracing output goes to stderr. Set `FILEOPS_LOG` (or `RUST_LOG`) to an
//! `EnvFilter` directive such as `fileops_core=debug`; the default is `warn`.

mod arena;
pub mod codec;
mod component;
pub mod exports;
mod logging;

pub use arena::{BufferArena, GuestResult};
pub use codec::{BatchFailureDetails, ErrorRecord};
pub use component::FileOpsComponent;
pub use exports::{fileops_alloc, fileops_free};
