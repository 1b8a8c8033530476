//! Sandboxed file operations for build workspaces.
//!
//! The crate is organised bottom-up:
//!
//! * [`security`] decides whether a path or operation is allowed
//! * [`ops`] implements the validated filesystem primitives
//! * [`batch`] runs ordered operation lists against a workspace root
//! * [`workspace`] expands ecosystem descriptors into batches
//! * [`FileOpsEngine`] ties a security context and a command runner together
//!
//! Validation is advisory. The host runtime's preopened directories remain
//! the actual confinement boundary.

pub mod batch;
pub mod command;
mod engine;
pub mod ops;
pub mod security;
pub mod workspace;

pub use batch::{BatchExecutor, BatchRequest, BatchResult, Operation};
pub use command::{CommandInvocation, CommandOutput, CommandRunner, ProcessCommandRunner};
pub use engine::FileOpsEngine;
pub use ops::{FileOperations, PathKind};
pub use security::{DirectoryGrant, OperationClass, RequestPolicy, SecurityContext};
