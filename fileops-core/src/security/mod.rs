//! Path and operation validation.
//!
//! [`SecurityContext`] holds the enforcement level and the preopened
//! directory grants; validation methods are spread over the submodules:
//! path rules live in [`validator`], per-operation rules in [`operation`].

mod context;
mod operation;
mod validator;

pub use context::{DirectoryGrant, SecurityContext};
pub use operation::OperationClass;
pub use validator::RequestPolicy;
