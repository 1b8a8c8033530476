//! Documents exchanged with the sandboxed file-operations component.
//!
//! Every structure here is a plain `serde` type with a derived JSON schema.
//! The same decoder serves configuration files on disk and arguments that
//! arrive over the guest/host boundary (see [`loader`]).

pub mod batch;
pub mod constants;
pub mod loader;
pub mod schema;
pub mod security;
pub mod workspace;

pub use batch::{
    BatchConfig, BatchFailurePolicy, OperationOutcome, OperationSpec, OperationType,
    WorkspaceInfo,
};
pub use loader::{from_json_str, load_json_file, to_json_string};
pub use schema::batch_config_schema;
pub use security::{
    AccessPermission, PreopenDirConfig, SecurityConfig, SecurityContextInfo, SecurityLevel,
};
pub use workspace::{
    CppWorkspaceConfig, Dependency, FileSpec, GoModuleConfig, JsonField, PackageConfig,
    WorkspaceDescriptor, WorkspaceType,
};
