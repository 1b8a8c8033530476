use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::manifests;
use crate::security::SecurityConfig;

/// Ecosystem-aware description of a build workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkspaceDescriptor {
    /// Absolute workspace root.
    pub work_dir: String,
    #[serde(default)]
    pub sources: Vec<FileSpec>,
    #[serde(default)]
    pub headers: Vec<FileSpec>,
    #[serde(default)]
    pub dependencies: Vec<FileSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings_dir: Option<String>,
    #[serde(default)]
    pub workspace_type: WorkspaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_config: Option<SecurityConfig>,
    /// `package.json` settings, used by JavaScript workspaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageConfig>,
    /// `go.mod` settings, used by Go workspaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_module: Option<GoModuleConfig>,
}

/// A single file to place into a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FileSpec {
    /// Absolute source path.
    pub source: String,
    /// Destination relative to the workspace; overrides every naming rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub preserve_permissions: bool,
    /// Keep the immediate parent directory name next to the file.
    #[serde(default)]
    pub preserve_structure: bool,
}

impl FileSpec {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn preserving_structure(mut self) -> Self {
        self.preserve_structure = true;
        self
    }
}

/// Ecosystem tag that selects the workspace expansion profile.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceType {
    Rust,
    Go,
    #[serde(alias = "c++", alias = "c")]
    Cpp,
    #[serde(rename = "javascript", alias = "js", alias = "typescript")]
    JavaScript,
    #[default]
    Generic,
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Cpp => "cpp",
            Self::JavaScript => "javascript",
            Self::Generic => "generic",
        };
        f.write_str(label)
    }
}

/// `package.json` contents for JavaScript workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PackageConfig {
    pub name: String,
    #[serde(default = "default_package_version")]
    pub version: String,
    #[serde(default = "default_module_type")]
    pub module_type: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Extra top-level keys; values that parse as JSON are embedded as such.
    #[serde(default)]
    pub additional_fields: Vec<JsonField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct JsonField {
    pub key: String,
    pub value: String,
}

/// Go module layout for TinyGo-style builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GoModuleConfig {
    pub module_name: String,
    #[serde(default = "default_go_version")]
    pub go_version: String,
    #[serde(default)]
    pub sources: Vec<FileSpec>,
    /// Existing `go.mod` to copy instead of rendering one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_mod_file: Option<String>,
    /// Interface definition copied to `component.wit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wit_file: Option<String>,
}

/// C/C++ source layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CppWorkspaceConfig {
    #[serde(default)]
    pub sources: Vec<FileSpec>,
    #[serde(default)]
    pub headers: Vec<FileSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings_dir: Option<String>,
    #[serde(default)]
    pub dependency_headers: Vec<FileSpec>,
}

fn default_package_version() -> String {
    manifests::DEFAULT_PACKAGE_VERSION.to_string()
}

fn default_module_type() -> String {
    manifests::DEFAULT_MODULE_TYPE.to_string()
}

fn default_go_version() -> String {
    manifests::DEFAULT_GO_VERSION.to_string()
}
