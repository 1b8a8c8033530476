use std::fmt;
use std::str::FromStr;

use fileops_commons::FileOpsError;
use serde::{Deserialize, Serialize};

/// Enforcement level applied by the path validator. Ordered so that a later
/// variant is always at least as restrictive as an earlier one.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Traversal protection only.
    #[default]
    Standard,
    /// Paths must lie inside allow-listed and preopened directories.
    High,
    /// High, plus mandatory allow-lists and sensitive-name detection.
    Strict,
}

impl SecurityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::High => "high",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = FileOpsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "high" => Ok(Self::High),
            "strict" => Ok(Self::Strict),
            other => Err(FileOpsError::schema(format!(
                "unknown security level '{other}' (expected standard, high or strict)"
            ))),
        }
    }
}

/// Access granted to a preopened directory.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessPermission {
    #[default]
    ReadOnly,
    ReadWrite,
    Full,
}

impl AccessPermission {
    pub fn allows_write(self) -> bool {
        matches!(self, Self::ReadWrite | Self::Full)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
            Self::Full => "full access",
        }
    }
}

/// One host-granted directory handle, as announced by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PreopenDirConfig {
    /// Directory on the host that backs the handle.
    #[serde(default)]
    pub host_path: String,
    /// Absolute path under which the guest sees the directory.
    pub virtual_path: String,
    #[serde(default, alias = "permissions")]
    pub permission: AccessPermission,
}

/// Optional per-request security settings carried by workspace descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SecurityConfig {
    #[serde(default)]
    pub level: SecurityLevel,
    /// Extra allow-list applied to every path of the request.
    #[serde(default)]
    pub allowed_dirs: Vec<String>,
    /// Extra sensitive substrings checked under strict mode.
    #[serde(default)]
    pub denied_patterns: Vec<String>,
    /// When false the descriptor does not change the component's level.
    #[serde(default = "default_true")]
    pub enforce_validation: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            level: SecurityLevel::default(),
            allowed_dirs: Vec::new(),
            denied_patterns: Vec::new(),
            enforce_validation: default_true(),
        }
    }
}

/// Read-only view of the security context returned to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SecurityContextInfo {
    pub level: SecurityLevel,
    pub accessible_dirs: Vec<String>,
    pub restrictions: Vec<String>,
}

#[inline]
const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_restrictiveness() {
        assert!(SecurityLevel::Standard < SecurityLevel::High);
        assert!(SecurityLevel::High < SecurityLevel::Strict);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("STRICT".parse::<SecurityLevel>().ok(), Some(SecurityLevel::Strict));
        assert!("paranoid".parse::<SecurityLevel>().is_err());
    }

    #[test]
    fn preopen_accepts_legacy_permissions_key() {
        let config: PreopenDirConfig = serde_json::from_str(
            r#"{"host_path":"/host/ws","virtual_path":"/ws","permissions":"read_write"}"#,
        )
        .unwrap();
        assert_eq!(config.permission, AccessPermission::ReadWrite);
        assert!(config.permission.allows_write());
    }

    #[test]
    fn security_config_defaults_to_enforcing() {
        let config: SecurityConfig = serde_json::from_str(r#"{"level":"high"}"#).unwrap();
        assert_eq!(config.level, SecurityLevel::High);
        assert!(config.enforce_validation);
        assert!(config.allowed_dirs.is_empty());
    }
}
