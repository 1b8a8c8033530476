use std::path::{Path, PathBuf};

use fileops_commons::{FileOpsError, Result, clean_path, contains_traversal, display_path};
use fileops_config::constants::security::{
    HIGH_RESTRICTIONS, STANDARD_RESTRICTIONS, STRICT_RESTRICTIONS,
};
use fileops_config::{AccessPermission, PreopenDirConfig, SecurityContextInfo, SecurityLevel};
use tracing::{debug, info, warn};

use super::validator::absolute_form;

/// A directory the host has preopened for the component.
///
/// The grant is advisory: it drives policy decisions here, while actual
/// confinement is the host runtime's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGrant {
    pub path: PathBuf,
    pub host_path: String,
    pub permission: AccessPermission,
}

/// Security configuration consulted by every validation.
///
/// The context is an owned value; whoever embeds the executor decides how
/// long it lives and when it is reconfigured.
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    level: SecurityLevel,
    level_configured: bool,
    grants: Vec<DirectoryGrant>,
}

impl SecurityContext {
    /// Create a context whose level counts as already configured.
    pub fn new(level: SecurityLevel) -> Self {
        Self {
            level,
            level_configured: true,
            grants: Vec::new(),
        }
    }

    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// Set the enforcement level.
    ///
    /// The first call may pick any level. Afterwards the level can only stay
    /// the same or become stricter; use [`SecurityContext::reconfigure`] to
    /// loosen it.
    pub fn set_level(&mut self, level: SecurityLevel) -> Result<()> {
        if self.level_configured && level < self.level {
            warn!(current = %self.level, requested = %level, "refusing to loosen security level");
            return Err(FileOpsError::denied(format!(
                "security level already configured as {}; cannot lower it to {}",
                self.level, level
            )));
        }
        if level != self.level {
            info!(from = %self.level, to = %level, "security level changed");
        }
        self.level = level;
        self.level_configured = true;
        Ok(())
    }

    /// Replace the level unconditionally.
    pub fn reconfigure(&mut self, level: SecurityLevel) {
        info!(from = %self.level, to = %level, "security level reconfigured");
        self.level = level;
        self.level_configured = true;
    }

    /// Replace the set of preopened directories.
    ///
    /// Every virtual path must be absolute and free of `..`; a single bad
    /// entry rejects the whole list and leaves the previous grants in place.
    pub fn configure_preopen_dirs(&mut self, configs: &[PreopenDirConfig]) -> Result<()> {
        let mut grants: Vec<DirectoryGrant> = Vec::with_capacity(configs.len());
        for config in configs {
            let raw = Path::new(&config.virtual_path);
            if config.virtual_path.trim().is_empty() {
                return Err(FileOpsError::schema("preopen directory requires virtual_path"));
            }
            if contains_traversal(raw) {
                return Err(FileOpsError::denied(format!(
                    "preopen directory contains path traversal: {}",
                    config.virtual_path
                )));
            }
            if !raw.is_absolute() {
                return Err(FileOpsError::schema(format!(
                    "preopen directory must be absolute: {}",
                    config.virtual_path
                )));
            }

            let path = clean_path(raw);
            grants.retain(|existing| existing.path != path);
            grants.push(DirectoryGrant {
                path,
                host_path: config.host_path.clone(),
                permission: config.permission,
            });
        }

        debug!(count = grants.len(), "configured preopen directories");
        self.grants = grants;
        Ok(())
    }

    pub fn grants(&self) -> &[DirectoryGrant] {
        &self.grants
    }

    pub fn accessible_dirs(&self) -> Vec<PathBuf> {
        self.grants.iter().map(|grant| grant.path.clone()).collect()
    }

    pub fn has_grants(&self) -> bool {
        !self.grants.is_empty()
    }

    /// Whether `path` lies under a grant. Without grants everything is readable.
    pub fn is_readable(&self, path: &Path) -> bool {
        if self.grants.is_empty() {
            return true;
        }
        let absolute = absolute_form(path);
        self.grants
            .iter()
            .any(|grant| absolute.starts_with(&grant.path))
    }

    /// Whether `path` lies under a grant that permits writes. Without grants
    /// everything is writable.
    pub fn is_writable(&self, path: &Path) -> bool {
        if self.grants.is_empty() {
            return true;
        }
        let absolute = absolute_form(path);
        self.grants
            .iter()
            .any(|grant| grant.permission.allows_write() && absolute.starts_with(&grant.path))
    }

    /// Whether `path` is exactly one of the granted directories.
    pub fn is_grant_root(&self, path: &Path) -> bool {
        let absolute = absolute_form(path);
        self.grants.iter().any(|grant| grant.path == absolute)
    }

    /// Level descriptors followed by one descriptor per grant.
    pub fn restrictions(&self) -> Vec<String> {
        let mut restrictions: Vec<String> = STANDARD_RESTRICTIONS
            .iter()
            .map(|item| (*item).to_string())
            .collect();
        if self.level >= SecurityLevel::High {
            restrictions.extend(HIGH_RESTRICTIONS.iter().map(|item| (*item).to_string()));
        }
        if self.level >= SecurityLevel::Strict {
            restrictions.extend(STRICT_RESTRICTIONS.iter().map(|item| (*item).to_string()));
        }
        restrictions.extend(self.grants.iter().map(|grant| {
            format!(
                "{}: {}",
                display_path(&grant.path),
                grant.permission.description()
            )
        }));
        restrictions
    }

    pub fn snapshot(&self) -> SecurityContextInfo {
        SecurityContextInfo {
            level: self.level,
            accessible_dirs: self
                .grants
                .iter()
                .map(|grant| display_path(&grant.path))
                .collect(),
            restrictions: self.restrictions(),
        }
    }
}
