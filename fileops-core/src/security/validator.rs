use std::path::{Path, PathBuf};

use fileops_commons::{
    FileOpsError, Result, clean_path, contains_traversal, display_path, resolve_absolute,
};
use fileops_config::constants::security::SENSITIVE_PATH_PATTERNS;
use fileops_config::{SecurityConfig, SecurityLevel};
use tracing::{debug, warn};

use super::context::SecurityContext;

/// Extra restrictions a single request layers on top of the context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Replaces the context's accessible directories as the allow-list when
    /// non-empty. Grants are still enforced separately.
    pub allowed_dirs: Vec<PathBuf>,
    /// Added to the built-in sensitive substrings under strict mode.
    pub denied_patterns: Vec<String>,
}

static UNRESTRICTED: RequestPolicy = RequestPolicy {
    allowed_dirs: Vec::new(),
    denied_patterns: Vec::new(),
};

impl RequestPolicy {
    pub fn unrestricted() -> &'static Self {
        &UNRESTRICTED
    }

    pub fn from_security_config(config: &SecurityConfig) -> Self {
        Self {
            allowed_dirs: config
                .allowed_dirs
                .iter()
                .filter(|dir| !dir.is_empty())
                .map(|dir| clean_path(Path::new(dir)))
                .collect(),
            denied_patterns: config
                .denied_patterns
                .iter()
                .filter(|pattern| !pattern.is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// Absolute, cleaned form used for every prefix comparison. Falls back to the
/// lexical form when the working directory cannot be determined.
pub(crate) fn absolute_form(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return clean_path(path);
    }
    resolve_absolute(path).unwrap_or_else(|_| clean_path(path))
}

impl SecurityContext {
    /// Validate one path against an explicit allow-list at the current level.
    ///
    /// * every level: the raw or cleaned path must not contain `..`
    /// * high: non-empty `allowed_dirs` and the preopened directories must
    ///   both contain the path
    /// * strict: additionally `allowed_dirs` must be non-empty and the
    ///   absolute path must not contain a sensitive substring
    pub fn validate_path(&self, path: &Path, allowed_dirs: &[PathBuf]) -> Result<()> {
        self.check_path(path, allowed_dirs, &[])
    }

    /// Validate one path using the request's allow-list (or the accessible
    /// directories when the request names none) and its extra patterns.
    pub fn validate_path_with(&self, path: &Path, policy: &RequestPolicy) -> Result<()> {
        if policy.allowed_dirs.is_empty() {
            let accessible = self.accessible_dirs();
            self.check_path(path, &accessible, &policy.denied_patterns)
        } else {
            self.check_path(path, &policy.allowed_dirs, &policy.denied_patterns)
        }
    }

    fn check_path(&self, path: &Path, allowed_dirs: &[PathBuf], extra_patterns: &[String]) -> Result<()> {
        if contains_traversal(path) {
            warn!(path = %path.display(), "path traversal attempt rejected");
            return Err(FileOpsError::denied(format!(
                "path contains path traversal attempts: {}",
                path.display()
            )));
        }

        let level = self.level();
        if level >= SecurityLevel::High {
            self.check_confinement(path, allowed_dirs)?;
        }
        if level >= SecurityLevel::Strict {
            check_sensitive(path, allowed_dirs, extra_patterns)?;
        }

        debug!(path = %path.display(), %level, "path validated");
        Ok(())
    }

    fn check_confinement(&self, path: &Path, allowed_dirs: &[PathBuf]) -> Result<()> {
        let absolute = absolute_form(path);

        if !allowed_dirs.is_empty()
            && !allowed_dirs
                .iter()
                .any(|dir| absolute.starts_with(absolute_form(dir)))
        {
            warn!(path = %absolute.display(), "path outside allowed directories");
            return Err(FileOpsError::denied(format!(
                "path {} not within allowed directories",
                display_path(&absolute)
            )));
        }

        if self.has_grants() && !self.is_readable(&absolute) {
            warn!(path = %absolute.display(), "path outside preopened directories");
            return Err(FileOpsError::denied(format!(
                "path {} not accessible in current security context",
                display_path(&absolute)
            )));
        }

        Ok(())
    }
}

fn check_sensitive(path: &Path, allowed_dirs: &[PathBuf], extra_patterns: &[String]) -> Result<()> {
    if allowed_dirs.is_empty() {
        return Err(FileOpsError::denied(
            "strict security mode requires explicit allowed directories",
        ));
    }

    let absolute = resolve_absolute(path).map_err(|err| {
        FileOpsError::denied(format!(
            "cannot resolve absolute path for {}: {err}",
            path.display()
        ))
    })?;
    let lowered = display_path(&absolute).to_lowercase();

    let patterns = SENSITIVE_PATH_PATTERNS
        .iter()
        .copied()
        .chain(extra_patterns.iter().map(String::as_str));
    for pattern in patterns {
        if lowered.contains(&pattern.to_lowercase()) {
            warn!(path = %absolute.display(), pattern, "sensitive path rejected");
            return Err(FileOpsError::denied(format!(
                "access to potentially sensitive path denied: {}",
                display_path(&absolute)
            )));
        }
    }
    Ok(())
}
