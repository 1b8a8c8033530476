use std::io;
use std::path::{Component, Path, PathBuf, is_separator};

use path_clean::PathClean;
use tracing::trace;

/// Lexically clean a path: collapse `.` segments, redundant separators and
/// resolvable `..` segments without touching the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    path.clean()
}

/// Returns `true` when the raw path or its cleaned form carries a `..`
/// component.
///
/// Checking the raw form as well means `/workspace/../etc/passwd` is treated
/// as a traversal attempt even though it cleans to `/etc/passwd`.
pub fn contains_traversal(path: &Path) -> bool {
    let has_parent = |candidate: &Path| {
        candidate
            .components()
            .any(|component| matches!(component, Component::ParentDir))
    };
    has_parent(path) || has_parent(&clean_path(path))
}

/// Join `relative` onto `root` and return the cleaned result only when it
/// stays inside `root`. Absolute inputs are rejected.
pub fn resolve_within(root: &Path, relative: &Path) -> Option<PathBuf> {
    if relative.is_absolute() || relative.has_root() {
        return None;
    }
    let root = clean_path(root);
    let joined = clean_path(&root.join(relative));
    if joined.starts_with(&root) {
        Some(joined)
    } else {
        trace!(
            root = %root.display(),
            relative = %relative.display(),
            "relative path escapes its root"
        );
        None
    }
}

/// Resolve a path against the current working directory and clean it.
pub fn resolve_absolute(path: &Path) -> io::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return std::env::current_dir().map(|dir| clean_path(&dir));
    }
    std::path::absolute(path).map(|absolute| clean_path(&absolute))
}

/// Join path segments, skipping empty ones, and clean the result. An input
/// with no non-empty segment yields an empty string.
pub fn join_paths<S: AsRef<str>>(segments: &[S]) -> String {
    let mut joined = PathBuf::new();
    let mut any = false;
    for segment in segments.iter().map(AsRef::as_ref) {
        if segment.is_empty() {
            continue;
        }
        any = true;
        if joined.as_os_str().is_empty() {
            joined = PathBuf::from(segment);
        } else {
            joined.push(segment.trim_start_matches(is_separator));
        }
    }
    if !any {
        return String::new();
    }
    display_path(&clean_path(&joined))
}

/// Everything but the last element of `path`, cleaned. Mirrors the usual
/// `dirname` conventions: no separator yields `.`, the root stays the root.
pub fn dirname(path: &str) -> String {
    match path.rfind(is_separator) {
        Some(index) => {
            let head = path.get(..=index).unwrap_or(path);
            display_path(&clean_path(Path::new(head)))
        }
        None => ".".to_string(),
    }
}

/// The last element of `path` after trailing separators are removed. An empty
/// input yields `.`, a path made only of separators yields the separator.
pub fn basename(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return std::path::MAIN_SEPARATOR.to_string();
    }
    match trimmed.rfind(is_separator) {
        Some(index) => trimmed.get(index + 1..).unwrap_or(trimmed).to_string(),
        None => trimmed.to_string(),
    }
}

/// Lossy UTF-8 rendering used for messages and boundary payloads.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
