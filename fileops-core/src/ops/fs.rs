//! Unchecked filesystem helpers. Callers validate paths first.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fileops_commons::{FileOpsError, Result};
use tempfile::NamedTempFile;
use tracing::trace;
use walkdir::WalkDir;

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|err| FileOpsError::io("creating parent directory", parent, err)),
        _ => Ok(()),
    }
}

/// Both paths resolve to the same existing filesystem object.
fn same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn onto_itself(destination: &Path, reason: &str) -> FileOpsError {
    FileOpsError::io(
        "copying into",
        destination,
        io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
    )
}

/// Stream `source` into `destination`, creating parent directories.
/// Returns the number of bytes copied.
pub(crate) fn copy_file(source: &Path, destination: &Path, preserve_permissions: bool) -> Result<u64> {
    let metadata =
        fs::metadata(source).map_err(|err| FileOpsError::io("reading metadata of", source, err))?;
    if metadata.is_dir() {
        return Err(FileOpsError::io(
            "copying",
            source,
            io::Error::new(io::ErrorKind::IsADirectory, "source is a directory"),
        ));
    }
    if same_file(source, destination) {
        return Err(onto_itself(destination, "source and destination are the same file"));
    }

    ensure_parent(destination)?;
    let mut reader =
        File::open(source).map_err(|err| FileOpsError::io("opening source", source, err))?;
    let mut writer = File::create(destination)
        .map_err(|err| FileOpsError::io("creating destination", destination, err))?;
    let bytes = io::copy(&mut reader, &mut writer)
        .map_err(|err| FileOpsError::io("copying to", destination, err))?;

    if preserve_permissions {
        fs::set_permissions(destination, metadata.permissions())
            .map_err(|err| FileOpsError::io("setting permissions on", destination, err))?;
    }
    trace!(source = %source.display(), destination = %destination.display(), bytes, "copied file");
    Ok(bytes)
}

/// Recursively mirror `source` into `destination`, depth-first in file name
/// order, keeping permission bits. Symbolic links are followed; a link cycle
/// aborts the copy.
pub(crate) fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    let metadata =
        fs::metadata(source).map_err(|err| FileOpsError::io("reading metadata of", source, err))?;
    if !metadata.is_dir() {
        return Err(FileOpsError::NotADirectory {
            path: source.to_path_buf(),
        });
    }
    let resolved_inside = match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => destination.starts_with(source),
        _ => false,
    };
    if destination.starts_with(source) || resolved_inside {
        return Err(onto_itself(destination, "destination lies inside the source directory"));
    }

    create_dir_like(destination, &metadata)?;
    for entry in WalkDir::new(source)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            FileOpsError::io("walking", path, io::Error::other(err.to_string()))
        })?;
        let relative = entry.path().strip_prefix(source).map_err(|err| {
            FileOpsError::io("walking", entry.path(), io::Error::other(err.to_string()))
        })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            let metadata = entry.metadata().map_err(|err| {
                FileOpsError::io(
                    "reading metadata of",
                    entry.path(),
                    io::Error::other(err.to_string()),
                )
            })?;
            create_dir_like(&target, &metadata)?;
        } else {
            copy_file(entry.path(), &target, true)?;
        }
    }
    Ok(())
}

fn create_dir_like(path: &Path, template: &fs::Metadata) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| FileOpsError::io("creating directory", path, err))?;
    fs::set_permissions(path, template.permissions())
        .map_err(|err| FileOpsError::io("setting permissions on", path, err))
}

pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| FileOpsError::io("creating directory", path, err))
}

/// Remove a file, symlink or directory tree. A missing path is not an error.
pub(crate) fn remove_any(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(FileOpsError::io("reading metadata of", path, err)),
    };
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|err| FileOpsError::io("removing", path, err))
}

/// Sorted entry names of `dir`, optionally filtered by a glob on the name.
pub(crate) fn list_names(dir: &Path, pattern: Option<&glob::Pattern>) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| FileOpsError::io("listing", dir, err))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| FileOpsError::io("listing", dir, err))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if pattern.is_none_or(|pattern| pattern.matches(&name)) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Full paths of the direct children of `dir`, sorted.
pub(crate) fn child_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_names(dir, None)?
        .into_iter()
        .map(|name| dir.join(name))
        .collect())
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| FileOpsError::io("reading", path, err))
}

pub(crate) fn write_bytes(path: &Path, contents: &[u8], append: bool) -> Result<()> {
    ensure_parent(path)?;
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    let mut file = options
        .open(path)
        .map_err(|err| FileOpsError::io("opening for write", path, err))?;
    file.write_all(contents)
        .map_err(|err| FileOpsError::io("writing", path, err))
}

/// Concatenate `sources` into a temporary sibling of `destination`, then
/// rename it into place so readers never observe a partial file.
pub(crate) fn concatenate(sources: &[PathBuf], destination: &Path) -> Result<u64> {
    ensure_parent(destination)?;
    let parent = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(parent)
        .map_err(|err| FileOpsError::io("staging", destination, err))?;
    let mut total = 0u64;
    for source in sources {
        let mut reader =
            File::open(source).map_err(|err| FileOpsError::io("opening source", source, err))?;
        total += io::copy(&mut reader, staged.as_file_mut())
            .map_err(|err| FileOpsError::io("concatenating", source, err))?;
    }
    staged
        .persist(destination)
        .map_err(|err| FileOpsError::io("replacing", destination, err.error))?;
    Ok(total)
}
