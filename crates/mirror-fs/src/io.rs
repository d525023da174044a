//! Copy and removal primitives
//!
//! Every helper maps failures to [`Error`] values naming the path involved.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{debug, warn};

use crate::{EntryKind, Error, Result};

/// Report what occupies `path` without following a final symlink.
///
/// Returns `Ok(None)` when nothing is there. Anything that is not a
/// directory counts as [`EntryKind::File`], so it can be removed with
/// [`remove_file`].
pub fn probe(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(_) => Ok(Some(EntryKind::File)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Like [`probe`], but only regular files and directories count.
///
/// Symlinks and other special files are reported as `Ok(None)`, matching
/// what [`TreeSnapshot::scan`](crate::TreeSnapshot::scan) records.
pub fn probe_regular(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(metadata) if metadata.is_file() => Ok(Some(EntryKind::File)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Copy `from` to `to`, preserving modification and access times.
///
/// The content is first copied to a hidden temporary file next to `to`,
/// timestamped, then renamed over `to`, so `to` holds either its previous
/// content or the complete new content. Missing parent directories are
/// created. Returns the number of bytes copied.
pub fn copy_atomic(from: &Path, to: &Path) -> Result<u64> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(to);
    let result = copy_via(from, &temp_path, to);
    if result.is_err() {
        match fs::remove_file(&temp_path) {
            Ok(()) => debug!("Removed partial copy {}", temp_path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove partial copy {}: {}",
                temp_path.display(),
                e
            ),
        }
    }
    result
}

fn copy_via(from: &Path, temp_path: &Path, to: &Path) -> Result<u64> {
    let metadata = fs::metadata(from).map_err(|e| Error::io(from, e))?;

    let bytes = fs::copy(from, temp_path).map_err(|e| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;

    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(temp_path, atime, mtime).map_err(|e| Error::io(temp_path, e))?;

    fs::rename(temp_path, to).map_err(|e| Error::io(to, e))?;
    Ok(bytes)
}

/// Temp file in the same directory as `target` (same filesystem, so the
/// final rename is atomic).
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", std::process::id()));
    target.with_file_name(name)
}

/// Create a directory and any missing ancestors.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a single non-directory entry.
///
/// Returns `Ok(false)` if it was already gone.
pub fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove a directory and everything beneath it in one operation.
///
/// Empty directories are removed like any other. Returns `Ok(false)` if it
/// was already gone.
pub fn remove_dir_all(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}
