//! SHA-256 content fingerprints
//!
//! Provides a single canonical fingerprint format (`sha256:<hex>`) used to
//! decide whether two files hold the same bytes, independent of timestamps.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of in-memory content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's full contents.
///
/// The whole file is read into memory; there is no partial hashing.
///
/// # Errors
///
/// Returns [`Error::Io`] naming `path` if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(compute_content_checksum(&content))
}
