//! Content comparison
//!
//! Change detection is purely content based: timestamps and sizes are never
//! used to decide that two files are the same.

use std::path::Path;

use mirror_fs::checksum;

/// Decides whether two files hold identical bytes.
pub trait ContentComparator {
    /// Compare the full contents of `a` and `b`.
    ///
    /// # Errors
    ///
    /// Fails if either file cannot be opened or read. A missing file is an
    /// error, never a verdict.
    fn identical(&self, a: &Path, b: &Path) -> mirror_fs::Result<bool>;
}

/// Compares SHA-256 fingerprints of the whole files.
///
/// No size short-circuit: both files are always read in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Comparator;

impl ContentComparator for Sha256Comparator {
    fn identical(&self, a: &Path, b: &Path) -> mirror_fs::Result<bool> {
        let left = checksum::compute_file_checksum(a)?;
        let right = checksum::compute_file_checksum(b)?;
        Ok(left == right)
    }
}
