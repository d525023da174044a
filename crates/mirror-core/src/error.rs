//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole pass.
///
/// Failures scoped to a single entry never surface here; they are recorded
/// as [`EntryFailure`](crate::EntryFailure)s in the pass report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root is missing or is not a directory
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Replica root exists but is not a directory
    #[error("Replica path is not a directory: {path}")]
    ReplicaNotDirectory { path: PathBuf },

    /// Source and replica are the same directory or nested in each other
    #[error("Source {source_root} and replica {replica_root} overlap")]
    OverlappingRoots {
        source_root: PathBuf,
        replica_root: PathBuf,
    },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
