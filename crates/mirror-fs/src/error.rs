//! Error types for mirror-fs

use std::path::PathBuf;

/// Result type for mirror-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } | Self::Copy { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            Self::Walk { source, .. } => source
                .io_error()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound),
            _ => false,
        }
    }
}
