//! Filesystem layer for dir-mirror
//!
//! Provides relative path keys, content fingerprints, tree snapshots and
//! the copy/remove primitives the reconciler is built on.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod tree;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::RelativePath;
pub use tree::{EntryKind, ScanFailure, TraversalOrder, TreeEntry, TreeSnapshot};
