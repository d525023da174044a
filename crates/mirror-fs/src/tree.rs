//! Tree snapshots
//!
//! A [`TreeSnapshot`] is the list of files and directories beneath a root,
//! keyed by [`RelativePath`] and ordered by traversal. Snapshots are plain
//! values taken on demand; nothing here caches filesystem state.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, RelativePath, Result};

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Order in which a snapshot lists its entries.
///
/// Siblings are always sorted by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Depth-first, every directory before its contents.
    ParentsFirst,
    /// Depth-first, every directory after its contents.
    ChildrenFirst,
}

/// A single file or directory in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: RelativePath,
    pub kind: EntryKind,
}

/// A part of the tree that could not be listed.
#[derive(Debug)]
pub struct ScanFailure {
    /// Entry that failed, relative to the snapshot root.
    pub path: RelativePath,
    pub error: Error,
}

/// Files and directories beneath a root, in traversal order.
#[derive(Debug)]
pub struct TreeSnapshot {
    entries: Vec<TreeEntry>,
    failures: Vec<ScanFailure>,
}

impl TreeSnapshot {
    /// Walk `root` and record every regular file and directory beneath it.
    ///
    /// Symlinks are neither followed nor recorded, nor are other special
    /// files. A missing root yields an empty snapshot. Entries that cannot be
    /// read are collected as [`ScanFailure`]s and the walk continues past
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` exists but is not a directory, or if its
    /// metadata cannot be read.
    pub fn scan(root: &Path, order: TraversalOrder) -> Result<Self> {
        Self::walk(root, order, false)
    }

    /// Like [`scan`](Self::scan), but symlinks and other special files are
    /// recorded as [`EntryKind::File`], the way [`io::probe`](crate::io::probe)
    /// reports them. Use this for trees whose every entry must be accounted
    /// for, such as a replica being pruned.
    pub fn scan_all(root: &Path, order: TraversalOrder) -> Result<Self> {
        Self::walk(root, order, true)
    }

    fn walk(root: &Path, order: TraversalOrder, include_special: bool) -> Result<Self> {
        let mut snapshot = Self {
            entries: Vec::new(),
            failures: Vec::new(),
        };

        match fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(Error::NotADirectory {
                    path: root.to_path_buf(),
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Snapshot root {} does not exist", root.display());
                return Ok(snapshot);
            }
            Err(e) => return Err(Error::io(root, e)),
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .contents_first(order == TraversalOrder::ChildrenFirst)
            .sort_by_file_name();

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .and_then(|p| RelativePath::from_root(root, p))
                        .unwrap_or_else(|| RelativePath::new(""));
                    let failed_at = e.path().unwrap_or(root).to_path_buf();
                    snapshot.failures.push(ScanFailure {
                        path,
                        error: Error::Walk {
                            path: failed_at,
                            source: e,
                        },
                    });
                    continue;
                }
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() || include_special {
                EntryKind::File
            } else {
                debug!("Skipping special entry {}", entry.path().display());
                continue;
            };

            if let Some(path) = RelativePath::from_root(root, entry.path()) {
                snapshot.entries.push(TreeEntry { path, kind });
            }
        }

        Ok(snapshot)
    }

    /// Entries in traversal order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Parts of the tree that could not be listed.
    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    /// Consume the snapshot, yielding entries and failures.
    pub fn into_parts(self) -> (Vec<TreeEntry>, Vec<ScanFailure>) {
        (self.entries, self.failures)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the kind recorded for `path`.
    pub fn kind_of(&self, path: &RelativePath) -> Option<EntryKind> {
        self.entries
            .iter()
            .find(|entry| &entry.path == path)
            .map(|entry| entry.kind)
    }
}
