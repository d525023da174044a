//! Pass reports
//!
//! A [`PassReport`] is the outcome of one pass: every action in the order it
//! was taken, plus every entry-scoped failure. It is the only thing that
//! outlives the pass.

use std::fmt;
use std::time::Duration;

use mirror_fs::RelativePath;

use crate::action::{Action, ActionKind};

/// Filesystem operation that failed for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Listing a directory
    Scan,
    /// Reading an entry's metadata
    Probe,
    /// Comparing file contents
    Compare,
    /// Copying a file into the replica
    Copy,
    /// Creating a replica directory
    CreateDir,
    /// Removing a replica file
    RemoveFile,
    /// Removing a replica directory tree
    RemoveDir,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scan => "scan",
            Self::Probe => "probe",
            Self::Compare => "compare",
            Self::Copy => "copy",
            Self::CreateDir => "create directory",
            Self::RemoveFile => "remove file",
            Self::RemoveDir => "remove directory",
        };
        f.write_str(name)
    }
}

/// A failed operation on a single entry. The pass skipped the entry and
/// went on with the rest.
#[derive(Debug)]
pub struct EntryFailure {
    pub path: RelativePath,
    pub operation: Operation,
    pub error: mirror_fs::Error,
}

impl EntryFailure {
    pub fn new(path: RelativePath, operation: Operation, error: mirror_fs::Error) -> Self {
        Self {
            path,
            operation,
            error,
        }
    }
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_root() {
            ".".to_string()
        } else {
            self.path.to_string()
        };
        write!(f, "{} failed for {}: {}", self.operation, path, self.error)
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Actions in the order they were taken
    pub actions: Vec<Action>,
    /// Entries that were skipped because an operation failed
    pub failures: Vec<EntryFailure>,
    /// Whether the actions were only computed, not applied
    pub dry_run: bool,
    /// Wall-clock time the pass took
    pub elapsed: Duration,
}

impl PassReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// True when no entry failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the replica already mirrored the source.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty() && self.failures.is_empty()
    }

    /// Number of actions of the given kind.
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }

    /// Observer messages, one per action.
    pub fn messages(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }

    pub fn summary(&self) -> PassSummary {
        PassSummary {
            created: self.count(ActionKind::Create),
            updated: self.count(ActionKind::Update),
            purged: self.count(ActionKind::DeleteFile) + self.count(ActionKind::DeleteDir),
            failed: self.failures.len(),
            elapsed: self.elapsed,
            dry_run: self.dry_run,
        }
    }
}

/// Counts for the end-of-pass log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub created: usize,
    pub updated: usize,
    pub purged: usize,
    pub failed: usize,
    pub elapsed: Duration,
    pub dry_run: bool,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            f.write_str("Dry run finished: ")?;
        } else {
            f.write_str("Pass finished: ")?;
        }
        write!(
            f,
            "{} created, {} updated, {} purged, {} failed in {:.2?}",
            self.created, self.updated, self.purged, self.failed, self.elapsed
        )
    }
}
