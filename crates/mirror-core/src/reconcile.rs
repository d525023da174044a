//! Reconciler implementation
//!
//! A pass runs in two phases over fresh snapshots:
//!
//! 1. **Forward** (source, parents first): create missing directories, copy
//!    missing files, replace files whose content differs, and replace
//!    entries whose kind differs between the trees.
//! 2. **Reverse** (replica, children first): purge every entry that no
//!    longer exists in the source. A purged directory goes as a unit, so
//!    only the top-most absent directory is reported.
//!
//! Failures are scoped to the entry they happen on: they are reported to
//! the observer, recorded in the [`PassReport`], and the pass moves on.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mirror_fs::{EntryKind, RelativePath, TraversalOrder, TreeSnapshot, io};
use tracing::{debug, info};

use crate::action::{Action, ActionKind};
use crate::compare::{ContentComparator, Sha256Comparator};
use crate::observer::Observer;
use crate::report::{EntryFailure, Operation, PassReport};
use crate::{Error, Result};

/// Options for a reconciliation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// If true, compute and report actions without modifying anything.
    pub dry_run: bool,
}

/// Mirrors a source tree onto a replica tree, one pass per call.
pub struct Reconciler {
    source: PathBuf,
    replica: PathBuf,
    comparator: Box<dyn ContentComparator>,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Create a reconciler comparing contents by SHA-256.
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            comparator: Box::new(Sha256Comparator),
            options: ReconcileOptions::default(),
        }
    }

    /// Replace the content comparator.
    pub fn with_comparator(mut self, comparator: impl ContentComparator + 'static) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one full pass.
    ///
    /// # Errors
    ///
    /// Only conditions that prevent the pass from starting are returned:
    /// a missing source root, a replica root that is not a directory or
    /// cannot be created, or roots nested in each other. Everything else is
    /// recorded per entry in the returned report.
    pub fn reconcile(&self, observer: &dyn Observer) -> Result<PassReport> {
        let started = Instant::now();
        debug!(
            "Reconciling {} -> {}",
            self.source.display(),
            self.replica.display()
        );

        self.prepare_roots()?;

        let mut pass = Pass::new(self, observer);
        pass.forward();
        pass.reverse();

        let mut report = pass.report;
        report.elapsed = started.elapsed();
        Ok(report)
    }

    fn prepare_roots(&self) -> Result<()> {
        match fs::metadata(&self.source) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(Error::SourceNotFound {
                    path: self.source.clone(),
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::SourceNotFound {
                    path: self.source.clone(),
                });
            }
            Err(e) => return Err(mirror_fs::Error::io(&self.source, e).into()),
        }

        let source_root = comparable_path(&self.source);
        let replica_root = comparable_path(&self.replica);
        if source_root.starts_with(&replica_root) || replica_root.starts_with(&source_root) {
            return Err(Error::OverlappingRoots {
                source_root: self.source.clone(),
                replica_root: self.replica.clone(),
            });
        }

        match fs::metadata(&self.replica) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(Error::ReplicaNotDirectory {
                path: self.replica.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !self.options.dry_run {
                    io::create_dir_all(&self.replica)?;
                    info!("Created replica directory {}", self.replica.display());
                }
                Ok(())
            }
            Err(e) => Err(mirror_fs::Error::io(&self.replica, e).into()),
        }
    }
}

/// Run one pass without keeping a [`Reconciler`] around.
pub fn reconcile(
    source: &Path,
    replica: &Path,
    comparator: impl ContentComparator + 'static,
    observer: &dyn Observer,
    options: ReconcileOptions,
) -> Result<PassReport> {
    Reconciler::new(source, replica)
        .with_comparator(comparator)
        .with_options(options)
        .reconcile(observer)
}

/// Absolute, symlink-resolved form of `path`, for overlap checks. Missing
/// trailing components are appended to the nearest existing ancestor.
fn comparable_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    resolve_existing_prefix(&absolute)
}

fn resolve_existing_prefix(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve_existing_prefix(parent).join(name),
        _ => path.to_path_buf(),
    }
}

/// State of a single pass. Nothing here outlives the pass.
struct Pass<'a> {
    reconciler: &'a Reconciler,
    observer: &'a dyn Observer,
    report: PassReport,
    /// Replica directories created this pass (or due to be, in a dry run).
    /// Nothing exists beneath them yet.
    fresh_dirs: HashSet<RelativePath>,
    /// Replica directories removed this pass (or due to be, in a dry run).
    removed_dirs: HashSet<RelativePath>,
    /// Source directories whose replica counterpart could not be prepared.
    blocked_dirs: HashSet<RelativePath>,
}

impl<'a> Pass<'a> {
    fn new(reconciler: &'a Reconciler, observer: &'a dyn Observer) -> Self {
        Self {
            reconciler,
            observer,
            report: PassReport::new(reconciler.options.dry_run),
            fresh_dirs: HashSet::new(),
            removed_dirs: HashSet::new(),
            blocked_dirs: HashSet::new(),
        }
    }

    fn dry_run(&self) -> bool {
        self.reconciler.options.dry_run
    }

    fn record(&mut self, action: Action) {
        debug!(kind = ?action.kind, path = %action.path, "Action");
        self.observer.record_action(&action);
        self.report.actions.push(action);
    }

    fn fail(&mut self, path: &RelativePath, operation: Operation, error: mirror_fs::Error) {
        let failure = EntryFailure::new(path.clone(), operation, error);
        debug!("Skipping entry: {}", failure);
        self.observer.record_failure(&failure);
        self.report.failures.push(failure);
    }

    fn within(set: &HashSet<RelativePath>, path: &RelativePath) -> bool {
        set.contains(path) || path.ancestors().any(|ancestor| set.contains(&ancestor))
    }

    fn replica_kind(&self, path: &RelativePath) -> mirror_fs::Result<Option<EntryKind>> {
        if path.ancestors().any(|ancestor| self.fresh_dirs.contains(&ancestor)) {
            return Ok(None);
        }
        io::probe(&path.resolve(&self.reconciler.replica))
    }

    /// Source entries the forward pass mirrors. Symlinks and special files
    /// count as absent.
    fn source_kind(&self, path: &RelativePath) -> mirror_fs::Result<Option<EntryKind>> {
        io::probe_regular(&path.resolve(&self.reconciler.source))
    }

    /// Whether the replica entry at `path`, known to be a non-directory, is
    /// a regular file rather than a symlink or special file.
    fn replica_is_regular(&self, path: &RelativePath) -> mirror_fs::Result<bool> {
        let kind = io::probe_regular(&path.resolve(&self.reconciler.replica))?;
        Ok(kind == Some(EntryKind::File))
    }

    fn forward(&mut self) {
        let snapshot =
            match TreeSnapshot::scan(&self.reconciler.source, TraversalOrder::ParentsFirst) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    self.fail(&RelativePath::new(""), Operation::Scan, e);
                    return;
                }
            };
        let (entries, failures) = snapshot.into_parts();
        for failure in failures {
            self.fail(&failure.path, Operation::Scan, failure.error);
        }

        for entry in entries {
            if Self::within(&self.blocked_dirs, &entry.path) {
                debug!("Skipping {}: parent directory unavailable", entry.path);
                continue;
            }
            match entry.kind {
                EntryKind::Directory => {
                    if !self.mirror_directory(&entry.path) {
                        self.blocked_dirs.insert(entry.path);
                    }
                }
                EntryKind::File => self.mirror_file(&entry.path),
            }
        }
    }

    /// Make sure the replica has a directory at `path`. Returns false if its
    /// contents cannot be mirrored this pass.
    fn mirror_directory(&mut self, path: &RelativePath) -> bool {
        let existing = match self.replica_kind(path) {
            Ok(kind) => kind,
            Err(e) => {
                self.fail(path, Operation::Probe, e);
                return false;
            }
        };

        match existing {
            Some(EntryKind::Directory) => return true,
            Some(EntryKind::File) => {
                debug!("{} is a directory in the source but a file in the replica", path);
                if !self.remove(path, EntryKind::File) {
                    return false;
                }
            }
            None => {}
        }

        if !self.dry_run() {
            let target = path.resolve(&self.reconciler.replica);
            if let Err(e) = io::create_dir_all(&target) {
                self.fail(path, Operation::CreateDir, e);
                return false;
            }
        }
        debug!("Created directory {}", path);
        self.fresh_dirs.insert(path.clone());
        true
    }

    fn mirror_file(&mut self, path: &RelativePath) {
        let source = path.resolve(&self.reconciler.source);
        let target = path.resolve(&self.reconciler.replica);

        let existing = match self.replica_kind(path) {
            Ok(kind) => kind,
            Err(e) => {
                self.fail(path, Operation::Probe, e);
                return;
            }
        };

        let kind = match existing {
            None => ActionKind::Create,
            Some(EntryKind::File) => {
                match self.replica_is_regular(path) {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("{} is not a regular file in the replica", path);
                        self.replace_file(path, &source, &target, ActionKind::Update);
                        return;
                    }
                    Err(e) => {
                        self.fail(path, Operation::Probe, e);
                        return;
                    }
                }
                match self.reconciler.comparator.identical(&source, &target) {
                    Ok(true) => {
                        debug!("{} unchanged", path);
                        return;
                    }
                    Ok(false) => ActionKind::Update,
                    Err(e) => {
                        self.fail(path, Operation::Compare, e);
                        return;
                    }
                }
            }
            Some(EntryKind::Directory) => {
                debug!("{} is a file in the source but a directory in the replica", path);
                if !self.remove(path, EntryKind::Directory) {
                    return;
                }
                ActionKind::Create
            }
        };

        self.replace_file(path, &source, &target, kind);
    }

    fn replace_file(&mut self, path: &RelativePath, source: &Path, target: &Path, kind: ActionKind) {
        if !self.dry_run() {
            if let Err(e) = io::copy_atomic(source, target) {
                self.fail(path, Operation::Copy, e);
                return;
            }
        }
        self.record(Action::new(kind, path.clone()));
    }

    /// Remove the replica entry at `path` and record the deletion. Returns
    /// false if the removal failed.
    fn remove(&mut self, path: &RelativePath, kind: EntryKind) -> bool {
        if !self.dry_run() {
            let target = path.resolve(&self.reconciler.replica);
            let (result, operation) = match kind {
                EntryKind::File => (io::remove_file(&target), Operation::RemoveFile),
                EntryKind::Directory => (io::remove_dir_all(&target), Operation::RemoveDir),
            };
            match result {
                Ok(true) => {}
                Ok(false) => {
                    debug!("{} already gone", path);
                    return true;
                }
                Err(e) => {
                    self.fail(path, operation, e);
                    return false;
                }
            }
        }

        let action = match kind {
            EntryKind::File => Action::delete_file(path.clone()),
            EntryKind::Directory => {
                self.removed_dirs.insert(path.clone());
                Action::delete_dir(path.clone())
            }
        };
        self.record(action);
        true
    }

    fn reverse(&mut self) {
        let snapshot =
            match TreeSnapshot::scan_all(&self.reconciler.replica, TraversalOrder::ChildrenFirst) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    self.fail(&RelativePath::new(""), Operation::Scan, e);
                    return;
                }
            };
        let (entries, failures) = snapshot.into_parts();
        for failure in failures {
            self.fail(&failure.path, Operation::Scan, failure.error);
        }

        for entry in entries {
            if Self::within(&self.removed_dirs, &entry.path) {
                continue;
            }

            match self.source_kind(&entry.path) {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                Err(e) => {
                    self.fail(&entry.path, Operation::Probe, e);
                    continue;
                }
            }

            // The absent parent comes later in children-first order and takes
            // this entry with it.
            if let Some(parent) = entry.path.parent() {
                if matches!(self.source_kind(&parent), Ok(None)) {
                    debug!("{} will be purged with {}", entry.path, parent);
                    continue;
                }
            }

            self.remove(&entry.path, entry.kind);
        }
    }
}
