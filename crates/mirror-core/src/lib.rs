//! Reconciliation engine for dir-mirror
//!
//! Keeps a replica directory an exact one-way mirror of a source directory:
//!
//! - **ContentComparator**: decides whether two files hold the same bytes
//! - **Reconciler**: one pass that copies, updates and purges replica entries
//! - **Scheduler**: repeats passes at a fixed interval
//! - **Observer**: receives every action and failure as it happens
//!
//! # Architecture
//!
//! ```text
//!                 dir-mirror CLI
//!                       |
//!                  mirror-core
//!                       |
//!                   mirror-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mirror_core::{MemoryObserver, Reconciler};
//!
//! let observer = MemoryObserver::new();
//! let report = Reconciler::new("origin", "destination").reconcile(&observer)?;
//! for message in report.messages() {
//!     println!("{}", message);
//! }
//! # Ok::<(), mirror_core::Error>(())
//! ```

pub mod action;
pub mod compare;
pub mod error;
pub mod observer;
pub mod reconcile;
pub mod report;
pub mod scheduler;

pub use action::{Action, ActionKind};
pub use compare::{ContentComparator, Sha256Comparator};
pub use error::{Error, Result};
pub use observer::{MemoryObserver, Observer};
pub use reconcile::{ReconcileOptions, Reconciler, reconcile};
pub use report::{EntryFailure, Operation, PassReport, PassSummary};
pub use scheduler::Scheduler;
