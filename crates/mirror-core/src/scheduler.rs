//! Periodic execution of reconciliation passes

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::Result;
use crate::observer::Observer;
use crate::reconcile::Reconciler;
use crate::report::PassReport;

/// Runs passes one after another with a fixed wait in between.
///
/// Passes never overlap: the wait starts when a pass ends, so a pass that
/// takes longer than the interval simply delays the next one. A pass that
/// aborts is logged and the schedule carries on.
pub struct Scheduler {
    reconciler: Reconciler,
    interval: Duration,
}

impl Scheduler {
    pub fn new(reconciler: Reconciler, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    /// Run a single pass and log its outcome.
    pub fn tick(&self, observer: &dyn Observer) -> Result<PassReport> {
        let outcome = self.reconciler.reconcile(observer);
        match &outcome {
            Ok(report) if report.is_clean() => info!("{}", report.summary()),
            Ok(report) => warn!("{}", report.summary()),
            Err(e) => error!("Pass aborted: {}", e),
        }
        outcome
    }

    /// Run `ticks` passes, waiting the interval between consecutive ones
    /// but not after the last.
    pub fn run_ticks(&self, ticks: usize, observer: &dyn Observer) -> Vec<Result<PassReport>> {
        let mut outcomes = Vec::with_capacity(ticks);
        for tick in 0..ticks {
            if tick > 0 {
                self.wait();
            }
            outcomes.push(self.tick(observer));
        }
        outcomes
    }

    /// Run passes until the process is terminated.
    pub fn run_forever(&self, observer: &dyn Observer) -> ! {
        loop {
            let _ = self.tick(observer);
            self.wait();
        }
    }

    fn wait(&self) {
        debug!("Next pass in {:?}", self.interval);
        thread::sleep(self.interval);
    }
}
