//! Observers receive what a pass does, as it happens.

use std::sync::Mutex;

use crate::action::Action;
use crate::report::EntryFailure;

/// Sink for the events of a pass.
///
/// The reconciler calls `record_action` after each action is applied (or,
/// in a dry run, decided) and `record_failure` for each skipped entry.
pub trait Observer {
    fn record_action(&self, action: &Action);

    fn record_failure(&self, failure: &EntryFailure);
}

/// Collects observer messages in memory.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    messages: Mutex<Vec<String>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far, failures included.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    fn push(&self, message: String) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

impl Observer for MemoryObserver {
    fn record_action(&self, action: &Action) {
        self.push(action.to_string());
    }

    fn record_failure(&self, failure: &EntryFailure) {
        self.push(failure.to_string());
    }
}
