//! Observer that reports pass events through the log

use mirror_core::{Action, EntryFailure, Observer};
use tracing::{error, info};

/// Logs every action at info level and every failure at error level.
/// Dry-run actions are prefixed with `[dry-run]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver {
    dry_run: bool,
}

impl LogObserver {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// The line logged for `action`.
    pub fn format_action(&self, action: &Action) -> String {
        if self.dry_run {
            format!("[dry-run] {}", action)
        } else {
            action.to_string()
        }
    }
}

impl Observer for LogObserver {
    fn record_action(&self, action: &Action) {
        info!("{}", self.format_action(action));
    }

    fn record_failure(&self, failure: &EntryFailure) {
        error!("{}", failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_lines_are_prefixed() {
        let action = Action::update("docs/a.md".into());
        assert_eq!(LogObserver::new(false).format_action(&action), "docs/a.md updated.");
        assert_eq!(
            LogObserver::new(true).format_action(&action),
            "[dry-run] docs/a.md updated."
        );
    }
}
