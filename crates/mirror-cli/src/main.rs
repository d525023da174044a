//! dir-mirror CLI
//!
//! Periodically mirrors a source directory onto a replica directory.

mod cli;
mod error;
mod logging;
mod observer;
mod settings;

use clap::Parser;
use colored::Colorize;
use mirror_core::{ReconcileOptions, Reconciler, Scheduler};
use tracing::{info, warn};

use cli::Cli;
use error::{CliError, Result};
use observer::LogObserver;
use settings::{MIN_INTERVAL_SECS, Settings};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the (single) pass completed without failures. Only
/// returns at all with `--once`.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;

    logging::init(&settings.log_file, settings.verbose)?;
    tracing::debug!("Verbose mode enabled");

    if let Some(requested) = settings.raised_from {
        warn!(
            "Interval of {} seconds is below the minimum, using {} seconds",
            requested, MIN_INTERVAL_SECS
        );
    }

    if !settings.source.is_dir() {
        return Err(CliError::user(format!(
            "Origin folder {} does not exist",
            settings.source.display()
        )));
    }

    info!(
        "Starting backup. Origin: {}, backup destination: {}, time to wait between backups: {} seconds, log file name: {}",
        settings.source.display(),
        settings.replica.display(),
        settings.interval,
        settings.log_file.display()
    );

    let reconciler = Reconciler::new(&settings.source, &settings.replica).with_options(
        ReconcileOptions {
            dry_run: settings.dry_run,
        },
    );
    let scheduler = Scheduler::new(reconciler, settings.interval_duration());
    let observer = LogObserver::new(settings.dry_run);

    if settings.once {
        let report = scheduler.tick(&observer)?;
        return Ok(report.is_clean());
    }

    scheduler.run_forever(&observer)
}
