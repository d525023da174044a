//! Settings resolution
//!
//! Each setting comes from the first of: command-line flag or environment
//! variable (merged by clap), the `--config` settings file, the default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_fs::ConfigStore;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{CliError, Result};

pub const DEFAULT_SOURCE: &str = "origin";
pub const DEFAULT_REPLICA: &str = "destination";
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
pub const MIN_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "logfile.log";

/// Contents of a `--config` settings file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    pub interval: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: PathBuf,
    pub replica: PathBuf,
    /// Seconds between passes, after clamping.
    pub interval: u64,
    /// The requested interval, when it was below the minimum and raised.
    pub raised_from: Option<u64>,
    pub log_file: PathBuf,
    pub once: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => ConfigStore::new().load::<FileSettings>(path)?,
            None => FileSettings::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileSettings) -> Result<Self> {
        let source = cli
            .source
            .clone()
            .or(file.source)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
        let replica = cli
            .replica
            .clone()
            .or(file.replica)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPLICA));
        let log_file = cli
            .log_file
            .clone()
            .or(file.log_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        let requested = cli
            .interval
            .or(file.interval)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        let (interval, raised_from) = check_interval(requested)?;
        check_log_file(&log_file)?;

        Ok(Self {
            source,
            replica,
            interval,
            raised_from,
            log_file,
            once: cli.once,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

fn check_interval(requested: u64) -> Result<(u64, Option<u64>)> {
    match requested {
        0 => Err(CliError::user(
            "Interval must be a positive number of seconds",
        )),
        n if n < MIN_INTERVAL_SECS => Ok((MIN_INTERVAL_SECS, Some(n))),
        n => Ok((n, None)),
    }
}

fn check_log_file(path: &Path) -> Result<()> {
    let accepted = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("log") || e.eq_ignore_ascii_case("txt"));
    if accepted {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "Log file {} must end in .log or .txt",
            path.display()
        )))
    }
}
