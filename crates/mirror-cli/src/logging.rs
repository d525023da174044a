//! Console and log file output
//!
//! One `tracing` registry with two `fmt` layers: the console gets the bare
//! message on stdout, the log file gets timestamp, level and target. Both
//! see the same events through the same filter.

use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Size at which the log file is rotated.
pub const MAX_LOG_BYTES: u64 = 200_000_000;

/// Number of rotated log files kept next to the active one.
pub const LOG_BACKUPS: usize = 5;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the level; otherwise `info`, or `debug` when
/// `verbose` is set.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::user(format!("Invalid log filter: {}", e)))?;

    let writer = RotatingFile::open(log_file, MAX_LOG_BYTES, LOG_BACKUPS).map_err(|e| {
        CliError::user(format!(
            "Failed to open log file {}: {}",
            log_file.display(),
            e
        ))
    })?;

    let console_layer = fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .with_writer(io::stdout);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to initialise logging: {}", e)))
}

/// Append-only file that rolls over once it would exceed `max_bytes`.
///
/// On rotation `<name>` becomes `<name>.1`, `<name>.1` becomes `<name>.2`
/// and so on; the oldest beyond `backups` is overwritten.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    size: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = append(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
            file,
            size,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups == 0 {
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)?;
        } else {
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
            self.file = append(&self.path)?;
        }
        self.size = 0;
        Ok(())
    }
}

fn append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
