//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// dir-mirror - Keep a backup directory an exact one-way mirror of a source directory
#[derive(Parser, Debug)]
#[command(name = "dir-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory to mirror [default: origin]
    #[arg(long, visible_alias = "origin", env = "DIR_MIRROR_SOURCE")]
    pub source: Option<PathBuf>,

    /// Replica (backup) directory, created if missing [default: destination]
    #[arg(long, visible_alias = "destination", env = "DIR_MIRROR_REPLICA")]
    pub replica: Option<PathBuf>,

    /// Seconds to wait between passes, at least 10 [default: 300]
    #[arg(long, visible_alias = "time", env = "DIR_MIRROR_INTERVAL")]
    pub interval: Option<u64>,

    /// Log file, must end in .log or .txt [default: logfile.log]
    #[arg(long, visible_alias = "logFile", env = "DIR_MIRROR_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Settings file (.toml, .json, .yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Report what a pass would do without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
