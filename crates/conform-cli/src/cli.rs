//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use conform_core::SyncBackend;

/// Monorepo Conform - Check packages against manifest rules and skeletons
#[derive(Parser, Debug)]
#[command(name = "conform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Only check packages whose manifest path matches this glob
    /// (relative to the repository root, e.g. `packages/**`)
    #[arg(default_value = "**")]
    pub glob: String,

    /// Apply fixes instead of only reporting issues
    #[arg(short, long)]
    pub fix: bool,

    /// Repository root (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR", env = "CONFORM_ROOT")]
    pub root: Option<PathBuf>,

    /// Skeleton sync backend, overriding the configuration file
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Skeleton sync backends selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// Shell out to rsync
    Rsync,
    /// Compare and copy in-process
    Native,
}

impl From<BackendArg> for SyncBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Rsync => SyncBackend::Rsync,
            BackendArg::Native => SyncBackend::Native,
        }
    }
}
