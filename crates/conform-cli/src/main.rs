//! Monorepo Conform CLI
//!
//! Checks every package manifest against the rule set and every package
//! directory against its skeletons, optionally fixing what it finds.

mod cli;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use conform_core::{ConformConfig, PackageFilter, Traversal};
use conform_fs::NormalizedPath;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};
use output::ConsoleReporter;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    // Logs go to stderr so stdout stays parseable with --json
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    if let Err(e) = result {
        eprintln!("{}: failed to install logger: {}", "warning".yellow().bold(), e);
    }
}

/// Returns whether every issue found was fixed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Repository root {} is not a directory",
            root.display()
        )));
    }
    let root = NormalizedPath::new(&root);

    let mut config = ConformConfig::load(&root)?;
    if let Some(backend) = cli.backend {
        config.skeleton.backend = backend.into();
    }
    let rules = config.rule_set()?;
    let sync = config.tree_sync();
    let filter = PackageFilter::new(&cli.glob)?;

    let mut reporter = ConsoleReporter::new(cli.json);
    let report = Traversal::new(root, &config, &rules, sync.as_ref())
        .with_fix(cli.fix)
        .run(&filter, &mut reporter)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_summary(&report);
    }
    Ok(!report.has_unresolved())
}
