//! Error types for conform-core

use std::path::PathBuf;

/// Result type for conform-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in conform-core operations
///
/// Manifest and skeleton deviations are never errors; they are reported as
/// issues. Everything here aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Discovery found no manifests at all
    #[error("Could not find any packages to validate under {root}")]
    NoPackagesFound { root: PathBuf },

    /// A computed rule kept producing computed rules
    #[error("Rule for '{path}' did not resolve within {limit} computed steps")]
    UnresolvedRule { path: String, limit: usize },

    /// A manifest path lacks the `<category>/<slug>/<manifest>` shape
    #[error("Manifest path '{path}' does not have category and package segments")]
    InvalidPackagePath { path: PathBuf },

    /// The manifest's parent folder is not a configured category
    #[error("Could not extract a known category from {path} (found '{category}')")]
    UnknownCategory { category: String, path: PathBuf },

    /// A pattern rule failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The package filter failed to compile
    #[error("Invalid package filter '{glob}': {message}")]
    InvalidGlob { glob: String, message: String },

    /// A declarative rule entry could not be turned into a rule
    #[error("Invalid rule for '{path}': {message}")]
    InvalidRule { path: String, message: String },

    /// A manifest is not valid JSON
    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// The tree sync command exited unsuccessfully
    #[error("Tree sync command `{command}` failed with status {code}: {stderr}")]
    SyncCommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Filesystem error from conform-fs
    #[error(transparent)]
    Fs(#[from] conform_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
