//! Filesystem primitives for Monorepo Conform
//!
//! Provides normalized paths, atomic manifest writes, content checksums and
//! format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::compute_file_checksum;
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
