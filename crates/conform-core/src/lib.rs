//! Rule resolution and skeleton reconciliation for Monorepo Conform
//!
//! This crate checks every package of a monorepo against two kinds of
//! expectations:
//!
//! - **Manifest rules**: each field of `package.json` is matched against a
//!   [`ValueRule`], which may be a literal, a sentinel (absent / skip), a
//!   pattern, or computed from the package's category and slug
//! - **Skeletons**: reference directory trees whose files every package must
//!   contain, compared by checksum through a [`TreeSync`] backend
//!
//! # Architecture
//!
//! ```text
//!                  Traversal
//!                      |
//!        +-------------+-------------+
//!        |             |             |
//!    discovery       check        skeleton
//!                      |             |
//!                    rules       TreeSync
//!                      |
//!                  conform-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use conform_core::{ConformConfig, PackageFilter, SilentReporter, Traversal};
//! use conform_fs::NormalizedPath;
//!
//! fn check(root: &NormalizedPath) -> conform_core::Result<bool> {
//!     let config = ConformConfig::load(root)?;
//!     let rules = config.rule_set()?;
//!     let sync = config.tree_sync();
//!     let report = Traversal::new(root.clone(), &config, &rules, sync.as_ref())
//!         .run(&PackageFilter::all(), &mut SilentReporter)?;
//!     Ok(report.is_clean())
//! }
//! ```

pub mod check;
pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod rules;
pub mod skeleton;
pub mod traverse;

pub use check::{ManifestChecker, ManifestFix, ManifestIssue};
pub use config::{ConformConfig, SkeletonConfig, SyncBackend};
pub use discovery::{PackageFilter, discover_manifests, select_manifests};
pub use error::{Error, Result};
pub use manifest::{FieldPath, PackageManifest};
pub use rules::{Resolved, Resolver, RuleContext, RuleSet, ValueRule};
pub use skeleton::{ChecksumTreeSync, RsyncTreeSync, SkeletonIssue, TreeSync};
pub use traverse::{Outcome, ReconciliationReport, Reporter, SilentReporter, Traversal};
