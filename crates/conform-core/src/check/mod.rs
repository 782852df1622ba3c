//! Manifest checks
//!
//! Walks a [`RuleSet`](crate::rules::RuleSet) against one manifest and
//! yields field-level issues. Nothing is modified until the caller applies
//! an issue's fix.

mod diff;
mod manifest;

pub use diff::render_value_diff;
pub use manifest::{ManifestChecker, ManifestFix, ManifestIssue, ManifestIssues};
