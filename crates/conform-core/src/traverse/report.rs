//! Run outcomes and reporting hooks

use serde::Serialize;

use crate::check::ManifestIssue;
use crate::manifest::PackageManifest;
use crate::skeleton::SkeletonIssue;

/// What happened to one issue during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Found in report-only mode
    Detected,
    /// Found and fixed
    Fixed,
    /// Found in fix mode, but the issue has no fix
    Unfixable,
}

/// Issue counts aggregated over every package and both checkers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub issues_found: usize,
    pub issues_fixed: usize,
}

impl ReconciliationReport {
    pub fn record(&mut self, outcome: Outcome) {
        self.issues_found += 1;
        if outcome == Outcome::Fixed {
            self.issues_fixed += 1;
        }
    }

    /// Combine the counts of two reports.
    pub fn merge(mut self, other: ReconciliationReport) -> Self {
        self.issues_found += other.issues_found;
        self.issues_fixed += other.issues_fixed;
        self
    }

    /// True when some issue was found but not fixed. Drives the exit status.
    pub fn has_unresolved(&self) -> bool {
        self.issues_found > self.issues_fixed
    }

    pub fn is_clean(&self) -> bool {
        self.issues_found == 0
    }
}

/// Receives issues as the traversal finds them.
///
/// Keeps presentation out of the core: the CLI prints colored lines, tests
/// record what they are given.
pub trait Reporter {
    /// Called once per package with manifest issues, before the first one,
    /// with the number found before any fix is applied.
    fn package(&mut self, _manifest: &PackageManifest, _issues: usize) {}

    fn manifest_issue(&mut self, manifest: &PackageManifest, issue: &ManifestIssue, outcome: Outcome);

    fn skeleton_issue(&mut self, issue: &SkeletonIssue, outcome: Outcome);
}

/// A [`Reporter`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn manifest_issue(&mut self, _: &PackageManifest, _: &ManifestIssue, _: Outcome) {}

    fn skeleton_issue(&mut self, _: &SkeletonIssue, _: Outcome) {}
}
