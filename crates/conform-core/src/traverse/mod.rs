//! Traversal
//!
//! Discovers packages and runs the manifest and skeleton checks on each in
//! turn, applying fixes when asked to.

mod report;

pub use report::{Outcome, ReconciliationReport, Reporter, SilentReporter};

use conform_fs::NormalizedPath;

use crate::Result;
use crate::check::ManifestChecker;
use crate::config::ConformConfig;
use crate::discovery::{PackageFilter, select_manifests};
use crate::manifest::PackageManifest;
use crate::rules::{RuleContext, RuleSet};
use crate::skeleton::{TreeSync, list_skeleton_issues};

/// One validation run over a repository.
///
/// Packages are processed one at a time in discovery order, manifest issues
/// before skeleton issues.
pub struct Traversal<'a> {
    root: NormalizedPath,
    config: &'a ConformConfig,
    rules: &'a RuleSet,
    sync: &'a dyn TreeSync,
    fix: bool,
}

impl<'a> Traversal<'a> {
    pub fn new(
        root: impl Into<NormalizedPath>,
        config: &'a ConformConfig,
        rules: &'a RuleSet,
        sync: &'a dyn TreeSync,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            rules,
            sync,
            fix: false,
        }
    }

    /// Apply fixes instead of only reporting.
    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Check every package whose repository-relative manifest path matches
    /// `filter`.
    ///
    /// # Errors
    ///
    /// Aborts on the first fatal error: no packages at all, a rule that
    /// does not resolve, a manifest that cannot be read or written, or a
    /// failing tree sync.
    pub fn run(
        &self,
        filter: &PackageFilter,
        reporter: &mut dyn Reporter,
    ) -> Result<ReconciliationReport> {
        let manifests = select_manifests(
            &self.root,
            &self.config.categories,
            &self.config.manifest_name,
            filter,
        )?;

        let mut report = ReconciliationReport::default();
        for path in manifests {
            tracing::debug!(manifest = %path, fix = self.fix, "checking package");
            let mut manifest = PackageManifest::load(&path)?;
            report = report.merge(self.check_manifest(&mut manifest, reporter)?);
            report = report.merge(self.check_skeleton(&manifest, reporter)?);
        }

        tracing::debug!(
            found = report.issues_found,
            fixed = report.issues_fixed,
            "traversal finished"
        );
        Ok(report)
    }

    /// Check one manifest field by field, persisting it once if any fix was
    /// applied.
    pub fn check_manifest(
        &self,
        manifest: &mut PackageManifest,
        reporter: &mut dyn Reporter,
    ) -> Result<ReconciliationReport> {
        let checker = ManifestChecker::new(
            self.rules,
            self.config.resolver(),
            &self.config.categories,
        );
        let mut report = ReconciliationReport::default();
        let mut modified = false;

        let pending = checker
            .issues(manifest)?
            .collect::<Result<Vec<_>>>()?
            .len();
        if pending > 0 {
            reporter.package(manifest, pending);
        }

        for (path, rule) in self.rules {
            // Re-checked per field so a fix is visible to later computed rules
            let Some(issue) = checker.check(manifest, path, rule)? else {
                continue;
            };

            let outcome = match (&issue.fix, self.fix) {
                (_, false) => Outcome::Detected,
                (None, true) => Outcome::Unfixable,
                (Some(fix), true) => {
                    if fix.apply(manifest) {
                        modified = true;
                        Outcome::Fixed
                    } else {
                        tracing::warn!(field = %issue.path, "fix left the manifest unchanged");
                        Outcome::Unfixable
                    }
                }
            };
            report.record(outcome);
            reporter.manifest_issue(manifest, &issue, outcome);
        }

        if modified {
            manifest.save()?;
        }
        Ok(report)
    }

    /// Compare the package directory against its reference trees.
    pub fn check_skeleton(
        &self,
        manifest: &PackageManifest,
        reporter: &mut dyn Reporter,
    ) -> Result<ReconciliationReport> {
        let context = RuleContext::from_manifest(manifest, &self.config.categories)?;
        let roots = self.config.reference_roots(&self.root, context.category);
        let Some(package_dir) = manifest.package_dir() else {
            return Ok(ReconciliationReport::default());
        };

        let mut report = ReconciliationReport::default();
        for issue in list_skeleton_issues(self.sync, package_dir, roots) {
            let issue = issue?;
            let outcome = if self.fix {
                issue.fix(self.sync)?;
                Outcome::Fixed
            } else {
                Outcome::Detected
            };
            report.record(outcome);
            reporter.skeleton_issue(&issue, outcome);
        }
        Ok(report)
    }
}
