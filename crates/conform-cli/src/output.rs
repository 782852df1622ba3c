//! Console reporting

use colored::{ColoredString, Colorize};
use conform_core::{
    ManifestIssue, Outcome, PackageManifest, ReconciliationReport, Reporter, SkeletonIssue,
};

/// Path segments kept when printing absolute paths.
const SUMMARY_SEGMENTS: usize = 3;

/// Prints one line per issue, colored by outcome.
///
/// With `quiet` set nothing is printed; used for `--json` where stdout
/// carries only the report.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn emit(&self, line: ColoredString) {
        if !self.quiet {
            println!("{line}");
        }
    }
}

impl Reporter for ConsoleReporter {
    fn package(&mut self, manifest: &PackageManifest, issues: usize) {
        self.emit(package_header(manifest, issues).blue());
    }

    fn manifest_issue(&mut self, _manifest: &PackageManifest, issue: &ManifestIssue, outcome: Outcome) {
        let line = match outcome {
            Outcome::Fixed => format!("FIXING {} : {}", issue.path, issue.message).bright_green(),
            Outcome::Unfixable => {
                format!("CANNOT FIX {} : {}", issue.path, issue.message).bright_red()
            }
            Outcome::Detected => {
                format!("DETECTED {} : {}", issue.path, issue.message).bright_yellow()
            }
        };
        self.emit(line);
    }

    fn skeleton_issue(&mut self, issue: &SkeletonIssue, outcome: Outcome) {
        let package = issue.package_path.tail(SUMMARY_SEGMENTS);
        let reference = issue.reference_path.tail(SUMMARY_SEGMENTS);
        let line = match outcome {
            Outcome::Fixed => format!("MERGING {package} FROM {reference}").bright_green(),
            Outcome::Detected | Outcome::Unfixable => format!(
                "DETECTED {package} DIFFERS FROM {reference} ({})",
                issue.message.trim()
            )
            .bright_yellow(),
        };
        self.emit(line);
    }
}

/// `<name> : <count> ISSUES`, falling back to the manifest path when the
/// package has no name.
pub fn package_header(manifest: &PackageManifest, issues: usize) -> String {
    let label = manifest
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| manifest.path().tail(SUMMARY_SEGMENTS));
    format!("{label} : {issues} ISSUES")
}

/// The closing summary line.
pub fn summary_line(report: &ReconciliationReport) -> String {
    if report.is_clean() {
        "NO VALIDATION ERRORS FOUND".to_string()
    } else {
        format!(
            "TOTAL VALIDATION ERRORS {} FIXED {}",
            report.issues_found, report.issues_fixed
        )
    }
}

/// Print the summary: green when clean, yellow when everything was fixed,
/// red otherwise.
pub fn print_summary(report: &ReconciliationReport) {
    let line = summary_line(report);
    let colored = if report.is_clean() {
        line.black().on_bright_green()
    } else if report.has_unresolved() {
        line.black().on_bright_red()
    } else {
        line.black().on_bright_yellow()
    };
    println!("{colored}");
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn header_counts_issues_by_name() {
        let manifest = PackageManifest::new(
            "/repo/packages/add/package.json",
            json!({"name": "@myrepo/add"}),
        );
        assert_eq!(package_header(&manifest, 3), "@myrepo/add : 3 ISSUES");
    }

    #[test]
    fn header_falls_back_to_manifest_path() {
        let manifest = PackageManifest::new("/repo/packages/add/package.json", json!({}));
        assert_eq!(package_header(&manifest, 1), "packages/add/package.json : 1 ISSUES");
    }

    #[test]
    fn summary_for_clean_run() {
        assert_eq!(
            summary_line(&ReconciliationReport::default()),
            "NO VALIDATION ERRORS FOUND"
        );
    }

    #[test]
    fn summary_with_counts() {
        let report = ReconciliationReport {
            issues_found: 5,
            issues_fixed: 3,
        };
        assert_eq!(summary_line(&report), "TOTAL VALIDATION ERRORS 5 FIXED 3");
    }
}
