//! Field-level issue detection

use serde_json::Value;

use super::diff::render_value_diff;
use crate::Result;
use crate::manifest::{FieldPath, PackageManifest};
use crate::rules::{Resolved, Resolver, RuleContext, RuleSet, ValueRule};

/// A mutation that brings one manifest field in line with its rule.
///
/// Applying a fix to a manifest that already satisfies the rule leaves it
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestFix {
    /// Assign the whole value at the path
    Set { path: FieldPath, value: Value },
    /// Delete the path
    Remove { path: FieldPath },
}

impl ManifestFix {
    /// Apply the fix, returning whether the manifest changed.
    pub fn apply(&self, manifest: &mut PackageManifest) -> bool {
        let document = manifest.document_mut();
        match self {
            Self::Set { path, value } => {
                if path.get(document) == Some(value) {
                    return false;
                }
                path.set(document, value.clone());
                true
            }
            Self::Remove { path } => path.remove(document).is_some(),
        }
    }
}

/// A manifest field that does not satisfy its rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestIssue {
    pub message: String,
    pub path: FieldPath,
    /// `None` for pattern mismatches, which have no canonical replacement
    pub fix: Option<ManifestFix>,
}

/// Checks manifests against a shared rule set.
#[derive(Debug, Clone, Copy)]
pub struct ManifestChecker<'a> {
    rules: &'a RuleSet,
    resolver: Resolver,
    categories: &'a [String],
}

impl<'a> ManifestChecker<'a> {
    pub fn new(rules: &'a RuleSet, resolver: Resolver, categories: &'a [String]) -> Self {
        Self {
            rules,
            resolver,
            categories,
        }
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Check a single field of `manifest` against `rule`.
    ///
    /// Lets a caller apply each fix before the next rule is evaluated, so
    /// computed rules always see the manifest's current state.
    pub fn check(
        &self,
        manifest: &PackageManifest,
        path: &FieldPath,
        rule: &ValueRule,
    ) -> Result<Option<ManifestIssue>> {
        let context = RuleContext::from_manifest(manifest, self.categories)?;
        check_field(&context, path, rule, self.resolver)
    }

    /// Lazily list the issues of `manifest`, in rule declaration order.
    ///
    /// Each call starts over from the manifest's current state.
    ///
    /// # Errors
    ///
    /// Fails if the manifest path does not identify a known category. Rule
    /// resolution failures are yielded by the iterator.
    pub fn issues<'m>(&self, manifest: &'m PackageManifest) -> Result<ManifestIssues<'m>>
    where
        'a: 'm,
    {
        Ok(ManifestIssues {
            context: RuleContext::from_manifest(manifest, self.categories)?,
            rules: self.rules.iter(),
            resolver: self.resolver,
        })
    }
}

/// Iterator over the issues of one manifest.
#[derive(Debug)]
pub struct ManifestIssues<'m> {
    context: RuleContext<'m>,
    rules: std::slice::Iter<'m, (FieldPath, ValueRule)>,
    resolver: Resolver,
}

impl Iterator for ManifestIssues<'_> {
    type Item = Result<ManifestIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        for (path, rule) in self.rules.by_ref() {
            match check_field(&self.context, path, rule, self.resolver) {
                Ok(None) => continue,
                Ok(Some(issue)) => return Some(Ok(issue)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

fn check_field(
    context: &RuleContext<'_>,
    path: &FieldPath,
    rule: &ValueRule,
    resolver: Resolver,
) -> Result<Option<ManifestIssue>> {
    let actual = path.get(context.document);

    let issue = match resolver.resolve(path, rule, context)? {
        Resolved::Skip => None,

        Resolved::Pattern(pattern) => match actual {
            Some(Value::String(text)) if !pattern.is_match(text) => Some(ManifestIssue {
                message: format!("Value {text} doesn't match /{pattern}/"),
                path: path.clone(),
                fix: None,
            }),
            _ => None,
        },

        Resolved::Absent => actual.map(|found| ManifestIssue {
            message: format!("EXPECTED absent FOUND {found}"),
            path: path.clone(),
            fix: Some(ManifestFix::Remove { path: path.clone() }),
        }),

        Resolved::Value(expected) => {
            if actual == Some(&expected) {
                None
            } else {
                Some(ManifestIssue {
                    message: format!(
                        "DIFFERS FROM RULE:\n{}",
                        render_value_diff(actual, &expected)
                    ),
                    path: path.clone(),
                    fix: Some(ManifestFix::Set {
                        path: path.clone(),
                        value: expected,
                    }),
                })
            }
        }
    };

    if let Some(issue) = &issue {
        tracing::debug!(manifest = %context.manifest_path, field = %issue.path, "rule violated");
    }
    Ok(issue)
}
