//! Ordered rule sets

use serde_json::json;

use super::factories::{by_category, template};
use super::{RuleEntry, ValueRule};
use crate::{Error, Result};
use crate::manifest::FieldPath;

/// Field rules in declaration order.
///
/// Built once at startup and shared read-only by every check. Declaration
/// order only affects the order issues are reported in.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(FieldPath, ValueRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, builder style.
    pub fn with_rule(mut self, path: impl Into<FieldPath>, rule: impl Into<ValueRule>) -> Self {
        self.push(path, rule);
        self
    }

    pub fn push(&mut self, path: impl Into<FieldPath>, rule: impl Into<ValueRule>) {
        self.rules.push((path.into(), rule.into()));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (FieldPath, ValueRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build a rule set from declarative entries.
    pub fn from_entries(entries: &[RuleEntry], scope: &str) -> Result<Self> {
        let mut set = Self::new();
        for entry in entries {
            let path = FieldPath::parse(&entry.path);
            if path.keys().is_empty() {
                return Err(Error::InvalidRule {
                    path: entry.path.clone(),
                    message: "field path is empty".to_string(),
                });
            }
            let rule = entry.spec.to_rule(&entry.path, scope)?;
            set.push(path, rule);
        }
        Ok(set)
    }

    /// Rules for a TypeScript monorepo of `packages` (libraries) and
    /// `servers` (applications).
    ///
    /// Libraries are scoped, public, and ship a dual ESM/CJS export map.
    /// Servers are private, unscoped, and export nothing.
    pub fn builtin(scope: &str) -> Self {
        let library_exports = json!({
            "./package.json": "./package.json",
            ".": {
                "import": {
                    scope: "./src/index.ts",
                    "types": "./dist/index.d.ts",
                    "default": "./dist/index.js"
                },
                "require": {
                    "types": "./dist/index.d.ts",
                    "default": "./dist/index.cjs"
                }
            }
        });

        Self::new()
            .with_rule(
                "name",
                by_category([
                    ("packages", template("{scope}/{slug}", scope)),
                    ("servers", template("{slug}", scope)),
                ]),
            )
            .with_rule("version", "0.0.0")
            .with_rule(
                "private",
                by_category([("packages", ValueRule::Absent), ("servers", true.into())]),
            )
            .with_rule("type", "module")
            .with_rule("main", ValueRule::Absent)
            .with_rule("module", ValueRule::Absent)
            .with_rule("types", ValueRule::Absent)
            .with_rule("keywords", ValueRule::Absent)
            .with_rule("author", ValueRule::Absent)
            .with_rule("description", ValueRule::Absent)
            .with_rule(
                "exports",
                by_category([
                    ("packages", ValueRule::Value(library_exports)),
                    ("servers", ValueRule::Absent),
                ]),
            )
            .with_rule("license", "MIT")
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a (FieldPath, ValueRule);
    type IntoIter = std::slice::Iter<'a, (FieldPath, ValueRule)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
