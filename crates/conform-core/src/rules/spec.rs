//! Declarative rule entries loaded from `conform.toml`
//!
//! ```toml
//! [[rules]]
//! path = "private"
//! by_category = { packages = { expect = "absent" }, servers = { value = true } }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::ValueRule;
use super::factories::{by_category, by_package_name, template};
use crate::Result;

/// One `[[rules]]` entry: a dotted field path plus its rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleEntry {
    pub path: String,
    #[serde(flatten)]
    pub spec: RuleSpec,
}

/// The sentinels expressible with `expect = "..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentinel {
    Absent,
    Skip,
}

/// Declarative form of a [`ValueRule`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSpec {
    Value(Value),
    Expect(Sentinel),
    Pattern(String),
    Template(String),
    ByCategory(BTreeMap<String, RuleSpec>),
    ByPackageName {
        names: BTreeMap<String, RuleSpec>,
        fallback: Box<RuleSpec>,
    },
}

impl RuleSpec {
    /// Build the rule for the field at `path`. Patterns are compiled here so
    /// a bad pattern fails at startup, not mid-run.
    pub fn to_rule(&self, path: &str, scope: &str) -> Result<ValueRule> {
        let rule = match self {
            Self::Value(value) => ValueRule::Value(value.clone()),
            Self::Expect(Sentinel::Absent) => ValueRule::Absent,
            Self::Expect(Sentinel::Skip) => ValueRule::Skip,
            Self::Pattern(pattern) => ValueRule::pattern(pattern)?,
            Self::Template(text) => template(text.as_str(), scope),
            Self::ByCategory(table) => by_category(Self::convert_table(table, path, scope)?),
            Self::ByPackageName { names, fallback } => by_package_name(
                Self::convert_table(names, path, scope)?,
                fallback.to_rule(path, scope)?,
            ),
        };
        Ok(rule)
    }

    fn convert_table(
        table: &BTreeMap<String, RuleSpec>,
        path: &str,
        scope: &str,
    ) -> Result<Vec<(String, ValueRule)>> {
        table
            .iter()
            .map(|(key, spec)| Ok((key.clone(), spec.to_rule(path, scope)?)))
            .collect()
    }
}
