//! Rule values

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::RuleContext;
use crate::{Error, Result};

type ComputeFn = dyn Fn(&RuleContext<'_>) -> ValueRule + Send + Sync;

/// A rule computed from the package context.
///
/// The function must be pure: the same context always yields the same rule.
#[derive(Clone)]
pub struct Computed(Arc<ComputeFn>);

impl Computed {
    pub fn new(f: impl Fn(&RuleContext<'_>) -> ValueRule + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn compute(&self, context: &RuleContext<'_>) -> ValueRule {
        (self.0)(context)
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(..)")
    }
}

/// The declared rule for one manifest field.
#[derive(Debug, Clone)]
pub enum ValueRule {
    /// The field must equal this value exactly
    Value(Value),
    /// The field must not exist
    Absent,
    /// The field is unconstrained
    Skip,
    /// A string field must match this pattern; never fixable
    Pattern(Regex),
    /// Evaluate against the package context to get the next rule
    Computed(Computed),
}

impl ValueRule {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Compile a pattern rule.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn computed(f: impl Fn(&RuleContext<'_>) -> ValueRule + Send + Sync + 'static) -> Self {
        Self::Computed(Computed::new(f))
    }
}

impl From<Value> for ValueRule {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ValueRule {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ValueRule {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<bool> for ValueRule {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<Regex> for ValueRule {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// A rule after all computed steps have been evaluated.
#[derive(Debug, Clone)]
pub enum Resolved {
    Value(Value),
    Absent,
    Skip,
    Pattern(Regex),
}
