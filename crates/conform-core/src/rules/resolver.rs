//! Rule resolution
//!
//! Computed rules may return further computed rules. Resolution follows the
//! chain with an explicit step counter instead of recursion, so a circular
//! definition surfaces as [`Error::UnresolvedRule`] rather than a hang.

use super::{Computed, Resolved, RuleContext, ValueRule};
use crate::manifest::FieldPath;
use crate::{Error, Result};

/// Default bound on computed-rule invocations per field.
pub const DEFAULT_RESOLUTION_LIMIT: usize = 10;

/// One step of resolution: either a concrete expectation or another
/// computed rule still to evaluate.
enum Step {
    Done(Resolved),
    Next(Computed),
}

impl From<ValueRule> for Step {
    fn from(rule: ValueRule) -> Self {
        match rule {
            ValueRule::Value(value) => Step::Done(Resolved::Value(value)),
            ValueRule::Absent => Step::Done(Resolved::Absent),
            ValueRule::Skip => Step::Done(Resolved::Skip),
            ValueRule::Pattern(pattern) => Step::Done(Resolved::Pattern(pattern)),
            ValueRule::Computed(computed) => Step::Next(computed),
        }
    }
}

/// Resolves [`ValueRule`]s against a package context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    limit: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION_LIMIT)
    }
}

impl Resolver {
    /// A resolver allowing at most `limit` computed invocations per rule.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Evaluate `rule` for the field at `path` until it is concrete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedRule`] when more than `limit` computed
    /// invocations would be needed.
    pub fn resolve(
        &self,
        path: &FieldPath,
        rule: &ValueRule,
        context: &RuleContext<'_>,
    ) -> Result<Resolved> {
        let mut step = Step::from(rule.clone());
        let mut invocations = 0;

        loop {
            match step {
                Step::Done(resolved) => return Ok(resolved),
                Step::Next(computed) => {
                    if invocations >= self.limit {
                        return Err(Error::UnresolvedRule {
                            path: path.to_string(),
                            limit: self.limit,
                        });
                    }
                    invocations += 1;
                    step = Step::from(computed.compute(context));
                }
            }
        }
    }
}
