//! Computed rule factories
//!
//! Shorthands for the common ways a rule varies between packages.

use std::collections::HashMap;

use super::{RuleContext, ValueRule};

/// Pick a rule by the package's category.
///
/// A category without an entry resolves to [`ValueRule::Absent`].
pub fn by_category<I, S>(table: I) -> ValueRule
where
    I: IntoIterator<Item = (S, ValueRule)>,
    S: Into<String>,
{
    let table: HashMap<String, ValueRule> =
        table.into_iter().map(|(k, v)| (k.into(), v)).collect();
    ValueRule::computed(move |ctx| {
        table
            .get(ctx.category)
            .cloned()
            .unwrap_or(ValueRule::Absent)
    })
}

/// Pick a rule by the manifest's current `name`, falling back otherwise.
pub fn by_package_name<I, S>(table: I, fallback: ValueRule) -> ValueRule
where
    I: IntoIterator<Item = (S, ValueRule)>,
    S: Into<String>,
{
    let table: HashMap<String, ValueRule> =
        table.into_iter().map(|(k, v)| (k.into(), v)).collect();
    ValueRule::computed(move |ctx| {
        ctx.package_name()
            .and_then(|name| table.get(name))
            .cloned()
            .unwrap_or_else(|| fallback.clone())
    })
}

/// A string value rendered from the package context.
///
/// Placeholders: `{scope}`, `{category}`, `{slug}`.
pub fn template(text: impl Into<String>, scope: impl Into<String>) -> ValueRule {
    let text = text.into();
    let scope = scope.into();
    ValueRule::computed(move |ctx| ValueRule::value(render(&text, &scope, ctx)))
}

fn render(text: &str, scope: &str, ctx: &RuleContext<'_>) -> String {
    text.replace("{scope}", scope)
        .replace("{category}", ctx.category)
        .replace("{slug}", ctx.slug)
}
