//! Line diffs of JSON values for issue messages

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

/// Render how `actual` differs from `expected` as a line diff of their
/// pretty-printed forms. Removed lines start with `-`, added with `+`.
pub fn render_value_diff(actual: Option<&Value>, expected: &Value) -> String {
    let old = actual.map_or_else(|| "(absent)\n".to_string(), pretty);
    let new = pretty(expected);

    let diff = TextDiff::from_lines(&old, &new);
    let mut rendered = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        rendered.push(sign);
        rendered.push_str(change.value());
        if change.missing_newline() {
            rendered.push('\n');
        }
    }
    rendered.trim_end().to_string()
}

fn pretty(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}
