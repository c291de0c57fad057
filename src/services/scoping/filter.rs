//! Field-level response redaction.
//!
//! Every object field gets a dotted path from the root (`account.name`).
//! Arrays keep the path of the field that holds them, so `account.users.name`
//! addresses the `name` of each element of `account.users`.

use serde_json::{Map, Value};

use super::pattern::ScopePattern;

/// Returns a redacted copy of `value`. The input is never modified.
///
/// A field is kept whole when some pattern matches its path, descended into
/// when some pattern only reaches below it, and omitted otherwise.
pub fn filter(visible: &[ScopePattern], root: &str, value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(filter_object(visible, root, fields)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| filter(visible, root, item))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}

fn filter_object(visible: &[ScopePattern], base: &str, fields: &Map<String, Value>) -> Map<String, Value> {
    let mut kept = Map::new();

    for (key, value) in fields {
        let path = if base.is_empty() {
            key.clone()
        } else {
            format!("{base}.{key}")
        };

        if visible.iter().any(|pattern| pattern.matches(&path)) {
            kept.insert(key.clone(), value.clone());
            continue;
        }

        let nested = matches!(value, Value::Object(_) | Value::Array(_));
        if nested && visible.iter().any(|pattern| pattern.reaches_below(&path)) {
            kept.insert(key.clone(), filter(visible, &path, value));
        }
    }

    kept
}
