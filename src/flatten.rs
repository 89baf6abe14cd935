use serde::Serialize;
use serde_json::Value;

/// A lower-cased string leaf together with where it was found.
///
/// The path (`organic[0].link`) is only for diagnostics; matching never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatString {
    pub value: String,
    pub path: String,
}

/// Collects every string leaf of `value`, depth-first, in document order.
///
/// Numbers, booleans and nulls are skipped. A string at the root gets an empty path.
pub fn flatten(value: &Value) -> Vec<FlatString> {
    flatten_at(value, "")
}

/// Like [`flatten`], but every produced path starts with `prefix`.
///
/// Used to flatten a single section (`videos`) while keeping paths absolute.
pub fn flatten_at(value: &Value, prefix: &str) -> Vec<FlatString> {
    let mut out = Vec::new();
    // Explicit stack: nesting depth of the document never touches the call stack.
    // Children are pushed in reverse so they pop in source order.
    let mut stack: Vec<(&Value, String)> = vec![(value, prefix.to_string())];

    while let Some((node, path)) = stack.pop() {
        match node {
            Value::String(s) => out.push(FlatString {
                value: s.to_lowercase(),
                path,
            }),
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    stack.push((child, join_key(&path, key)));
                }
            }
            Value::Array(items) => {
                for (idx, child) in items.iter().enumerate().rev() {
                    stack.push((child, format!("{path}[{idx}]")));
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    out
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
