//! Environment variable overlay.
//!
//! `APP__DATABASE__HOST=db` with prefix `APP__` and separator `__` becomes
//! `{"DATABASE": {"HOST": "db"}}`. Key case is kept as written; use
//! [`align_keys`] to fold it onto the keys of an existing options object.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::merge::merge_options_into;

pub const DEFAULT_SEPARATOR: &str = "__";

/// Build an options object from the process environment.
pub fn env_overrides(prefix: &str, separator: &str) -> Map<String, Value> {
    let env: HashMap<String, String> = std::env::vars().collect();
    env_overrides_with_env(prefix, separator, &env)
}

/// Build an options object from a provided env map.
///
/// For each env var:
/// - Skip it unless it starts with `prefix`
/// - Split the remainder on `separator` into a key path
/// - Coerce the value to a JSON literal when it parses as one
pub fn env_overrides_with_env(
    prefix: &str,
    separator: &str,
    env: &HashMap<String, String>,
) -> Map<String, Value> {
    // Sorted so that colliding paths resolve the same way on every run
    let mut keys: Vec<&String> = env.keys().filter(|k| k.starts_with(prefix)).collect();
    keys.sort();

    let mut result = Map::new();
    for key in keys {
        let Some(path) = key_path(&key[prefix.len()..], separator) else {
            tracing::debug!(key = %key, "ignoring env var with empty path segment");
            continue;
        };
        let value = coerce_value(&env[key]);
        merge_options_into(&mut result, &nest(path, value));
    }
    result
}

/// Rename keys in `overrides` to the existing keys of `base` they match
/// ignoring ASCII case, recursing where both sides hold objects.
///
/// An exact match wins over a case-insensitive one. Keys with no match
/// keep the case they were written in.
pub fn align_keys(overrides: Map<String, Value>, base: &Map<String, Value>) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, value) in overrides {
        let aligned = if base.contains_key(&key) {
            key
        } else {
            base.keys()
                .find(|existing| existing.eq_ignore_ascii_case(&key))
                .cloned()
                .unwrap_or(key)
        };
        let value = match (value, base.get(&aligned)) {
            (Value::Object(inner), Some(Value::Object(existing))) => {
                Value::Object(align_keys(inner, existing))
            }
            (value, _) => value,
        };
        // Two env keys can align onto the same name
        merge_options_into(&mut result, &nest(vec![aligned], value));
    }
    result
}

fn nest(path: Vec<String>, value: Value) -> Value {
    path.into_iter().rev().fold(value, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment, inner);
        Value::Object(map)
    })
}

fn key_path(rest: &str, separator: &str) -> Option<Vec<String>> {
    if rest.is_empty() {
        return None;
    }
    let segments: Vec<String> = if separator.is_empty() {
        vec![rest.to_string()]
    } else {
        rest.split(separator).map(str::to_string).collect()
    };
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments)
}

/// Coerce an env string: JSON literals parse, anything else stays a string.
pub fn coerce_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(parsed) => parsed,
        Err(_) => Value::String(raw.to_string()),
    }
}
