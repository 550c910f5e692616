//! Deep merge of option objects: objects recurse, everything else replaces.

use serde_json::{Map, Value};

/// Returns true when `value` is a plain key/value record.
///
/// Arrays, strings, numbers, booleans and null are never plain.
pub fn is_plain(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Merge any number of sources left to right into a freshly allocated map.
///
/// The rightmost source defining a key wins, except where both the
/// accumulated value and the incoming value are objects, in which case they
/// merge recursively. Sources that are not objects contribute nothing.
pub fn merge_options<'a, I>(sources: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut result = Map::new();
    for source in sources {
        merge_options_into(&mut result, source);
    }
    result
}

/// Fold a single source into an existing accumulator.
pub fn merge_options_into(target: &mut Map<String, Value>, source: &Value) {
    let Value::Object(source_map) = source else {
        tracing::trace!(kind = value_kind(source), "skipping non-object merge source");
        return;
    };

    for (key, incoming) in source_map {
        if !is_plain(incoming) {
            // Arrays and scalars replace wholesale
            target.insert(key.clone(), incoming.clone());
            continue;
        }
        match target.get_mut(key) {
            // Both sides are objects: recurse into the existing slot
            Some(Value::Object(existing)) => merge_options_into(existing, incoming),
            // Incoming object over anything else: install a fresh copy
            _ => {
                target.insert(key.clone(), Value::Object(merge_options([incoming])));
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Variadic form of [`merge_options`].
///
/// ```
/// use merge_options::merge_options;
/// use serde_json::json;
///
/// let merged = merge_options!(json!({"a": 1, "b": {"c": 2}}), json!({"b": {"d": 3}}));
/// assert_eq!(serde_json::Value::Object(merged), json!({"a": 1, "b": {"c": 2, "d": 3}}));
/// ```
#[macro_export]
macro_rules! merge_options {
    () => {
        ::serde_json::Map::<::std::string::String, ::serde_json::Value>::new()
    };
    ($($source:expr),+ $(,)?) => {
        $crate::merge::merge_options([$(&$source),+])
    };
}
