//! Shared value and data-bag types.

use serde_json::Value;

/// A single field value. Anything JSON can express.
pub type FieldValue = Value;

/// The shared key-value store that every step and field reads and writes.
pub type FormData = serde_json::Map<String, Value>;

/// Shallow-merge `partial` into `target`.
///
/// Keys in `partial` overwrite existing keys wholesale; nested objects are
/// replaced, never merged.
pub fn merge_shallow(target: &mut FormData, partial: FormData) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// Returns `true` for a missing value, `null`, or the empty string.
///
/// `false` and `0` are present values.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Build a [`FormData`] from a JSON object literal.
///
/// Non-object values yield an empty bag.
pub fn form_data(value: Value) -> FormData {
    match value {
        Value::Object(map) => map,
        _ => FormData::new(),
    }
}
