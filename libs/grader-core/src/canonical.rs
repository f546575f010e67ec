/// Canonical Serialization - Deterministic Value Encoding
///
/// **Core Responsibility:**
/// Turn an arbitrary structured value into a stable string form used both
/// for structural deep-equality comparison and for display.
///
/// **Encoding Rules:**
/// - Compact JSON, no insignificant whitespace
/// - Object keys sorted recursively (deep equality must not depend on
///   insertion order)
/// - Floats with a zero fractional part render as integers: the grading
///   value domain has one number type, so an author-supplied `2.0` and a
///   computed `2` are the same value
/// - Closed variant set: null, bool, number, string, array, object
///
/// Two values are considered equal exactly when their canonical strings are
/// byte-equal.
use serde_json::{Map, Number, Value};

/// Canonical string form of a value.
pub fn canonicalize(value: &Value) -> String {
    canonical_value(value).to_string()
}

/// Structural deep equality under canonical serialization.
pub fn values_match(left: &Value, right: &Value) -> bool {
    canonicalize(left) == canonicalize(right)
}

fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonical_value(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        Value::Number(number) => Value::Number(canonical_number(number)),
        scalar => scalar.clone(),
    }
}

/// Fold integral floats into integers so `2.0` and `2` serialize
/// identically.
fn canonical_number(number: &Number) -> Number {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            if float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Number::from(float as i64);
            }
        }
    }
    number.clone()
}
