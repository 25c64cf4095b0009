//! Loose value coercions shared by the parser and the checkers.
//!
//! `in`, `notIn`, `equals` and `different` compare values through
//! [`loose_eq`], so `5`, `"5"` and `"05"` are the same member everywhere.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

/// String form used for loose comparison.
///
/// Strings are kept as is, numbers use their decimal text, booleans become
/// `"true"`/`"false"`, null (the absent sentinel) is `""`, and arrays and
/// objects fall back to compact JSON.
pub fn normalize(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Loose equality: numerically when both sides read as numbers, otherwise
/// in [`normalize`]d form.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => normalize(a) == normalize(b),
    }
}

/// Whether a string token reads as a number (`12`, `-3.5`, `1e3`).
pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC.is_match(s)
}

/// Coerce a rule-string token: numeric text becomes a JSON number, anything
/// else stays a string.
pub fn coerce_token(token: &str) -> Value {
    if is_numeric_str(token) {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Ok(u) = token.parse::<u64>() {
            return Value::Number(u.into());
        }
        if let Some(n) = token.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(token.to_string())
}

/// Numeric reading of a value: numbers, or strings that look numeric.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s.trim()) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative whole-number reading, used for length parameters.
pub fn as_count(value: &Value) -> Option<usize> {
    let n = as_f64(value)?;
    if n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}

/// Character length of a scalar value; the absent sentinel has length 0.
/// Arrays and objects have no character length.
pub fn char_len(value: &Value) -> Option<usize> {
    match value {
        Value::Array(_) | Value::Object(_) => None,
        other => Some(normalize(other).chars().count()),
    }
}
