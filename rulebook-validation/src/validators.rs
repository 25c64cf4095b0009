// Built-in checkers
//
// Every checker has the registry signature (value, params, context) -> bool.
// Malformed parameters make the check fail and are logged, they never panic.

use crate::loose::{self, as_count, as_f64, char_len, loose_eq, normalize};
use crate::{RequiredPolicy, ValidationContext};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use ::regex::Regex;
use rulebook_log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::net::IpAddr;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

/// Card brands and the prefix/length pattern each must match.
static CARD_TYPES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("visa", r"^4[0-9]{12}(?:[0-9]{3})?$"),
        ("mastercard", r"^(?:5[1-5]|2[2-7])[0-9]{14}$"),
        ("amex", r"^3[47][0-9]{13}$"),
        ("dinersclub", r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
        ("discover", r"^6(?:011|5[0-9]{2})[0-9]{12}$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

// Compiled `regex` rule patterns, keyed by pattern text
static PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(|| RwLock::new(HashMap::new()));

const PATTERN_CACHE_LIMIT: usize = 256;

/// Compile `pattern` once and reuse it for later checks.
fn compiled(pattern: &str) -> Result<Regex, ::regex::Error> {
    if let Some(re) = PATTERNS.read().get(pattern) {
        return Ok(re.clone());
    }

    let re = Regex::new(pattern)?;
    let mut cache = PATTERNS.write();
    if cache.len() >= PATTERN_CACHE_LIMIT {
        cache.clear();
    }
    cache.insert(pattern.to_string(), re.clone());
    Ok(re)
}

fn param<'a>(params: &'a [Value], index: usize, rule: &str) -> Option<&'a Value> {
    let found = params.get(index);
    if found.is_none() {
        warn!("Rule '{}' is missing parameter #{}", rule, index + 1);
    }
    found
}

fn count_param(params: &[Value], index: usize, rule: &str) -> Option<usize> {
    let raw = param(params, index, rule)?;
    let count = as_count(raw);
    if count.is_none() {
        warn!("Rule '{}' expects a whole number, got {}", rule, raw);
    }
    count
}

fn number_param(params: &[Value], index: usize, rule: &str) -> Option<f64> {
    let raw = param(params, index, rule)?;
    let number = as_f64(raw);
    if number.is_none() {
        warn!("Rule '{}' expects a number, got {}", rule, raw);
    }
    number
}

/// Members of a list-style parameter: array items, or object keys.
/// A scalar is a one-member set.
fn members(param: &Value) -> Vec<Value> {
    match param {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.keys().cloned().map(Value::String).collect(),
        scalar => vec![scalar.clone()],
    }
}

/// `required` checker for the given policy.
pub fn required(
    policy: RequiredPolicy,
    trim: bool,
) -> impl Fn(&Value, &[Value], &ValidationContext) -> bool + Send + Sync {
    move |value: &Value, _: &[Value], _: &ValidationContext| match value {
        Value::Null => false,
        Value::String(s) => {
            let s = if trim { s.trim() } else { s.as_str() };
            !s.is_empty() && !(policy == RequiredPolicy::Truthy && s == "0")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(b) => *b || policy == RequiredPolicy::Presence,
        Value::Number(n) => policy == RequiredPolicy::Presence || n.as_f64() != Some(0.0),
    }
}

pub fn integer(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        Value::String(s) => INTEGER_REGEX.is_match(s),
        _ => false,
    }
}

pub fn numeric(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => loose::is_numeric_str(s),
        _ => false,
    }
}

pub fn accepted(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1"),
        _ => false,
    }
}

pub fn boolean(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) => matches!(s.as_str(), "0" | "1"),
        _ => false,
    }
}

pub fn in_list(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    param(params, 0, "in").is_some_and(|allowed| members(allowed).iter().any(|m| loose_eq(value, m)))
}

pub fn not_in_list(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    param(params, 0, "notIn").is_some_and(|denied| !members(denied).iter().any(|m| loose_eq(value, m)))
}

pub fn equals(value: &Value, params: &[Value], context: &ValidationContext) -> bool {
    let Some(other) = param(params, 0, "equals").map(normalize) else {
        return false;
    };
    context.contains(&other) && loose_eq(value, context.get(&other))
}

pub fn different(value: &Value, params: &[Value], context: &ValidationContext) -> bool {
    let Some(other) = param(params, 0, "different").map(normalize) else {
        return false;
    };
    context.contains(&other) && !loose_eq(value, context.get(&other))
}

pub fn length(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (char_len(value), count_param(params, 0, "length")) {
        (Some(len), Some(expected)) => len == expected,
        _ => false,
    }
}

pub fn length_between(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    let (Some(len), Some(min)) = (char_len(value), count_param(params, 0, "lengthBetween")) else {
        return false;
    };
    // The maximum is optional; without it only the minimum applies.
    let max = match params.get(1) {
        Some(_) => match count_param(params, 1, "lengthBetween") {
            Some(max) => max,
            None => return false,
        },
        None => usize::MAX,
    };
    (min..=max).contains(&len)
}

pub fn length_min(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (char_len(value), count_param(params, 0, "lengthMin")) {
        (Some(len), Some(min)) => len >= min,
        _ => false,
    }
}

pub fn length_max(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (char_len(value), count_param(params, 0, "lengthMax")) {
        (Some(len), Some(max)) => len <= max,
        _ => false,
    }
}

pub fn between(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (
        as_f64(value),
        number_param(params, 0, "between"),
        number_param(params, 1, "between"),
    ) {
        (Some(n), Some(min), Some(max)) => n >= min && n <= max,
        _ => false,
    }
}

pub fn min(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (as_f64(value), number_param(params, 0, "min")) {
        (Some(n), Some(min)) => n >= min,
        _ => false,
    }
}

pub fn max(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    match (as_f64(value), number_param(params, 0, "max")) {
        (Some(n), Some(max)) => n <= max,
        _ => false,
    }
}

pub fn email(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

pub fn url(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    value.as_str().is_some_and(|s| URL_REGEX.is_match(s))
}

pub fn alpha(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    value.as_str().is_some_and(|s| ALPHA_REGEX.is_match(s))
}

pub fn alpha_num(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    match value {
        Value::String(s) => ALPHANUMERIC_REGEX.is_match(s),
        Value::Number(n) => n.is_u64(),
        _ => false,
    }
}

pub fn slug(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    value.as_str().is_some_and(|s| SLUG_REGEX.is_match(s))
}

pub fn ip(value: &Value, _: &[Value], _: &ValidationContext) -> bool {
    value.as_str().is_some_and(|s| s.parse::<IpAddr>().is_ok())
}

pub fn contains(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    let Some(needle) = param(params, 0, "contains").map(normalize) else {
        return false;
    };
    value.as_str().is_some_and(|s| s.contains(&needle))
}

/// Strip `/.../` delimiters from a pattern written in delimited form.
fn strip_delimiters(pattern: &str) -> &str {
    pattern
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .filter(|p| !p.is_empty())
        .unwrap_or(pattern)
}

pub fn regex(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    let Some(pattern) = param(params, 0, "regex").map(normalize) else {
        return false;
    };
    match compiled(strip_delimiters(&pattern)) {
        Ok(re) => re.is_match(&normalize(value)),
        Err(e) => {
            warn!("Invalid pattern for rule 'regex': {}", e);
            false
        }
    }
}

/// Luhn checksum over an all-digit string.
pub fn luhn(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Type names a `creditCard` rule was given, lower-cased.
fn card_types(params: &[Value]) -> Vec<String> {
    params
        .iter()
        .flat_map(members)
        .map(|m| normalize(&m).to_lowercase())
        .collect()
}

pub fn credit_card(value: &Value, params: &[Value], _: &ValidationContext) -> bool {
    let digits: String = normalize(value).chars().filter(char::is_ascii_digit).collect();
    if !luhn(&digits) {
        return false;
    }

    let wanted = card_types(params);
    for name in &wanted {
        if !CARD_TYPES.iter().any(|(known, _)| known == name) {
            warn!("Ignoring unknown card type '{}'", name);
        }
    }

    CARD_TYPES
        .iter()
        .filter(|(name, _)| wanted.is_empty() || wanted.iter().any(|w| w == name))
        .any(|(_, pattern)| pattern.is_match(&digits))
}
