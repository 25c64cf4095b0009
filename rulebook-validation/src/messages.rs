// Default English messages for built-in rules

use crate::MessageResolver;
use crate::loose::normalize;
use serde_json::Value;

/// Short English sentences for the built-in rules. Unknown rules get a
/// generic "is invalid" message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

fn list(params: &[Value]) -> String {
    match params.first() {
        Some(Value::Array(items)) => items.iter().map(normalize).collect::<Vec<_>>().join(", "),
        Some(Value::Object(map)) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        Some(other) => normalize(other),
        None => String::new(),
    }
}

fn arg(params: &[Value], index: usize) -> String {
    params.get(index).map(normalize).unwrap_or_default()
}

impl MessageResolver for DefaultMessages {
    fn message(&self, rule: &str, field: &str, params: &[Value]) -> String {
        let detail = match rule {
            "required" => "is required".to_string(),
            "integer" => "must be an integer".to_string(),
            "numeric" => "must be numeric".to_string(),
            "accepted" => "must be accepted".to_string(),
            "boolean" => "must be a boolean".to_string(),
            "in" => format!("must be one of: {}", list(params)),
            "notIn" => format!("must not be one of: {}", list(params)),
            "equals" => format!("must be the same as '{}'", arg(params, 0)),
            "different" => format!("must be different from '{}'", arg(params, 0)),
            "length" => format!("must be {} characters long", arg(params, 0)),
            "lengthBetween" if params.len() > 1 => format!(
                "must be between {} and {} characters",
                arg(params, 0),
                arg(params, 1)
            ),
            "lengthBetween" | "lengthMin" => {
                format!("must be at least {} characters", arg(params, 0))
            }
            "lengthMax" => format!("must be at most {} characters", arg(params, 0)),
            "between" => format!("must be between {} and {}", arg(params, 0), arg(params, 1)),
            "min" => format!("must be at least {}", arg(params, 0)),
            "max" => format!("must be at most {}", arg(params, 0)),
            "creditCard" => "must be a valid credit card number".to_string(),
            "email" => "must be a valid email address".to_string(),
            "url" => "must be a valid URL".to_string(),
            "alpha" => "must contain only letters".to_string(),
            "alphaNum" => "must contain only letters and numbers".to_string(),
            "slug" => "must contain only letters, numbers, dashes and underscores".to_string(),
            "regex" => "does not match the required pattern".to_string(),
            "ip" => "must be a valid IP address".to_string(),
            "contains" => format!("must contain '{}'", arg(params, 0)),
            _ => "is invalid".to_string(),
        };
        format!("{} {}", field, detail)
    }
}
