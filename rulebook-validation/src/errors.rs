// Error types for rule parsing, checker resolution and configuration

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A rule specification could not be turned into canonical rules.
///
/// Raised eagerly while parsing, never deferred to validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `required||email` or a trailing `|`
    #[error("Empty rule segment at position {position}")]
    EmptySegment { position: usize },

    /// `:3` or a blank structured entry
    #[error("Empty rule name in segment '{segment}'")]
    EmptyName { segment: String },

    /// Structured parameter whose shape cannot be mapped onto the rule
    #[error("Ambiguous parameters for rule '{rule}': {reason}")]
    AmbiguousParameters { rule: String, reason: String },
}

/// A canonical rule identifier has no registered checker.
///
/// This is a configuration defect and aborts the whole validation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No checker registered for rule '{rule}' (field '{field}')")]
pub struct UnknownRuleError {
    pub rule: String,
    pub field: String,
}

/// Errors from the process-wide checker registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A global checker registry is already installed")]
    AlreadyInstalled,
}

/// Errors while loading [`ValidatorConfig`](crate::ValidatorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Any error raised by this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    UnknownRule(#[from] UnknownRuleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable failure for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Error message
    pub message: String,

    /// Identifier of the rule that failed
    pub constraint: String,

    /// Value that failed validation, if the field was present
    pub value: Option<Value>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            value: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Per-field failures of one validation run, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Failure recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "message": e.message,
                    "constraint": e.constraint,
                    "value": e.value,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}
