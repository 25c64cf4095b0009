// Validator configuration

use crate::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::Path;

/// How `required` treats values that are present but falsy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredPolicy {
    /// Absent, null, blank strings, empty arrays and empty objects fail.
    /// `0` and `false` count as provided.
    #[default]
    Presence,
    /// Like `Presence`, but `0`, `false` and `"0"` fail too.
    Truthy,
}

impl std::str::FromStr for RequiredPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "presence" => Ok(RequiredPolicy::Presence),
            "truthy" => Ok(RequiredPolicy::Truthy),
            other => Err(ConfigError::InvalidValue {
                key: "required_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Settings that shape the built-in checkers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub required_policy: RequiredPolicy,
    /// Whether `required` trims strings before the emptiness check
    pub trim_strings: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            required_policy: RequiredPolicy::Presence,
            trim_strings: true,
        }
    }
}

impl ValidatorConfig {
    /// Read `RULEBOOK_REQUIRED_POLICY` and `RULEBOOK_TRIM_STRINGS`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(policy) = env::var("RULEBOOK_REQUIRED_POLICY") {
            config.required_policy = policy.parse()?;
        }
        if let Ok(trim) = env::var("RULEBOOK_TRIM_STRINGS") {
            config.trim_strings = parse_flag("RULEBOOK_TRIM_STRINGS", &trim)?;
        }

        Ok(config)
    }

    /// Parse a TOML document such as `required_policy = "truthy"`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
