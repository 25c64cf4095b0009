// Validation context and message collaborator seam

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

static ABSENT: Value = Value::Null;

/// Snapshot of the data being validated, keyed by field name.
///
/// Missing fields read as `Value::Null`, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationContext {
    data: HashMap<String, Value>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field value
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(field.into(), value.into());
    }

    /// Value of `field`, or the null sentinel when absent
    pub fn get(&self, field: &str) -> &Value {
        self.data.get(field).unwrap_or(&ABSENT)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl From<HashMap<String, Value>> for ValidationContext {
    fn from(data: HashMap<String, Value>) -> Self {
        Self { data }
    }
}

impl From<Map<String, Value>> for ValidationContext {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            data: map.into_iter().collect(),
        }
    }
}

/// JSON objects convert; any other value is handed back unchanged.
impl TryFrom<Value> for ValidationContext {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(other),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationContext
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolves the human-readable message for a failed rule.
///
/// Template loading and translation live behind this trait; the crate only
/// ships [`DefaultMessages`](crate::DefaultMessages).
pub trait MessageResolver {
    fn message(&self, rule: &str, field: &str, params: &[Value]) -> String;
}
