// Rule model: raw caller-supplied specifications and their canonical form

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name to ordered canonical rules. Field order is evaluation order.
pub type RuleSet = IndexMap<String, Vec<ParsedRule>>;

/// Canonical rule: identifier plus an ordered parameter list.
///
/// `params` is always a list, even for rules that take none. List-style
/// rules such as `in` carry a single parameter that is itself an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub name: String,
    pub params: Vec<Value>,
}

impl ParsedRule {
    pub fn new(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Rule without parameters
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// One entry of the structured rule form.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    /// `"required"`
    Bare(String),
    /// `"length" => 3`, `"in" => ["a", "b"]`
    WithParam(String, Value),
}

/// Raw rule description for one field, in either surface syntax.
///
/// ```
/// use rulebook_validation::RuleSpec;
///
/// let text = RuleSpec::from("required|length:3");
/// let structured = RuleSpec::structured().rule("required").with("length", 3);
/// # let _ = (text, structured);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawSpec")]
pub enum RuleSpec {
    /// Delimited mini-language, `required|in:a,b`
    Text(String),
    /// Ordered bare names and name/parameter pairs
    Entries(Vec<RuleEntry>),
}

impl RuleSpec {
    /// Empty structured specification, to be filled with [`rule`](Self::rule)
    /// and [`with`](Self::with).
    pub fn structured() -> Self {
        RuleSpec::Entries(Vec::new())
    }

    /// Append a parameterless rule.
    pub fn rule(self, name: impl Into<String>) -> Self {
        self.push(RuleEntry::Bare(name.into()))
    }

    /// Append a rule with a parameter (scalar, array or object).
    pub fn with(self, name: impl Into<String>, param: impl Into<Value>) -> Self {
        self.push(RuleEntry::WithParam(name.into(), param.into()))
    }

    fn push(self, entry: RuleEntry) -> Self {
        match self {
            RuleSpec::Entries(mut entries) => {
                entries.push(entry);
                RuleSpec::Entries(entries)
            }
            // Appending to the string form keeps the text rules first.
            RuleSpec::Text(text) => RuleSpec::Entries(vec![RuleEntry::Bare(text), entry]),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(value: &str) -> Self {
        RuleSpec::Text(value.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(value: String) -> Self {
        RuleSpec::Text(value)
    }
}

impl From<Vec<RuleEntry>> for RuleSpec {
    fn from(entries: Vec<RuleEntry>) -> Self {
        RuleSpec::Entries(entries)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpec {
    Text(String),
    List(Vec<RawEntry>),
    Map(Map<String, Value>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Bare(String),
    Keyed(Map<String, Value>),
}

fn keyed_entries(map: Map<String, Value>) -> impl Iterator<Item = RuleEntry> {
    map.into_iter().map(|(name, param)| match param {
        Value::Null => RuleEntry::Bare(name),
        param => RuleEntry::WithParam(name, param),
    })
}

impl From<RawSpec> for RuleSpec {
    fn from(raw: RawSpec) -> Self {
        match raw {
            RawSpec::Text(text) => RuleSpec::Text(text),
            RawSpec::Map(map) => RuleSpec::Entries(keyed_entries(map).collect()),
            RawSpec::List(list) => RuleSpec::Entries(
                list.into_iter()
                    .flat_map(|entry| -> Box<dyn Iterator<Item = RuleEntry>> {
                        match entry {
                            RawEntry::Bare(name) => Box::new(std::iter::once(RuleEntry::Bare(name))),
                            RawEntry::Keyed(map) => Box::new(keyed_entries(map)),
                        }
                    })
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let spec = RuleSpec::structured()
            .rule("required")
            .with("length", 3)
            .with("in", json!(["a", "b"]));

        assert_eq!(
            spec,
            RuleSpec::Entries(vec![
                RuleEntry::Bare("required".to_string()),
                RuleEntry::WithParam("length".to_string(), json!(3)),
                RuleEntry::WithParam("in".to_string(), json!(["a", "b"])),
            ])
        );
    }

    #[test]
    fn test_builder_on_text_spec() {
        let spec = RuleSpec::from("required|email").with("lengthMax", 64);
        assert_eq!(
            spec,
            RuleSpec::Entries(vec![
                RuleEntry::Bare("required|email".to_string()),
                RuleEntry::WithParam("lengthMax".to_string(), json!(64)),
            ])
        );
    }

    #[test]
    fn test_deserialize_text() {
        let spec: RuleSpec = serde_json::from_value(json!("required|int")).unwrap();
        assert_eq!(spec, RuleSpec::Text("required|int".to_string()));
    }

    #[test]
    fn test_deserialize_list_of_names_and_pairs() {
        let spec: RuleSpec =
            serde_json::from_value(json!(["required", {"length": 3}, {"in": ["a", "b"]}]))
                .unwrap();
        assert_eq!(
            spec,
            RuleSpec::structured()
                .rule("required")
                .with("length", 3)
                .with("in", json!(["a", "b"]))
        );
    }

    #[test]
    fn test_deserialize_object_preserves_order() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"required": null, "between": [3, 7], "email": null}"#)
                .unwrap();
        assert_eq!(
            spec,
            RuleSpec::structured()
                .rule("required")
                .with("between", json!([3, 7]))
                .rule("email")
        );
    }
}
