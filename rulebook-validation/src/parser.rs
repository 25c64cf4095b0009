// Rule parser: both surface syntaxes into canonical ParsedRule sequences

use crate::loose::coerce_token;
use crate::{ParseError, ParsedRule, RuleEntry, RuleSet, RuleSpec};
use once_cell::sync::Lazy;
use rulebook_log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// How a rule's trailing arguments map onto parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// All arguments collapse into one array parameter (`in:a,b` -> `[["a","b"]]`)
    List,
    /// The whole argument tail is one unsplit string (`regex:^a,b$`)
    Raw,
    /// Each argument is its own parameter. `None` when the rule is unknown.
    Positional(Option<usize>),
}

const NONE: Arity = Arity::Positional(Some(0));
const ONE: Arity = Arity::Positional(Some(1));
const TWO: Arity = Arity::Positional(Some(2));

/// Canonical spelling and arity of every known rule.
const KNOWN_RULES: &[(&str, Arity)] = &[
    ("required", NONE),
    ("integer", NONE),
    ("numeric", NONE),
    ("accepted", NONE),
    ("boolean", NONE),
    ("email", NONE),
    ("url", NONE),
    ("alpha", NONE),
    ("alphaNum", NONE),
    ("slug", NONE),
    ("ip", NONE),
    ("in", Arity::List),
    ("notIn", Arity::List),
    ("creditCard", Arity::List),
    ("regex", Arity::Raw),
    ("equals", ONE),
    ("different", ONE),
    ("length", ONE),
    ("lengthMin", ONE),
    ("lengthMax", ONE),
    ("min", ONE),
    ("max", ONE),
    ("contains", ONE),
    ("lengthBetween", TWO),
    ("between", TWO),
];

const ALIASES: &[(&str, &str)] = &[
    ("int", "integer"),
    ("bool", "boolean"),
    ("alphanumeric", "alphaNum"),
];

// Lower-cased spelling -> canonical spelling
static CANONICAL: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    KNOWN_RULES
        .iter()
        .map(|(name, _)| (name.to_lowercase(), *name))
        .chain(ALIASES.iter().map(|(alias, name)| (alias.to_string(), *name)))
        .collect()
});

/// Fold case and aliases into the canonical rule identifier.
///
/// Unknown identifiers keep the caller's spelling; they are reported when a
/// validator fails to resolve a checker for them.
pub fn canonical_name(name: &str) -> String {
    match CANONICAL.get(&name.to_lowercase()) {
        Some(canonical) => (*canonical).to_string(),
        None => name.to_string(),
    }
}

/// Arity of a canonical rule identifier.
pub fn arity(name: &str) -> Arity {
    KNOWN_RULES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, arity)| *arity)
        .unwrap_or(Arity::Positional(None))
}

/// Normalizes rule specifications into canonical [`ParsedRule`]s.
pub struct Parser;

impl Parser {
    /// Parse the delimited syntax, e.g. `required|int|in:1,2,3`.
    ///
    /// ```
    /// use rulebook_validation::Parser;
    /// use serde_json::json;
    ///
    /// let rules = Parser::parse("required|int|in:1,2,3").unwrap();
    /// assert_eq!(rules[1].name, "integer");
    /// assert_eq!(rules[2].params, vec![json!([1, 2, 3])]);
    /// ```
    pub fn parse(rules: &str) -> Result<Vec<ParsedRule>, ParseError> {
        rules
            .split('|')
            .enumerate()
            .map(|(position, segment)| Self::parse_segment(position, segment))
            .collect()
    }

    /// Parse every field of a field -> spec mapping. Repeated fields append.
    pub fn explode<I, K, S>(rules: I) -> Result<RuleSet, ParseError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<RuleSpec>,
    {
        let mut set = RuleSet::new();
        for (field, spec) in rules {
            let field = field.into();
            let parsed = Self::parse_spec(&spec.into())?;
            debug!("Parsed {} rule(s) for field '{}'", parsed.len(), field);
            set.entry(field).or_default().extend(parsed);
        }
        Ok(set)
    }

    /// Parse a single field's spec in either syntax.
    pub fn parse_spec(spec: &RuleSpec) -> Result<Vec<ParsedRule>, ParseError> {
        match spec {
            RuleSpec::Text(text) => Self::parse(text),
            RuleSpec::Entries(entries) => {
                let mut parsed = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        RuleEntry::Bare(text) => parsed.extend(Self::parse(text)?),
                        RuleEntry::WithParam(name, param) => {
                            parsed.push(Self::structured_rule(name, param)?)
                        }
                    }
                }
                Ok(parsed)
            }
        }
    }

    fn parse_segment(position: usize, segment: &str) -> Result<ParsedRule, ParseError> {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(ParseError::EmptySegment { position });
        }

        let (name, tail) = match segment.split_once(':') {
            Some((name, tail)) => (name.trim(), Some(tail)),
            None => (segment, None),
        };
        if name.is_empty() {
            return Err(ParseError::EmptyName {
                segment: segment.to_string(),
            });
        }

        let name = canonical_name(name);
        let params = match tail {
            Some(tail) => Self::text_params(&name, tail),
            None => Vec::new(),
        };
        Ok(ParsedRule::new(name, params))
    }

    fn text_params(name: &str, tail: &str) -> Vec<Value> {
        let arity = arity(name);
        if arity == Arity::Raw {
            return if tail.is_empty() {
                Vec::new()
            } else {
                vec![Value::String(tail.to_string())]
            };
        }
        if tail.trim().is_empty() {
            return Vec::new();
        }

        let tokens: Vec<Value> = tail.split(',').map(|t| coerce_token(t.trim())).collect();
        match arity {
            Arity::List => vec![Value::Array(tokens)],
            _ => tokens,
        }
    }

    fn structured_rule(name: &str, param: &Value) -> Result<ParsedRule, ParseError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyName {
                segment: name.to_string(),
            });
        }
        let name = canonical_name(trimmed);

        let params = match (arity(&name), param) {
            (_, Value::Null) => Vec::new(),
            (Arity::List, Value::Array(_) | Value::Object(_)) => vec![param.clone()],
            (Arity::List, scalar) => vec![Value::Array(vec![scalar.clone()])],
            (Arity::Raw, Value::Array(_) | Value::Object(_)) => {
                return Err(ambiguous(&name, "expects a single pattern string"));
            }
            (Arity::Raw, scalar) => vec![scalar.clone()],
            (Arity::Positional(Some(max)), Value::Array(items))
                if max > 1 && (1..=max).contains(&items.len()) && items.iter().all(is_scalar) =>
            {
                items.clone()
            }
            (Arity::Positional(max), Value::Array(_) | Value::Object(_)) => {
                let reason = match max {
                    Some(1) => "takes a single parameter, got a collection".to_string(),
                    Some(n) if n > 1 => format!("takes at most {} scalar parameters", n),
                    Some(_) => "takes no parameters".to_string(),
                    None => "unknown rule cannot take a collection parameter".to_string(),
                };
                return Err(ambiguous(&name, &reason));
            }
            (Arity::Positional(_), scalar) => vec![scalar.clone()],
        };
        Ok(ParsedRule::new(name, params))
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn ambiguous(rule: &str, reason: &str) -> ParseError {
    ParseError::AmbiguousParameters {
        rule: rule.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_basic() {
        let parsed = Parser::parse("required|int|in:1,2,3").unwrap();
        assert_eq!(
            parsed,
            vec![
                ParsedRule::bare("required"),
                ParsedRule::bare("integer"),
                ParsedRule::new("in", vec![json!([1, 2, 3])]),
            ]
        );
    }

    #[test]
    fn test_parse_positional_params() {
        let parsed = Parser::parse("between:3, 7|equals:other").unwrap();
        assert_eq!(parsed[0], ParsedRule::new("between", vec![json!(3), json!(7)]));
        assert_eq!(parsed[1], ParsedRule::new("equals", vec![json!("other")]));
    }

    #[test]
    fn test_canonical_name_folding() {
        assert_eq!(canonical_name("creditcard"), "creditCard");
        assert_eq!(canonical_name("CREDITCARD"), "creditCard");
        assert_eq!(canonical_name("int"), "integer");
        assert_eq!(canonical_name("LengthBetween"), "lengthBetween");
        assert_eq!(canonical_name("isbn"), "isbn");
        assert_eq!(canonical_name("myRule"), "myRule");
    }

    #[test]
    fn test_parse_unknown_rule_is_kept() {
        let parsed = Parser::parse("isbn:10,13").unwrap();
        assert_eq!(parsed, vec![ParsedRule::new("isbn", vec![json!(10), json!(13)])]);
    }

    #[test]
    fn test_parse_empty_segments() {
        assert_eq!(
            Parser::parse("required||email"),
            Err(ParseError::EmptySegment { position: 1 })
        );
        assert_eq!(
            Parser::parse("required|"),
            Err(ParseError::EmptySegment { position: 1 })
        );
        assert_eq!(Parser::parse(""), Err(ParseError::EmptySegment { position: 0 }));
    }

    #[test]
    fn test_parse_empty_name() {
        assert!(matches!(
            Parser::parse(":3"),
            Err(ParseError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_parse_empty_tail() {
        assert_eq!(Parser::parse("in:").unwrap(), vec![ParsedRule::bare("in")]);
        assert_eq!(
            Parser::parse("creditcard").unwrap(),
            vec![ParsedRule::bare("creditCard")]
        );
    }

    #[test]
    fn test_parse_regex_keeps_commas() {
        let parsed = Parser::parse(r"regex:^\d{2,4}$").unwrap();
        assert_eq!(parsed, vec![ParsedRule::new("regex", vec![json!(r"^\d{2,4}$")])]);
    }

    #[test]
    fn test_explode_both_syntaxes() {
        let text = Parser::explode([
            ("name", RuleSpec::from("required|length:3")),
            (
                "email",
                RuleSpec::from("email|equals:name|in:other,name|creditcard:visa,mastercard"),
            ),
        ])
        .unwrap();

        let structured = Parser::explode([
            ("name", RuleSpec::structured().rule("required").with("length", 3)),
            (
                "email",
                RuleSpec::structured()
                    .rule("email")
                    .with("equals", "name")
                    .with("in", json!(["other", "name"]))
                    .with("creditcard", json!(["visa", "mastercard"])),
            ),
        ])
        .unwrap();

        assert_eq!(text, structured);
        assert_eq!(text["name"].len(), 2);
        assert_eq!(text["name"][1], ParsedRule::new("length", vec![json!(3)]));
        assert_eq!(text["email"].len(), 4);
        assert_eq!(
            text["email"][3],
            ParsedRule::new("creditCard", vec![json!(["visa", "mastercard"])])
        );
    }

    #[test]
    fn test_explode_keeps_field_order_and_appends_repeats() {
        let set = Parser::explode([("b", "required"), ("a", "email"), ("b", "int")]).unwrap();
        let fields: Vec<_> = set.keys().cloned().collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(
            set["b"],
            vec![ParsedRule::bare("required"), ParsedRule::bare("integer")]
        );
    }

    #[test]
    fn test_structured_list_rule_scalar_wraps() {
        let parsed = Parser::parse_spec(&RuleSpec::structured().with("creditcard", "visa")).unwrap();
        assert_eq!(parsed, Parser::parse("creditcard:visa").unwrap());
    }

    #[test]
    fn test_structured_mapping_for_in() {
        let mapping = json!({"red": "Red", "green": "Green"});
        let parsed = Parser::parse_spec(&RuleSpec::structured().with("in", mapping.clone())).unwrap();
        assert_eq!(parsed, vec![ParsedRule::new("in", vec![mapping])]);
    }

    #[test]
    fn test_structured_sequence_spreads_for_multi_param_rules() {
        let parsed = Parser::parse_spec(&RuleSpec::structured().with("between", json!([3, 7]))).unwrap();
        assert_eq!(parsed, Parser::parse("between:3,7").unwrap());

        let parsed =
            Parser::parse_spec(&RuleSpec::structured().with("lengthBetween", json!([2, 8]))).unwrap();
        assert_eq!(parsed, Parser::parse("lengthBetween:2,8").unwrap());
    }

    #[test]
    fn test_structured_sequence_ambiguous() {
        for spec in [
            RuleSpec::structured().with("length", json!([3, 4])),
            RuleSpec::structured().with("equals", json!(["a"])),
            RuleSpec::structured().with("between", json!([1, 2, 3])),
            RuleSpec::structured().with("between", json!([[1], 2])),
            RuleSpec::structured().with("required", json!([true])),
            RuleSpec::structured().with("custom", json!(["x"])),
            RuleSpec::structured().with("regex", json!(["^a$"])),
        ] {
            assert!(
                matches!(
                    Parser::parse_spec(&spec),
                    Err(ParseError::AmbiguousParameters { .. })
                ),
                "{:?} should be ambiguous",
                spec
            );
        }
    }

    #[test]
    fn test_structured_null_param_is_bare() {
        let parsed = Parser::parse_spec(&RuleSpec::structured().with("email", Value::Null)).unwrap();
        assert_eq!(parsed, vec![ParsedRule::bare("email")]);
    }

    #[test]
    fn test_structured_empty_name() {
        assert!(matches!(
            Parser::parse_spec(&RuleSpec::structured().with("  ", 3)),
            Err(ParseError::EmptyName { .. })
        ));
    }
}
