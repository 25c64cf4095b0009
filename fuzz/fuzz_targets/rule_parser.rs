//! Fuzz target for the rule language.
//!
//! Feeds arbitrary rule strings and structured entries through the parser
//! and, when they parse, through a full validation run.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rulebook_validation::{
    Parser, RuleEntry, RuleSpec, ValidationContext, Validator,
};
use serde_json::Value;

/// Arbitrary rule input for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzRules {
    /// Pipe-delimited rule string
    text: String,
    /// Structured entries, as rule name and optional string parameter
    entries: Vec<(String, Option<String>)>,
    /// Field value to validate against
    value: String,
    /// Second field, for rules that reference another field
    other: String,
}

fuzz_target!(|input: FuzzRules| {
    // Parsing must never panic, whatever the input.
    let _ = Parser::parse(&input.text);

    let entries: Vec<RuleEntry> = input
        .entries
        .iter()
        .map(|(name, param)| match param {
            Some(p) => RuleEntry::WithParam(name.clone(), Value::String(p.clone())),
            None => RuleEntry::Bare(name.clone()),
        })
        .collect();
    let _ = Parser::parse_spec(&RuleSpec::Entries(entries));

    let data = ValidationContext::new()
        .with("field", input.value)
        .with("other", input.other);

    if let Ok(mut v) = Validator::new(data, [("field", input.text.as_str())]) {
        // Unknown rule names are reported, not panicked on.
        if let Ok(passed) = v.validate() {
            assert_eq!(passed, v.failed().is_empty());
            let _ = v.errors().to_json();
        }
    }
});
