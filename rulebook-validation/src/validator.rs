// Validation engine

use crate::registry::{self, Registry};
use crate::{
    DefaultMessages, MessageResolver, ParseError, Parser, RuleSet, RuleSpec, UnknownRuleError,
    ValidationContext, ValidationError, ValidationErrors,
};
use indexmap::IndexMap;
use rulebook_log::{debug, trace};
use std::sync::Arc;

/// Validates a data snapshot against per-field rules.
///
/// ```
/// use rulebook_validation::{ValidationContext, Validator};
///
/// let data = ValidationContext::new().with("foo", "bar").with("bar", "bar");
/// let mut v = Validator::new(data, [("foo", "required|equals:bar")]).unwrap();
/// assert!(v.validate().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    data: ValidationContext,
    rules: RuleSet,
    registry: Arc<Registry>,
    failed: IndexMap<String, String>,
    // Position of the failing rule within its field's rules
    failed_at: IndexMap<String, usize>,
}

impl Validator {
    /// Build a validator over `data`, parsing every field's rules eagerly.
    pub fn new<I, K, S>(data: impl Into<ValidationContext>, rules: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<RuleSpec>,
    {
        Ok(Self {
            data: data.into(),
            rules: Parser::explode(rules)?,
            registry: registry::global(),
            failed: IndexMap::new(),
            failed_at: IndexMap::new(),
        })
    }

    /// Validator with no rules yet; add them with [`add_rule`](Self::add_rule).
    pub fn with_data(data: impl Into<ValidationContext>) -> Self {
        Self {
            data: data.into(),
            rules: RuleSet::new(),
            registry: registry::global(),
            failed: IndexMap::new(),
            failed_at: IndexMap::new(),
        }
    }

    /// Resolve checkers from `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Append rules for `field` after any it already has.
    pub fn add_rule(
        &mut self,
        field: impl Into<String>,
        spec: impl Into<RuleSpec>,
    ) -> Result<&mut Self, ParseError> {
        let field = field.into();
        let parsed = Parser::parse_spec(&spec.into())?;
        debug!("Adding {} rule(s) to field '{}'", parsed.len(), field);
        self.rules.entry(field).or_default().extend(parsed);
        Ok(self)
    }

    /// Run every field's rules; `Ok(true)` when no field failed.
    ///
    /// Rules of a field run in order and stop at the first failure. A rule
    /// without a registered checker aborts the run with [`UnknownRuleError`]
    /// and leaves no failures recorded.
    pub fn validate(&mut self) -> Result<bool, UnknownRuleError> {
        self.failed.clear();
        self.failed_at.clear();
        let mut failed = IndexMap::new();
        let mut failed_at = IndexMap::new();

        for (field, rules) in &self.rules {
            let value = self.data.get(field);

            for (index, rule) in rules.iter().enumerate() {
                let checker =
                    self.registry
                        .resolve(&rule.name)
                        .ok_or_else(|| UnknownRuleError {
                            rule: rule.name.clone(),
                            field: field.clone(),
                        })?;

                let passed = checker(value, rule.params.as_slice(), &self.data);
                trace!(
                    "Field '{}' rule '{}' -> {}",
                    field,
                    rule.name,
                    if passed { "pass" } else { "fail" }
                );
                if !passed {
                    failed.insert(field.clone(), rule.name.clone());
                    failed_at.insert(field.clone(), index);
                    break;
                }
            }
        }

        debug!(
            "Validated {} field(s), {} failed",
            self.rules.len(),
            failed.len()
        );
        self.failed = failed;
        self.failed_at = failed_at;
        Ok(self.failed.is_empty())
    }

    /// Same as [`validate`](Self::validate).
    pub fn passes(&mut self) -> Result<bool, UnknownRuleError> {
        self.validate()
    }

    /// Negation of [`validate`](Self::validate).
    pub fn fails(&mut self) -> Result<bool, UnknownRuleError> {
        self.validate().map(|passed| !passed)
    }

    /// Failed field -> identifier of the rule that failed it, from the last
    /// validation run, in field order.
    pub fn failed(&self) -> &IndexMap<String, String> {
        &self.failed
    }

    /// Failures of the last run as messages from [`DefaultMessages`].
    pub fn errors(&self) -> ValidationErrors {
        self.errors_with(&DefaultMessages)
    }

    /// Failures of the last run as messages from `resolver`.
    pub fn errors_with(&self, resolver: &dyn MessageResolver) -> ValidationErrors {
        self.failed
            .iter()
            .map(|(field, rule)| {
                let params = self
                    .failed_at
                    .get(field)
                    .and_then(|&index| self.rules.get(field)?.get(index))
                    .map(|r| r.params.as_slice())
                    .unwrap_or_default();

                let mut error = ValidationError::new(field, resolver.message(rule, field, params))
                    .with_constraint(rule);
                if self.data.contains(field) {
                    error = error.with_value(self.data.get(field).clone());
                }
                error
            })
            .collect::<Vec<_>>()
            .into()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn data(&self) -> &ValidationContext {
        &self.data
    }
}
