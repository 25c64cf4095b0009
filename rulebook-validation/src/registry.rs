// Checker registry: rule identifier -> checker function

use crate::validators;
use crate::{RegistryError, ValidationContext, ValidatorConfig};
use once_cell::sync::OnceCell;
use rulebook_log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Checker signature: (value, parameters, full data context) -> passed.
pub type Checker = Arc<dyn Fn(&Value, &[Value], &ValidationContext) -> bool + Send + Sync>;

static GLOBAL: OnceCell<Arc<Registry>> = OnceCell::new();

/// Table of named checkers.
///
/// Build it, register everything, then share it read-only (usually through
/// [`install`]). Lookups are exact on the canonical identifier.
#[derive(Clone, Default)]
pub struct Registry {
    checkers: HashMap<String, Checker>,
}

impl Registry {
    /// Registry with no checkers
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in checkers with the default configuration
    pub fn builtin() -> Self {
        Self::from_config(&ValidatorConfig::default())
    }

    /// All built-in checkers, shaped by `config`
    pub fn from_config(config: &ValidatorConfig) -> Self {
        let mut registry = Self::new();
        registry
            .register("required", validators::required(config.required_policy, config.trim_strings))
            .register("integer", validators::integer)
            .register("numeric", validators::numeric)
            .register("accepted", validators::accepted)
            .register("boolean", validators::boolean)
            .register("in", validators::in_list)
            .register("notIn", validators::not_in_list)
            .register("equals", validators::equals)
            .register("different", validators::different)
            .register("length", validators::length)
            .register("lengthBetween", validators::length_between)
            .register("lengthMin", validators::length_min)
            .register("lengthMax", validators::length_max)
            .register("between", validators::between)
            .register("min", validators::min)
            .register("max", validators::max)
            .register("creditCard", validators::credit_card)
            .register("email", validators::email)
            .register("url", validators::url)
            .register("alpha", validators::alpha)
            .register("alphaNum", validators::alpha_num)
            .register("slug", validators::slug)
            .register("regex", validators::regex)
            .register("ip", validators::ip)
            .register("contains", validators::contains);
        registry
    }

    /// Register (or replace) the checker for `identifier`
    pub fn register<F>(&mut self, identifier: impl Into<String>, checker: F) -> &mut Self
    where
        F: Fn(&Value, &[Value], &ValidationContext) -> bool + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        if self
            .checkers
            .insert(identifier.clone(), Arc::new(checker))
            .is_some()
        {
            debug!("Replaced checker for rule '{}'", identifier);
        }
        self
    }

    pub fn resolve(&self, identifier: &str) -> Option<&Checker> {
        self.checkers.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.checkers.contains_key(identifier)
    }

    /// Registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.checkers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("checkers", &self.identifiers())
            .finish()
    }
}

/// Install the process-wide registry. Must happen before the first call to
/// [`global`]; afterwards the registry is frozen.
pub fn install(registry: Registry) -> Result<(), RegistryError> {
    GLOBAL
        .set(Arc::new(registry))
        .map_err(|_| RegistryError::AlreadyInstalled)
}

/// The process-wide registry.
///
/// Falls back to the built-ins configured from the environment when nothing
/// was installed. A malformed environment configuration is logged and the
/// defaults are used.
pub fn global() -> Arc<Registry> {
    GLOBAL
        .get_or_init(|| {
            let config = ValidatorConfig::from_env().unwrap_or_else(|e| {
                warn!("Ignoring validator configuration from environment: {}", e);
                ValidatorConfig::default()
            });
            debug!("Initializing global checker registry with {:?}", config);
            Arc::new(Registry::from_config(&config))
        })
        .clone()
}
