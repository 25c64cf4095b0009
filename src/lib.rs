// Rulebook - declarative validation of flat field maps
//
// Rules are written as a small pipe-delimited language or as structured
// rule maps; both normalize to one canonical form that a validator runs
// against a registry of named checkers.

// Re-export core functionality
pub use rulebook_validation::*;

// Re-export optional crates
#[cfg(feature = "log")]
pub use rulebook_log;

pub use serde_json::{Value, json};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        MessageResolver, ParsedRule, Parser, Registry, RuleSpec, ValidationContext,
        ValidationErrors, Validator, ValidatorConfig,
    };
    pub use serde_json::{Value, json};
}
