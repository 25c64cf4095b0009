//! Rule-based validation for flat field maps
//!
//! Rules are written either as a delimited string (`"required|length:3"`) or
//! in structured form (rule name mapped to its parameter). Both are parsed
//! into the same canonical [`ParsedRule`] sequence, then run by a
//! [`Validator`] against a registry of named checkers.
//!
//! # Examples
//!
//! ## String Rules
//!
//! ```
//! use rulebook_validation::{ValidationContext, Validator};
//!
//! let data = ValidationContext::new().with("color", "green").with("age", 42);
//! let mut v = Validator::new(data, [
//!     ("color", "required|in:red,green,blue"),
//!     ("age", "integer|between:18,99"),
//! ])
//! .unwrap();
//!
//! assert!(v.passes().unwrap());
//! ```
//!
//! ## Structured Rules
//!
//! ```
//! use rulebook_validation::{RuleSpec, ValidationContext, Validator};
//! use serde_json::json;
//!
//! let mut v = Validator::with_data(ValidationContext::new().with("color", "green"));
//! v.add_rule(
//!     "color",
//!     RuleSpec::structured()
//!         .rule("required")
//!         .with("in", json!({"red": "Red", "green": "Green"})),
//! )
//! .unwrap();
//!
//! assert!(v.validate().unwrap());
//! ```
//!
//! ## Failures
//!
//! ```
//! use rulebook_validation::{ValidationContext, Validator};
//!
//! let mut v = Validator::new(
//!     ValidationContext::new().with("str", "happy"),
//!     [("str", "required|length:4")],
//! )
//! .unwrap();
//!
//! assert!(v.fails().unwrap());
//! assert_eq!(v.failed()["str"], "length");
//! assert_eq!(v.errors().errors[0].message, "str must be 4 characters long");
//! ```

mod config;
mod errors;
pub mod loose;
mod messages;
mod parser;
pub mod registry;
mod rules;
mod traits;
mod validator;
pub mod validators;

pub use config::*;
pub use errors::*;
pub use messages::*;
pub use parser::*;
pub use registry::{Checker, Registry};
pub use rules::*;
pub use traits::*;
pub use validator::*;
