//! Shared building blocks for the Maksudi form components.
//!
//! - [`types`]: the [`FormData`](types::FormData) bag and value helpers.
//! - [`validation`]: declarative rule sets and the pure-logic evaluator
//!   used by schema-driven forms and step validators alike.
//! - [`error`]: [`CoreError`](error::CoreError) for API misuse.

pub mod error;
pub mod types;
pub mod validation;

pub use error::CoreError;
pub use types::{form_data, is_empty_value, merge_shallow, FieldValue, FormData};
pub use validation::evaluator::evaluate_rules;
pub use validation::rules::{CustomOutcome, CustomRule, RuleKind, RuleViolation, ValidationRuleSet};
