//! Field validation engine.
//!
//! Provides the rule-set type attached to form fields and a pure-logic
//! evaluator with no UI dependencies.

pub mod evaluator;
pub mod rules;
