//! Validation rule-set and result types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::FormData;

/// Result of a custom field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomOutcome {
    Pass,
    /// Failed; the rule set's custom or default message is used.
    Fail,
    /// Failed with a message that is shown verbatim.
    Message(String),
}

impl From<bool> for CustomOutcome {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl From<String> for CustomOutcome {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for CustomOutcome {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

type CustomFn = dyn Fn(&Value, &FormData) -> CustomOutcome + Send + Sync;

/// A caller-supplied predicate over the field value and the whole data bag.
///
/// Not serializable: schemas loaded from JSON never carry one.
#[derive(Clone)]
pub struct CustomRule(Arc<CustomFn>);

impl CustomRule {
    pub fn new<F, O>(f: F) -> Self
    where
        F: Fn(&Value, &FormData) -> O + Send + Sync + 'static,
        O: Into<CustomOutcome>,
    {
        Self(Arc::new(move |value, data| f(value, data).into()))
    }

    pub fn check(&self, value: &Value, data: &FormData) -> CustomOutcome {
        (self.0)(value, data)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// Constraints attached to one field.
///
/// Every member is optional; an empty rule set accepts anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRuleSet {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Name of another field whose value must equal this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_field: Option<String>,
    #[serde(skip)]
    pub validate: Option<CustomRule>,
    /// Replaces the generated message for every failure on this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

impl ValidationRuleSet {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn matching(mut self, field_name: impl Into<String>) -> Self {
        self.match_field = Some(field_name.into());
        self
    }

    pub fn with_custom<F, O>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &FormData) -> O + Send + Sync + 'static,
        O: Into<CustomOutcome>,
    {
        self.validate = Some(CustomRule::new(f));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    /// The custom message, if one is set and non-empty.
    pub fn override_message(&self) -> Option<&str> {
        self.custom_message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Which constraint a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Pattern,
    Min,
    Max,
    MinLength,
    MaxLength,
    MatchField,
    Custom,
    Email,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Pattern => "pattern",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::MatchField => "match_field",
            Self::Custom => "custom",
            Self::Email => "email",
        }
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub field: String,
    pub rule: RuleKind,
    pub message: String,
}
