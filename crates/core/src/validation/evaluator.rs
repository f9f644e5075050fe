//! Ordered rule evaluation over a single field value.
//!
//! Rules run in a fixed order and stop at the first failure:
//! required, pattern, min/max, minLength/maxLength, matchField, custom.

use regress::Regex;
use serde_json::Value;

use super::rules::{CustomOutcome, RuleKind, RuleViolation, ValidationRuleSet};
use crate::types::{is_empty_value, FormData};

/// Evaluate `rules` for the field `name` (displayed as `label`).
///
/// `value` is the field's current value and `data` the full data bag used
/// by cross-field rules. Returns `None` when every rule passes.
pub fn evaluate_rules(
    name: &str,
    label: &str,
    rules: &ValidationRuleSet,
    value: Option<&Value>,
    data: &FormData,
) -> Option<RuleViolation> {
    let (rule, default_message) = first_failure(label, rules, value, data)?;
    let message = match default_message {
        // A custom predicate's own string always wins.
        Failure::Verbatim(message) => message,
        Failure::Generated(message) => rules
            .override_message()
            .map(str::to_string)
            .unwrap_or(message),
    };
    Some(RuleViolation {
        field: name.to_string(),
        rule,
        message,
    })
}

enum Failure {
    Generated(String),
    Verbatim(String),
}

fn first_failure(
    label: &str,
    rules: &ValidationRuleSet,
    value: Option<&Value>,
    data: &FormData,
) -> Option<(RuleKind, Failure)> {
    if is_empty_value(value) {
        if rules.required {
            return Some((
                RuleKind::Required,
                Failure::Generated(format!("{label} is required")),
            ));
        }
        return None;
    }
    let value = value?;

    if let Some(failure) = check_pattern(label, rules, value) {
        return Some(failure);
    }
    if let Some(failure) = check_range(label, rules, value) {
        return Some(failure);
    }
    if let Some(failure) = check_length(label, rules, value) {
        return Some(failure);
    }
    if let Some(other) = rules.match_field.as_deref() {
        if !data.get(other).is_some_and(|o| same_value(o, value)) {
            return Some((
                RuleKind::MatchField,
                Failure::Generated(format!("{label} does not match {other}")),
            ));
        }
    }
    if let Some(custom) = &rules.validate {
        match custom.check(value, data) {
            CustomOutcome::Pass => {}
            CustomOutcome::Fail => {
                return Some((
                    RuleKind::Custom,
                    Failure::Generated(format!("{label} is invalid")),
                ))
            }
            // An empty message carries no error.
            CustomOutcome::Message(message) if message.is_empty() => {}
            CustomOutcome::Message(message) => {
                return Some((RuleKind::Custom, Failure::Verbatim(message)))
            }
        }
    }
    None
}

fn check_pattern(
    label: &str,
    rules: &ValidationRuleSet,
    value: &Value,
) -> Option<(RuleKind, Failure)> {
    let pattern = rules.pattern.as_deref().filter(|p| !p.is_empty())?;
    let s = value.as_str()?;
    let matched = match Regex::new(pattern) {
        Ok(re) => re.find(s).is_some(),
        // A pattern that cannot be compiled can never be satisfied.
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Invalid pattern rule");
            false
        }
    };
    if matched {
        return None;
    }
    Some((
        RuleKind::Pattern,
        Failure::Generated(format!("{label} has an invalid format")),
    ))
}

/// Strict equality, except that numbers compare by value (`1 == 1.0`).
fn same_value(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

fn check_range(
    label: &str,
    rules: &ValidationRuleSet,
    value: &Value,
) -> Option<(RuleKind, Failure)> {
    let num = value.as_f64()?;
    if let Some(min) = rules.min {
        if num < min {
            return Some((
                RuleKind::Min,
                Failure::Generated(format!("{label} must be at least {}", format_bound(min))),
            ));
        }
    }
    if let Some(max) = rules.max {
        if num > max {
            return Some((
                RuleKind::Max,
                Failure::Generated(format!("{label} must be at most {}", format_bound(max))),
            ));
        }
    }
    None
}

fn check_length(
    label: &str,
    rules: &ValidationRuleSet,
    value: &Value,
) -> Option<(RuleKind, Failure)> {
    let len = value.as_str()?.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            return Some((
                RuleKind::MinLength,
                Failure::Generated(format!("{label} must be at least {min} characters")),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Some((
                RuleKind::MaxLength,
                Failure::Generated(format!("{label} must be at most {max} characters")),
            ));
        }
    }
    None
}

/// Render a numeric bound without a trailing `.0` for whole numbers.
fn format_bound(bound: f64) -> String {
    if bound.is_finite() && bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{bound}")
    }
}
