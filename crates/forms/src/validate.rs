//! Field- and form-level validation over a schema.

use std::collections::BTreeMap;

use maksudi_core::{evaluate_rules, FieldValue, FormData, RuleKind, RuleViolation};
use serde::Serialize;
use validator::ValidateEmail;

use crate::schema::{FieldDescriptor, FieldType};

/// Validate one field's value against its rule set.
///
/// Fields without a rule set always pass. After the declared rules, email
/// fields additionally require a well-formed address.
pub fn check_field(
    field: &FieldDescriptor,
    value: Option<&FieldValue>,
    data: &FormData,
) -> Option<RuleViolation> {
    let rules = field.validation.as_ref()?;
    if let Some(violation) = evaluate_rules(&field.name, &field.label, rules, value, data) {
        return Some(violation);
    }

    if field.field_type == FieldType::Email {
        let address = value.and_then(FieldValue::as_str).filter(|s| !s.is_empty())?;
        if !address.to_string().validate_email() {
            let message = rules
                .override_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} must be a valid email address", field.label));
            return Some(RuleViolation {
                field: field.name.clone(),
                rule: RuleKind::Email,
                message,
            });
        }
    }
    None
}

/// Message-only form of [`check_field`].
pub fn validate_field(
    field: &FieldDescriptor,
    value: Option<&FieldValue>,
    data: &FormData,
) -> Option<String> {
    check_field(field, value, data).map(|v| v.message)
}

// ---------------------------------------------------------------------------
// Error map
// ---------------------------------------------------------------------------

/// Field name to current error message.
///
/// A field with no entry has no error. Empty messages are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn has_error(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set or clear the entry for `name`.
    pub fn patch(&mut self, name: &str, error: Option<String>) {
        match error.filter(|m| !m.is_empty()) {
            Some(message) => {
                self.0.insert(name.to_string(), message);
            }
            None => {
                self.0.remove(name);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Validate every field against `data`, building a fresh error map.
///
/// With duplicate names the last failing field's message wins.
pub fn validate_all(fields: &[FieldDescriptor], data: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();
    for field in fields {
        if let Some(message) = validate_field(field, data.get(&field.name), data) {
            errors.patch(&field.name, Some(message));
        }
    }
    errors
}
