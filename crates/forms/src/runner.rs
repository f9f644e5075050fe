//! Run-mode form state: the data bag being filled and its error map.

use std::collections::HashMap;

use maksudi_core::{FieldValue, FormData};

use crate::config::FormBuilderConfig;
use crate::schema::FieldDescriptor;
use crate::validate::{validate_all, validate_field, FormErrors};

/// Values and errors for one filling session.
///
/// Live validation only ever touches the field that changed or blurred.
/// A field whose rules depend on another field (`matchField`, custom
/// predicates) keeps its previous error until it is itself re-triggered or
/// [`validate_form`](FormState::validate_form) runs.
#[derive(Debug, Clone)]
pub struct FormState {
    data: FormData,
    errors: FormErrors,
    /// Last default seeded per field name.
    seeded: HashMap<String, FieldValue>,
    validate_on_change: bool,
    validate_on_blur: bool,
}

impl FormState {
    pub fn new(config: &FormBuilderConfig) -> Self {
        Self {
            data: FormData::new(),
            errors: FormErrors::new(),
            seeded: HashMap::new(),
            validate_on_change: config.validate_on_change,
            validate_on_blur: config.validate_on_blur,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.data.get(name)
    }

    /// Copy field defaults into the data bag.
    ///
    /// Only defaults that are new or changed since the last seeding are
    /// written, so values entered for other fields survive schema edits.
    pub fn seed_defaults(&mut self, fields: &[FieldDescriptor]) {
        for field in fields {
            let Some(default) = &field.default_value else {
                continue;
            };
            if self.seeded.get(&field.name) == Some(default) {
                continue;
            }
            tracing::debug!(field = %field.name, "Seeding default value");
            self.data.insert(field.name.clone(), default.clone());
            self.seeded.insert(field.name.clone(), default.clone());
        }
    }

    /// Record a new value for `field` and, if enabled, re-validate it.
    pub fn change(&mut self, field: &FieldDescriptor, value: FieldValue) {
        self.data.insert(field.name.clone(), value);
        if self.validate_on_change {
            self.revalidate(field);
        }
    }

    /// Handle `field` losing focus.
    pub fn blur(&mut self, field: &FieldDescriptor) {
        if self.validate_on_blur {
            self.revalidate(field);
        }
    }

    /// Re-validate every field, replacing the whole error map.
    ///
    /// Returns `true` iff no field failed.
    pub fn validate_form(&mut self, fields: &[FieldDescriptor]) -> bool {
        self.errors = validate_all(fields, &self.data);
        tracing::debug!(errors = self.errors.len(), "Validated form");
        self.errors.is_empty()
    }

    /// Drop entered values and errors, keeping seeded defaults.
    pub fn reset(&mut self, fields: &[FieldDescriptor]) {
        self.data.clear();
        self.errors.clear();
        self.seeded.clear();
        self.seed_defaults(fields);
    }

    fn revalidate(&mut self, field: &FieldDescriptor) {
        let error = validate_field(field, self.data.get(&field.name), &self.data);
        self.errors.patch(&field.name, error);
    }
}
