use serde::{Deserialize, Serialize};

/// Behaviour switches for a [`FormBuilder`](crate::builder::FormBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormBuilderConfig {
    /// Editing is unavailable; the builder only previews and submits.
    pub read_only: bool,
    /// Re-validate a field each time its value changes.
    pub validate_on_change: bool,
    /// Re-validate a field when it loses focus.
    pub validate_on_blur: bool,
    /// Reject field names already used by another field in the schema.
    pub reject_duplicate_names: bool,
}

impl Default for FormBuilderConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            validate_on_change: true,
            validate_on_blur: true,
            reject_duplicate_names: false,
        }
    }
}

impl FormBuilderConfig {
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }

    pub fn validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    pub fn reject_duplicate_names(mut self, enabled: bool) -> Self {
        self.reject_duplicate_names = enabled;
        self
    }
}
