//! Declarative form schema types.
//!
//! A [`FormSchema`] is an ordered list of [`FieldDescriptor`]s. Field order
//! is render and tab order. Field `name`s key the submitted data bag and
//! are expected to be unique, but nothing here enforces that.

use maksudi_core::{FieldValue, ValidationRuleSet};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// Input kind of a field.
///
/// Unknown tags survive deserialization as [`FieldType::Other`] so that a
/// malformed schema still loads and renders a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Number,
    Email,
    Password,
    Textarea,
    Select,
    Checkbox,
    Switch,
    Radio,
    Date,
    Richtext,
    Other(String),
}

impl FieldType {
    /// All built-in types, in palette order.
    pub const BUILT_IN: [FieldType; 11] = [
        Self::Text,
        Self::Number,
        Self::Email,
        Self::Password,
        Self::Textarea,
        Self::Select,
        Self::Checkbox,
        Self::Switch,
        Self::Radio,
        Self::Date,
        Self::Richtext,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "number" => Self::Number,
            "email" => Self::Email,
            "password" => Self::Password,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "switch" => Self::Switch,
            "radio" => Self::Radio,
            "date" => Self::Date,
            "richtext" => Self::Richtext,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Radio => "radio",
            Self::Date => "date",
            Self::Richtext => "richtext",
            Self::Other(tag) => tag,
        }
    }

    /// Select and radio fields pick from a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Convert raw text input into the value stored for this type.
    ///
    /// Number fields store JSON numbers (empty input stays an empty
    /// string), checkbox and switch fields store booleans.
    pub fn coerce_input(&self, raw: &str) -> FieldValue {
        match self {
            Self::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return FieldValue::String(String::new());
                }
                if let Ok(int) = trimmed.parse::<i64>() {
                    return FieldValue::from(int);
                }
                match trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                    Some(num) => FieldValue::Number(num),
                    None => FieldValue::String(raw.to_string()),
                }
            }
            Self::Checkbox | Self::Switch => FieldValue::Bool(matches!(raw, "true" | "on" | "1")),
            _ => FieldValue::String(raw.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Field descriptor
// ---------------------------------------------------------------------------

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The `k`-th generated placeholder option (1-based).
    pub fn placeholder(k: usize) -> Self {
        Self::new(format!("Option {k}"), format!("option{k}"))
    }
}

/// Declarative definition of one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Shows the required marker. Enforcement comes from `validation`.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRuleSet>,
}

impl FieldDescriptor {
    pub fn new(
        id: impl Into<String>,
        field_type: FieldType,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            name: name.into(),
            placeholder: None,
            description: None,
            class_name: None,
            required: false,
            disabled: false,
            read_only: false,
            options: Vec::new(),
            default_value: None,
            validation: None,
        }
    }

    pub fn with_validation(mut self, validation: ValidationRuleSet) -> Self {
        self.required = self.required || validation.required;
        self.validation = Some(validation);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append the next generated placeholder option.
    pub fn add_option(&mut self) -> &FieldOption {
        let k = self.options.len() + 1;
        self.options.push(FieldOption::placeholder(k));
        &self.options[k - 1]
    }

    /// Replace the option at `index`. Returns `false` if out of range.
    pub fn update_option(&mut self, index: usize, option: FieldOption) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = option;
                true
            }
            None => false,
        }
    }

    pub fn remove_option(&mut self, index: usize) -> Option<FieldOption> {
        (index < self.options.len()).then(|| self.options.remove(index))
    }

    /// Mutable access to the rule set, creating an empty one if absent.
    pub fn validation_mut(&mut self) -> &mut ValidationRuleSet {
        self.validation.get_or_insert_with(ValidationRuleSet::default)
    }
}

// ---------------------------------------------------------------------------
// Form schema
// ---------------------------------------------------------------------------

/// Default title of a freshly created schema.
pub const DEFAULT_FORM_TITLE: &str = "New Form";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// An empty schema with a generated id and the default title.
    pub fn untitled() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), DEFAULT_FORM_TITLE)
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, maksudi_core::CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, maksudi_core::CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// First field with the given data-bag name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Names used by more than one field, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes = Vec::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) && !dupes.contains(&field.name.as_str()) {
                dupes.push(field.name.as_str());
            }
        }
        dupes
    }
}

/// Move the item at `from` so that it ends up at `to`.
///
/// Remove-then-insert: items between the two positions shift by one and
/// no other relative order changes. Returns `false` (and leaves `items`
/// untouched) if either index is out of range.
pub fn splice_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_type_tags_roundtrip() {
        for ty in FieldType::BUILT_IN {
            assert_eq!(FieldType::parse(ty.as_str()), ty);
        }
        assert_eq!(
            FieldType::parse("color"),
            FieldType::Other("color".to_string())
        );
    }

    #[test]
    fn unknown_type_deserializes() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "id": "f1", "type": "signature", "label": "Sign", "name": "sig"
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::Other("signature".into()));
        assert_eq!(serde_json::to_value(&field).unwrap()["type"], json!("signature"));
    }

    #[test]
    fn coerce_number_input() {
        assert_eq!(FieldType::Number.coerce_input("25"), json!(25));
        assert_eq!(FieldType::Number.coerce_input(" 2.5 "), json!(2.5));
        assert_eq!(FieldType::Number.coerce_input(""), json!(""));
        assert_eq!(FieldType::Number.coerce_input("abc"), json!("abc"));
        assert_eq!(FieldType::Checkbox.coerce_input("on"), json!(true));
        assert_eq!(FieldType::Switch.coerce_input("false"), json!(false));
        assert_eq!(FieldType::Text.coerce_input("25"), json!("25"));
    }

    #[test]
    fn splice_move_forward_and_back() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(splice_move(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        assert!(splice_move(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        assert!(splice_move(&mut items, 1, 1));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn splice_move_out_of_range_is_rejected() {
        let mut items = vec![1, 2];
        assert!(!splice_move(&mut items, 2, 0));
        assert!(!splice_move(&mut items, 0, 5));
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn option_helpers() {
        let mut field = FieldDescriptor::new("f", FieldType::Select, "color", "Color");
        field.add_option();
        field.add_option();
        assert_eq!(field.options[1], FieldOption::new("Option 2", "option2"));
        assert!(field.update_option(0, FieldOption::new("Red", "red")));
        assert!(!field.update_option(9, FieldOption::new("x", "x")));
        assert_eq!(field.remove_option(0).unwrap().value, "red");
        assert!(field.remove_option(5).is_none());
        assert_eq!(field.options.len(), 1);
    }

    #[test]
    fn duplicate_names_are_reported() {
        let schema = FormSchema::new("s", "S")
            .with_field(FieldDescriptor::new("1", FieldType::Text, "email", "Email"))
            .with_field(FieldDescriptor::new("2", FieldType::Text, "email", "Email again"))
            .with_field(FieldDescriptor::new("3", FieldType::Text, "name", "Name"))
            .with_field(FieldDescriptor::new("4", FieldType::Text, "email", "Third"));
        assert_eq!(schema.duplicate_names(), vec!["email"]);
    }

    #[test]
    fn schema_json_roundtrip_keeps_order() {
        let json = r#"{
            "id": "signup",
            "title": "Sign up",
            "fields": [
                {"id": "1", "type": "email", "label": "Email", "name": "email",
                 "required": true, "validation": {"required": true}},
                {"id": "2", "type": "select", "label": "Plan", "name": "plan",
                 "options": [{"label": "Free", "value": "free"}], "defaultValue": "free"}
            ]
        }"#;
        let schema = FormSchema::from_json(json).unwrap();
        assert_eq!(schema.fields[0].name, "email");
        assert_eq!(schema.fields[1].default_value, Some(json!("free")));

        let again = FormSchema::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(again.fields.len(), 2);
        assert_eq!(again.fields[1].options[0].value, "free");
    }

    #[test]
    fn untitled_schema_defaults() {
        let schema = FormSchema::untitled();
        assert_eq!(schema.title, DEFAULT_FORM_TITLE);
        assert!(schema.fields.is_empty());
        assert!(!schema.id.is_empty());
    }
}
