//! Field rendering dispatch.
//!
//! A [`RendererRegistry`] maps a field-type tag to a [`FieldRenderer`]
//! strategy that produces a headless [`FieldView`]. Types with no
//! registered renderer produce [`Control::Unsupported`] instead of failing,
//! so one bad field never takes down the whole form.

use std::collections::HashMap;
use std::sync::Arc;

use maksudi_core::FieldValue;
use serde::Serialize;

use crate::schema::{FieldDescriptor, FieldOption, FieldType};

/// Placeholder shown by an empty select.
pub const SELECT_PLACEHOLDER: &str = "Select an option";

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Per-render inputs that are not part of the descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub value: Option<&'a FieldValue>,
    pub error: Option<&'a str>,
    /// The whole form is read-only; every control is disabled.
    pub form_read_only: bool,
}

/// Everything a UI layer needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub id: String,
    pub name: String,
    pub label: String,
    pub required_marker: bool,
    pub description: Option<String>,
    pub class_name: Option<String>,
    pub disabled: bool,
    pub read_only: bool,
    pub error: Option<String>,
    pub control: Control,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    /// Single-line input; `input_type` is the HTML-style input type.
    Input {
        input_type: String,
        placeholder: Option<String>,
        value: String,
    },
    TextArea {
        placeholder: Option<String>,
        value: String,
    },
    RichText {
        placeholder: Option<String>,
        value: String,
    },
    Select {
        placeholder: String,
        options: Vec<FieldOption>,
        selected: Option<String>,
    },
    Checkbox {
        checked: bool,
    },
    Switch {
        checked: bool,
    },
    Radio {
        choices: Vec<RadioChoice>,
    },
    Date {
        value: String,
    },
    Unsupported {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioChoice {
    /// `<field id>_<option value>`.
    pub id: String,
    pub label: String,
    pub value: String,
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Builds the control for one field type.
pub trait FieldRenderer: Send + Sync {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control;
}

impl<F> FieldRenderer for F
where
    F: Fn(&FieldDescriptor, &RenderContext<'_>) -> Control + Send + Sync,
{
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        self(field, ctx)
    }
}

/// Text shown in a text-like control: strings as-is, numbers formatted,
/// everything else blank.
pub fn display_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::String(s)) => s.clone(),
        Some(FieldValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn is_checked(value: Option<&FieldValue>) -> bool {
    value.and_then(FieldValue::as_bool).unwrap_or(false)
}

struct TextInput;

impl FieldRenderer for TextInput {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::Input {
            input_type: field.field_type.as_str().to_string(),
            placeholder: field.placeholder.clone(),
            value: display_text(ctx.value),
        }
    }
}

struct TextAreaInput;

impl FieldRenderer for TextAreaInput {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::TextArea {
            placeholder: field.placeholder.clone(),
            value: display_text(ctx.value),
        }
    }
}

struct RichTextInput;

impl FieldRenderer for RichTextInput {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::RichText {
            placeholder: field.placeholder.clone(),
            value: display_text(ctx.value),
        }
    }
}

struct SelectInput;

impl FieldRenderer for SelectInput {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        let selected = ctx
            .value
            .and_then(FieldValue::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Control::Select {
            placeholder: field
                .placeholder
                .clone()
                .unwrap_or_else(|| SELECT_PLACEHOLDER.to_string()),
            options: field.options.clone(),
            selected,
        }
    }
}

struct CheckboxInput;

impl FieldRenderer for CheckboxInput {
    fn control(&self, _field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::Checkbox {
            checked: is_checked(ctx.value),
        }
    }
}

struct SwitchInput;

impl FieldRenderer for SwitchInput {
    fn control(&self, _field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::Switch {
            checked: is_checked(ctx.value),
        }
    }
}

struct RadioInput;

impl FieldRenderer for RadioInput {
    fn control(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        let current = ctx.value.and_then(FieldValue::as_str);
        Control::Radio {
            choices: field
                .options
                .iter()
                .map(|opt| RadioChoice {
                    id: format!("{}_{}", field.id, opt.value),
                    label: opt.label.clone(),
                    value: opt.value.clone(),
                    checked: current == Some(opt.value.as_str()),
                })
                .collect(),
        }
    }
}

struct DateInput;

impl FieldRenderer for DateInput {
    fn control(&self, _field: &FieldDescriptor, ctx: &RenderContext<'_>) -> Control {
        Control::Date {
            value: display_text(ctx.value),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Type tag to renderer map.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn FieldRenderer>>,
}

impl RendererRegistry {
    /// An empty registry; every field renders as unsupported.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry covering every built-in [`FieldType`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for ty in [
            FieldType::Text,
            FieldType::Number,
            FieldType::Email,
            FieldType::Password,
        ] {
            registry.register(ty.as_str(), TextInput);
        }
        registry.register(FieldType::Textarea.as_str(), TextAreaInput);
        registry.register(FieldType::Richtext.as_str(), RichTextInput);
        registry.register(FieldType::Select.as_str(), SelectInput);
        registry.register(FieldType::Checkbox.as_str(), CheckboxInput);
        registry.register(FieldType::Switch.as_str(), SwitchInput);
        registry.register(FieldType::Radio.as_str(), RadioInput);
        registry.register(FieldType::Date.as_str(), DateInput);
        registry
    }

    /// Register (or replace) the renderer for a type tag.
    pub fn register(&mut self, type_tag: impl Into<String>, renderer: impl FieldRenderer + 'static) {
        self.renderers.insert(type_tag.into(), Arc::new(renderer));
    }

    pub fn supports(&self, field_type: &FieldType) -> bool {
        self.renderers.contains_key(field_type.as_str())
    }

    pub fn render(&self, field: &FieldDescriptor, ctx: &RenderContext<'_>) -> FieldView {
        let control = match self.renderers.get(field.field_type.as_str()) {
            Some(renderer) => renderer.control(field, ctx),
            None => {
                tracing::warn!(
                    field = %field.name,
                    field_type = field.field_type.as_str(),
                    "No renderer for field type -- rendering placeholder"
                );
                Control::Unsupported {
                    message: format!("Unsupported field type: {}", field.field_type.as_str()),
                }
            }
        };
        FieldView {
            id: field.id.clone(),
            name: field.name.clone(),
            label: field.label.clone(),
            required_marker: field.required,
            description: field.description.clone(),
            class_name: field.class_name.clone(),
            disabled: field.disabled || ctx.form_read_only,
            read_only: field.read_only,
            error: ctx.error.filter(|e| !e.is_empty()).map(str::to_string),
            control,
        }
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("RendererRegistry").field("types", &tags).finish()
    }
}
