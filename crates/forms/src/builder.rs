//! Schema form builder: edit mode (schema authoring) and preview mode
//! (filling and submitting).

use maksudi_core::{CoreError, FieldValue, FormData};
use serde::{Deserialize, Serialize};

use crate::config::FormBuilderConfig;
use crate::render::{FieldView, RenderContext, RendererRegistry};
use crate::runner::FormState;
use crate::schema::{splice_move, FieldDescriptor, FieldOption, FieldType, FormSchema};
use crate::validate::FormErrors;

pub type SaveCallback = Box<dyn FnMut(&FormSchema)>;
pub type SubmitCallback = Box<dyn FnMut(&FormData)>;

/// Which tab the builder is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderMode {
    Edit,
    Preview,
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field passed; the data bag was handed to the submit callback.
    Submitted(FormData),
    /// At least one field failed; the error map now lists each failure.
    Rejected { error_count: usize },
}

/// Owns a [`FormSchema`] and the state of filling it in.
pub struct FormBuilder {
    schema: FormSchema,
    config: FormBuilderConfig,
    mode: BuilderMode,
    editing: Option<FieldDescriptor>,
    dragged: Option<usize>,
    state: FormState,
    registry: RendererRegistry,
    on_save: Option<SaveCallback>,
    on_submit: Option<SubmitCallback>,
}

impl FormBuilder {
    /// Create a builder. `None` starts from an empty "New Form" schema.
    pub fn new(initial_schema: Option<FormSchema>, config: FormBuilderConfig) -> Self {
        let schema = initial_schema.unwrap_or_else(FormSchema::untitled);
        let mut state = FormState::new(&config);
        state.seed_defaults(&schema.fields);
        let mode = if config.read_only {
            BuilderMode::Preview
        } else {
            BuilderMode::Edit
        };
        Self {
            schema,
            config,
            mode,
            editing: None,
            dragged: None,
            state,
            registry: RendererRegistry::with_defaults(),
            on_save: None,
            on_submit: None,
        }
    }

    pub fn on_save(mut self, callback: impl FnMut(&FormSchema) + 'static) -> Self {
        self.on_save = Some(Box::new(callback));
        self
    }

    pub fn on_submit(mut self, callback: impl FnMut(&FormData) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn config(&self) -> &FormBuilderConfig {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut RendererRegistry {
        &mut self.registry
    }

    // -----------------------------------------------------------------------
    // Mode
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> BuilderMode {
        self.mode
    }

    /// Switch tabs. Edit mode is unavailable when read-only.
    pub fn set_mode(&mut self, mode: BuilderMode) -> bool {
        if mode == BuilderMode::Edit && self.config.read_only {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Hand the current schema to the save callback. No-op when read-only.
    pub fn save(&mut self) -> bool {
        if self.config.read_only {
            return false;
        }
        tracing::debug!(schema = %self.schema.id, fields = self.schema.fields.len(), "Saving schema");
        if let Some(cb) = self.on_save.as_mut() {
            cb(&self.schema);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Schema editing
    // -----------------------------------------------------------------------

    fn ensure_editable(&self) -> Result<(), CoreError> {
        if self.config.read_only {
            return Err(CoreError::Forbidden("form is read-only".to_string()));
        }
        Ok(())
    }

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> Result<(), CoreError> {
        if !self.config.reject_duplicate_names {
            return Ok(());
        }
        let taken = self
            .schema
            .fields
            .iter()
            .any(|f| f.name == name && Some(f.id.as_str()) != except_id);
        if taken {
            return Err(CoreError::Conflict(format!(
                "Field name '{name}' is already used"
            )));
        }
        Ok(())
    }

    /// `field_<n+1>` for a schema of `n` fields. In strict mode a name that
    /// is already taken (possible after a removal) gives way to the lowest
    /// free `field_<k>`.
    fn next_field_name(&self) -> String {
        let name = format!("field_{}", self.schema.fields.len() + 1);
        let taken = |candidate: &str| self.schema.field_by_name(candidate).is_some();
        if !self.config.reject_duplicate_names || !taken(&name) {
            return name;
        }
        (1..)
            .map(|k| format!("field_{k}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or(name)
    }

    /// Append a new field of `field_type` and open it for editing.
    ///
    /// Select and radio fields start with two placeholder options.
    pub fn add_field(&mut self, field_type: FieldType) -> Result<&FieldDescriptor, CoreError> {
        self.ensure_editable()?;
        let name = self.next_field_name();
        self.ensure_unique_name(&name, None)?;

        let mut field = FieldDescriptor::new(
            uuid::Uuid::new_v4().to_string(),
            field_type.clone(),
            name,
            format!("New {} field", field_type.as_str()),
        );
        if field_type.has_options() {
            field.options = vec![FieldOption::placeholder(1), FieldOption::placeholder(2)];
        }
        tracing::debug!(field_id = %field.id, field_type = field_type.as_str(), "Added field");

        self.editing = Some(field.clone());
        self.schema.fields.push(field);
        self.fields_changed();
        Ok(&self.schema.fields[self.schema.fields.len() - 1])
    }

    /// Replace the stored field with the same id.
    pub fn update_field(&mut self, field: FieldDescriptor) -> Result<(), CoreError> {
        self.ensure_editable()?;
        let index = self
            .schema
            .position(&field.id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "field",
                id: field.id.clone(),
            })?;
        self.ensure_unique_name(&field.name, Some(&field.id))?;

        tracing::debug!(field_id = %field.id, "Updated field");
        self.schema.fields[index] = field;
        self.editing = None;
        self.fields_changed();
        Ok(())
    }

    /// Delete the field with `id`. Returns `false` if there was none.
    pub fn remove_field(&mut self, id: &str) -> Result<bool, CoreError> {
        self.ensure_editable()?;
        let before = self.schema.fields.len();
        self.schema.fields.retain(|f| f.id != id);
        if self.editing.as_ref().is_some_and(|f| f.id == id) {
            self.editing = None;
        }
        let removed = self.schema.fields.len() != before;
        if removed {
            tracing::debug!(field_id = id, "Removed field");
            self.fields_changed();
        }
        Ok(removed)
    }

    /// Move the field at `from` to position `to`.
    pub fn move_field(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.ensure_editable()?;
        if !splice_move(&mut self.schema.fields, from, to) {
            return Err(CoreError::Validation(format!(
                "Cannot move field {from} to {to}: schema has {} fields",
                self.schema.fields.len()
            )));
        }
        self.fields_changed();
        Ok(())
    }

    /// Password fields (other than `field_id`) a confirmation may match.
    pub fn match_field_candidates(&self, field_id: &str) -> Vec<&FieldDescriptor> {
        self.schema
            .fields
            .iter()
            .filter(|f| f.id != field_id && f.field_type == FieldType::Password)
            .collect()
    }

    fn fields_changed(&mut self) {
        self.state.seed_defaults(&self.schema.fields);
    }

    // -----------------------------------------------------------------------
    // Edit draft
    // -----------------------------------------------------------------------

    /// Open a draft copy of the field with `id`.
    pub fn begin_edit(&mut self, id: &str) -> Result<&mut FieldDescriptor, CoreError> {
        self.ensure_editable()?;
        let field = self.schema.field(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "field",
            id: id.to_string(),
        })?;
        Ok(self.editing.insert(field))
    }

    pub fn editing(&self) -> Option<&FieldDescriptor> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut FieldDescriptor> {
        self.editing.as_mut()
    }

    /// Discard the draft.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Write the draft back into the schema.
    pub fn commit_edit(&mut self) -> Result<(), CoreError> {
        let draft = self
            .editing
            .clone()
            .ok_or_else(|| CoreError::Validation("No field is being edited".to_string()))?;
        self.update_field(draft)
    }

    // -----------------------------------------------------------------------
    // Drag reordering
    // -----------------------------------------------------------------------

    pub fn drag_start(&mut self, index: usize) {
        if index < self.schema.fields.len() && !self.config.read_only {
            self.dragged = Some(index);
        }
    }

    /// The dragged field passes over `index`: move it there and keep
    /// tracking it at its new position.
    pub fn drag_over(&mut self, index: usize) {
        let Some(from) = self.dragged else {
            return;
        };
        if from == index {
            return;
        }
        if self.move_field(from, index).is_ok() {
            self.dragged = Some(index);
        }
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    // -----------------------------------------------------------------------
    // Preview / run mode
    // -----------------------------------------------------------------------

    pub fn data(&self) -> &FormData {
        self.state.data()
    }

    pub fn errors(&self) -> &FormErrors {
        self.state.errors()
    }

    /// Set the value of the first field named `name`.
    ///
    /// Returns `false` if no field has that name.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.schema.field_by_name(name) {
            Some(field) => {
                self.state.change(field, value.into());
                true
            }
            None => false,
        }
    }

    /// Set a value from raw text, coerced by the field's type.
    pub fn set_input(&mut self, name: &str, raw: &str) -> bool {
        match self.schema.field_by_name(name) {
            Some(field) => {
                let value = field.field_type.coerce_input(raw);
                self.state.change(field, value);
                true
            }
            None => false,
        }
    }

    /// The field named `name` lost focus.
    pub fn blur(&mut self, name: &str) -> bool {
        match self.schema.field_by_name(name) {
            Some(field) => {
                self.state.blur(field);
                true
            }
            None => false,
        }
    }

    /// Re-validate all fields. Returns `true` iff none failed.
    pub fn validate_form(&mut self) -> bool {
        self.state.validate_form(&self.schema.fields)
    }

    /// Validate everything and, if clean, hand the data to the submit
    /// callback.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.validate_form() {
            let error_count = self.state.errors().len();
            tracing::debug!(error_count, "Submit rejected");
            return SubmitOutcome::Rejected { error_count };
        }
        let data = self.state.data().clone();
        if let Some(cb) = self.on_submit.as_mut() {
            cb(&data);
        }
        SubmitOutcome::Submitted(data)
    }

    /// Clear entered values and errors, re-seeding defaults.
    pub fn reset_data(&mut self) {
        self.state.reset(&self.schema.fields);
    }

    /// Render every field in schema order.
    pub fn render(&self) -> Vec<FieldView> {
        self.schema
            .fields
            .iter()
            .map(|field| {
                let ctx = RenderContext {
                    value: self.state.value(&field.name),
                    error: self.state.errors().get(&field.name),
                    form_read_only: self.config.read_only,
                };
                self.registry.render(field, &ctx)
            })
            .collect()
    }
}

impl std::fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormBuilder")
            .field("schema", &self.schema.id)
            .field("fields", &self.schema.fields.len())
            .field("mode", &self.mode)
            .field("editing", &self.editing.as_ref().map(|f| &f.id))
            .field("dragged", &self.dragged)
            .finish()
    }
}
