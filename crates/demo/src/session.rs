//! Scripted sessions over the form engine and the step controller.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use maksudi_core::FormData;
use maksudi_forms::{FormBuilder, FormBuilderConfig, FormErrors, FormSchema, SubmitOutcome};
use maksudi_stepper::{FormStep, Navigation, StepContext, StepController, Validity};
use serde::Serialize;

use crate::config::DemoConfig;

/// Signup form used when no schema file is configured.
pub const BUILT_IN_SCHEMA: &str = include_str!("../fixtures/signup.json");

/// Answers used when no data file is configured.
pub const BUILT_IN_ANSWERS: &str = include_str!("../fixtures/answers.json");

pub fn load_schema(config: &DemoConfig) -> anyhow::Result<FormSchema> {
    let json = match &config.schema_path {
        Some(path) => read(path)?,
        None => BUILT_IN_SCHEMA.to_string(),
    };
    FormSchema::from_json(&json).context("Failed to parse form schema")
}

pub fn load_answers(config: &DemoConfig) -> anyhow::Result<FormData> {
    let json = match &config.data_path {
        Some(path) => read(path)?,
        None => BUILT_IN_ANSWERS.to_string(),
    };
    serde_json::from_str(&json).context("Answers must be a JSON object")
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub form: String,
    pub valid: bool,
    pub errors: FormErrors,
    /// Answer keys that no field of the schema is named after.
    pub unknown_fields: Vec<String>,
}

/// Fill a read-only preview of `schema` with `answers` and submit it.
pub fn validate_answers(
    schema: FormSchema,
    answers: &FormData,
    config: &DemoConfig,
) -> ValidationReport {
    let form_config = FormBuilderConfig::default()
        .read_only(true)
        .validate_on_change(config.validate_on_change)
        .validate_on_blur(config.validate_on_blur);
    let form = schema.title.clone();
    let mut builder = FormBuilder::new(Some(schema), form_config);

    let mut unknown_fields = Vec::new();
    for (name, value) in answers {
        if builder.set_value(name, value.clone()) {
            builder.blur(name);
        } else {
            unknown_fields.push(name.clone());
        }
    }
    if !unknown_fields.is_empty() {
        tracing::warn!(fields = ?unknown_fields, "Answers contain fields the form does not have");
    }

    let valid = matches!(builder.submit(), SubmitOutcome::Submitted(_));
    tracing::info!(form = %form, valid, errors = builder.errors().len(), "Form validated");
    ValidationReport {
        form,
        valid,
        errors: builder.errors().clone(),
        unknown_fields,
    }
}

// ---------------------------------------------------------------------------
// Step session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct WizardTranscript {
    pub events: Vec<String>,
    /// Data handed to the completion callback, if the session completed.
    pub completed: Option<FormData>,
}

const ACCOUNT_KEYS: [&str; 2] = ["name", "email"];

fn account_complete(data: &FormData) -> Validity {
    let present = |key: &str| {
        data.get(key)
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.trim().is_empty())
    };
    if ACCOUNT_KEYS.iter().all(|key| present(key)) {
        Validity::valid()
    } else {
        Validity::invalid("Name and email are required")
    }
}

fn pick(answers: &FormData, keys: &[&str]) -> FormData {
    keys.iter()
        .filter_map(|&key| answers.get(key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Walk a three-step account wizard (account, plan, review) with
/// `answers`, logging every navigation and validity event.
pub fn replay_wizard(answers: &FormData) -> anyhow::Result<WizardTranscript> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let completed = Rc::new(RefCell::new(None));

    let steps = vec![
        FormStep::new("account").with_validator(account_complete),
        FormStep::new("plan"),
        FormStep::manual("review"),
    ];
    let step_log = Rc::clone(&events);
    let validity_log = Rc::clone(&events);
    let sink = Rc::clone(&completed);
    let mut controller = StepController::builder(steps)
        .on_step_change(move |from, to| {
            step_log.borrow_mut().push(format!("step {from} -> {to}"));
        })
        .on_validity_change(move |step, valid| {
            validity_log
                .borrow_mut()
                .push(format!("step {step} valid={valid}"));
        })
        .on_complete(move |data| *sink.borrow_mut() = Some(data.clone()))
        .build()
        .context("Failed to build wizard")?;

    let navigate = |controller: &mut StepController<&'static str>, label: &str| {
        let outcome = match controller.next_step() {
            Navigation::Moved { to, .. } => {
                format!("moved to {}", controller.content(to).unwrap_or(&"?"))
            }
            Navigation::Completed => "completed".to_string(),
            Navigation::Blocked => match controller.validation_message() {
                Some(message) => format!("blocked: {message}"),
                None => "blocked".to_string(),
            },
            Navigation::Ignored => "ignored".to_string(),
        };
        events.borrow_mut().push(format!("{label}: {outcome}"));
    };

    navigate(&mut controller, "next");
    controller.update_form_data(pick(answers, &ACCOUNT_KEYS));
    navigate(&mut controller, "next");
    controller.update_form_data(pick(answers, &["plan"]));
    navigate(&mut controller, "next");
    navigate(&mut controller, "next");
    let review = controller.current_step();
    controller.set_step_validity(review, true);
    navigate(&mut controller, "confirm");

    let events = events.borrow().clone();
    let completed = completed.borrow_mut().take();
    Ok(WizardTranscript { events, completed })
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub validation: ValidationReport,
    pub wizard: WizardTranscript,
}

pub fn run(config: &DemoConfig) -> anyhow::Result<DemoReport> {
    let schema = load_schema(config)?;
    let answers = load_answers(config)?;
    tracing::debug!(fields = schema.fields.len(), answers = answers.len(), "Loaded inputs");
    let validation = validate_answers(schema, &answers, config);
    let wizard = replay_wizard(&answers)?;
    Ok(DemoReport { validation, wizard })
}
