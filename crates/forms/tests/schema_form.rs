//! Integration tests for the schema form engine: rule evaluation through
//! field descriptors, the submit gate, and live-validation behaviour.

use assert_matches::assert_matches;
use maksudi_core::{form_data, FormData, ValidationRuleSet};
use maksudi_forms::{
    validate_field, FieldDescriptor, FieldType, FormBuilder, FormBuilderConfig, FormSchema,
    SubmitOutcome,
};
use serde_json::json;

fn text_field(name: &str, label: &str, rules: ValidationRuleSet) -> FieldDescriptor {
    FieldDescriptor::new(format!("id-{name}"), FieldType::Text, name, label).with_validation(rules)
}

fn password_schema() -> FormSchema {
    FormSchema::new("pw", "Password")
        .with_field(
            FieldDescriptor::new("1", FieldType::Password, "password", "Password")
                .with_validation(ValidationRuleSet::required()),
        )
        .with_field(
            FieldDescriptor::new("2", FieldType::Password, "confirmPassword", "Confirm password")
                .with_validation(ValidationRuleSet::required().matching("password")),
        )
}

// ---------------------------------------------------------------------------
// Test: required rule
// ---------------------------------------------------------------------------

#[test]
fn required_rule_rejects_empty_and_accepts_value() {
    let field = text_field("name", "Name", ValidationRuleSet::required());
    let empty = FormData::new();
    assert!(validate_field(&field, Some(&json!("")), &empty).is_some());
    assert!(validate_field(&field, Some(&json!("x")), &empty).is_none());
}

// ---------------------------------------------------------------------------
// Test: match rule
// ---------------------------------------------------------------------------

#[test]
fn match_rule_compares_with_other_field() {
    let confirm = text_field("confirm", "Confirm", ValidationRuleSet::default().matching("password"));
    let data = form_data(json!({"password": "secret"}));
    assert!(validate_field(&confirm, Some(&json!("secret")), &data).is_none());
    assert!(validate_field(&confirm, Some(&json!("wrong")), &data).is_some());
}

// ---------------------------------------------------------------------------
// Test: form-level gate
// ---------------------------------------------------------------------------

#[test]
fn validate_form_populates_and_clears_errors() {
    let schema = FormSchema::new("s", "S")
        .with_field(text_field("name", "Name", ValidationRuleSet::required()))
        .with_field(text_field(
            "code",
            "Code",
            ValidationRuleSet::default().with_pattern("^[A-Z]{3}$"),
        ));
    let mut builder = FormBuilder::new(Some(schema), FormBuilderConfig::default());

    builder.set_value("code", "abc");
    assert!(!builder.validate_form());
    assert_eq!(builder.errors().len(), 2);

    builder.set_value("name", "Ann");
    builder.set_value("code", "ABC");
    assert!(builder.validate_form());
    assert!(builder.errors().is_empty());
}

#[test]
fn validate_form_reports_only_failing_fields() {
    let schema = FormSchema::new("s", "S")
        .with_field(text_field("name", "Name", ValidationRuleSet::required()))
        .with_field(text_field("nick", "Nick", ValidationRuleSet::default()));
    let mut builder = FormBuilder::new(Some(schema), FormBuilderConfig::default());
    builder.set_value("nick", "annie");
    assert!(!builder.validate_form());
    assert!(builder.errors().has_error("name"));
    assert!(!builder.errors().has_error("nick"));
}

// ---------------------------------------------------------------------------
// Test: numeric bounds on submit
// ---------------------------------------------------------------------------

#[test]
fn age_bounds_gate_submission() {
    let schema = FormSchema::new("age", "Age").with_field(
        FieldDescriptor::new("1", FieldType::Number, "age", "Age")
            .with_validation(ValidationRuleSet::default().with_range(Some(18.0), Some(99.0))),
    );
    let mut builder = FormBuilder::new(Some(schema), FormBuilderConfig::default());

    builder.set_value("age", 15);
    assert_matches!(builder.submit(), SubmitOutcome::Rejected { error_count: 1 });
    let message = builder.errors().get("age").unwrap();
    assert!(message.contains("18"), "unexpected message: {message}");

    builder.set_value("age", 25);
    assert_matches!(builder.submit(), SubmitOutcome::Submitted(_));
    assert!(builder.errors().is_empty());
}

// ---------------------------------------------------------------------------
// Test: stale cross-field error until re-triggered
// ---------------------------------------------------------------------------

#[test]
fn confirm_error_is_stale_until_retriggered() {
    let mut builder = FormBuilder::new(Some(password_schema()), FormBuilderConfig::default());

    builder.set_value("password", "abc123");
    builder.set_value("confirmPassword", "abc123");
    assert!(!builder.errors().has_error("confirmPassword"));

    // Changing the password does not re-check the confirmation.
    builder.set_value("password", "xyz999");
    assert!(!builder.errors().has_error("confirmPassword"));

    // Blurring the confirmation re-checks it.
    builder.blur("confirmPassword");
    assert_eq!(
        builder.errors().get("confirmPassword"),
        Some("Confirm password does not match password")
    );

    // Matching again clears it on change.
    builder.set_value("confirmPassword", "xyz999");
    assert!(!builder.errors().has_error("confirmPassword"));
}

#[test]
fn submit_catches_stale_confirmation() {
    let mut builder = FormBuilder::new(Some(password_schema()), FormBuilderConfig::default());
    builder.set_value("password", "abc123");
    builder.set_value("confirmPassword", "abc123");
    builder.set_value("password", "xyz999");

    assert!(!builder.validate_form());
    assert!(builder.errors().has_error("confirmPassword"));
}

// ---------------------------------------------------------------------------
// Test: schema loaded from JSON
// ---------------------------------------------------------------------------

#[test]
fn json_schema_with_unknown_type_still_runs() {
    let schema = FormSchema::from_json(
        r#"{
            "id": "contact",
            "title": "Contact",
            "fields": [
                {"id": "1", "type": "email", "label": "Email", "name": "email",
                 "required": true, "validation": {"required": true}},
                {"id": "2", "type": "hologram", "label": "Hologram", "name": "holo"}
            ]
        }"#,
    )
    .unwrap();
    let mut builder = FormBuilder::new(Some(schema), FormBuilderConfig::default());
    let views = builder.render();
    assert_eq!(views.len(), 2);

    builder.set_value("email", "ann@example.com");
    assert_matches!(builder.submit(), SubmitOutcome::Submitted(ref data) if data.len() == 1);
}

#[test]
fn blur_only_configuration() {
    let schema = FormSchema::new("s", "S")
        .with_field(text_field("name", "Name", ValidationRuleSet::required()));
    let config = FormBuilderConfig::default().validate_on_change(false);
    let mut builder = FormBuilder::new(Some(schema), config);

    builder.set_value("name", "");
    assert!(builder.errors().is_empty());
    builder.blur("name");
    assert!(builder.errors().has_error("name"));
}
