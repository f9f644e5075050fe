//! Multi-step form controller.
//!
//! States are step indices `0..total`. Transitions:
//!
//! | Action      | Guard                               | Effect                       |
//! |-------------|-------------------------------------|------------------------------|
//! | `prev`      | `current > 0`                       | `current - 1`                |
//! | `next`      | `current < last`, current valid     | `current + 1`                |
//! | `next`      | `current == last`, current valid    | `on_complete(data)`, no move |
//! | `go_to(m)`  | `m < total` (validity not checked)  | `m`                          |
//!
//! Completion does not lock or reset the controller; calling `next` again
//! on the last step completes again.

use std::collections::{BTreeMap, HashMap};

use maksudi_core::{merge_shallow, CoreError, FormData};

use crate::config::StepperConfig;
use crate::context::StepContext;
use crate::effects::{NoopAnimator, StepTransition, TransitionAnimator};
use crate::indicator::ControllerView;
use crate::step::{validator, FormStep, StepValidator, ValidityHook, ValidityPolicy, Validity};

pub type CompleteCallback = Box<dyn FnMut(&FormData)>;
pub type StepChangeCallback = Box<dyn FnMut(usize, usize)>;
pub type ValidityChangeCallback = Box<dyn FnMut(usize, bool)>;

/// What a navigation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved { from: usize, to: usize },
    /// `next` on the last step invoked the completion callback.
    Completed,
    /// The current step is not valid.
    Blocked,
    /// Out of range, or already at the boundary.
    Ignored,
}

// ---------------------------------------------------------------------------
// Core state
// ---------------------------------------------------------------------------

struct StepSlot {
    validator: Option<StepValidator>,
    policy: ValidityPolicy,
    on_validity_change: Option<ValidityHook>,
    /// Latest message from this step's validator.
    message: Option<String>,
}

/// Everything except the step contents. This is the [`StepContext`] that
/// steps see.
pub struct ControllerCore {
    current: usize,
    data: FormData,
    initial_data: FormData,
    validity: BTreeMap<usize, bool>,
    slots: Vec<StepSlot>,
    validators: HashMap<usize, StepValidator>,
    config: StepperConfig,
    on_complete: Option<CompleteCallback>,
    on_step_change: Option<StepChangeCallback>,
    on_validity_change: Option<ValidityChangeCallback>,
    animator: Box<dyn TransitionAnimator>,
}

impl ControllerCore {
    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Why the current step is invalid, if its validator said.
    ///
    /// A controller-level validator for the step is authoritative here as
    /// well; the step's own message is not consulted.
    pub fn validation_message(&self) -> Option<String> {
        if let Some(check) = self.validators.get(&self.current) {
            let Validity { valid, message } = check(&self.data);
            return if valid { None } else { message };
        }
        if self.is_step_valid(self.current) {
            return None;
        }
        self.slots[self.current].message.clone()
    }

    /// Stored validity for `step`, ignoring controller-level validators.
    pub fn recorded_validity(&self, step: usize) -> Option<bool> {
        self.validity.get(&step).copied()
    }

    fn move_to(&mut self, to: usize) -> Navigation {
        let from = self.current;
        self.current = to;
        tracing::debug!(from, to, "Step changed");
        if let Some(cb) = self.on_step_change.as_mut() {
            cb(from, to);
        }
        if from != to {
            self.animator
                .animate(&StepTransition::new(from, to, self.config.animation_variant));
            self.mount_current();
        }
        Navigation::Moved { from, to }
    }

    /// The current step just became visible.
    fn mount_current(&mut self) {
        let slot = &self.slots[self.current];
        if slot.validator.is_some() {
            self.sync_current_validity();
        } else if slot.policy == ValidityPolicy::DefaultValid {
            self.record_validity(self.current, true);
        }
    }

    /// Re-run the current step's own validator and record the result if it
    /// differs from what is stored.
    fn sync_current_validity(&mut self) {
        let step = self.current;
        let Some(check) = self.slots[step].validator.as_ref() else {
            return;
        };
        let Validity { valid, message } = check(&self.data);
        self.slots[step].message = if valid { None } else { message };
        self.record_validity(step, valid);
    }

    fn record_validity(&mut self, step: usize, valid: bool) -> bool {
        if self.validity.get(&step) == Some(&valid) {
            return false;
        }
        self.validity.insert(step, valid);
        tracing::debug!(step, valid, "Step validity changed");
        if let Some(hook) = self.slots[step].on_validity_change.as_mut() {
            hook(valid);
        }
        if let Some(cb) = self.on_validity_change.as_mut() {
            cb(step, valid);
        }
        true
    }

    fn reset(&mut self) {
        self.current = 0;
        self.data = self.initial_data.clone();
        self.validity.clear();
        for slot in &mut self.slots {
            slot.message = None;
        }
        tracing::debug!("Step controller reset");
        self.mount_current();
    }
}

impl StepContext for ControllerCore {
    fn current_step(&self) -> usize {
        self.current
    }

    fn total_steps(&self) -> usize {
        self.slots.len()
    }

    fn go_to_step(&mut self, step: usize) -> Navigation {
        if step >= self.total_steps() {
            tracing::warn!(step, total = self.total_steps(), "Ignoring out-of-range step jump");
            return Navigation::Ignored;
        }
        self.move_to(step)
    }

    fn next_step(&mut self) -> Navigation {
        let current = self.current;
        if !self.is_step_valid(current) {
            tracing::debug!(step = current, "Next blocked by invalid step");
            return Navigation::Blocked;
        }
        if current + 1 < self.total_steps() {
            return self.move_to(current + 1);
        }
        tracing::debug!(step = current, "Form completed");
        if let Some(cb) = self.on_complete.as_mut() {
            cb(&self.data);
        }
        Navigation::Completed
    }

    fn prev_step(&mut self) -> Navigation {
        if self.current == 0 {
            return Navigation::Ignored;
        }
        self.move_to(self.current - 1)
    }

    fn form_data(&self) -> &FormData {
        &self.data
    }

    fn update_form_data(&mut self, partial: FormData) {
        tracing::debug!(keys = partial.len(), "Merging form data");
        merge_shallow(&mut self.data, partial);
        self.sync_current_validity();
    }

    fn is_step_valid(&self, step: usize) -> bool {
        match self.validators.get(&step) {
            Some(check) => check(&self.data).valid,
            None => self.validity.get(&step).copied().unwrap_or(false),
        }
    }

    fn set_step_validity(&mut self, step: usize, valid: bool) -> bool {
        if step >= self.total_steps() {
            tracing::warn!(step, "Ignoring validity for unknown step");
            return false;
        }
        self.record_validity(step, valid)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the steps of one multi-step form and navigates between them.
///
/// Exactly one step is current. The controller implements
/// [`StepContext`]; step code can also get at it through
/// [`dispatch`](StepController::dispatch).
pub struct StepController<S> {
    contents: Vec<S>,
    core: ControllerCore,
}

impl<S> StepController<S> {
    pub fn builder(steps: Vec<FormStep<S>>) -> StepControllerBuilder<S> {
        StepControllerBuilder::new(steps)
    }

    pub fn current_content(&self) -> &S {
        &self.contents[self.core.current]
    }

    pub fn content(&self, step: usize) -> Option<&S> {
        self.contents.get(step)
    }

    /// Run `f` with the current step's content and the context.
    pub fn dispatch<R>(&mut self, f: impl FnOnce(&mut S, &mut dyn StepContext) -> R) -> R {
        let content = &mut self.contents[self.core.current];
        f(content, &mut self.core)
    }

    pub fn context(&mut self) -> &mut dyn StepContext {
        &mut self.core
    }

    pub fn core(&self) -> &ControllerCore {
        &self.core
    }

    pub fn config(&self) -> &StepperConfig {
        self.core.config()
    }

    pub fn validation_message(&self) -> Option<String> {
        self.core.validation_message()
    }

    /// Back to the first step with the initial data and no recorded
    /// validity. Only happens when the caller asks for it.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    pub fn view(&self) -> ControllerView {
        ControllerView::of(&self.core)
    }
}

impl<S> StepContext for StepController<S> {
    fn current_step(&self) -> usize {
        self.core.current_step()
    }

    fn total_steps(&self) -> usize {
        self.core.total_steps()
    }

    fn go_to_step(&mut self, step: usize) -> Navigation {
        self.core.go_to_step(step)
    }

    fn next_step(&mut self) -> Navigation {
        self.core.next_step()
    }

    fn prev_step(&mut self) -> Navigation {
        self.core.prev_step()
    }

    fn form_data(&self) -> &FormData {
        self.core.form_data()
    }

    fn update_form_data(&mut self, partial: FormData) {
        self.core.update_form_data(partial)
    }

    fn is_step_valid(&self, step: usize) -> bool {
        self.core.is_step_valid(step)
    }

    fn set_step_validity(&mut self, step: usize, valid: bool) -> bool {
        self.core.set_step_validity(step, valid)
    }
}

impl<S> std::fmt::Debug for StepController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepController")
            .field("current", &self.core.current)
            .field("total", &self.contents.len())
            .field("validity", &self.core.validity)
            .field("config", &self.core.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct StepControllerBuilder<S> {
    steps: Vec<FormStep<S>>,
    initial_data: FormData,
    validators: HashMap<usize, StepValidator>,
    config: StepperConfig,
    on_complete: Option<CompleteCallback>,
    on_step_change: Option<StepChangeCallback>,
    on_validity_change: Option<ValidityChangeCallback>,
    animator: Box<dyn TransitionAnimator>,
}

impl<S> StepControllerBuilder<S> {
    fn new(steps: Vec<FormStep<S>>) -> Self {
        Self {
            steps,
            initial_data: FormData::new(),
            validators: HashMap::new(),
            config: StepperConfig::default(),
            on_complete: None,
            on_step_change: None,
            on_validity_change: None,
            animator: Box::new(NoopAnimator),
        }
    }

    pub fn initial_data(mut self, data: FormData) -> Self {
        self.initial_data = data;
        self
    }

    /// Register an authoritative validator for `step`. Its result is
    /// computed on demand and bypasses stored validity.
    pub fn validator<F, V>(mut self, step: usize, f: F) -> Self
    where
        F: Fn(&FormData) -> V + 'static,
        V: Into<Validity>,
    {
        self.validators.insert(step, validator(f));
        self
    }

    pub fn config(mut self, config: StepperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut(&FormData) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_step_change(mut self, callback: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_step_change = Some(Box::new(callback));
        self
    }

    pub fn on_validity_change(mut self, callback: impl FnMut(usize, bool) + 'static) -> Self {
        self.on_validity_change = Some(Box::new(callback));
        self
    }

    pub fn animator(mut self, animator: impl TransitionAnimator + 'static) -> Self {
        self.animator = Box::new(animator);
        self
    }

    /// Build the controller and mount the first step.
    pub fn build(self) -> Result<StepController<S>, CoreError> {
        if self.steps.is_empty() {
            return Err(CoreError::Validation(
                "A step controller needs at least one step".to_string(),
            ));
        }
        let total = self.steps.len();
        if let Some(&step) = self.validators.keys().find(|&&step| step >= total) {
            tracing::warn!(step, total, "Validator registered for a step that does not exist");
        }

        let mut contents = Vec::with_capacity(total);
        let mut slots = Vec::with_capacity(total);
        for step in self.steps {
            contents.push(step.content);
            slots.push(StepSlot {
                validator: step.validator,
                policy: step.policy,
                on_validity_change: step.on_validity_change,
                message: None,
            });
        }

        let mut core = ControllerCore {
            current: 0,
            data: self.initial_data.clone(),
            initial_data: self.initial_data,
            validity: BTreeMap::new(),
            slots,
            validators: self.validators,
            config: self.config,
            on_complete: self.on_complete,
            on_step_change: self.on_step_change,
            on_validity_change: self.on_validity_change,
            animator: self.animator,
        };
        core.mount_current();
        tracing::debug!(total, "Step controller ready");
        Ok(StepController { contents, core })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use maksudi_core::form_data;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn plain(n: usize) -> Vec<FormStep<usize>> {
        (0..n).map(FormStep::new).collect()
    }

    // -- construction --

    #[test]
    fn empty_step_list_is_rejected() {
        assert_matches!(
            StepController::<()>::builder(Vec::new()).build(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn starts_at_first_step_and_mounts_it() {
        let c = StepController::builder(plain(3)).build().unwrap();
        assert_eq!(c.current_step(), 0);
        assert_eq!(c.total_steps(), 3);
        assert!(c.is_first_step());
        assert!(!c.is_last_step());
        assert!(c.is_step_valid(0));
        // Steps that were never current are unset.
        assert!(!c.is_step_valid(1));
        assert_eq!(*c.current_content(), 0);
    }

    // -- navigation --

    #[test]
    fn go_to_step_ignores_out_of_range() {
        let mut c = StepController::builder(plain(3)).build().unwrap();
        assert_eq!(c.go_to_step(3), Navigation::Ignored);
        assert_eq!(c.current_step(), 0);
        assert_eq!(c.go_to_step(2), Navigation::Moved { from: 0, to: 2 });
        assert!(c.is_last_step());
    }

    #[test]
    fn go_to_step_bypasses_validity() {
        let steps = vec![FormStep::manual(0), FormStep::manual(1), FormStep::manual(2)];
        let mut c = StepController::builder(steps).build().unwrap();
        assert_eq!(c.next_step(), Navigation::Blocked);
        assert_eq!(c.go_to_step(2), Navigation::Moved { from: 0, to: 2 });
    }

    #[test]
    fn prev_step_stops_at_first() {
        let mut c = StepController::builder(plain(2)).build().unwrap();
        assert_eq!(c.prev_step(), Navigation::Ignored);
        c.next_step();
        assert_eq!(c.prev_step(), Navigation::Moved { from: 1, to: 0 });
    }

    #[test]
    fn step_change_callback_gets_previous_and_next() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut c = StepController::builder(plain(3))
            .on_step_change(move |from, to| sink.borrow_mut().push((from, to)))
            .build()
            .unwrap();
        c.next_step();
        c.next_step();
        c.prev_step();
        c.go_to_step(0);
        c.go_to_step(9);
        assert_eq!(*seen.borrow(), vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn animator_sees_each_real_transition() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut c = StepController::builder(plain(3))
            .animator(move |t: &StepTransition| sink.borrow_mut().push((t.from, t.to)))
            .build()
            .unwrap();
        c.next_step();
        c.go_to_step(1);
        c.prev_step();
        assert_eq!(*seen.borrow(), vec![(0, 1), (1, 0)]);
    }

    // -- completion --

    #[test]
    fn next_on_last_step_completes_without_moving() {
        let completed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&completed);
        let mut c = StepController::builder(plain(2))
            .initial_data(form_data(json!({"plan": "pro"})))
            .on_complete(move |data| sink.borrow_mut().push(data.clone()))
            .build()
            .unwrap();
        c.next_step();
        assert_eq!(c.next_step(), Navigation::Completed);
        assert_eq!(c.next_step(), Navigation::Completed);
        assert_eq!(c.current_step(), 1);
        assert_eq!(completed.borrow().len(), 2);
        assert_eq!(completed.borrow()[0]["plan"], json!("pro"));
    }

    // -- validity --

    #[test]
    fn controller_validator_is_authoritative() {
        let mut c = StepController::builder(plain(2))
            .validator(0, |data: &FormData| data.contains_key("email"))
            .build()
            .unwrap();
        // Mounted as default-valid, but the validator wins.
        assert_eq!(c.core().recorded_validity(0), Some(true));
        assert!(!c.is_step_valid(0));
        assert_eq!(c.next_step(), Navigation::Blocked);

        c.update_form_data(form_data(json!({"email": "ann@example.com"})));
        assert!(c.is_step_valid(0));
        assert_eq!(c.next_step(), Navigation::Moved { from: 0, to: 1 });
    }

    #[test]
    fn controller_validator_message_wins() {
        let steps = vec![
            FormStep::new(0).with_validator(|_: &FormData| Validity::invalid("Step says no")),
            FormStep::new(1),
        ];
        let mut c = StepController::builder(steps)
            .validator(0, |data: &FormData| {
                if data.contains_key("email") {
                    Validity::valid()
                } else {
                    Validity::invalid("Email is required")
                }
            })
            .build()
            .unwrap();
        assert_eq!(c.validation_message().as_deref(), Some("Email is required"));
        assert_eq!(c.view().validation_message.as_deref(), Some("Email is required"));

        c.update_form_data(form_data(json!({"email": "ann@example.com"})));
        assert_eq!(c.validation_message(), None);
        assert_eq!(c.next_step(), Navigation::Moved { from: 0, to: 1 });
    }

    #[test]
    fn step_validator_reacts_to_data_changes() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let steps = vec![
            FormStep::new(0)
                .with_validator(|data: &FormData| {
                    if data.get("name").and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty()) {
                        Validity::valid()
                    } else {
                        Validity::invalid("Name is required")
                    }
                })
                .on_validity_change(move |valid| sink.borrow_mut().push(valid)),
            FormStep::new(1),
        ];
        let mut c = StepController::builder(steps).build().unwrap();
        assert!(!c.is_step_valid(0));
        assert_eq!(c.validation_message().as_deref(), Some("Name is required"));

        c.update_form_data(form_data(json!({"other": 1})));
        c.update_form_data(form_data(json!({"name": "Ann"})));
        c.update_form_data(form_data(json!({"age": 30})));
        assert!(c.is_step_valid(0));
        assert_eq!(c.validation_message(), None);
        // Only real changes are reported.
        assert_eq!(*changes.borrow(), vec![false, true]);
    }

    #[test]
    fn validator_of_non_current_step_does_not_run() {
        let runs = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&runs);
        let steps = vec![
            FormStep::new(0),
            FormStep::new(1).with_validator(move |_: &FormData| {
                *counter.borrow_mut() += 1;
                true
            }),
        ];
        let mut c = StepController::builder(steps).build().unwrap();
        c.update_form_data(form_data(json!({"a": 1})));
        assert_eq!(*runs.borrow(), 0);
        c.next_step();
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn set_step_validity_is_idempotent() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let steps = vec![FormStep::manual(0), FormStep::manual(1)];
        let mut c = StepController::builder(steps)
            .on_validity_change(move |step, valid| sink.borrow_mut().push((step, valid)))
            .build()
            .unwrap();
        assert!(c.set_step_validity(1, true));
        assert!(!c.set_step_validity(1, true));
        assert!(c.set_step_validity(1, false));
        assert!(!c.set_step_validity(7, true));
        assert_eq!(*events.borrow(), vec![(1, true), (1, false)]);
    }

    #[test]
    fn manual_step_stays_gated_until_set() {
        let steps = vec![FormStep::manual(0), FormStep::new(1)];
        let mut c = StepController::builder(steps).build().unwrap();
        assert_eq!(c.core().recorded_validity(0), None);
        assert_eq!(c.next_step(), Navigation::Blocked);
        c.set_step_validity(0, true);
        assert_eq!(c.next_step(), Navigation::Moved { from: 0, to: 1 });
    }

    // -- context & reset --

    #[test]
    fn dispatch_gives_content_and_context() {
        let mut c = StepController::builder(vec![
            FormStep::new(String::from("first")),
            FormStep::new(String::from("second")),
        ])
        .build()
        .unwrap();
        let nav = c.dispatch(|content, ctx| {
            content.push_str(" (visited)");
            ctx.update_form_data(form_data(json!({"seen": true})));
            ctx.next_step()
        });
        assert_eq!(nav, Navigation::Moved { from: 0, to: 1 });
        assert_eq!(c.content(0).map(String::as_str), Some("first (visited)"));
        assert_eq!(c.form_data()["seen"], json!(true));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut c = StepController::builder(plain(3))
            .initial_data(form_data(json!({"plan": "free"})))
            .build()
            .unwrap();
        c.update_form_data(form_data(json!({"plan": "pro", "name": "Ann"})));
        c.next_step();
        c.reset();
        assert_eq!(c.current_step(), 0);
        assert_eq!(c.form_data().len(), 1);
        assert_eq!(c.form_data()["plan"], json!("free"));
        assert!(c.is_step_valid(0));
        assert!(!c.is_step_valid(1));
    }

    #[test]
    fn independent_controllers_do_not_share_state() {
        let mut a = StepController::builder(plain(2)).build().unwrap();
        let b = StepController::builder(plain(2)).build().unwrap();
        a.update_form_data(form_data(json!({"x": 1})));
        a.next_step();
        assert_eq!(b.current_step(), 0);
        assert!(b.form_data().is_empty());
    }
}
