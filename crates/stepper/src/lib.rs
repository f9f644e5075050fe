//! Multi-step form controller.
//!
//! A [`StepController`] owns an ordered list of [`FormStep`]s, a shared data
//! bag and per-step validity. Forward navigation is gated by the current
//! step's validity; `next` on the last step completes the form.

pub mod config;
pub mod context;
pub mod controller;
pub mod effects;
pub mod indicator;
pub mod step;

pub use config::{AnimationVariant, NavigationPosition, StepperConfig};
pub use context::StepContext;
pub use controller::{ControllerCore, Navigation, StepController, StepControllerBuilder};
pub use effects::{NoopAnimator, StepTransition, TransitionAnimator, TRANSITION_DURATION};
pub use indicator::{progress_label, ControllerView, NavigationView, StepIndicator, StepState};
pub use step::{validator, FormStep, StepValidator, Validity, ValidityPolicy};
