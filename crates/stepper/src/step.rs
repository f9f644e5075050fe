//! Step units and step-level validity.

use maksudi_core::FormData;

/// Outcome of a step validator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validity {
    pub valid: bool,
    /// Shown under the step while it is invalid.
    pub message: Option<String>,
}

impl Validity {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

impl From<bool> for Validity {
    fn from(valid: bool) -> Self {
        Self {
            valid,
            message: None,
        }
    }
}

/// A predicate over the shared data bag.
pub type StepValidator = Box<dyn Fn(&FormData) -> Validity>;

/// Wrap a closure returning `bool` or [`Validity`] as a [`StepValidator`].
pub fn validator<F, V>(f: F) -> StepValidator
where
    F: Fn(&FormData) -> V + 'static,
    V: Into<Validity>,
{
    Box::new(move |data| f(data).into())
}

/// How a step without a validator reports validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidityPolicy {
    /// Reports itself valid each time it becomes the current step.
    #[default]
    DefaultValid,
    /// Reports nothing; the caller drives `set_step_validity`.
    Manual,
}

pub type ValidityHook = Box<dyn FnMut(bool)>;

/// One page of a multi-step form.
///
/// `content` is opaque to the controller.
pub struct FormStep<S> {
    pub(crate) content: S,
    pub(crate) validator: Option<StepValidator>,
    pub(crate) policy: ValidityPolicy,
    pub(crate) on_validity_change: Option<ValidityHook>,
}

impl<S> FormStep<S> {
    pub fn new(content: S) -> Self {
        Self {
            content,
            validator: None,
            policy: ValidityPolicy::DefaultValid,
            on_validity_change: None,
        }
    }

    /// A step that never reports validity on its own.
    pub fn manual(content: S) -> Self {
        Self {
            policy: ValidityPolicy::Manual,
            ..Self::new(content)
        }
    }

    /// Re-evaluated whenever the data bag changes while this step is
    /// current.
    pub fn with_validator<F, V>(mut self, f: F) -> Self
    where
        F: Fn(&FormData) -> V + 'static,
        V: Into<Validity>,
    {
        self.validator = Some(validator(f));
        self
    }

    /// Called when this step's recorded validity changes.
    pub fn on_validity_change(mut self, hook: impl FnMut(bool) + 'static) -> Self {
        self.on_validity_change = Some(Box::new(hook));
        self
    }

    pub fn content(&self) -> &S {
        &self.content
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }
}

impl<S> From<S> for FormStep<S> {
    fn from(content: S) -> Self {
        Self::new(content)
    }
}
