//! The context a multi-step form exposes to its steps.
//!
//! Step code is written against `&mut dyn StepContext` rather than a
//! concrete controller, so every controller instance hands out its own
//! context and independent forms never share state.

use maksudi_core::FormData;

use crate::controller::Navigation;

pub trait StepContext {
    fn current_step(&self) -> usize;

    fn total_steps(&self) -> usize;

    fn is_first_step(&self) -> bool {
        self.current_step() == 0
    }

    fn is_last_step(&self) -> bool {
        self.current_step() + 1 == self.total_steps()
    }

    /// Jump to `step`. Out-of-range targets are ignored. Not gated by
    /// validity.
    fn go_to_step(&mut self, step: usize) -> Navigation;

    /// Advance, or complete on the last step. Gated by the current step's
    /// validity.
    fn next_step(&mut self) -> Navigation;

    /// Go back one step. Ignored on the first step.
    fn prev_step(&mut self) -> Navigation;

    fn form_data(&self) -> &FormData;

    /// Shallow-merge `partial` into the shared data bag.
    fn update_form_data(&mut self, partial: FormData);

    fn is_step_valid(&self, step: usize) -> bool;

    /// Record validity for `step`. Returns `true` if the stored value
    /// changed.
    fn set_step_validity(&mut self, step: usize, valid: bool) -> bool;
}
