//! Command-line driver for the form engine and step controller.
//!
//! Loads a form schema and a set of answers (built-in fixtures unless
//! configured otherwise), validates the answers and replays a scripted
//! multi-step session over them.

pub mod config;
pub mod session;

pub use config::DemoConfig;
pub use session::{run, DemoReport, ValidationReport, WizardTranscript};
