//! Schema-driven forms.
//!
//! - [`schema`]: [`FormSchema`] / [`FieldDescriptor`] and the pure
//!   [`splice_move`] reorder.
//! - [`validate`]: per-field and whole-form validation, [`FormErrors`].
//! - [`render`]: type-tag to renderer registry producing headless views.
//! - [`runner`]: the data bag and error map of one filling session.
//! - [`builder`]: [`FormBuilder`], tying edit and preview modes together.

pub mod builder;
pub mod config;
pub mod render;
pub mod runner;
pub mod schema;
pub mod validate;

pub use builder::{BuilderMode, FormBuilder, SubmitOutcome};
pub use config::FormBuilderConfig;
pub use render::{Control, FieldRenderer, FieldView, RenderContext, RendererRegistry};
pub use runner::FormState;
pub use schema::{splice_move, FieldDescriptor, FieldOption, FieldType, FormSchema};
pub use validate::{check_field, validate_all, validate_field, FormErrors};
