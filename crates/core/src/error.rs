/// Programmer-facing misuse of the form and step APIs.
///
/// User-input validation failures are never reported through this type;
/// they surface as error-map entries or step validity flags instead.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
