//! Error types for document loading.

/// Error loading a [`DocumentModel`](crate::DocumentModel) from JSON.
///
/// Diagram text never produces this error: the line parser drops what it
/// cannot understand instead.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Text is not valid JSON or does not match the document model.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level field is absent.
    #[error("document is missing required field '{0}'")]
    MissingField(&'static str),

    /// A required top-level field has the wrong JSON type.
    #[error("document field '{field}' is invalid: {message}")]
    InvalidField {
        /// Field name (e.g., "entities").
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}
