//! Error types for schema registration, casting and accessor dispatch.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while defining schemas or building documents.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The schema definition itself is unusable.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// No accessor with this name was synthesized for the schema.
    #[error("unknown accessor `{accessor}` on model {model}")]
    UnknownAccessor { model: String, accessor: String },

    /// The type registry has no constructor for this name.
    #[error("unresolvable type: {0}")]
    UnresolvableType(String),

    /// The constructor does not support the requested init method.
    #[error("type {type_name} has no init method `{init_method}`")]
    UnknownInitMethod { type_name: String, init_method: String },

    /// A constructor rejected its input.
    #[error("cannot construct {type_name}: {message}")]
    Construction { type_name: String, message: String },

    /// An array-typed property held a non-array value.
    #[error("property `{0}` is array-typed but does not hold an array")]
    ExpectedArray(String),

    /// A document was built from a JSON value that is not an object.
    #[error("expected a JSON object, got {0}")]
    ExpectedObject(String),

    /// A lenient numeric cast did not apply. Recoverable.
    #[error("not a number: {0}")]
    NumericCoercion(String),

    /// Timestamp parsing failed.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] docprop_types::Error),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Whether casting may swallow this error and keep the original value.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NumericCoercion(_))
    }

    pub(crate) fn construction(type_name: &str, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }
}
