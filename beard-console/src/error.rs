//! Error types for beard-console

use crate::services::ServiceError;
use thiserror::Error;

/// Main error type for the console
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// An input text field did not parse as JSON of the expected shape
    #[error("Malformed {field}: {message}")]
    MalformedInput {
        /// Name of the offending input field
        field: &'static str,
        message: String,
    },

    /// A backend service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// beard-common error (configuration, I/O)
    #[error("Common error: {0}")]
    Common(#[from] beard_common::Error),
}

/// Convenience Result type using ConsoleError
pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
