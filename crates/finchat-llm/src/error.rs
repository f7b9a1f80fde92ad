//! Error types for completion operations

use thiserror::Error;

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur while talking to a completion endpoint
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Endpoint returned a non-success status
    #[error("API error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Model returned no usable content
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
