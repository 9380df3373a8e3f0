//! Error types for format operations
//!
//! USFM parsing itself never fails: malformed scripture degrades to best-effort
//! output. These errors cover the surrounding layers (registry lookups, JSON
//! input, option strings coming from the command line).

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Error while parsing a structured input (e.g. JSON)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Format does not support the requested direction or parameters
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// A `key=value` option could not be interpreted
    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    pub(crate) fn invalid_option(key: &str, message: impl Into<String>) -> Self {
        FormatError::InvalidOption {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
