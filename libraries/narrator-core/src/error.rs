//! Error types for the narrator core

use thiserror::Error;

/// Result type alias using `NarratorError`
pub type Result<T> = std::result::Result<T, NarratorError>;

/// Core error type
#[derive(Error, Debug)]
pub enum NarratorError {
    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio base URL does not parse
    #[error("Invalid audio base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Configuration could not be (de)serialized
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl NarratorError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
