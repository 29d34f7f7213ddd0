//! Error types for the sii-stc library.

use thiserror::Error;

/// Main error type for the sii-stc library.
#[derive(Error, Debug)]
pub enum StcError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("HTTP error! status: {status} ({url})")]
    Transport { status: u16, url: String },

    /// The document is missing the container or a mandatory field
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Invalid response from server
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Captcha blob is not valid base64
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// CSS selector for an anchor could not be parsed
    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl StcError {
    /// HTTP status code for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            StcError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for sii-stc operations.
pub type Result<T> = std::result::Result<T, StcError>;
