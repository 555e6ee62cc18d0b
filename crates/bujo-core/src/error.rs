//! Error types for bujo-core

use thiserror::Error;

/// Result type alias using bujo-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bujo-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local pre-network validation failure (e.g. password mismatch)
    #[error("{0}")]
    Validation(String),

    /// 401/403 from the remote, or a forced re-authentication
    #[error("{0}")]
    Unauthorized(String),

    /// 404 from the remote
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server could not be reached at all
    #[error("Cannot reach server: {0}")]
    Unreachable(String),

    /// 5xx from the remote
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Remote payload did not decode into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session/secure storage error
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Invalid configuration (endpoint URLs etc.)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Classify a transport error: connect/timeout failures become
    /// [`Error::Unreachable`], everything else stays an HTTP error.
    #[must_use]
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::Unreachable(error.to_string())
        } else {
            Self::Http(error)
        }
    }
}
