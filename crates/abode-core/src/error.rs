//! Error types for abode-core

use thiserror::Error;

/// Result type alias using abode-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in abode-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error: {message} ({status})")]
    Api { status: u16, message: String },

    /// Backend rejected the stored token; the token has been cleared
    #[error("Session expired or token rejected by the server")]
    Unauthorized,

    /// No token is stored for a request that needs one
    #[error("Not authenticated: sign in first")]
    NotAuthenticated,

    /// The owning scope was closed before the response could be applied
    #[error("Request cancelled")]
    Cancelled,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Listing not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Token storage failure
    #[error("Token storage error: {0}")]
    TokenStorage(String),
}

impl Error {
    /// Whether the failure came back from the server as an HTTP status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}
