//! Error types for hotseat-ai

use thiserror::Error;

/// Result type alias using hotseat-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the model backend
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend reported an error inside the stream body
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
