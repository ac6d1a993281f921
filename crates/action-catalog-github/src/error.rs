//! Error types for the GitHub client

use action_catalog_core::TransportError;
use thiserror::Error;

/// Errors that can occur while talking to the GitHub REST API
#[derive(Error, Debug)]
pub enum GithubError {
    /// Token missing or rejected (HTTP 401)
    #[error("GitHub rejected the credentials: {0}")]
    Unauthorized(String),

    /// Non-success status other than 401/404
    #[error("GitHub API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Request could not be sent or the response not read
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("invalid GitHub client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        GithubError::Http(err.to_string())
    }
}

impl From<GithubError> for TransportError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::Unauthorized(msg) => TransportError::Unauthorized(msg),
            GithubError::Status { status, body } => TransportError::Http {
                status,
                message: body,
            },
            GithubError::Http(msg) => TransportError::Network(msg),
            GithubError::Json(e) => TransportError::Decode(e.to_string()),
            GithubError::Config(msg) => TransportError::InvalidRequest(msg),
        }
    }
}
