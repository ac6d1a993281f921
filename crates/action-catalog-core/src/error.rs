//! Error taxonomy for manifest discovery and catalog assembly.

use thiserror::Error;

/// Failures reported by a [`crate::transport::Transport`].
///
/// "Not found" is not an error: transports return `Ok(None)` for it so the
/// locator can fall through to its next strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Credentials were rejected by the provider.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The provider answered with an unexpected status code.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request could not be built (bad URL or configuration).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Whether this failure must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::Unauthorized(_))
    }
}

/// Run-level catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Authentication failed; no partial catalog is emitted.
    #[error("could not authenticate with the provided token: {0}")]
    Authentication(String),

    /// A required input was not supplied.
    #[error("{0}")]
    MissingInput(String),

    /// Repository enumeration failed before scanning began.
    #[error("failed to enumerate repositories: {0}")]
    Enumeration(TransportError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TransportError> for CatalogError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unauthorized(msg) => CatalogError::Authentication(msg),
            other => CatalogError::Enumeration(other),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type for transport calls.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
