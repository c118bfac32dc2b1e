//! Error types for catalog operations.

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error type for catalog operations.
///
/// Upstream failures are propagated to the caller and never cached; a
/// cache miss is not an error at all and does not appear here.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The query parameters were out of range before any network call.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The catalog could not be reached or the request failed in transit.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered but reported a non-success envelope code.
    #[error("catalog returned code {code}")]
    Upstream {
        /// Envelope code from the catalog response body.
        code: i64,
    },

    /// The catalog answered with a body we could not interpret.
    #[error("malformed catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Create an invalid-query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
