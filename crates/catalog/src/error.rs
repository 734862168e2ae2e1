//! Error types for catalog API access.

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured base URL or a derived URL is invalid.
    #[error("invalid catalog URL: {0}")]
    Url(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog returned a non-success status.
    #[error("catalog returned status {status}")]
    Status { status: u16 },

    /// The response body did not decode as expected.
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
