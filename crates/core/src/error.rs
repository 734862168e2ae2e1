//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid shelf type: {0}")]
    InvalidShelfType(String),

    #[error("invalid rating: {rating} (must be between 1 and 5)")]
    InvalidRating { rating: i64 },

    #[error("invalid book reference: {0}")]
    InvalidBookRef(String),

    #[error("review text too long: {len} bytes (max {max})")]
    ReviewTextTooLong { len: usize, max: usize },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
