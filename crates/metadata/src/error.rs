//! Error types for metadata storage operations.

use thiserror::Error;

/// Errors that can occur during metadata store operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The requested record does not exist (or is not visible to the
    /// requesting user).
    #[error("not found: {0}")]
    NotFound(String),

    /// A record with the same unique identity already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Store configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Config(format!("io error: {err}"))
    }
}

pub type MetadataResult<T> = Result<T, MetadataError>;
