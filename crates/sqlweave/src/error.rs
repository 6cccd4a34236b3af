//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement compilation and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// A descriptor value the compiler cannot accept (connector, DROP kind, UNION mode, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error reported by the PostgreSQL executor
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Error reported by any other executor
    #[error("Executor error: {0}")]
    Executor(String),
}

impl SqlError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an executor error
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
