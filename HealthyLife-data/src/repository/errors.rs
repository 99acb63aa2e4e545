use std::sync::PoisonError;
use thiserror::Error;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Assessment not found: {0}")]
    NotFound(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// Dataset could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}
