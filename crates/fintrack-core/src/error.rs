use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for core services and storage backends.
///
/// Empty transaction sets and missing budget rows are normal states, not
/// errors; only genuinely exceptional conditions live here.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Account not linked")]
    NotLinked,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

pub type Result<T> = StdResult<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}
