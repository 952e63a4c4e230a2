//! Error types module
//!
//! Core error type shared by the persistence and pipeline crates. Stage-local
//! errors (validation, compression, provider) live next to their components;
//! `AppError` covers the cross-cutting failures: database, storage, auth
//! preconditions.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature. With `default-features = false` the variant carries the rendered
//! message instead.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether a retry of the same operation can reasonably succeed.
    /// Database and storage failures are transient until proven otherwise;
    /// precondition and input failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => true,
            AppError::NotAuthenticated | AppError::NotFound(_) | AppError::InvalidInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(AppError::Storage("timeout".into()).is_retryable());
        assert!(!AppError::NotAuthenticated.is_retryable());
        assert!(!AppError::InvalidInput("bad".into()).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(AppError::NotAuthenticated.to_string(), "Not authenticated");
        assert_eq!(
            AppError::NotFound("verification 42".into()).to_string(),
            "Not found: verification 42"
        );
    }
}
