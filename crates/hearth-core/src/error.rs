//! Error types module
//!
//! `AppError` covers failures that are not tied to a single storage backend:
//! database lookups, configuration, and internal faults. Storage backends have
//! their own `StorageError` in hearth-storage, and the image lifecycle wraps both
//! in `ImageError` in hearth-services.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl AppError {
    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
