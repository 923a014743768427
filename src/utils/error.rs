//! Error types and handling
//!
//! Every failure leaving the data access layer is one of these variants.
//! Driver errors are classified here so callers can tell an unreachable
//! store apart from a missing row or a failed statement.

use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// The query ran but matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before it reached the store
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unique or foreign key constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store could not be reached (bad path, pool closed or exhausted, I/O)
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// The statement itself failed
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier for programmatic handling
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Conflict(_) => "conflict",
            AppError::Unavailable(_) => "unavailable",
            AppError::Database(_) => "database_error",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the error points at the store or the process rather than the caller's input
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Unavailable(_)
                | AppError::Database(_)
                | AppError::Config(_)
                | AppError::Internal(_)
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => AppError::Unavailable(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                    AppError::Conflict(db_err.message().to_string())
                } else if db_err.is_check_violation() {
                    AppError::BadRequest(db_err.message().to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(format!("Migration failed: {}", err))
    }
}

/// Result type alias for data access operations
pub type AppResult<T> = Result<T, AppError>;
