//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed username, password or payload
    #[error("Validation failed: {0}")]
    Validation(String),

    /// User name already exists
    #[error("Username unavailable")]
    UserNameTaken,

    /// Too many attempts for the key within the window
    #[error("Too many attempts, please try again later")]
    RateLimited,

    /// Credentials incorrect or user absent
    ///
    /// A single generic variant for every incorrect case; callers must not
    /// be able to tell unknown-user from wrong-password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Storage operation exceeded its deadline
    #[error("Storage operation timed out")]
    StorageTimeout,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::RateLimited => ErrorKind::RateLimited,
            AuthError::InvalidCredentials => ErrorKind::AuthenticationFailed,
            AuthError::StorageTimeout | AuthError::Database(_) => ErrorKind::Storage,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    ///
    /// Server-kind errors surface a generic message; the detail stays in the
    /// log, never in the result handed to the caller.
    pub fn to_app_error(&self) -> AppError {
        if self.kind().is_server_error() {
            AppError::new(self.kind(), "An internal error occurred")
        } else {
            AppError::new(self.kind(), self.to_string())
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StorageTimeout => {
                tracing::error!("Auth storage operation timed out");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimited => {
                tracing::warn!("Rate limited request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}
