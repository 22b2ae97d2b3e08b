//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::storage("I/O operation failed").with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::validation("Invalid UTF-8 string").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::validation("Invalid integer format").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::validation(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                AppError::storage("Expected record missing").with_source(err)
            }
            sqlx::Error::PoolTimedOut => {
                AppError::storage("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // SQLite extended result codes
                // https://www.sqlite.org/rescode.html
                let app_err = if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
                        "2067" | "1555" => AppError::conflict("Duplicate key value"),
                        // SQLITE_CONSTRAINT_FOREIGNKEY
                        "787" => AppError::conflict("Foreign key violation"),
                        // SQLITE_CONSTRAINT_NOTNULL
                        "1299" => AppError::validation("Required field is null"),
                        // SQLITE_CONSTRAINT_CHECK
                        "275" => AppError::validation("Check constraint violation"),
                        // SQLITE_BUSY / SQLITE_LOCKED
                        "5" | "6" => AppError::storage("Database busy"),
                        _ => AppError::storage("Database error"),
                    }
                } else {
                    AppError::storage("Database error")
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::storage("Database connection error").with_source(err)
            }
            sqlx::Error::Protocol(_) => {
                AppError::storage("Database protocol error").with_source(err)
            }
            _ => AppError::storage("Database error").with_source(err),
        }
    }
}
