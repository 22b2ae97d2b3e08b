//! Auth (Credential Management) Core
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, value objects, repository traits
//! - `application/` - Use cases and the service facade
//! - `infra/` - Database implementations
//!
//! ## Features
//! - User registration/authentication with username + password
//! - Per-client fixed-window rate limiting, separate budgets per endpoint
//! - Transactional, parameterized persistence with store-level uniqueness
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant), verified in
//!   constant time on a blocking worker pool
//! - Plaintext never stored, logged or echoed in errors; buffers zeroized
//! - Unknown-user and wrong-password responses are indistinguishable in
//!   content and latency (decoy-hash verification)
//! - Duplicate registration detected by the storage unique constraint, not a
//!   racy check-then-insert

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::service::AuthService;
pub use error::{AuthError, AuthResult};
pub use infra::sqlite::SqliteAuthRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::user::User;
    pub use crate::domain::value_object::user_id::UserId;
    pub use crate::domain::value_object::user_name::UserName;
    pub use crate::domain::value_object::user_password::{RawPassword, UserPassword};
}

pub mod store {
    pub use crate::infra::sqlite::SqliteAuthRepository as AuthStore;
}
