//! User Entity
//!
//! One registered account: identity, credentials and creation time.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword,
};

/// User entity
///
/// The password hash is an opaque, self-describing blob; it is redacted from
/// Debug output and never leaves the store/verification paths.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, immutable after creation
    pub user_id: UserId,
    /// User name (unique on its canonical form)
    pub user_name: UserName,
    /// Argon2id PHC-format password hash
    pub password_hash: UserPassword,
    /// Created timestamp, set once
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    ///
    /// Called by the store at insert time; the store is the id authority.
    pub(crate) fn new(user_name: UserName, password_hash: UserPassword) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
