//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the infrastructure
//! layer, which is the only code allowed to touch the storage driver.

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
use crate::error::AuthResult;

/// User repository trait
///
/// Uniqueness of the user name is the store's job: `create` relies on the
/// storage-level unique constraint and reports a violation as
/// `AuthError::UserNameTaken`. There is deliberately no `exists` operation,
/// since a check-then-insert sequence would reopen the race the constraint
/// closes.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user atomically
    ///
    /// The store assigns the id and creation timestamp and returns the
    /// persisted record.
    async fn create(
        &self,
        user_name: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<User>;

    /// Find a user by user name (canonical form)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;
}
