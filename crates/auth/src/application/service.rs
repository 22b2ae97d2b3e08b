//! Auth Service Facade
//!
//! The single entry point the caller (an HTTP layer, a CLI, a test harness)
//! wires against. Exposes exactly two operations: register and authenticate.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
use crate::application::config::AuthConfig;
use crate::application::register::{RegisterInput, RegisterOutput, RegisterUseCase};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

/// Fixed plaintext the decoy hash is derived from
///
/// The value is irrelevant; only the derivation cost matters.
const DECOY_PASSWORD: &str = "decoy-fixture-0000";

/// Credential management service
///
/// Owns the register and authenticate workflows over a shared user store and
/// rate-limit store. Construction derives the decoy hash once, at the
/// configured cost, so failed lookups later verify against real Argon2id
/// work rather than returning early.
pub struct AuthService<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    register: RegisterUseCase<U, R>,
    authenticate: AuthenticateUseCase<U, R>,
}

impl<U, R> AuthService<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    /// Build the service
    ///
    /// Fails only if decoy-hash derivation fails (an entropy or parameter
    /// fault, fatal at startup).
    pub fn new(user_repo: Arc<U>, rate_limits: Arc<R>, config: Arc<AuthConfig>) -> AuthResult<Self> {
        let decoy_plain = RawPassword::new_unchecked(DECOY_PASSWORD.to_string());
        let decoy_hash = Arc::new(UserPassword::from_raw(
            &decoy_plain,
            config.pepper(),
            &config.hash,
        )?);

        Ok(Self {
            register: RegisterUseCase::new(
                Arc::clone(&user_repo),
                Arc::clone(&rate_limits),
                Arc::clone(&config),
            ),
            authenticate: AuthenticateUseCase::new(user_repo, rate_limits, config, decoy_hash),
        })
    }

    /// Register a new user
    ///
    /// Returns the new user's id, or an error carrying the responsible kind.
    pub async fn register(
        &self,
        user_name: String,
        password: String,
        client_key: String,
    ) -> AuthResult<RegisterOutput> {
        self.register
            .execute(RegisterInput {
                user_name,
                password,
                client_key,
            })
            .await
            .inspect_err(|e| e.log())
    }

    /// Authenticate a username/password pair
    ///
    /// Returns the user's id on success; every incorrect case maps to the
    /// same generic authentication failure.
    pub async fn authenticate(
        &self,
        user_name: String,
        password: String,
        client_key: String,
    ) -> AuthResult<AuthenticateOutput> {
        self.authenticate
            .execute(AuthenticateInput {
                user_name,
                password,
                client_key,
            })
            .await
            .inspect_err(|e| e.log())
    }
}
