//! Authenticate Use Case
//!
//! Verifies a username/password pair against the store.
//!
//! The rate limiter runs first, keyed by client identity alone, so limiter
//! behavior reveals nothing about whether a username exists. Every incorrect
//! case (unknown user, wrong password, malformed input or stored blob)
//! collapses into the same `InvalidCredentials` result, and the unknown-user
//! path pays a decoy hash verification so its latency matches the
//! wrong-password path.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Key prefix separating login counters from other endpoint classes
const RATE_LIMIT_PREFIX: &str = "login";

/// Fixed plaintext probed against the decoy hash
const DECOY_PROBE: &str = "decoy-probe-never-a-real-password";

/// Authenticate input
pub struct AuthenticateInput {
    pub user_name: String,
    pub password: String,
    /// Opaque client identity (e.g. remote address), owned by the caller
    pub client_key: String,
}

/// Authenticate output
#[derive(Debug, Clone)]
pub struct AuthenticateOutput {
    pub user_id: UserId,
}

/// Authenticate use case
pub struct AuthenticateUseCase<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    user_repo: Arc<U>,
    rate_limits: Arc<R>,
    config: Arc<AuthConfig>,
    /// Verified against when no stored hash applies; same cost parameters
    /// as real hashes
    decoy_hash: Arc<UserPassword>,
}

impl<U, R> AuthenticateUseCase<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    pub fn new(
        user_repo: Arc<U>,
        rate_limits: Arc<R>,
        config: Arc<AuthConfig>,
        decoy_hash: Arc<UserPassword>,
    ) -> Self {
        Self {
            user_repo,
            rate_limits,
            config,
            decoy_hash,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<AuthenticateOutput> {
        // Rate limit first, independent of whether the username exists
        let decision = self
            .rate_limits
            .check_and_increment(
                &format!("{}:{}", RATE_LIMIT_PREFIX, input.client_key),
                &self.config.login_limit,
            )
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !decision.allowed {
            tracing::warn!(client_key = %input.client_key, "Login rate limit exceeded");
            return Err(AuthError::RateLimited);
        }

        // Malformed input can never match a stored credential; it still pays
        // a full verification before failing
        let Ok(user_name) = UserName::new(&input.user_name) else {
            self.verify_decoy().await?;
            return Err(AuthError::InvalidCredentials);
        };
        let Ok(raw_password) = RawPassword::new(input.password) else {
            self.verify_decoy().await?;
            return Err(AuthError::InvalidCredentials);
        };

        let user = match self.user_repo.find_by_user_name(&user_name).await? {
            Some(user) => user,
            None => {
                // Keep unknown-user latency aligned with wrong-password
                self.verify_decoy().await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let pepper = self.config.password_pepper.clone();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || {
            stored.verify(&raw_password, pepper.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !valid {
            tracing::warn!(user_name = %user.user_name, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User authenticated"
        );

        Ok(AuthenticateOutput {
            user_id: user.user_id,
        })
    }

    /// Burn one hash verification against the decoy blob
    async fn verify_decoy(&self) -> AuthResult<()> {
        let decoy = Arc::clone(&self.decoy_hash);
        let pepper = self.config.password_pepper.clone();

        tokio::task::spawn_blocking(move || {
            let probe = RawPassword::new_unchecked(DECOY_PROBE.to_string());
            decoy.verify(&probe, pepper.as_deref());
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }
}
