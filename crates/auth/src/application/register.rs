//! Register Use Case
//!
//! Creates a new user account.
//!
//! Linear, fail-fast pipeline: required fields → format validation → rate
//! limit → hash → persist. Validation and rate-limit failures return before
//! any hashing or storage work happens.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::validation::validate_required;
use crate::domain::value_object::{
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Key prefix separating registration counters from other endpoint classes
const RATE_LIMIT_PREFIX: &str = "register";

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    /// Opaque client identity (e.g. remote address), owned by the caller
    pub client_key: String,
}

/// Register output
#[derive(Debug, Clone)]
pub struct RegisterOutput {
    pub user_id: UserId,
}

/// Register use case
pub struct RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    user_repo: Arc<U>,
    rate_limits: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<U, R> RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RateLimitStore,
{
    pub fn new(user_repo: Arc<U>, rate_limits: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            rate_limits,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate fields and formats
        validate_required(&[
            ("username", input.user_name.as_str()),
            ("password", input.password.as_str()),
        ])?;

        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(input.password)?;

        // Rate limit before any hashing or storage work
        let decision = self
            .rate_limits
            .check_and_increment(
                &format!("{}:{}", RATE_LIMIT_PREFIX, input.client_key),
                &self.config.registration_limit,
            )
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !decision.allowed {
            tracing::warn!(client_key = %input.client_key, "Registration rate limit exceeded");
            return Err(AuthError::RateLimited);
        }

        // Hashing is CPU-bound; keep it off the async executor threads
        let pepper = self.config.password_pepper.clone();
        let hash_config = self.config.hash.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, pepper.as_deref(), &hash_config)
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))??;

        // The store's unique constraint is the only duplicate check
        let user = self.user_repo.create(&user_name, &password_hash).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
        })
    }
}
