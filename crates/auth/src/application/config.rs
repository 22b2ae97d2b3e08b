//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup by the
//! caller's bootstrap and passed by reference into every constructor; the
//! core reads no environment and keeps no ambient globals.

use std::time::Duration;

use platform::password::PasswordHashConfig;
use platform::rate_limit::RateLimitConfig;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Argon2id cost parameters for new hashes
    pub hash: PasswordHashConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Registration attempts per client key (stricter: creation is costly)
    pub registration_limit: RateLimitConfig,
    /// Login attempts per client key
    pub login_limit: RateLimitConfig,
    /// Deadline applied to each storage operation
    pub storage_op_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash: PasswordHashConfig::default(),
            password_pepper: None,
            registration_limit: RateLimitConfig::new(5, 60),
            login_limit: RateLimitConfig::new(10, 60),
            storage_op_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Create config for development and tests (cheap hashing)
    ///
    /// Not suitable for production use.
    pub fn development() -> Self {
        Self {
            hash: PasswordHashConfig::fast_insecure(),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
