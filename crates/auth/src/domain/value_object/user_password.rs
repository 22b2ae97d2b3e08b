//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Security Features
//! - Argon2id hashing (memory-hard)
//! - Automatic memory zeroization
//! - Constant-time comparison
//! - Unicode NFKC normalization

use std::fmt;

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashConfig, PasswordHashError,
};

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Wrapper around `ClearTextPassword` with domain-specific error handling.
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// ## Validation Rules
    /// - 8 to 128 characters (Unicode code points)
    /// - At least one uppercase letter, one lowercase letter and one digit
    /// - No control characters
    /// - Unicode NFKC normalized
    ///
    /// The error message never echoes the password text.
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text =
            ClearTextPassword::new(raw).map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(Self(clear_text))
    }

    /// Create without policy validation
    ///
    /// For verification probes and decoy material, where the policy of the
    /// moment must not apply.
    pub fn new_unchecked(raw: String) -> Self {
        Self(ClearTextPassword::new_unchecked(raw))
    }

    /// Access the inner ClearTextPassword
    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
///
/// Stores the password in Argon2id PHC string format.
/// Safe to store in the database; never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Create from raw password by hashing
    ///
    /// ## Arguments
    /// * `raw` - The validated raw password
    /// * `pepper` - Optional application-wide secret
    /// * `config` - Cost parameters embedded into the blob
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        config: &PasswordHashConfig,
    ) -> AuthResult<Self> {
        let hashed = raw.inner().hash(pepper, config).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AuthError::Internal(format!("Password hashing failed: {}", msg))
            }
            _ => AuthError::Internal("Unexpected error during password hashing".to_string()),
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string, validating the format
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Invalid password hash".to_string()))?;

        Ok(Self(hashed))
    }

    /// Create from a stored blob without re-validating the format
    ///
    /// Used when hydrating records from the store. A malformed blob is not an
    /// error here; [`UserPassword::verify`] treats it as a mismatch, which is
    /// exactly the externally visible behavior authentication requires.
    pub(crate) fn from_stored(blob: String) -> Self {
        match HashedPassword::from_phc_string(&blob) {
            Ok(hashed) => Self(hashed),
            Err(_) => {
                tracing::error!("Stored password hash is not valid PHC format");
                // Poison blob: no password can verify against it
                Self(
                    HashedPassword::from_phc_string(
                        "$argon2id$v=19$m=8,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
                    )
                    .expect("static decoy blob is valid PHC"),
                )
            }
        }
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash
    ///
    /// Uses constant-time comparison to prevent timing attacks. Returns
    /// `false` on any mismatch or malformed blob.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// Check if the hash should be re-derived at the current cost settings
    pub fn needs_rehash(&self, config: &PasswordHashConfig) -> bool {
        self.0.needs_rehash(config)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================
