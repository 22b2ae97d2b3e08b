//! Request payload validation
//!
//! Pure checks on untrusted input, performed before any credential work.
//! Field *values* are never included in errors or logs; they may be secrets.

use crate::error::{AuthError, AuthResult};

/// Check that every named field is present and non-empty
///
/// Fails with a `Validation` error listing the offending field names.
pub fn validate_required(fields: &[(&str, &str)]) -> AuthResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )))
    }
}
