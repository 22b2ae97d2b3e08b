//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! ログイン、監査ログ、管理運用に使用される。
//!
//! ## 設計方針
//! - ASCII文字のみ許可（A-Z, a-z, 0-9, _ -）
//! - 大文字入力は受け付けるが、canonical（正規形）は小文字
//! - NFKC正規化 → trim → 小文字化 → 検証 の順で処理
//!
//! ## 不変条件
//! - 長さ: 3〜50文字（正規化後）
//! - 文字種: 英数字・アンダースコア・ハイフンのみ

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too short (minimum: USER_NAME_MIN_LENGTH)
    TooShort { length: usize, min: usize },

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// User name contains a character outside the whitelist
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooShort { length, min } => {
                write!(f, "User name is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "User name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "Invalid character '{char}' at position {position}. Only letters, digits, _ and - are allowed"
                )
            }
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
///
/// # Invariants
/// - Non-empty after normalization
/// - Length between USER_NAME_MIN_LENGTH and USER_NAME_MAX_LENGTH
/// - Contains only ASCII alphanumeric characters, `_` and `-`
///
/// # Storage
/// - `original`: The user's input (trimmed, NFKC normalized, preserves case)
/// - `canonical`: Lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    /// Original user input (preserves case)
    original: String,
    /// Canonical form (lowercase) for uniqueness
    canonical: String,
}

impl UserName {
    /// Create a new UserName from raw input
    ///
    /// Applies normalization (NFKC, trim) and validates.
    /// Preserves case in original, stores lowercase in canonical.
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = Self::normalize_original(input.as_ref());
        let canonical = original.to_lowercase();
        Self::validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (normalized, lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Alias for canonical() for compatibility
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        }
    }

    /// Normalize input string (trim and NFKC, preserve case)
    fn normalize_original(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    /// Validate the normalized user name
    fn validate(canonical: &str) -> Result<(), UserNameError> {
        // Check empty
        if canonical.is_empty() {
            return Err(UserNameError::Empty);
        }

        // Check length
        let length = canonical.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        // Check all characters are in the whitelist
        for (pos, ch) in canonical.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(UserNameError::InvalidCharacter {
                    char: ch,
                    position: pos,
                });
            }
        }

        Ok(())
    }

    /// Check if character is valid in a (canonical, lowercase) user name
    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = UserName::new("  alice  ").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_lowercase_canonical_preserves_original() {
            let name = UserName::new("ALICE").unwrap();
            assert_eq!(name.as_str(), "alice");
            assert_eq!(name.original(), "ALICE");
        }

        #[test]
        fn test_mixed_case() {
            let name = UserName::new("AlIcE_123").unwrap();
            assert_eq!(name.as_str(), "alice_123");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) should normalize to ASCII
            let name = UserName::new("Ａlice");
            assert!(name.is_ok());
            assert_eq!(name.unwrap().as_str(), "alice");
        }

        #[test]
        fn test_idempotent() {
            let input = "  AlIcE-123  ";
            let first = UserName::new(input).unwrap();
            let second = UserName::new(first.as_str()).unwrap();
            assert_eq!(first.canonical(), second.canonical());
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert!(matches!(UserName::new(""), Err(UserNameError::Empty)));
        }

        #[test]
        fn test_whitespace_only_fails() {
            assert!(matches!(UserName::new("   "), Err(UserNameError::Empty)));
        }

        #[test]
        fn test_too_short() {
            assert!(matches!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            ));
        }

        #[test]
        fn test_minimum_length() {
            assert!(UserName::new("abc").is_ok());
        }

        #[test]
        fn test_maximum_length() {
            let input = "a".repeat(USER_NAME_MAX_LENGTH);
            assert!(UserName::new(&input).is_ok());
        }

        #[test]
        fn test_too_long() {
            let input = "a".repeat(USER_NAME_MAX_LENGTH + 1);
            assert!(matches!(
                UserName::new(&input),
                Err(UserNameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_alphanumeric() {
            assert!(UserName::new("alice123").is_ok());
        }

        #[test]
        fn test_valid_underscore() {
            assert!(UserName::new("alice_bob").is_ok());
        }

        #[test]
        fn test_valid_hyphen() {
            assert!(UserName::new("alice-bob").is_ok());
        }

        #[test]
        fn test_invalid_dot() {
            assert!(matches!(
                UserName::new("alice.bob"),
                Err(UserNameError::InvalidCharacter { char: '.', .. })
            ));
        }

        #[test]
        fn test_invalid_at_sign() {
            assert!(matches!(
                UserName::new("alice@bob"),
                Err(UserNameError::InvalidCharacter { char: '@', .. })
            ));
        }

        #[test]
        fn test_invalid_whitespace_in_middle() {
            assert!(matches!(
                UserName::new("alice bob"),
                Err(UserNameError::InvalidCharacter { char: ' ', .. })
            ));
        }

        #[test]
        fn test_invalid_unicode() {
            assert!(matches!(
                UserName::new("日本語です"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }

        #[test]
        fn test_invalid_emoji() {
            assert!(matches!(
                UserName::new("alice🎉"),
                Err(UserNameError::InvalidCharacter { .. })
            ));
        }

        #[test]
        fn test_injection_style_input_rejected() {
            let result = UserName::new("x'; DROP TABLE users; --");
            assert!(matches!(
                result,
                Err(UserNameError::InvalidCharacter { char: '\'', .. })
            ));
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = UserName::new("Alice").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"Alice\"");
        }

        #[test]
        fn test_deserialize() {
            let name: UserName = serde_json::from_str("\"alice\"").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_deserialize_invalid() {
            let result: Result<UserName, _> = serde_json::from_str("\"ab\""); // too short
            assert!(result.is_err());
        }
    }

    mod display_and_debug {
        use super::*;

        #[test]
        fn test_display_shows_original() {
            let name = UserName::new("Alice").unwrap();
            assert_eq!(format!("{}", name), "Alice");
        }

        #[test]
        fn test_debug() {
            let name = UserName::new("alice").unwrap();
            let debug = format!("{:?}", name);
            assert!(debug.contains("UserName"));
            assert!(debug.contains("alice"));
        }
    }

    mod conversions {
        use super::*;

        #[test]
        fn test_try_from_string() {
            let name: Result<UserName, _> = "alice".to_string().try_into();
            assert!(name.is_ok());
        }

        #[test]
        fn test_into_string() {
            let name = UserName::new("Alice").unwrap();
            let s: String = name.into();
            assert_eq!(s, "Alice");
        }

        #[test]
        fn test_from_db_round_trip() {
            let name = UserName::new("Alice").unwrap();
            let restored = UserName::from_db(name.original());
            assert_eq!(restored.canonical(), "alice");
            assert_eq!(restored.original(), "Alice");
        }
    }
}
