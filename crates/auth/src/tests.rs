//! End-to-end tests for the credential core
//!
//! Drives the service facade against an in-memory SQLite store and the
//! in-memory rate limiter, the same wiring the excluded HTTP layer uses.

use std::sync::Arc;

use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig};
use sqlx::sqlite::SqlitePoolOptions;

use crate::application::config::AuthConfig;
use crate::application::service::AuthService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::AuthError;
use crate::infra::sqlite::SqliteAuthRepository;
use kernel::error::kind::ErrorKind;

type TestService = AuthService<SqliteAuthRepository, InMemoryRateLimitStore>;

async fn memory_repo(config: &AuthConfig) -> Arc<SqliteAuthRepository> {
    // Single connection: every borrower sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let repo = Arc::new(
        SqliteAuthRepository::new(pool).with_op_timeout(config.storage_op_timeout),
    );
    repo.migrate().await.unwrap();
    repo
}

async fn service_with(config: AuthConfig) -> (Arc<TestService>, Arc<SqliteAuthRepository>) {
    let repo = memory_repo(&config).await;
    let limits = Arc::new(InMemoryRateLimitStore::new());
    let service =
        AuthService::new(Arc::clone(&repo), limits, Arc::new(config)).unwrap();
    (Arc::new(service), repo)
}

async fn service() -> (Arc<TestService>, Arc<SqliteAuthRepository>) {
    service_with(AuthConfig::development()).await
}

fn key() -> String {
    "203.0.113.7".to_string()
}

#[cfg(test)]
mod register_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_authenticate_roundtrip() {
        let (service, _) = service().await;

        let registered = service
            .register("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let authed = service
            .authenticate("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        assert_eq!(authed.user_id, registered.user_id);
    }

    #[tokio::test]
    async fn test_register_is_case_preserving_but_unique_case_insensitively() {
        let (service, repo) = service().await;

        service
            .register("Alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        // Same name in another case: conflict
        let result = service
            .register("ALICE01".into(), "Other1Pass!".into(), key())
            .await;
        assert!(matches!(result, Err(AuthError::UserNameTaken)));

        // Stored record preserves the original casing
        let found = repo
            .find_by_user_name(&UserName::new("alice01").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_name.original(), "Alice01");
    }

    #[tokio::test]
    async fn test_duplicate_registration_leaves_first_record_intact() {
        let (service, _) = service().await;

        let first = service
            .register("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let second = service
            .register("alice01".into(), "Different1Pw!".into(), key())
            .await;
        assert!(matches!(second, Err(AuthError::UserNameTaken)));

        // The original credentials still authenticate to the original id
        let authed = service
            .authenticate("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
        assert_eq!(authed.user_id, first.user_id);
    }

    #[tokio::test]
    async fn test_invalid_username_is_validation_error() {
        let (service, _) = service().await;

        let result = service
            .register(
                "x'; DROP TABLE users; --".into(),
                "Str0ngPass!".into(),
                key(),
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_weak_password_is_validation_error() {
        let (service, _) = service().await;

        for weak in ["short1A", "nouppercase1", "NODIGITSALLCAPS", "NoDigitsHere"] {
            let err = service
                .register("alice01".into(), weak.into(), key())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "password: {weak}");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_are_listed() {
        let (service, _) = service().await;

        let err = service
            .register("".into(), "".into(), key())
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("username"));
        assert!(msg.contains("password"));
    }

    #[tokio::test]
    async fn test_validation_failure_has_no_side_effects() {
        // Limit of 1: if validation consumed quota or touched storage, the
        // follow-up valid registration would fail
        let mut config = AuthConfig::development();
        config.registration_limit = RateLimitConfig::new(1, 60);
        let (service, repo) = service_with(config).await;

        let err = service
            .register("alice01".into(), "weak".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(
            repo.find_by_user_name(&UserName::new("alice01").unwrap())
                .await
                .unwrap()
                .is_none()
        );

        service
            .register("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_username_admits_exactly_one() {
        let mut config = AuthConfig::development();
        // Generous limit so only the uniqueness constraint arbitrates
        config.registration_limit = RateLimitConfig::new(100, 60);
        let (service, _) = service_with(config).await;

        let mut handles = Vec::new();
        for i in 0..6 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .register("contested".into(), "Str0ngPass!".into(), format!("client-{i}"))
                    .await
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AuthError::UserNameTaken) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 5);
    }
}

#[cfg(test)]
mod authenticate_tests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_password_fails_generically() {
        let (service, _) = service().await;

        service
            .register("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let err = service
            .authenticate("alice01".into(), "wrongpass".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let (service, _) = service().await;

        service
            .register("real_user".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let unknown = service
            .authenticate("nonexistent_user".into(), "anything".into(), key())
            .await
            .unwrap_err();
        let wrong = service
            .authenticate("real_user".into(), "Wr0ngPassword!".into(), key())
            .await
            .unwrap_err();

        // Identical kind and identical message: nothing to enumerate on
        assert_eq!(unknown.kind(), wrong.kind());
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.kind(), ErrorKind::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_malformed_username_fails_like_wrong_password() {
        let (service, _) = service().await;

        let err = service
            .authenticate("not a valid name!!".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_authenticate_accepts_any_username_case() {
        let (service, _) = service().await;

        let registered = service
            .register("Alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let authed = service
            .authenticate("ALICE01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
        assert_eq!(authed.user_id, registered.user_id);
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[tokio::test]
    async fn test_registration_rate_limit_blocks_before_storage() {
        let mut config = AuthConfig::development();
        config.registration_limit = RateLimitConfig::new(2, 60);
        let (service, repo) = service_with(config).await;

        service
            .register("user-one".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
        service
            .register("user-two".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();

        let err = service
            .register("user-three".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);

        // Denied before any storage work: nothing was persisted
        assert!(
            repo.find_by_user_name(&UserName::new("user-three").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_login_rate_limit_applies_to_unknown_users_too() {
        let mut config = AuthConfig::development();
        config.login_limit = RateLimitConfig::new(3, 60);
        let (service, _) = service_with(config).await;

        // Limiter is keyed by client identity alone; a nonexistent username
        // burns quota exactly like a real one
        for _ in 0..3 {
            let err = service
                .authenticate("ghost".into(), "Wr0ngPass1!".into(), key())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        }

        let err = service
            .authenticate("ghost".into(), "Wr0ngPass1!".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_endpoint_classes_have_separate_budgets() {
        let mut config = AuthConfig::development();
        config.registration_limit = RateLimitConfig::new(1, 60);
        config.login_limit = RateLimitConfig::new(5, 60);
        let (service, _) = service_with(config).await;

        // Exhaust the registration budget for this client
        service
            .register("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
        let err = service
            .register("bob-002".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);

        // Login for the same client still has its own budget
        service
            .authenticate("alice01".into(), "Str0ngPass!".into(), key())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_distinct_clients_do_not_share_quota() {
        let mut config = AuthConfig::development();
        config.registration_limit = RateLimitConfig::new(1, 60);
        let (service, _) = service_with(config).await;

        service
            .register("alice01".into(), "Str0ngPass!".into(), "198.51.100.1".into())
            .await
            .unwrap();

        // A different client key is unaffected by the first client's usage
        service
            .register("bob-002".into(), "Str0ngPass!".into(), "198.51.100.2".into())
            .await
            .unwrap();
    }
}
