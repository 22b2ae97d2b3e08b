//! SQLite Repository Implementation
//!
//! The only module that touches the storage driver. Every statement is
//! parameterized; nothing here ever builds SQL from untrusted input, and no
//! operation accepts or returns a plaintext password.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Default per-operation deadline
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait for a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long SQLite may retry on a locked database
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed user repository
///
/// Uniqueness of the canonical user name is enforced by the schema's UNIQUE
/// constraint; a violation surfaces as [`AuthError::UserNameTaken`]. All
/// operations run under a deadline and fail with
/// [`AuthError::StorageTimeout`] instead of hanging.
#[derive(Clone)]
pub struct SqliteAuthRepository {
    pool: SqlitePool,
    op_timeout: Duration,
}

impl SqliteAuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Override the per-operation deadline
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Open a bounded connection pool for the given target
    ///
    /// The connection string is an opaque handle owned by the caller's
    /// bootstrap (e.g. `sqlite://users.db`).
    pub async fn connect(url: &str) -> AuthResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create the users table and its uniqueness constraint
    ///
    /// Idempotent; safe to run at every startup.
    pub async fn migrate(&self) -> AuthResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id             TEXT PRIMARY KEY NOT NULL,
                user_name           TEXT NOT NULL,
                user_name_canonical TEXT NOT NULL UNIQUE,
                password_hash       TEXT NOT NULL,
                created_at          TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database schema ready");

        Ok(())
    }

    /// Run a storage future under the per-operation deadline
    async fn with_deadline<T>(
        &self,
        op: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::StorageTimeout),
        }
    }
}

impl UserRepository for SqliteAuthRepository {
    async fn create(
        &self,
        user_name: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<User> {
        let user = User::new(user_name.clone(), password_hash.clone());

        let result = self
            .with_deadline(async {
                let mut tx = self.pool.begin().await?;

                sqlx::query(
                    r#"
                    INSERT INTO users (
                        user_id,
                        user_name,
                        user_name_canonical,
                        password_hash,
                        created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(user.user_id.to_string())
                .bind(user.user_name.original())
                .bind(user.user_name.canonical())
                .bind(user.password_hash.as_phc_string())
                .bind(user.created_at)
                .execute(&mut *tx)
                .await?;

                // Dropping the transaction on any earlier error rolls back
                tx.commit().await?;
                Ok(())
            })
            .await;

        match result {
            Ok(()) => {
                tracing::info!(user_id = %user.user_id, "User record created");
                Ok(user)
            }
            Err(AuthError::Database(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                Err(AuthError::UserNameTaken)
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = self
            .with_deadline(
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT
                        user_id,
                        user_name,
                        password_hash,
                        created_at
                    FROM users
                    WHERE user_name_canonical = ?1
                    "#,
                )
                .bind(user_name.canonical())
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    user_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let uuid = Uuid::parse_str(&self.user_id)
            .map_err(|_| AuthError::Internal("Invalid user id in database".to_string()))?;

        Ok(User {
            user_id: UserId::from_uuid(uuid),
            user_name: UserName::from_db(&self.user_name),
            password_hash: UserPassword::from_stored(self.password_hash),
            created_at: self.created_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
