//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod sqlite;

pub use sqlite::SqliteAuthRepository;
