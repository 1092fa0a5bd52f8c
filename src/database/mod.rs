//! Database layer for authgate
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::User;

/// Database trait for credential persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a new user, returning the assigned row ID
    ///
    /// Fails with `DbError::Duplicate` if the email is already taken. The
    /// unique index decides races between concurrent inserts of the same email.
    async fn insert_user(&self, user: &User) -> Result<i64, DbError>;

    /// Look up a user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Check whether an account with this email exists
    async fn email_exists(&self, email: &str) -> Result<bool, DbError>;

    /// Count all stored users (used for bootstrap seeding)
    async fn count_users(&self) -> Result<u64, DbError>;
}
