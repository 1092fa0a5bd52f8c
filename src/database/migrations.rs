//! Database migrations for authgate
//!
//! This module contains SQL migrations for the SQLite database schema.

/// SQL statement to create the initial database schema
///
/// The UNIQUE constraint on email is what enforces one-account-per-email
/// under concurrent signups. Callers may pre-check, but the constraint decides.
pub const CREATE_SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Get the migration version
pub fn migration_version() -> i32 {
    1
}
