//! Application error types for authgate
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Authentication-related errors
///
/// The display messages here are the exact messages returned to clients,
/// so variants that must be indistinguishable externally share a message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    /// Signup attempted with an email that already has an account
    #[error("Email is already in use")]
    EmailInUse,

    /// Signin failed. Covers both unknown email and wrong password so
    /// responses cannot be used to probe which accounts exist.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Token is malformed, carries a bad signature, or has expired
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token verified but its subject no longer resolves to a stored user.
    /// Clients see the same message as InvalidToken.
    #[error("Invalid or expired token")]
    UnknownIdentity,

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// Token signing failed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Storage failure while authenticating
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    /// Unique constraint violated
    #[error("Unique constraint violated")]
    Duplicate,

    /// Connection-level error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(e) => match e {
                rusqlite::Error::SqliteFailure(f, _)
                    if f.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    DbError::Duplicate
                }
                other => DbError::Sqlite(other),
            },
            other => DbError::Connection(other.to_string()),
        }
    }
}

impl From<DbError> for AuthError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::Duplicate => AuthError::EmailInUse,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Application-level error type
///
/// This is the main error type used throughout the application.
/// It aggregates all domain-specific error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
