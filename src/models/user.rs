//! User domain models
//!
//! This module defines the stored user account and the request-scoped
//! identity attached to authenticated requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authority granted to every registered account
pub const AUTHORITY_USER: &str = "USER";

/// User account stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row ID, assigned by the database on insert
    pub id: Option<i64>,

    /// Display name
    pub name: String,

    /// Email address, unique across all accounts
    pub email: String,

    /// Hashed password (argon2id, PHC format)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user pending insertion
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// Identity attached to a request after its bearer token has been verified
///
/// Carried as an axum request extension so handlers and the authorization
/// middleware read it explicitly from the request instead of any shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Email of the verified account
    pub email: String,

    /// Authorities granted to the account
    pub authorities: Vec<String>,
}

impl AuthenticatedUser {
    /// Check whether this identity carries a specific authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            authorities: vec![AUTHORITY_USER.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: New users have no ID until inserted
    #[test]
    fn test_user_new_has_no_id() {
        let user = User::new("Alice", "alice@example.com", "$argon2id$hash");
        assert!(user.id.is_none());
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
    }

    // Test 2: Every account converts to an identity with the USER authority
    #[test]
    fn test_authenticated_user_from_user() {
        let user = User::new("Alice", "alice@example.com", "hash");
        let identity = AuthenticatedUser::from(&user);

        assert_eq!(identity.email, "alice@example.com");
        assert!(identity.has_authority(AUTHORITY_USER));
    }

    // Test 3: has_authority rejects missing authorities
    #[test]
    fn test_has_authority_missing() {
        let identity = AuthenticatedUser {
            email: "alice@example.com".to_string(),
            authorities: vec![AUTHORITY_USER.to_string()],
        };

        assert!(!identity.has_authority("ADMIN"));
        assert!(!identity.has_authority("user"));
    }
}
