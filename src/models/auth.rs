//! Request and response bodies for the authentication endpoints

use serde::{Deserialize, Serialize};

/// Body of a signup request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name for the new account
    pub name: String,

    /// Email address, must not already have an account
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Body of a signin request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    /// Email of the account
    pub email: String,

    /// Plaintext password to verify
    pub password: String,
}

/// Successful authentication response carrying a freshly issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed JWT to present as `Authorization: Bearer <token>`
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl AuthResponse {
    /// Create a bearer response for a freshly issued token
    pub fn bearer(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
