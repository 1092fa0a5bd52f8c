//! Authentication service
//!
//! This module provides the main authentication interface for the application.
//! It handles signup, signin, token verification, and bootstrap seeding.

use std::sync::Arc;

use crate::database::Database;
use crate::error::AuthError;
use crate::models::{AuthResponse, AuthenticatedUser, SigninRequest, SignupRequest, User};

use super::password::{hash_password, verify_password};
use super::token::TokenCodec;

/// Authentication service
///
/// Registers accounts, verifies credentials, and issues bearer tokens.
pub struct AuthService<D: Database> {
    db: Arc<D>,
    codec: TokenCodec,
}

impl<D: Database + 'static> AuthService<D> {
    /// Create a new authentication service
    pub fn new(db: Arc<D>, codec: TokenCodec) -> Self {
        Self { db, codec }
    }

    /// Register a new account and issue its first token
    ///
    /// The email pre-check gives a fast answer in the common case; the unique
    /// index on email is what actually decides concurrent signups, so a lost
    /// race surfaces as `EmailInUse` just like a plain duplicate.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        if self.db.email_exists(&request.email).await? {
            return Err(AuthError::EmailInUse);
        }

        // Argon2 is deliberately CPU-heavy, keep it off the async workers
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        let user = User::new(&request.name, &request.email, &password_hash);
        self.db.insert_user(&user).await?;

        tracing::info!(email = %request.email, "New account registered");
        self.issue_for(&request.email)
    }

    /// Verify credentials and issue a token
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`,
    /// so a caller cannot probe which accounts exist.
    pub async fn signin(&self, request: SigninRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = request.password;
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_for(&user.email)
    }

    /// Validate a bearer token and resolve its subject to an identity
    ///
    /// A token whose subject no longer exists fails with `UnknownIdentity`,
    /// which clients cannot tell apart from an invalid token.
    pub async fn verify_identity(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.codec.decode(token)?;

        let user = self
            .db
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        Ok(AuthenticatedUser::from(&user))
    }

    /// Seed an initial account into an empty store
    ///
    /// Returns `Ok(true)` if a user was created, `Ok(false)` if the store
    /// already had accounts or another instance won the insert race.
    pub async fn seed_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        if self.db.count_users().await? > 0 {
            return Ok(false);
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        let user = User::new(name, email, &password_hash);
        match self.db.insert_user(&user).await {
            Ok(_) => Ok(true),
            Err(crate::error::DbError::Duplicate) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn issue_for(&self, email: &str) -> Result<AuthResponse, AuthError> {
        let issued = self.codec.issue(email)?;
        Ok(AuthResponse::bearer(issued.token, self.codec.ttl_secs()))
    }
}
