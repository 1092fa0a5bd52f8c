//! HTTP middleware for authgate
//!
//! This module provides middleware layers for:
//! - The request gate: bearer token validation, once per request
//! - Authorization: route-level authority checks
//! - Request/response logging

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthService;
use crate::database::Database;
use crate::error::AuthError;
use crate::models::AuthenticatedUser;

/// Path prefixes that bypass the token gate entirely
///
/// The public test endpoint is listed by its exact path so its protected
/// sibling under the same prefix still goes through the gate.
pub const PUBLIC_PATHS: &[&str] = &[
    "/api/v1/auth/",
    "/api/v1/test/public",
    "/v2/api-docs",
    "/v3/api-docs",
    "/swagger-ui",
    "/webjars",
    "/health",
];

/// Routes that require an authority, checked after the token gate
const PROTECTED_ROUTES: &[(&str, &str)] = &[("/api/v1/test/protected", "USER")];

/// Token gate middleware
///
/// Runs once per request:
/// 1. Public paths pass through untouched
/// 2. A missing or non-Bearer Authorization header passes through without an
///    identity (whether one is required is the authorizer's decision)
/// 3. A presented bearer token must verify; on failure the handler is never
///    invoked and the response does not say why the token was rejected
/// 4. On success the identity is attached to the request as an extension
pub async fn auth_gate<D: Database + 'static>(
    State(auth): State<Arc<AuthService<D>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ErrorResponse> {
    let path = request.uri().path();

    if PUBLIC_PATHS.iter().any(|p| path.starts_with(p)) {
        return Ok(next.run(request).await);
    }

    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);

    let token = match bearer {
        Some(token) => token,
        None => return Ok(next.run(request).await),
    };

    let user = auth
        .verify_identity(&token)
        .await
        .map_err(ErrorResponse::from_auth_error)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Authorization middleware
///
/// Consults the route metadata table and enforces the required authority.
/// Runs after the token gate, reading the identity the gate attached.
pub async fn authorize(request: Request, next: Next) -> Result<Response, ErrorResponse> {
    let path = request.uri().path();

    if let Some((_, authority)) = PROTECTED_ROUTES.iter().find(|(route, _)| path == *route) {
        match request.extensions().get::<AuthenticatedUser>() {
            None => return Err(ErrorResponse::authentication_required()),
            Some(user) if !user.has_authority(authority) => {
                return Err(ErrorResponse::access_denied())
            }
            Some(_) => {}
        }
    }

    Ok(next.run(request).await)
}

/// Error response returned by middleware and handlers
///
/// All errors share one body shape: `{"error": "<message>"}`.
pub struct ErrorResponse {
    status: StatusCode,
    message: String,
}

impl ErrorResponse {
    /// Map an authentication error to its HTTP response
    ///
    /// Internal failures are logged with their detail and answered with an
    /// opaque 500 so storage or hashing problems never leak to clients.
    pub fn from_auth_error(error: AuthError) -> Self {
        match error {
            AuthError::EmailInUse => Self {
                status: StatusCode::CONFLICT,
                message: error.to_string(),
            },
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::UnknownIdentity => Self {
                status: StatusCode::UNAUTHORIZED,
                message: error.to_string(),
            },
            AuthError::Hash(_) | AuthError::Signing(_) | AuthError::Storage(_) => {
                tracing::error!(error = %error, "Internal failure while handling request");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                }
            }
        }
    }

    fn authentication_required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication required".to_string(),
        }
    }

    fn access_denied() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Access denied".to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

/// Logging middleware function
///
/// Logs request and response details including:
/// - Method and path
/// - Status code
/// - Response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %elapsed.as_millis(),
        "Request completed"
    );

    response
}
