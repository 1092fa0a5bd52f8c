//! HTTP router for authgate
//!
//! This module defines the axum router that handles all HTTP requests.
//! It provides routes for:
//! - Health checks
//! - Signup and signin
//! - Public and protected test endpoints

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};

use super::middleware::{auth_gate, authorize, logging_middleware, ErrorResponse};
use crate::auth::AuthService;
use crate::config::CorsConfig;
use crate::database::Database;
use crate::models::{AuthenticatedUser, SigninRequest, SignupRequest};

/// Shared application state
pub struct AppState<D: Database> {
    /// Authentication service
    pub auth: Arc<AuthService<D>>,

    /// Database
    pub database: Arc<D>,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            database: Arc::clone(&self.database),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the main application router
///
/// Layer order (outermost first): logging, CORS, token gate, authorizer.
/// The gate attaches identities, the authorizer enforces them.
pub fn build_router<D: Database + 'static>(state: AppState<D>, cors: &CorsConfig) -> Router {
    Router::new()
        // Health endpoint (no auth required)
        .route("/health", get(health_handler))
        // Authentication routes
        .route("/api/v1/auth/signup", post(signup_handler::<D>))
        .route("/api/v1/auth/signin", post(signin_handler::<D>))
        // Test routes
        .route("/api/v1/test/public", get(public_handler))
        .route("/api/v1/test/protected", get(protected_handler))
        .layer(middleware::from_fn(authorize))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth),
            auth_gate::<D>,
        ))
        .layer(cors_layer(cors))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Build the CORS layer from configuration
///
/// Origins are listed explicitly because credentials are allowed, which
/// rules out wildcards. Request headers are mirrored back.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Signup endpoint handler
async fn signup_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let response = state
        .auth
        .signup(request)
        .await
        .map_err(ErrorResponse::from_auth_error)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Signin endpoint handler
async fn signin_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<SigninRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let response = state
        .auth
        .signin(request)
        .await
        .map_err(ErrorResponse::from_auth_error)?;

    Ok((StatusCode::OK, Json(response)))
}

/// Public test endpoint handler
async fn public_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "This is a public endpoint"
    }))
}

/// Protected test endpoint handler
///
/// The identity extension is guaranteed by the authorizer for this route.
async fn protected_handler(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "This is a protected endpoint",
        "email": user.email
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCodec;
    use crate::database::MockDatabase;
    use crate::error::DbError;
    use crate::models::User;
    use axum_test::TestServer;

    fn create_test_state(mock_db: MockDatabase) -> AppState<MockDatabase> {
        let db = Arc::new(mock_db);
        let codec = TokenCodec::new("test-secret", 3600);
        let auth = Arc::new(AuthService::new(Arc::clone(&db), codec));

        AppState { auth, database: db }
    }

    fn create_test_server(mock_db: MockDatabase) -> TestServer {
        let state = create_test_state(mock_db);
        let app = build_router(state, &CorsConfig::default());
        TestServer::new(app).unwrap()
    }

    // Test 1: Health endpoint returns OK
    #[tokio::test]
    async fn test_health_endpoint_returns_ok() {
        let server = create_test_server(MockDatabase::new());

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert!(!body.version.is_empty());
    }

    // Test 2: Signup returns 201 with a bearer token
    #[tokio::test]
    async fn test_signup_created() {
        let mut mock_db = MockDatabase::new();
        mock_db.expect_email_exists().returning(|_| Ok(false));
        mock_db.expect_insert_user().returning(|_| Ok(1));

        let server = create_test_server(mock_db);

        let response = server
            .post("/api/v1/auth/signup")
            .json(&serde_json::json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "secret123"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert!(!body["access_token"].as_str().unwrap().is_empty());
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
    }

    // Test 3: Signup with a taken email returns 409
    #[tokio::test]
    async fn test_signup_conflict() {
        let mut mock_db = MockDatabase::new();
        mock_db.expect_email_exists().returning(|_| Ok(true));

        let server = create_test_server(mock_db);

        let response = server
            .post("/api/v1/auth/signup")
            .json(&serde_json::json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "secret123"
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Email is already in use");
    }

    // Test 4: Signin with bad credentials returns 401 with one shared message
    #[tokio::test]
    async fn test_signin_unauthorized() {
        let mut mock_db = MockDatabase::new();
        mock_db.expect_find_user_by_email().returning(|_| Ok(None));

        let server = create_test_server(mock_db);

        let response = server
            .post("/api/v1/auth/signin")
            .json(&serde_json::json!({
                "email": "nobody@example.com",
                "password": "whatever"
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid email or password");
    }

    // Test 5: Public test endpoint needs no credentials
    #[tokio::test]
    async fn test_public_endpoint() {
        let server = create_test_server(MockDatabase::new());

        let response = server.get("/api/v1/test/public").await;

        response.assert_status_ok();
    }

    // Test 6: Protected endpoint accepts a valid token
    #[tokio::test]
    async fn test_protected_endpoint_with_token() {
        let mut mock_db = MockDatabase::new();
        mock_db
            .expect_find_user_by_email()
            .returning(|_| Ok(Some(User::new("Alice", "alice@example.com", "hash"))));

        let server = create_test_server(mock_db);
        let token = TokenCodec::new("test-secret", 3600)
            .issue("alice@example.com")
            .unwrap()
            .token;

        let response = server
            .get("/api/v1/test/protected")
            .add_header(
                "Authorization".parse().unwrap(),
                format!("Bearer {}", token).parse().unwrap(),
            )
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["email"], "alice@example.com");
    }

    // Test 7: Protected endpoint rejects requests without credentials
    #[tokio::test]
    async fn test_protected_endpoint_without_token() {
        let server = create_test_server(MockDatabase::new());

        let response = server.get("/api/v1/test/protected").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Authentication required");
    }

    // Test 8: Storage failures surface as an opaque 500
    #[tokio::test]
    async fn test_signup_storage_failure_is_opaque() {
        let mut mock_db = MockDatabase::new();
        mock_db
            .expect_email_exists()
            .returning(|_| Err(DbError::Connection("connection closed".to_string())));

        let server = create_test_server(mock_db);

        let response = server
            .post("/api/v1/auth/signup")
            .json(&serde_json::json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "secret123"
            }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
    }
}
