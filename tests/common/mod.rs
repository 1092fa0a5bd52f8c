//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use authgate::auth::{AuthService, TokenCodec};
use authgate::config::CorsConfig;
use authgate::database::SqliteDatabase;
use authgate::server::{build_router, AppState};

/// Signing secret shared by all test servers
pub const TEST_SECRET: &str = "test-secret";

/// Token lifetime used by all test servers
pub const TEST_TTL_SECS: i64 = 3600;

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test authentication service over the given database
pub fn create_test_auth_service(db: Arc<SqliteDatabase>) -> Arc<AuthService<SqliteDatabase>> {
    let codec = TokenCodec::new(TEST_SECRET, TEST_TTL_SECS);
    Arc::new(AuthService::new(db, codec))
}

/// Create a token codec matching the test servers' signing key
pub fn create_test_codec(ttl_secs: i64) -> TokenCodec {
    TokenCodec::new(TEST_SECRET, ttl_secs)
}

/// Create a test application state backed by an in-memory database
pub async fn create_test_state() -> AppState<SqliteDatabase> {
    let database = create_test_database().await;
    let auth = create_test_auth_service(Arc::clone(&database));

    AppState { auth, database }
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = build_router(state, &CorsConfig::default())
        .layer(tower_http::trace::TraceLayer::new_for_http());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start (100ms is sufficient for slow CI systems)
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// Sign up a user through the HTTP API and return the access token
pub async fn signup_user(addr: std::net::SocketAddr, name: &str, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/api/v1/auth/signup", addr))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}
