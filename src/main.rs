//! authgate - A minimal JWT bearer-token authentication backend
//!
//! This is the main entry point for the authgate application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use authgate::auth::{AuthService, TokenCodec};
use authgate::config::Config;
use authgate::database::SqliteDatabase;
use authgate::server::{AppState, Server};
use authgate::telemetry::init_tracing;

/// authgate - A minimal JWT bearer-token authentication backend
#[derive(Parser, Debug)]
#[command(name = "authgate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "AUTHGATE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load and validate configuration
    let config = load_config(&args)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Initialize tracing/logging
    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting authgate");

    // Initialize database
    let database = SqliteDatabase::new(&config.database.path).await?;
    let database = Arc::new(database);
    info!(path = %config.database.path, "Database initialized");

    // Initialize authentication service
    let codec = TokenCodec::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let auth = Arc::new(AuthService::new(Arc::clone(&database), codec));
    info!(
        token_ttl_secs = config.auth.token_ttl_secs,
        "Authentication service initialized"
    );

    // Seed an initial account into an empty store
    if config.seed.enabled {
        match auth
            .seed_admin(&config.seed.name, &config.seed.email, &config.seed.password)
            .await
        {
            Ok(true) => info!(email = %config.seed.email, "Seeded initial user"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to seed initial user"),
        }
    }

    // Create application state
    let state = AppState { auth, database };

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), config.cors.clone(), state);
    let shutdown_signal = shutdown_signal();

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    // Run the server
    let result = server.run(shutdown_signal).await;

    info!("authgate shutdown complete");

    result.map_err(Into::into)
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
