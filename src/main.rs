//! Quotegate application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Open the SQLite quote store
//! 3. Build the authentication gate (clock window, nonce registry, verifier)
//! 4. Build router with open reads and the signed write endpoint
//! 5. Start Axum server

use std::sync::Arc;
use std::time::Duration;

use quotegate::{
    auth::{middleware::AppState, AuthGate, ClockWindow, NonceRegistry, SignatureVerifier},
    config::Config,
    routes,
    storage::Db,
};

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting quotegate on {}", config.bind_addr);

    // Open the quote store
    let db = Db::open(&config.database_path).expect("Failed to open quote database");
    tracing::info!("Quote store at {}", config.database_path);

    // Nonce registry: process-wide, injected into the gate. A TTL of 0 keeps
    // nonces for the process lifetime (unbounded growth, per the minimal
    // design); a positive TTL bounds memory with a periodic sweep.
    let nonces = match config.nonce_ttl_secs {
        0 => Arc::new(NonceRegistry::new()),
        ttl => {
            let registry = Arc::new(NonceRegistry::with_ttl(Some(Duration::from_secs(ttl))));
            registry.start_sweep_task(Duration::from_secs(ttl.max(60)));
            registry
        }
    };

    let gate = AuthGate::new(
        ClockWindow::new(config.tolerance_secs, config.utc_offset),
        nonces,
        SignatureVerifier::new(config.secret_key.as_bytes().to_vec()),
    );

    // Build shared state
    let state = AppState {
        db,
        gate: Arc::new(gate),
        config: Arc::new(config.clone()),
    };

    let app = routes::api_router(&state).with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
