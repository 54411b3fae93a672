//! Axum application state and the signed-request middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::gate::{AuthGate, AuthHeaders};
use crate::config::Config;
use crate::error::AppError;
use crate::storage::Db;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub gate: Arc<AuthGate>,
    pub config: Arc<Config>,
}

/// Log a gate rejection and pass the error through.
fn rejected(err: AppError) -> AppError {
    tracing::warn!(reason = %err, "Rejected request on protected route");
    err
}

/// Middleware guarding write endpoints: only requests that pass the full
/// authentication pipeline reach the inner handler, with their body intact.
pub async fn require_signed(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let auth = AuthHeaders::from_header_map(&parts.headers).map_err(rejected)?;
    state.gate.admit(&auth).map_err(rejected)?;

    // Bounded read into memory. A client that overruns the limit or
    // disconnects mid-read fails here; its nonce is already consumed, which
    // keeps the replay guarantee independent of body delivery.
    let bytes = axum::body::to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|_| rejected(AppError::MalformedBody))?;

    state.gate.verify_body(&auth, &bytes).map_err(rejected)?;

    // Canonicalization worked on a copy; hand the handler the bytes exactly
    // as received.
    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}
