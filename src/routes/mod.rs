//! API route handlers.

pub mod quote;

use crate::auth::middleware::{require_signed, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// GET /ping — health check
async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

/// Build the API router with all endpoints.
///
/// `POST /quote` is the write endpoint and sits behind the signed-request
/// middleware; everything else is open.
pub fn api_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/quote", post(quote::lookup_quote))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_signed,
        ));

    Router::new()
        .route("/ping", get(ping))
        .route("/quotes", get(quote::list_quotes))
        .merge(protected)
}
