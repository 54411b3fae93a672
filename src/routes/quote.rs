//! Quote API endpoints.

use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::models::{QuoteRequest, QuoteResponse};
use crate::storage;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GET /quotes — List all quotes
pub async fn list_quotes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quotes = storage::quote::list_quotes(&state.db).await?;
    Ok(Json(quotes))
}

/// POST /quote — Look up a quote by id (signed requests only)
///
/// The authentication middleware has already verified the token against this
/// body; by the time we parse it here it is known-valid JSON.
pub async fn lookup_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Response, AppError> {
    match storage::quote::find_quote(&state.db, &request.id).await? {
        Some(text) => {
            tracing::info!(action = "quote_lookup", quote_id = %request.id, "Quote served");
            Ok(Json(QuoteResponse { quote: text }).into_response())
        }
        None => {
            tracing::info!(action = "quote_lookup", quote_id = %request.id, "No quote found");
            Ok(Json(json!({ "message": "No quote found" })).into_response())
        }
    }
}
