//! Request and response types for the quote API.

use serde::{Deserialize, Serialize};

/// A stored quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub id: String,
    pub text: String,
}

/// Body of `POST /quote`: the id of the quote to look up.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub id: String,
}

/// Successful lookup response.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote: String,
}
