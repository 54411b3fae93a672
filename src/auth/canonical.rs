//! Canonical JSON body reconstruction.
//!
//! A signed token binds the request body in its whitespace-stripped form, so
//! two formattings of the same JSON document must canonicalize to identical
//! bytes. Only whitespace is insignificant: serde_json's `preserve_order`
//! feature keeps object keys in the order they appear in the input, and its
//! `arbitrary_precision` feature carries number literals through unchanged
//! (`1.50` stays `1.50`, integers wider than 64 bits are not coerced).

use crate::error::AppError;

/// Re-serialize a raw JSON body with no insignificant whitespace.
///
/// Semantic content and key order are unchanged. Returns `MalformedBody` if
/// the input is not valid JSON. Pure: the caller's buffer is never mutated.
pub fn canonicalize(raw: &[u8]) -> Result<Vec<u8>, AppError> {
    let value: serde_json::Value =
        serde_json::from_slice(raw).map_err(|_| AppError::MalformedBody)?;
    serde_json::to_vec(&value).map_err(|e| AppError::Internal(format!("JSON error: {}", e)))
}
