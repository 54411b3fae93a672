//! The authentication pipeline for the protected route.
//!
//! Checks run in a fixed order and short-circuit on first failure:
//!
//! 1. required headers present (`Timestamp`, `Ref`, `Signature`)
//! 2. timestamp within the freshness window
//! 3. nonce never seen before (recorded here, before any body work)
//! 4. body canonicalized
//! 5. token signature verified against the canonical body
//!
//! A stale request is rejected before its nonce is consumed; a replayed
//! nonce is rejected even if the signature would have verified.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::canonical::canonicalize;
use crate::auth::nonce::NonceRegistry;
use crate::auth::signature::{SignatureVerifier, SignedToken};
use crate::auth::timestamp::ClockWindow;
use crate::error::AppError;

/// The three required header values, extracted once per request.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub timestamp: String,
    pub reference: String,
    pub token: String,
}

impl AuthHeaders {
    /// Pull `Timestamp`, `Ref`, and `Signature` out of the header map.
    /// A missing or empty header is `MissingHeaders`.
    pub fn from_header_map(headers: &HeaderMap) -> Result<Self, AppError> {
        let get = |name: &str| -> Option<String> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };

        match (get("Timestamp"), get("Ref"), get("Signature")) {
            (Some(timestamp), Some(reference), Some(token)) => Ok(Self {
                timestamp,
                reference,
                token,
            }),
            _ => Err(AppError::MissingHeaders),
        }
    }
}

/// Orchestrates the per-request authentication checks.
///
/// Holds no per-request state; the nonce registry is the only shared
/// mutable resource, and it synchronizes internally.
pub struct AuthGate {
    window: ClockWindow,
    nonces: Arc<NonceRegistry>,
    verifier: SignatureVerifier,
}

impl AuthGate {
    pub fn new(window: ClockWindow, nonces: Arc<NonceRegistry>, verifier: SignatureVerifier) -> Self {
        Self {
            window,
            nonces,
            verifier,
        }
    }

    /// Pre-body checks: timestamp freshness, then nonce uniqueness.
    ///
    /// On success the nonce is recorded as used. A request whose body read
    /// later fails has still consumed its nonce, which is deliberate: the
    /// replay guarantee must not depend on the body arriving.
    pub fn admit(&self, headers: &AuthHeaders) -> Result<(), AppError> {
        if !self.window.is_fresh(&headers.timestamp) {
            return Err(AppError::InvalidTimestamp);
        }
        if !self.nonces.check_and_record(&headers.reference) {
            return Err(AppError::ReplayedNonce);
        }
        Ok(())
    }

    /// Post-body checks: canonicalize the body and verify the token binds it.
    pub fn verify_body(&self, headers: &AuthHeaders, raw_body: &[u8]) -> Result<(), AppError> {
        let canonical = canonicalize(raw_body)?;
        let token = SignedToken::parse(&headers.token)?;
        if !self.verifier.verify(&token, &canonical)? {
            return Err(AppError::SignatureMismatch);
        }
        Ok(())
    }

    /// Run the full pipeline over an in-memory body.
    pub fn authenticate(&self, headers: &AuthHeaders, raw_body: &[u8]) -> Result<(), AppError> {
        self.admit(headers)?;
        self.verify_body(headers, raw_body)
    }

    pub fn nonces(&self) -> &Arc<NonceRegistry> {
        &self.nonces
    }
}
