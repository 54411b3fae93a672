//! HMAC-SHA256 verification of compact signed tokens.
//!
//! The `Signature` header carries a three-segment `header.payload.signature`
//! token (each segment base64url, no padding). The signature segment is the
//! HMAC-SHA256 of `header || "." || payload` under the shared secret, and the
//! payload segment must decode to the canonical form of the request body.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// A parsed compact token. Borrows the raw header value; segments are kept
/// encoded until verification needs them.
#[derive(Debug, Clone, Copy)]
pub struct SignedToken<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> SignedToken<'a> {
    /// Split a raw token into its three segments.
    ///
    /// Anything other than exactly three dot-separated segments is
    /// `MalformedToken`.
    pub fn parse(raw: &'a str) -> Result<Self, AppError> {
        let mut segments = raw.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AppError::MalformedToken);
        };
        Ok(Self {
            header,
            payload,
            signature,
        })
    }

    /// The signed material: the two non-signature segments rejoined with a
    /// literal dot.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

/// Verifies signed tokens against canonical request bodies.
///
/// Sole holder of the shared secret; constructed once at startup from
/// configuration.
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify `token` against `canonical_body`.
    ///
    /// Returns `Ok(true)` only if the signature segment matches the computed
    /// HMAC *and* the payload segment decodes to exactly `canonical_body`.
    /// A payload that fails to decode is `MalformedToken` rather than a
    /// mismatch; that branch is only reachable with a valid signature, so it
    /// indicates a broken signing client, not a forgery.
    ///
    /// Both equality checks are constant-time: digests derived from the
    /// secret must not leak the position of the first differing byte.
    pub fn verify(&self, token: &SignedToken, canonical_body: &[u8]) -> Result<bool, AppError> {
        let expected = self.sign(&token.signing_input())?;
        if !bool::from(expected.as_bytes().ct_eq(token.signature.as_bytes())) {
            return Ok(false);
        }

        let claimed_body = URL_SAFE_NO_PAD
            .decode(token.payload)
            .map_err(|_| AppError::MalformedToken)?;

        // Signature was valid for *some* payload; the body bound by it must
        // be the body actually sent.
        Ok(bool::from(claimed_body.ct_eq(canonical_body)))
    }

    /// Compute the base64url (no padding) HMAC-SHA256 of `signing_input`.
    ///
    /// This is the client half of the contract; the server uses it to
    /// recompute the expected signature segment.
    pub fn sign(&self, signing_input: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(signing_input.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}
