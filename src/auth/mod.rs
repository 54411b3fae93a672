//! Request authentication: timestamp freshness, one-time nonces, canonical
//! body reconstruction, and HMAC token verification.

pub mod canonical;
pub mod gate;
pub mod middleware;
pub mod nonce;
pub mod signature;
pub mod timestamp;

pub use gate::{AuthGate, AuthHeaders};
pub use nonce::NonceRegistry;
pub use signature::{SignatureVerifier, SignedToken};
pub use timestamp::ClockWindow;
