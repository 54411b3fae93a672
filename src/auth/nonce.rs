//! In-memory nonce registry for replay attack prevention.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Thread-safe registry of already-accepted reference values.
///
/// `check_and_record` is the single atomic check-and-set that makes replay
/// prevention correct under concurrency: the mutex guarantees two callers
/// racing on the same reference cannot both be told it is fresh.
///
/// With a TTL of `None` the registry grows for the process lifetime, matching
/// the minimal design; a TTL bounds growth by expiring old entries (lazily on
/// insert, or via [`NonceRegistry::start_sweep_task`]).
pub struct NonceRegistry {
    /// Map of reference -> time it was first accepted.
    seen: Mutex<HashMap<String, Instant>>,
    ttl: Option<Duration>,
}

impl NonceRegistry {
    /// Create a registry that remembers references forever.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Create a registry with an optional expiry for recorded references.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Record `reference` as seen if it has never been accepted before.
    ///
    /// Returns `true` exactly once per reference (per TTL period when expiry
    /// is configured); `false` leaves the registry unchanged.
    pub fn check_and_record(&self, reference: &str) -> bool {
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(), // Recover from mutex poisoning
        };

        if let Some(ttl) = self.ttl {
            let now = Instant::now();
            seen.retain(|_, recorded| now.duration_since(*recorded) < ttl);
        }

        if seen.contains_key(reference) {
            return false;
        }

        seen.insert(reference.to_string(), Instant::now());
        true
    }

    /// Number of currently recorded references (for monitoring).
    pub fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired references. No-op when no TTL is configured.
    pub fn sweep(&self) {
        let Some(ttl) = self.ttl else { return };
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        seen.retain(|_, recorded| now.duration_since(*recorded) < ttl);
    }

    /// Spawn a tokio task that periodically sweeps expired references.
    pub fn start_sweep_task(self: &Arc<Self>, interval: Duration) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                registry.sweep();
            }
        });
    }
}

impl Default for NonceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
