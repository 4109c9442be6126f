//! Cooldown ledger - last-notification timestamps per peer.
//!
//! The ledger itself is single-threaded state; the loop manager guards it
//! with a mutex and hands it to one cycle at a time. Timestamps use the
//! monotonic clock; a peer never notified counts as eligible.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-peer record of when the last engagement notification went out.
#[derive(Debug, Default)]
pub struct CooldownLedger {
    last_sent: HashMap<String, Instant>,
}

impl CooldownLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the peer was last notified, None if never.
    pub fn elapsed(&self, uid: &str) -> Option<Duration> {
        self.last_sent.get(uid).map(Instant::elapsed)
    }

    /// Whether the peer may be notified again given the cooldown window.
    pub fn eligible(&self, uid: &str, window: Duration) -> bool {
        match self.elapsed(uid) {
            Some(elapsed) => elapsed >= window,
            None => true,
        }
    }

    /// Record a notification to the peer at the current instant.
    ///
    /// Called regardless of dispatch success: a broken token is not retried
    /// until the window elapses.
    pub fn record(&mut self, uid: &str) {
        self.record_at(uid, Instant::now());
    }

    /// Record a notification at an explicit instant.
    pub fn record_at(&mut self, uid: &str, at: Instant) {
        self.last_sent.insert(uid.to_string(), at);
    }

    /// Evict entries older than `older_than`, returning how many were
    /// removed. Entries past several cooldown windows are eligible anyway, so
    /// keeping them only grows the map.
    pub fn sweep(&mut self, older_than: Duration) -> usize {
        let before = self.last_sent.len();
        self.last_sent.retain(|_, at| at.elapsed() < older_than);
        before - self.last_sent.len()
    }

    /// Number of peers currently tracked.
    pub fn len(&self) -> usize {
        self.last_sent.len()
    }

    /// Whether the ledger tracks no peers.
    pub fn is_empty(&self) -> bool {
        self.last_sent.is_empty()
    }
}
