//! Engagement notification dispatch.
//!
//! The loop hands a push token and the matched tag to a notifier and moves
//! on; delivery is the messaging layer's problem. `LogNotifier` backs the
//! CLI, `RecordingNotifier` backs tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::{IcebreakrError, Result};

/// Fire-and-forget delivery of one engagement notification.
#[async_trait]
pub trait EngagementNotifier: Send + Sync {
    /// Send a notification about a shared `tag` to the peer behind `token`.
    async fn dispatch(&self, token: &str, tag: &str) -> Result<()>;
}

/// Notifier that only logs - used when running the daemon without a real
/// messaging backend.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl EngagementNotifier for LogNotifier {
    async fn dispatch(&self, token: &str, tag: &str) -> Result<()> {
        tracing::info!(token, tag, "engagement notification dispatched");
        Ok(())
    }
}

/// A dispatched notification, as captured by `RecordingNotifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub token: String,
    pub tag: String,
}

/// Notifier that records every dispatch, optionally failing them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    /// Create a recording notifier that succeeds on every dispatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent dispatches fail. Dispatches are still recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything dispatched so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }

    /// Number of dispatch calls seen, including failed ones.
    pub fn count(&self) -> usize {
        self.sent.lock().expect("notifier lock poisoned").len()
    }
}

#[async_trait]
impl EngagementNotifier for RecordingNotifier {
    async fn dispatch(&self, token: &str, tag: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                token: token.to_string(),
                tag: tag.to_string(),
            });
        if self.failing.load(Ordering::SeqCst) {
            return Err(IcebreakrError::Dispatch("send rejected".to_string()));
        }
        Ok(())
    }
}
