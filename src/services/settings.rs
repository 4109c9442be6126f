//! Settings store - discoverability flag and filter criteria.
//!
//! Both values are externally owned and re-read every cycle, so filter edits
//! take effect without restarting the loop.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::FilterCriteria;
use crate::error::Result;

/// Asynchronous read access to user preferences.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Whether the local user wants to appear in (and run) proximity checks.
    async fn is_discoverable(&self) -> Result<bool>;

    /// Current filter criteria for nearby queries.
    async fn filter_criteria(&self) -> Result<FilterCriteria>;
}

/// Settings held in process memory, mutable for tests and the CLI.
pub struct StaticSettings {
    discoverable: AtomicBool,
    criteria: RwLock<FilterCriteria>,
}

impl StaticSettings {
    /// Create a settings store with the given initial values.
    pub fn new(discoverable: bool, criteria: FilterCriteria) -> Self {
        Self {
            discoverable: AtomicBool::new(discoverable),
            criteria: RwLock::new(criteria),
        }
    }

    /// Flip the discoverability flag.
    pub fn set_discoverable(&self, discoverable: bool) {
        self.discoverable.store(discoverable, Ordering::SeqCst);
    }

    /// Replace the filter criteria.
    pub async fn set_criteria(&self, criteria: FilterCriteria) {
        *self.criteria.write().await = criteria;
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new(true, FilterCriteria::default())
    }
}

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn is_discoverable(&self) -> Result<bool> {
        Ok(self.discoverable.load(Ordering::SeqCst))
    }

    async fn filter_criteria(&self) -> Result<FilterCriteria> {
        Ok(self.criteria.read().await.clone())
    }
}
