//! Engagement loop lifecycle - scheduling, start/stop, cooperative shutdown.
//!
//! One tokio task per started loop runs cycles strictly sequentially with a
//! fixed sleep between them. The cooldown ledger belongs to the manager and
//! is handed to whichever schedule is current, so restarts keep existing
//! windows. All collaborators arrive through the constructor; nothing here
//! is process-global.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::domain::LoopState;
use crate::engage::cooldown::CooldownLedger;
use crate::engage::cycle::{CycleOutcome, run_cycle};
use crate::services::{EngagementNotifier, ProfileDirectory, SettingsStore};

/// Timing configuration for the engagement loop.
#[derive(Debug, Clone)]
pub struct EngagementLoopConfig {
    /// Delay between cycles.
    pub period: Duration,
    /// Minimum time before a peer can be renotified.
    pub cooldown: Duration,
    /// Ledger entries older than `sweep_factor * cooldown` are evicted after
    /// each cycle; 0 disables sweeping.
    pub sweep_factor: u32,
}

impl Default for EngagementLoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60),
            cooldown: Duration::from_secs(4 * 3600),
            sweep_factor: 4,
        }
    }
}

impl EngagementLoopConfig {
    /// Create a config with explicit period and cooldown.
    pub fn new(period: Duration, cooldown: Duration) -> Self {
        Self {
            period,
            cooldown,
            sweep_factor: 4,
        }
    }

    /// Set the sweep factor.
    pub fn with_sweep_factor(mut self, factor: u32) -> Self {
        self.sweep_factor = factor;
        self
    }
}

/// Handle to a scheduled loop task.
struct ScheduledTask {
    task: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Periodic proximity check with per-peer notification cooldown.
///
/// The ledger outlives individual schedules: stopping and restarting the
/// loop does not reset cooldown windows.
pub struct EngagementLoop<D, S, N> {
    directory: Arc<D>,
    settings: Arc<S>,
    notifier: Arc<N>,
    config: EngagementLoopConfig,
    ledger: Arc<Mutex<CooldownLedger>>,
    running: Arc<AtomicBool>,
    scheduled: Mutex<Option<ScheduledTask>>,
}

impl<D, S, N> EngagementLoop<D, S, N>
where
    D: ProfileDirectory + 'static,
    S: SettingsStore + 'static,
    N: EngagementNotifier + 'static,
{
    /// Create a loop over the given collaborators. Nothing is scheduled
    /// until `start()` is called.
    pub fn new(
        directory: Arc<D>,
        settings: Arc<S>,
        notifier: Arc<N>,
        config: EngagementLoopConfig,
    ) -> Self {
        Self {
            directory,
            settings,
            notifier,
            config,
            ledger: Arc::new(Mutex::new(CooldownLedger::new())),
            running: Arc::new(AtomicBool::new(false)),
            scheduled: Mutex::new(None),
        }
    }

    /// Start the periodic schedule. Idempotent: an already-running schedule
    /// is cancelled first, so there is never more than one task.
    pub async fn start(&self) {
        self.stop().await;

        let (shutdown, rx) = watch::channel(false);
        let directory = self.directory.clone();
        let settings = self.settings.clone();
        let notifier = self.notifier.clone();
        let config = self.config.clone();
        let ledger = self.ledger.clone();

        let task = tokio::spawn(async move {
            drive_loop(directory, settings, notifier, config, ledger, rx).await;
        });

        *self.scheduled.lock().await = Some(ScheduledTask { task, shutdown });
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            period_secs = self.config.period.as_secs(),
            cooldown_secs = self.config.cooldown.as_secs(),
            "engagement loop started"
        );
    }

    /// Stop the schedule. A cycle in flight is allowed to finish; only
    /// future cycles are prevented. Safe to call when already stopped.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let taken = self.scheduled.lock().await.take();
        if let Some(scheduled) = taken {
            let _ = scheduled.shutdown.send(true);
            let _ = scheduled.task.await;
            tracing::info!("engagement loop stopped");
        }
    }

    /// Whether the loop is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        if self.is_running() {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }
}

/// The scheduling task body: cycle, sweep, sleep, repeat until shutdown.
///
/// Every failure mode is handled here so nothing can terminate the schedule
/// except the shutdown signal.
async fn drive_loop<D, S, N>(
    directory: Arc<D>,
    settings: Arc<S>,
    notifier: Arc<N>,
    config: EngagementLoopConfig,
    ledger: Arc<Mutex<CooldownLedger>>,
    mut shutdown: watch::Receiver<bool>,
) where
    D: ProfileDirectory,
    S: SettingsStore,
    N: EngagementNotifier,
{
    loop {
        // Only one schedule exists at a time, so the lock is uncontended;
        // it is held for the duration of one cycle, never across the sleep.
        {
            let mut ledger = ledger.lock().await;
            match run_cycle(
                &*directory,
                &*settings,
                &*notifier,
                &mut ledger,
                config.cooldown,
            )
            .await
            {
                Ok(CycleOutcome::Completed(stats)) => {
                    tracing::debug!(
                        candidates = stats.candidates,
                        dispatched = stats.dispatched,
                        cooled_down = stats.cooled_down,
                        no_overlap = stats.no_overlap,
                        "engagement cycle completed"
                    );
                }
                Ok(CycleOutcome::Skipped(reason)) => {
                    tracing::debug!(?reason, "engagement cycle skipped");
                }
                Err(e) => {
                    // Transient: the next scheduled cycle retries from scratch
                    tracing::warn!(error = %e, "engagement cycle aborted");
                }
            }

            // A horizon too large for Duration means nothing is old enough
            // to evict, so the sweep is skipped rather than panicking.
            if config.sweep_factor > 0 {
                if let Some(horizon) = config.cooldown.checked_mul(config.sweep_factor) {
                    let evicted = ledger.sweep(horizon);
                    if evicted > 0 {
                        tracing::debug!(evicted, remaining = ledger.len(), "cooldown ledger swept");
                    }
                }
            }
        }

        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(config.period) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
