//! One proximity check - the per-cycle algorithm.
//!
//! A cycle reads the discoverability flag, fetches the self profile and the
//! filtered nearby set, then walks the peers: cooldown first, tag overlap
//! second, one dispatch per qualifying peer. Per-peer failures are logged and
//! do not stop the walk; fetch failures abort the cycle and surface to the
//! scheduler, which logs and waits for the next period.

use std::time::Duration;

use crate::domain::Profile;
use crate::engage::cooldown::CooldownLedger;
use crate::engage::matching::first_shared_tag;
use crate::error::Result;
use crate::services::{EngagementNotifier, ProfileDirectory, SettingsStore};

/// Sentinel sent in place of a missing push token. The messaging layer drops
/// it; the peer still enters the cooldown window.
pub const NULL_TOKEN: &str = "null";

/// Counters for one completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Peers returned by the directory, self excluded.
    pub candidates: usize,
    /// Dispatch calls made (successful or not).
    pub dispatched: usize,
    /// Peers skipped because their cooldown window has not elapsed.
    pub cooled_down: usize,
    /// Peers skipped for lack of tag overlap.
    pub no_overlap: usize,
}

/// Why a cycle did no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// User opted out of discovery; no directory query was issued.
    NotDiscoverable,
    /// No self profile available.
    NoSelfProfile,
    /// Self profile has no location to center the query on.
    NoSelfLocation,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Skipped(SkipReason),
    Completed(CycleStats),
}

/// Run one proximity check.
///
/// The nearby query is awaited to completion before peers are processed, so
/// the result set is never read mid-flight.
pub async fn run_cycle<D, S, N>(
    directory: &D,
    settings: &S,
    notifier: &N,
    ledger: &mut CooldownLedger,
    cooldown: Duration,
) -> Result<CycleOutcome>
where
    D: ProfileDirectory,
    S: SettingsStore,
    N: EngagementNotifier,
{
    if !settings.is_discoverable().await? {
        return Ok(CycleOutcome::Skipped(SkipReason::NotDiscoverable));
    }

    let Some(me) = directory.self_profile().await? else {
        return Ok(CycleOutcome::Skipped(SkipReason::NoSelfProfile));
    };
    let Some(center) = me.location else {
        return Ok(CycleOutcome::Skipped(SkipReason::NoSelfLocation));
    };

    let criteria = settings.filter_criteria().await?;
    let peers = directory.filtered_profiles(center, &criteria).await?;

    let mut stats = CycleStats::default();
    for peer in peers.into_iter().filter(|p| p.uid != me.uid) {
        stats.candidates += 1;
        process_peer(&me, &peer, notifier, ledger, cooldown, &mut stats).await;
    }

    Ok(CycleOutcome::Completed(stats))
}

/// Handle a single peer. Never fails: dispatch errors are logged and the
/// cooldown is recorded anyway, so a broken token is not hammered.
async fn process_peer<N: EngagementNotifier>(
    me: &Profile,
    peer: &Profile,
    notifier: &N,
    ledger: &mut CooldownLedger,
    cooldown: Duration,
    stats: &mut CycleStats,
) {
    if !ledger.eligible(&peer.uid, cooldown) {
        stats.cooled_down += 1;
        return;
    }

    let Some(tag) = first_shared_tag(&me.tags, &peer.tags) else {
        stats.no_overlap += 1;
        return;
    };

    let token = peer.token.as_deref().unwrap_or(NULL_TOKEN);
    if let Err(e) = notifier.dispatch(token, tag).await {
        tracing::warn!(peer = %peer.uid, error = %e, "engagement dispatch failed");
    }
    ledger.record(&peer.uid);
    stats.dispatched += 1;
}
