//! Engagement loop integration tests
//!
//! Exercises the full path: seeded directory -> cycle -> notification
//! dispatch, plus the loop lifecycle over real collaborator implementations.

use std::sync::Arc;
use std::time::Duration;

use icebreakr::domain::{FilterCriteria, Gender, Profile};
use icebreakr::engage::{
    CooldownLedger, CycleOutcome, CycleStats, EngagementLoop, EngagementLoopConfig, run_cycle,
};
use icebreakr::services::{InMemoryDirectory, RecordingNotifier, StaticSettings};
use tempfile::TempDir;

const COOLDOWN: Duration = Duration::from_secs(4 * 3600);

fn me() -> Profile {
    Profile::new("me", "Me")
        .with_tags(["hiking", "music"])
        .with_location(46.5191, 6.5668)
        .with_token("tok-me")
}

fn peer(uid: &str, tags: &[&str]) -> Profile {
    Profile::new(uid, uid)
        .with_tags(tags.iter().copied())
        .with_location(46.5195, 6.5670)
        .with_token(format!("tok-{}", uid))
}

/// Integration test: the canonical matching scenario across one cycle.
#[tokio::test]
async fn test_single_cycle_scenario() {
    let directory = InMemoryDirectory::new(
        Some(me()),
        vec![
            peer("a", &["music"]),
            peer("b", &["chess"]),
            peer("c", &["hiking"]),
        ],
    );
    let settings = StaticSettings::default();
    let notifier = RecordingNotifier::new();
    let mut ledger = CooldownLedger::new();
    // Peer c was notified recently and sits inside its cooldown window
    ledger.record("c");

    let outcome = run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Completed(CycleStats {
            candidates: 3,
            dispatched: 1,
            cooled_down: 1,
            no_overlap: 1,
        })
    );
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "tok-a");
    assert_eq!(sent[0].tag, "music");
}

/// Integration test: a YAML seed file drives a full check end to end.
#[tokio::test]
async fn test_seeded_directory_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let seed_path = temp_dir.path().join("profiles.yml");
    std::fs::write(
        &seed_path,
        r#"
self:
  uid: me
  name: Me
  tags: [climbing, jazz]
  location: { latitude: 46.5191, longitude: 6.5668 }
profiles:
  - uid: ana
    name: Ana
    tags: [jazz, running]
    location: { latitude: 46.5195, longitude: 6.5670 }
    token: tok-ana
  - uid: remote
    name: Remote
    tags: [jazz]
    location: { latitude: 47.4, longitude: 8.5 }
    token: tok-remote
"#,
    )
    .unwrap();

    let directory = InMemoryDirectory::from_seed_file(&seed_path).unwrap();
    let settings = StaticSettings::default();
    let notifier = RecordingNotifier::new();
    let mut ledger = CooldownLedger::new();

    run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();

    // Only Ana is within the default 10 km radius
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "tok-ana");
    assert_eq!(sent[0].tag, "jazz");
}

/// Integration test: gender and age filters narrow the candidate set.
#[tokio::test]
async fn test_filters_applied_end_to_end() {
    let directory = InMemoryDirectory::new(
        Some(me()),
        vec![
            peer("young-w", &["music"])
                .with_gender(Gender::Women)
                .with_age(22),
            peer("young-m", &["music"])
                .with_gender(Gender::Men)
                .with_age(23),
            peer("older-w", &["music"])
                .with_gender(Gender::Women)
                .with_age(45),
        ],
    );
    let settings = StaticSettings::new(
        true,
        FilterCriteria {
            genders: vec![Gender::Women],
            age_range: Some(icebreakr::domain::AgeRange::new(18, 30)),
            ..Default::default()
        },
    );
    let notifier = RecordingNotifier::new();
    let mut ledger = CooldownLedger::new();

    run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "tok-young-w");
}

/// Integration test: opting out of discovery silences everything.
#[tokio::test]
async fn test_not_discoverable_no_queries() {
    let directory = InMemoryDirectory::new(Some(me()), vec![peer("a", &["music"])]);
    let settings = StaticSettings::default();
    settings.set_discoverable(false);
    let notifier = RecordingNotifier::new();
    let mut ledger = CooldownLedger::new();

    let outcome = run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();

    assert!(matches!(outcome, CycleOutcome::Skipped(_)));
    assert_eq!(notifier.count(), 0);
    assert_eq!(directory.query_count(), 0);
}

/// Integration test: loop lifecycle over the real in-memory collaborators.
#[tokio::test(start_paused = true)]
async fn test_loop_lifecycle() {
    let directory = Arc::new(InMemoryDirectory::new(
        Some(me()),
        vec![peer("a", &["music"])],
    ));
    let settings = Arc::new(StaticSettings::default());
    let notifier = Arc::new(RecordingNotifier::new());

    let config = EngagementLoopConfig::new(Duration::from_millis(50), COOLDOWN);
    let engagement = EngagementLoop::new(directory.clone(), settings, notifier.clone(), config);

    assert!(!engagement.is_running());

    engagement.start().await;
    assert!(engagement.is_running());

    tokio::time::sleep(Duration::from_millis(200)).await;
    engagement.stop().await;
    assert!(!engagement.is_running());

    // Several cycles ran, but the cooldown held dispatches to one
    assert_eq!(notifier.count(), 1);
    assert!(directory.query_count() > 1);

    // Stopped means stopped: no further dispatches or queries
    let queries = directory.query_count();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(notifier.count(), 1);
    assert_eq!(directory.query_count(), queries);
}

/// Integration test: a dispatch failure suppresses retries until the window
/// elapses, matching the record-regardless policy.
#[tokio::test]
async fn test_failed_dispatch_policy() {
    let directory = InMemoryDirectory::new(Some(me()), vec![peer("a", &["music"])]);
    let settings = StaticSettings::default();
    let notifier = RecordingNotifier::new();
    notifier.set_failing(true);
    let mut ledger = CooldownLedger::new();

    run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();
    assert_eq!(notifier.count(), 1);

    notifier.set_failing(false);
    run_cycle(&directory, &settings, &notifier, &mut ledger, COOLDOWN)
        .await
        .unwrap();

    // No retry: the failed attempt already started the window
    assert_eq!(notifier.count(), 1);
}
