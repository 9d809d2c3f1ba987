//! Recordings tree -> catalog -> probe -> engine -> end of event

use std::sync::Arc;
use std::time::Duration;

use catalog::ReadStatusStore;
use contracts::{CameraId, Event, MediaTrack, PlaybackState, PlayerConfig};
use media_host::{
    duration_table, probe_clip_durations, run_playback, simulated_tracks, FsAllocator, RunOptions,
    RunOutcome, SimulatedTrack, TokioClock, TrackProfile,
};
use observability::PlaybackMetricsAggregator;
use sync_engine::PlaybackEngine;

use crate::fixtures::sentry_event;

const TRIGGERED_EVENT: &str = r#"{
    "timestamp": "2024-03-09T10:02:03",
    "city": "Taipei",
    "street": "Xinyi Rd",
    "reason": "sentry_aware_object_detection",
    "camera": "7"
}"#;

fn config() -> PlayerConfig {
    let mut config = PlayerConfig::default();
    config.playback.auto_seek_lead_s = 4.0;
    config
}

fn engine_for(
    event: &Event,
    probed: &[Option<f64>],
    config: PlayerConfig,
) -> PlaybackEngine<SimulatedTrack, FsAllocator> {
    let clock = Arc::new(TokioClock::default());
    let profile = TrackProfile {
        default_duration: config.playback.default_clip_duration_s,
        ..TrackProfile::default()
    };
    let tracks = simulated_tracks(clock.clone(), &profile, duration_table(event, probed));
    PlaybackEngine::new(config, clock, FsAllocator::new(), tracks)
}

#[tokio::test(start_paused = true)]
async fn test_triggered_event_plays_from_trigger_to_end() {
    let dir = tempfile::tempdir().unwrap();
    sentry_event(
        dir.path(),
        "2024-03-09_10-02-10",
        &["front", "back", "left_repeater"],
        3,
        5_000,
        Some(TRIGGERED_EVENT),
    );

    let store = ReadStatusStore::new(dir.path().join("state.json"));
    let events = catalog::scan(dir.path(), &store).unwrap();
    assert_eq!(events.len(), 1);
    let event = events.into_iter().next().unwrap();
    assert!(event.title().contains("Taipei"));
    assert_eq!(event.clip_count(), 3);

    let probed = probe_clip_durations(&event).await;
    assert_eq!(probed, vec![Some(5.0); 3]);

    let mut engine = engine_for(&event, &probed, config());
    engine.load_event(event).unwrap();
    assert!(engine.durations_pending());
    engine.settle_durations(&probed).unwrap();

    // trigger is 3s into the third clip (offset 13), lead 4s
    assert_eq!(engine.clip_index(), 1);
    assert!((engine.global_time() - 9.0).abs() < 1e-9);
    assert_eq!(engine.master_camera(), Some(CameraId::Back));

    let mut aggregator = PlaybackMetricsAggregator::new();
    let outcome = run_playback(&mut engine, &RunOptions::from_hz(60), |engine, report| {
        if let Some(report) = report {
            aggregator.update(report);
        }
        aggregator.observe(&engine.snapshot());
    })
    .await
    .unwrap();

    assert_eq!(outcome, RunOutcome::Ended);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert_eq!(snapshot.clip_index, 2);
    assert_eq!(snapshot.global_time, 15.0);
    assert_eq!(snapshot.progress, 1.0);

    let summary = aggregator.summary();
    assert_eq!(summary.clip_advances, 1);
    assert!(summary.total_ticks > 0);

    // clip 0 was released once the playhead reached clip 2
    let window = engine.window();
    assert!(!window.is_materialized(0));
    assert_eq!(window.allocator().live_count(), 6);

    engine.unload_event();
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.window().allocator().live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_seek_before_durations_replaces_auto_seek() {
    let dir = tempfile::tempdir().unwrap();
    sentry_event(dir.path(), "2024-03-09_10-02-10", &["front", "back"], 3, 5_000, Some(TRIGGERED_EVENT));

    let store = ReadStatusStore::new(dir.path().join("state.json"));
    let event = catalog::scan(dir.path(), &store).unwrap().remove(0);
    let probed = probe_clip_durations(&event).await;

    let mut engine = engine_for(&event, &probed, config());
    engine.load_event(event).unwrap();
    engine.seek_to(2.0).unwrap();
    engine.settle_durations(&probed).unwrap();

    assert_eq!(engine.clip_index(), 0);
    assert_eq!(engine.global_time(), 2.0);

    let options = RunOptions {
        max_duration: Some(Duration::from_secs(1)),
        ..RunOptions::from_hz(60)
    };
    let outcome = run_playback(&mut engine, &options, |_, _| {}).await.unwrap();
    assert_eq!(outcome, RunOutcome::TimedOut);

    // resumed after the grace delay, so well under a full second of progress
    let global = engine.global_time();
    assert!(global > 2.5 && global < 3.1, "global = {global}");
    let back = engine.track(CameraId::Back).unwrap();
    assert!((back.current_time() - engine.local_time()).abs() < 0.5);
}

#[tokio::test(start_paused = true)]
async fn test_missing_camera_and_unprobeable_clip() {
    let dir = tempfile::tempdir().unwrap();
    let event_dir = sentry_event(dir.path(), "2024-03-09_10-05-00", &["front", "back"], 2, 4_000, None);
    // back camera absent from the second clip; front file of the first clip is garbage
    std::fs::remove_file(event_dir.join("2024-03-09_10-01-00-back.mp4")).unwrap();
    std::fs::write(event_dir.join("2024-03-09_10-00-00-front.mp4"), b"not an mp4").unwrap();

    let store = ReadStatusStore::new(dir.path().join("state.json"));
    let event = catalog::scan(dir.path(), &store).unwrap().remove(0);
    let probed = probe_clip_durations(&event).await;
    assert_eq!(probed, vec![None, Some(4.0)]);

    let mut config = PlayerConfig::default();
    config.playback.default_clip_duration_s = 3.0;
    let mut engine = engine_for(&event, &probed, config);
    engine.load_event(event).unwrap();
    engine.set_master_camera(CameraId::Back);
    engine.settle_durations(&probed).unwrap();
    assert_eq!(engine.timeline().durations(), &[3.0, 4.0]);

    let mut masters = Vec::new();
    let outcome = run_playback(&mut engine, &RunOptions::from_hz(60), |engine, _| {
        let master = engine.master_camera();
        if masters.last() != Some(&master) {
            masters.push(master);
        }
    })
    .await
    .unwrap();

    assert_eq!(outcome, RunOutcome::Ended);
    assert_eq!(masters, vec![Some(CameraId::Back), Some(CameraId::Front)]);
    assert_eq!(engine.global_time(), 7.0);
}

#[test]
fn test_read_status_persists_across_scans() {
    let dir = tempfile::tempdir().unwrap();
    sentry_event(dir.path(), "2024-03-09_10-05-00", &["front"], 1, 1_000, None);
    sentry_event(dir.path(), "2024-03-09_11-00-00", &["front"], 1, 1_000, None);
    let state = dir.path().join("state.json");

    let mut store = ReadStatusStore::load(&state);
    store.set_read("2024-03-09_10-05-00", true);
    store.set_playback_rate(2.0);
    store.save().unwrap();

    let store = ReadStatusStore::load(&state);
    let events = catalog::scan(dir.path(), &store).unwrap();
    let read: Vec<(&str, bool)> = events.iter().map(|e| (e.name.as_str(), e.read)).collect();
    assert!(read.contains(&("2024-03-09_10-05-00", true)));
    assert!(read.contains(&("2024-03-09_11-00-00", false)));
    assert_eq!(store.playback_rate(), Some(2.0));
}
