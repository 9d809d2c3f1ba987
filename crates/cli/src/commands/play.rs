//! `play` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use catalog::ReadStatusStore;
use contracts::Event;
use media_host::{
    duration_table, probe_clip_durations, run_playback, simulated_tracks, FsAllocator, RunOptions,
    RunOutcome, TokioClock, TrackProfile,
};
use observability::PlaybackMetricsAggregator;
use sync_engine::PlaybackEngine;
use tracing::{info, warn};

use super::Context;
use crate::cli::PlayArgs;
use crate::error::CliError;

/// Execute the `play` command
pub async fn run_play(ctx: &Context, args: &PlayArgs) -> Result<()> {
    let mut store = ReadStatusStore::load(&ctx.store_path);
    let events = catalog::scan(&args.root, &store)
        .with_context(|| format!("Failed to scan {}", args.root.display()))?;
    let event = select_event(events, args)?;
    info!(event = %event.name, clips = event.clip_count(), "Event selected");

    let rate = args
        .rate
        .or_else(|| store.playback_rate())
        .unwrap_or(ctx.config.playback.default_rate);

    store.set_read(&event.name, true);
    store.set_playback_rate(rate);
    store
        .save()
        .with_context(|| format!("Failed to save {}", ctx.store_path.display()))?;

    let probed = probe_clip_durations(&event).await;

    let clock = Arc::new(TokioClock::default());
    let profile = TrackProfile {
        default_duration: ctx.config.playback.default_clip_duration_s,
        ..TrackProfile::default()
    };
    let tracks = simulated_tracks(clock.clone(), &profile, duration_table(&event, &probed));

    let mut engine = PlaybackEngine::new(ctx.config.clone(), clock, FsAllocator::new(), tracks);
    engine
        .set_playback_rate(rate)
        .context("Invalid playback rate")?;
    engine.load_event(event).context("Failed to load event")?;
    if let Some(camera) = args.camera {
        let master = engine.set_master_camera(camera);
        if master != Some(camera) {
            warn!(requested = %camera, master = ?master, "camera not recorded, using fallback master");
        }
    }
    if let Some(seek) = args.seek {
        engine.seek_to(seek).context("Seek failed")?;
    }
    engine
        .settle_durations(&probed)
        .context("Failed to apply clip durations")?;

    let snapshot = engine.snapshot();
    info!(
        total = snapshot.total_duration,
        start = snapshot.global_time,
        rate,
        master = ?snapshot.master_camera,
        "Playback starting"
    );

    let options = RunOptions {
        max_duration: args.duration.filter(|d| *d > 0.0).map(Duration::from_secs_f64),
        ..RunOptions::from_hz(ctx.config.sync.tick_hz)
    };
    let mut aggregator = PlaybackMetricsAggregator::new();

    let outcome = tokio::select! {
        outcome = run_playback(&mut engine, &options, |engine, report| {
            if let Some(report) = report {
                observability::record_tick_metrics(report);
                aggregator.update(report);
            }
            let snapshot = engine.snapshot();
            observability::record_snapshot(&snapshot);
            aggregator.observe(&snapshot);
        }) => Some(outcome.context("Playback failed")?),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping playback");
            None
        }
    };

    aggregator.record_diagnostics(engine.diagnostics());
    print_result(&engine, outcome);
    println!("{}", aggregator.summary());
    engine.unload_event();
    Ok(())
}

/// Named event, else the newest unread, else the newest
fn select_event(events: Vec<Event>, args: &PlayArgs) -> Result<Event> {
    if events.is_empty() {
        return Err(CliError::no_events(&args.root).into());
    }
    let index = match &args.event {
        Some(name) => events
            .iter()
            .position(|e| &e.name == name || &e.id == name)
            .ok_or_else(|| CliError::event_not_found(name, &args.root))?,
        None => events.iter().position(|e| !e.read).unwrap_or(0),
    };
    Ok(events.into_iter().nth(index).ok_or_else(|| CliError::no_events(&args.root))?)
}

fn print_result<A>(engine: &PlaybackEngine<media_host::SimulatedTrack, A>, outcome: Option<RunOutcome>)
where
    A: contracts::ResourceAllocator,
{
    let snapshot = engine.snapshot();
    let status = match outcome {
        Some(RunOutcome::Ended) => "ended",
        Some(RunOutcome::TimedOut) => "time limit reached",
        Some(RunOutcome::Unloaded) => "unloaded",
        None => "interrupted",
    };
    println!(
        "Playback {}: clip {}/{}, {:.1}s of {:.1}s ({:.0}%)",
        status,
        snapshot.clip_index + 1,
        snapshot.clip_count,
        snapshot.global_time,
        snapshot.total_duration,
        snapshot.progress * 100.0
    );
    if let Some(at) = engine.wall_clock_time() {
        println!("Wall clock: {}", catalog::display::format_full_timestamp(&at));
    }
    for diagnostic in engine.diagnostics() {
        println!("  ! {:?}: {}", diagnostic.camera, diagnostic.message);
    }
    println!();
}
