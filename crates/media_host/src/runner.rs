//! Headless playback loop on a tokio interval

use std::time::Duration;

use contracts::{ContractError, PlaybackState, ResourceAllocator, TickReport};
use sync_engine::PlaybackEngine;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::host::dispatch_track_events;
use crate::track::SimulatedTrack;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Loop period; one engine pump per period
    pub tick: Duration,
    /// Stop after this much wall time
    pub max_duration: Option<Duration>,
}

impl RunOptions {
    pub fn from_hz(tick_hz: u32) -> Self {
        Self {
            tick: Duration::from_secs(1) / tick_hz.max(1),
            max_duration: None,
        }
    }
}

/// Why the loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Ended,
    TimedOut,
    Unloaded,
}

/// Pump `engine` until the event ends, is unloaded, or time runs out.
///
/// `on_tick` sees the engine after every pump, with the tick report if a
/// drift-correction pass ran.
pub async fn run_playback<A, F>(
    engine: &mut PlaybackEngine<SimulatedTrack, A>,
    options: &RunOptions,
    mut on_tick: F,
) -> Result<RunOutcome, ContractError>
where
    A: ResourceAllocator,
    F: FnMut(&PlaybackEngine<SimulatedTrack, A>, Option<&TickReport>),
{
    let mut interval = tokio::time::interval(options.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();

    loop {
        interval.tick().await;
        dispatch_track_events(engine)?;
        let report = engine.pump();
        on_tick(engine, report.as_ref());

        match engine.state() {
            PlaybackState::Ended => {
                info!(global = engine.global_time(), "playback finished");
                return Ok(RunOutcome::Ended);
            }
            PlaybackState::Idle => return Ok(RunOutcome::Unloaded),
            _ => {}
        }
        if options.max_duration.is_some_and(|max| started.elapsed() >= max) {
            info!(global = engine.global_time(), "run time limit reached");
            return Ok(RunOutcome::TimedOut);
        }
    }
}
