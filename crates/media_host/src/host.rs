//! Glue between simulated tracks and the playback engine

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use contracts::{ContractError, Event, ResourceAllocator, TrackEvent};
use sync_engine::{Clock, PlaybackEngine};
use tracing::trace;

use crate::track::{DurationTable, SimulatedTrack};

/// A notice can trigger loads that report immediately; bound the follow-up rounds
const MAX_DISPATCH_ROUNDS: usize = 8;

/// Clock on tokio's timer, so paused-time tests drive it too
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Locator -> media duration for every video of `event`.
///
/// Locators follow `FsAllocator`: the file location's display string.
pub fn duration_table(event: &Event, probed: &[Option<f64>]) -> DurationTable {
    let mut table = HashMap::new();
    for (clip, duration) in event.clips.iter().zip(probed) {
        let Some(duration) = duration else {
            continue;
        };
        for source in clip.videos.values() {
            table.insert(source.location.display().to_string(), *duration);
        }
    }
    Arc::new(table)
}

/// Forward pending track notices to the engine. Returns how many were delivered.
pub fn dispatch_track_events<A: ResourceAllocator>(
    engine: &mut PlaybackEngine<SimulatedTrack, A>,
) -> Result<usize, ContractError> {
    let mut delivered = 0;
    for _ in 0..MAX_DISPATCH_ROUNDS {
        let notices: Vec<TrackEvent> = engine
            .tracks_mut()
            .flat_map(SimulatedTrack::poll_events)
            .collect();
        if notices.is_empty() {
            break;
        }
        for notice in notices {
            trace!(notice = ?notice, "track notice");
            engine.on_track_event(notice)?;
            delivered += 1;
        }
    }
    Ok(delivered)
}
