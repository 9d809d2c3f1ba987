//! Concurrent clip duration probing
//!
//! Each clip's primary camera file is probed on the blocking pool. A failed
//! probe yields `None` for that clip only; the engine substitutes the default.

use std::path::PathBuf;

use contracts::Event;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::error::{HostError, Result};

/// Probe one container file
pub async fn probe_path(path: PathBuf) -> Result<f64> {
    let shown = path.display().to_string();
    let joined = tokio::task::spawn_blocking(move || telemetry::probe_file_duration(&path)).await;
    match joined {
        Ok(Ok(seconds)) => Ok(seconds),
        Ok(Err(source)) => Err(HostError::probe(shown, source)),
        Err(e) => Err(HostError::task(shown, e.to_string())),
    }
}

/// Probe every clip of `event` concurrently. Indexed like `event.clips`.
#[instrument(level = "debug", name = "probe_clip_durations", skip(event), fields(event = %event.id, clips = event.clip_count()))]
pub async fn probe_clip_durations(event: &Event) -> Vec<Option<f64>> {
    let mut set = JoinSet::new();
    for (index, clip) in event.clips.iter().enumerate() {
        let Some(source) = clip.primary_camera().and_then(|c| clip.video(c)) else {
            continue;
        };
        let path = source.location.clone();
        set.spawn(async move { (index, probe_path(path).await) });
    }

    let mut durations = vec![None; event.clip_count()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, Ok(seconds))) if seconds.is_finite() && seconds > 0.0 => {
                debug!(clip = index, seconds, "duration probed");
                durations[index] = Some(seconds);
            }
            Ok((index, Ok(seconds))) => {
                warn!(clip = index, seconds, "unusable probed duration, using default");
                metrics::counter!("media_probe_failures_total").increment(1);
            }
            Ok((index, Err(e))) => {
                warn!(clip = index, error = %e, "duration probe failed, using default");
                metrics::counter!("media_probe_failures_total").increment(1);
            }
            Err(e) => warn!(error = %e, "probe task aborted"),
        }
    }
    durations
}
