//! # Media Host
//!
//! Runs the playback engine without a UI.
//!
//! Responsibilities:
//! - Lease clip files as resource handles (`FsAllocator`)
//! - Probe clip durations concurrently off the async runtime
//! - Simulate per-camera media tracks on a shared clock
//! - Pump the engine on a tokio interval until the event ends
//!
//! ## Example
//!
//! ```ignore
//! let probed = media_host::probe_clip_durations(&event).await;
//! let clock = Arc::new(TokioClock::default());
//! let tracks = simulated_tracks(clock.clone(), &TrackProfile::default(), duration_table(&event, &probed));
//!
//! let mut engine = PlaybackEngine::new(config, clock, FsAllocator::new(), tracks);
//! engine.load_event(event)?;
//! engine.settle_durations(&probed)?;
//! let outcome = run_playback(&mut engine, &RunOptions::from_hz(60), |_, _| {}).await?;
//! ```

mod allocator;
mod error;
mod host;
mod probe;
mod runner;
mod track;

pub use allocator::FsAllocator;
pub use error::{HostError, Result};
pub use host::{dispatch_track_events, duration_table, TokioClock};
pub use probe::{probe_clip_durations, probe_path};
pub use runner::{run_playback, RunOptions, RunOutcome};
pub use track::{simulated_tracks, DurationTable, SimulatedTrack, TrackProfile};
