//! # Sync Engine
//!
//! Synchronized multi-camera playback of one event.
//!
//! Responsibilities:
//! - Map event-global time onto (clip, local time) (`Timeline`)
//! - Keep a bounded window of clip resources materialized (`ResourceWindow`)
//! - Drive every camera track from one master clock, correcting drift and
//!   stalls on a cancelable frame tick (`PlaybackEngine`)
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sync_engine::{PlaybackEngine, SystemClock};
//!
//! let mut engine = PlaybackEngine::new(config, Arc::new(SystemClock::default()), allocator, tracks);
//! engine.load_event(event)?;
//! engine.settle_durations(&probed)?;
//!
//! loop {
//!     for notice in host.drain_track_events() {
//!         engine.on_track_event(notice)?;
//!     }
//!     if let Some(report) = engine.pump() {
//!         aggregator.update(&report);
//!     }
//! }
//! ```

mod clock;
mod engine;
mod scheduler;
mod timeline;
mod window;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::PlaybackEngine;
pub use scheduler::{FrameScheduler, TickToken};
pub use timeline::{build_offsets, global_to_local, local_to_global, Position, Timeline};
pub use window::{ClipHandles, ResourceWindow};

pub use contracts::{PlaybackSnapshot, PlaybackState, TickReport};
