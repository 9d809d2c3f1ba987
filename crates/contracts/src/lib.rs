//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Clip keys and Metadata timestamps are naive local wall-clock times, the way the
//!   vehicle writes them into file names and `event.json`
//! - Playback positions are seconds (`f64`): `local` within a clip, `global` since
//!   the first clip of the event started
//! - Telemetry samples are addressed by video frame index, not by seconds

mod camera;
mod config;
mod error;
mod event;
mod media;
mod playback;
mod telemetry;

pub use camera::{CameraId, SnapshotCell};
pub use config::*;
pub use error::*;
pub use event::*;
pub use media::*;
pub use playback::*;
pub use telemetry::*;
