//! # Catalog
//!
//! Turns a recorded directory tree into an ordered list of Events.
//!
//! Responsibilities:
//! - List files under a scan root (`walk_directory`)
//! - Group `YYYY-MM-DD_HH-MM-SS-<camera>.<ext>` files into Clips per directory
//! - Attach `event.json` metadata and `thumb.png`
//! - Persist read flags and the playback-rate preference (`ReadStatusStore`)
//!
//! # Example
//!
//! ```no_run
//! use catalog::{walk_directory, CatalogBuilder};
//! use std::path::Path;
//!
//! let entries = walk_directory(Path::new("/media/TeslaCam")).unwrap();
//! for event in CatalogBuilder::new().build(&entries) {
//!     println!("{} ({} clips)", event.title(), event.clip_count());
//! }
//! ```

mod builder;
pub mod display;
mod entry;
mod error;
mod filename;
mod metadata;
mod store;

pub use builder::{CatalogBuilder, FsReader, MetadataReader};
pub use entry::{walk_directory, FileEntry};
pub use error::CatalogError;
pub use filename::{format_clip_key, parse_clip_name, ClipName};
pub use metadata::{parse_metadata, parse_timestamp};
pub use store::ReadStatusStore;

use contracts::Event;
use std::path::Path;

/// List `root` and build its events with read flags from `store`
pub fn scan(root: &Path, store: &ReadStatusStore) -> Result<Vec<Event>, CatalogError> {
    let entries = walk_directory(root)?;
    Ok(CatalogBuilder::new().build_with_status(&entries, store))
}
