//! CatalogBuilder - groups file entries into Events and Clips
//!
//! Never fails on content: malformed names, unknown cameras and unreadable
//! metadata are dropped with a debug log.

use std::collections::BTreeMap;
use std::io;
use tracing::{debug, info, instrument};

use contracts::{CameraId, Clip, Event, EventMetadata, VideoSource};

use crate::entry::FileEntry;
use crate::filename::parse_clip_name;
use crate::metadata::parse_metadata;
use crate::store::ReadStatusStore;

const METADATA_FILE: &str = "event.json";
const THUMBNAIL_FILE: &str = "thumb.png";
const UNKNOWN_EVENT: &str = "Unknown Event";

/// Source of `event.json` contents.
pub trait MetadataReader {
    fn read_to_string(&self, entry: &FileEntry) -> io::Result<String>;
}

/// Reads metadata from the entry's filesystem location
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl MetadataReader for FsReader {
    fn read_to_string(&self, entry: &FileEntry) -> io::Result<String> {
        std::fs::read_to_string(&entry.location)
    }
}

/// Per-directory accumulator
#[derive(Default)]
struct PendingEvent {
    name: String,
    clips: BTreeMap<chrono::NaiveDateTime, Clip>,
    metadata: Option<EventMetadata>,
    thumbnail: Option<VideoSource>,
}

/// Builds the event list from a flat file listing.
pub struct CatalogBuilder<R = FsReader> {
    reader: R,
}

impl Default for CatalogBuilder<FsReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder<FsReader> {
    pub fn new() -> Self {
        Self { reader: FsReader }
    }
}

impl<R: MetadataReader> CatalogBuilder<R> {
    /// Use a custom metadata source
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Group entries into events, newest first.
    ///
    /// The result depends only on the set of entries, not their order.
    #[instrument(level = "debug", skip_all, fields(entries = entries.len()))]
    pub fn build(&self, entries: &[FileEntry]) -> Vec<Event> {
        let mut sorted: Vec<&FileEntry> = entries.iter().collect();
        sorted.sort();

        let mut pending: BTreeMap<String, PendingEvent> = BTreeMap::new();
        let mut dropped = 0usize;

        for entry in sorted {
            let file_name = entry.file_name();
            if file_name.starts_with('.') {
                continue;
            }

            let parent = entry.parent();
            let event = pending
                .entry(parent.to_string())
                .or_insert_with(|| PendingEvent {
                    name: entry.parent_name().unwrap_or(UNKNOWN_EVENT).to_string(),
                    ..Default::default()
                });

            if file_name == METADATA_FILE {
                event.metadata = self.load_metadata(entry);
            } else if file_name == THUMBNAIL_FILE {
                event.thumbnail = Some(video_source(entry));
            } else if !add_clip_file(event, entry) {
                dropped += 1;
            }
        }

        let mut events: Vec<Event> = pending
            .into_iter()
            .filter_map(|(id, p)| {
                if p.clips.is_empty() {
                    debug!(event = %id, "no clips, discarding event");
                    return None;
                }
                Some(Event {
                    id,
                    name: p.name,
                    clips: p.clips.into_values().collect(),
                    metadata: p.metadata,
                    thumbnail: p.thumbnail,
                    read: false,
                })
            })
            .collect();

        // newest first; id breaks ties so output stays deterministic
        events.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()).then_with(|| a.id.cmp(&b.id)));

        info!(events = events.len(), dropped, "catalog built");
        events
    }

    /// Build, then fill read flags from the store
    pub fn build_with_status(&self, entries: &[FileEntry], store: &ReadStatusStore) -> Vec<Event> {
        let mut events = self.build(entries);
        for event in &mut events {
            event.read = store.is_read(&event.name);
        }
        events
    }

    fn load_metadata(&self, entry: &FileEntry) -> Option<EventMetadata> {
        let content = match self.reader.read_to_string(entry) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %entry.relative_path, error = %e, "metadata unreadable");
                return None;
            }
        };
        let parsed = parse_metadata(&content);
        if parsed.is_none() {
            debug!(path = %entry.relative_path, "metadata is not a JSON object");
        }
        parsed
    }
}

fn video_source(entry: &FileEntry) -> VideoSource {
    VideoSource {
        relative_path: entry.relative_path.clone(),
        location: entry.location.clone(),
    }
}

/// Returns false when the file was dropped
fn add_clip_file(event: &mut PendingEvent, entry: &FileEntry) -> bool {
    let Some(name) = parse_clip_name(entry.file_name()) else {
        debug!(path = %entry.relative_path, "not a clip file name, skipping");
        return false;
    };
    let Some(camera) = CameraId::from_file_stem(name.camera) else {
        debug!(path = %entry.relative_path, camera = name.camera, "unknown camera, skipping");
        return false;
    };
    event
        .clips
        .entry(name.key)
        .or_insert_with(|| Clip::new(name.key))
        .videos
        .insert(camera, video_source(entry));
    true
}
