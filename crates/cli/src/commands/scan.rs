//! `scan` command implementation.

use std::collections::BTreeSet;

use anyhow::{Context as _, Result};
use catalog::display::format_event_time;
use catalog::ReadStatusStore;
use contracts::{CameraId, Event};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::cli::ScanArgs;

/// Event row for JSON output
#[derive(Serialize)]
struct EventInfo {
    name: String,
    title: String,
    reason: String,
    time: String,
    clips: usize,
    cameras: Vec<CameraId>,
    read: bool,
}

impl EventInfo {
    fn new(event: &Event, default_clip_duration_s: f64) -> Self {
        let cameras: BTreeSet<CameraId> = event.clips.iter().flat_map(|c| c.cameras()).collect();
        Self {
            name: event.name.clone(),
            title: event.title(),
            reason: event.reason().label().to_string(),
            time: format_event_time(event, default_clip_duration_s),
            clips: event.clip_count(),
            cameras: cameras.into_iter().collect(),
            read: event.read,
        }
    }
}

/// Execute the `scan` command
pub fn run_scan(ctx: &Context, args: &ScanArgs) -> Result<()> {
    info!(root = %args.root.display(), "Scanning recordings");

    let store = ReadStatusStore::load(&ctx.store_path);
    let events = catalog::scan(&args.root, &store)
        .with_context(|| format!("Failed to scan {}", args.root.display()))?;

    let rows: Vec<EventInfo> = events
        .iter()
        .filter(|e| !args.unread || !e.read)
        .map(|e| EventInfo::new(e, ctx.config.playback.default_clip_duration_s))
        .collect();
    info!(events = events.len(), shown = rows.len(), "Scan complete");

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize events")?;
        println!("{}", json);
    } else {
        print_events(&rows);
    }
    Ok(())
}

fn print_events(rows: &[EventInfo]) {
    if rows.is_empty() {
        println!("No events found.");
        return;
    }
    for row in rows {
        let marker = if row.read { " " } else { "*" };
        let cameras: Vec<&str> = row.cameras.iter().map(|c| c.display_name()).collect();
        println!("{} {}  {}", marker, row.name, row.time);
        println!(
            "    {} | {} | {} clips | {}",
            row.title,
            row.reason,
            row.clips,
            cameras.join(", ")
        );
    }
    println!();
    println!("{} events ({} unread)", rows.len(), rows.iter().filter(|r| !r.read).count());
}
