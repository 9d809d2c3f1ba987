//! `telemetry` command implementation.

use anyhow::{Context as _, Result};
use contracts::TelemetrySample;
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::cli::TelemetryArgs;

#[derive(Serialize)]
struct TelemetryInfo<'a> {
    file: String,
    samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_frame: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_frame: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<&'a TelemetrySample>,
}

/// Execute the `telemetry` command
pub fn run_telemetry(ctx: &Context, args: &TelemetryArgs) -> Result<()> {
    info!(file = %args.file.display(), "Extracting telemetry");

    let samples = telemetry::extract_from_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    info!(samples = samples.len(), "Telemetry extracted");

    let settings = &ctx.config.telemetry;
    let at = args.at.and_then(|t| {
        telemetry::sample_at_within(&samples, t, settings.fps, settings.max_frame_distance)
    });

    if args.json {
        let info = TelemetryInfo {
            file: args.file.display().to_string(),
            samples: samples.len(),
            first_frame: samples.first().map(|s| s.frame_index),
            last_frame: samples.last().map(|s| s.frame_index),
            at,
        };
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize telemetry")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}: {} samples", args.file.display(), samples.len());
    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        println!("  frames {}..={}", first.frame_index, last.frame_index);
    }

    match (args.at, at) {
        (Some(t), Some(sample)) => {
            println!("\nAt {:.2}s (frame {}):", t, sample.frame_index);
            print_sample(sample);
        }
        (Some(t), None) => println!("\nNo sample within {} frames of {:.2}s", settings.max_frame_distance, t),
        (None, _) => {}
    }
    Ok(())
}

fn print_sample(sample: &TelemetrySample) {
    for row in telemetry::format_sample(sample) {
        if row.unit.is_empty() {
            println!("  {:<14} {}", row.label, row.value);
        } else {
            println!("  {:<14} {} {}", row.label, row.value, row.unit);
        }
    }
    if let Some(g) = telemetry::total_g(sample) {
        println!("  {:<14} {:.2} g", "Total G", g);
    }
}
