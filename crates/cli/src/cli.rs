//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::CameraId;
use std::path::PathBuf;

/// Sentry Viewer - browse and replay multi-camera dashcam events
#[derive(Parser, Debug)]
#[command(
    name = "sentry-viewer",
    author,
    version,
    about = "Multi-camera dashcam/sentry event reviewer",
    long_about = "Catalogs dashcam recordings into events, extracts embedded vehicle \n\
                  telemetry, and replays events headlessly with every camera kept \n\
                  in sync against one master clock."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENTRY_VIEWER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SENTRY_VIEWER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Player configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, global = true, env = "SENTRY_VIEWER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read-status store file, overriding the configured path
    #[arg(long, global = true, env = "SENTRY_VIEWER_STORE")]
    pub store: Option<PathBuf>,

    /// Prometheus exporter port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "SENTRY_VIEWER_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the events found under a recordings directory
    Scan(ScanArgs),

    /// Extract telemetry embedded in a clip file
    Telemetry(TelemetryArgs),

    /// Replay an event headlessly with simulated camera tracks
    Play(PlayArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Set or clear an event's read flag
    MarkRead(MarkReadArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Recordings root (e.g. the TeslaCam folder)
    #[arg(env = "SENTRY_VIEWER_ROOT")]
    pub root: PathBuf,

    /// Only list events not yet marked read
    #[arg(long)]
    pub unread: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TelemetryArgs {
    /// Clip file (MP4)
    pub file: PathBuf,

    /// Show the sample nearest to this many seconds into the clip
    #[arg(long)]
    pub at: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    /// Recordings root
    #[arg(env = "SENTRY_VIEWER_ROOT")]
    pub root: PathBuf,

    /// Event directory name; defaults to the newest unread event
    #[arg(short, long)]
    pub event: Option<String>,

    /// Start at this many seconds into the event instead of the trigger
    #[arg(long)]
    pub seek: Option<f64>,

    /// Playback rate; defaults to the remembered rate
    #[arg(long, env = "SENTRY_VIEWER_RATE")]
    pub rate: Option<f64>,

    /// Master camera (front, back, left, right, inside)
    #[arg(long, value_parser = parse_camera)]
    pub camera: Option<CameraId>,

    /// Stop after this many wall-clock seconds
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(default_value = "sentry-viewer.toml")]
    pub file: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct MarkReadArgs {
    /// Event directory name
    pub event: String,

    /// Clear the flag instead of setting it
    #[arg(long, conflicts_with = "toggle")]
    pub unread: bool,

    /// Flip the current flag
    #[arg(long)]
    pub toggle: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

fn parse_camera(s: &str) -> Result<CameraId, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        let cli = Cli::try_parse_from([
            "sentry-viewer",
            "-vv",
            "play",
            "/media/TeslaCam",
            "--event",
            "2024-03-09_10-01-00",
            "--rate",
            "2",
            "--camera",
            "left",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.event.as_deref(), Some("2024-03-09_10-01-00"));
        assert_eq!(args.rate, Some(2.0));
        assert_eq!(args.camera, Some(CameraId::LeftRepeater));
    }

    #[test]
    fn test_unknown_camera_rejected() {
        let parsed = Cli::try_parse_from(["sentry-viewer", "play", "/x", "--camera", "roof"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sentry-viewer", "-q", "-v", "scan", "/x"]).is_err());
    }
}
