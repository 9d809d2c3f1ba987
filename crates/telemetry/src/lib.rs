//! # Telemetry
//!
//! Recovers vehicle-state samples embedded as vendor SEI payloads in dashcam
//! H.264 MP4 files.
//!
//! Pipeline:
//! 1. locate the top-level `mdat` box
//! 2. walk its AVCC-framed NAL units, counting coded slices as frames
//! 3. for SEI units carrying the `0x42.. 0x69` marker, strip emulation
//!    prevention and decode the protobuf-style tag stream
//!
//! Extraction is infallible: a corrupt box or unit ends or skips that part of
//! the scan and whatever was decoded so far is returned.

mod error;
pub mod format;
mod lookup;
pub mod mp4;
pub mod nal;
pub mod sei;
pub mod wire;

pub use contracts::{TelemetryField, TelemetrySample, TelemetryValue};
pub use error::TelemetryError;
pub use format::{format_sample, format_value, total_g, FormattedField};
pub use lookup::{sample_at, sample_at_within, DEFAULT_FPS, MAX_FRAME_DISTANCE};
pub use mp4::probe_duration;

use bytes::Bytes;
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Decode every telemetry sample in an MP4 file buffer, in stream order.
#[instrument(level = "debug", skip(data), fields(len = data.len()))]
pub fn extract_telemetry(data: &[u8]) -> Vec<TelemetrySample> {
    let Some(mdat) = mp4::mdat_payload(data) else {
        debug!("no mdat box, nothing to extract");
        return Vec::new();
    };

    let mut samples = Vec::new();
    let mut frame_index = 0u64;

    for unit in nal::NalUnits::new(&data[mdat]) {
        let kind = nal::nal_type(unit[0]);

        if kind == nal::NAL_SEI {
            match sei::locate_payload(unit) {
                Some(escaped) => {
                    let payload = sei::strip_emulation_prevention(escaped);
                    samples.push(TelemetrySample {
                        frame_index,
                        fields: wire::decode_fields(&payload),
                    });
                }
                None => trace!(frame_index, "SEI without telemetry marker"),
            }
        }

        if nal::is_coded_slice(kind) {
            frame_index += 1;
        }
    }

    metrics::counter!("telemetry_samples_decoded_total").increment(samples.len() as u64);
    debug!(samples = samples.len(), frames = frame_index, "telemetry extracted");
    samples
}

/// Read a clip file into memory
pub fn read_file(path: &Path) -> Result<Bytes, TelemetryError> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|source| TelemetryError::Read {
            path: path.display().to_string(),
            source,
        })
}

/// Read a clip file and extract its telemetry
pub fn extract_from_file(path: &Path) -> Result<Vec<TelemetrySample>, TelemetryError> {
    let data = read_file(path)?;
    Ok(extract_telemetry(&data))
}

/// Read a clip file and probe its duration
pub fn probe_file_duration(path: &Path) -> Result<f64, TelemetryError> {
    let data = read_file(path)?;
    probe_duration(&data)
}
