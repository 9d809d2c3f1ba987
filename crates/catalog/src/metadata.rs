//! `event.json` parsing
//!
//! The vehicle writes numbers as strings in some firmware versions, so every
//! numeric field accepts either. Anything unusable is simply absent.

use chrono::{DateTime, NaiveDateTime};
use contracts::EventMetadata;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetadata {
    timestamp: Option<Value>,
    reason: Option<Value>,
    city: Option<Value>,
    street: Option<Value>,
    est_lat: Option<Value>,
    est_lon: Option<Value>,
    camera: Option<Value>,
}

/// Parse `event.json` content. `None` when the document is not a JSON object.
pub fn parse_metadata(content: &str) -> Option<EventMetadata> {
    let value: Value = serde_json::from_str(content).ok()?;
    if !value.is_object() {
        return None;
    }
    let raw: RawMetadata = serde_json::from_value(value).ok()?;

    let gps = match (
        raw.est_lat.as_ref().and_then(as_number),
        raw.est_lon.as_ref().and_then(as_number),
    ) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    };

    Some(EventMetadata {
        timestamp: raw.timestamp.as_ref().and_then(Value::as_str).and_then(parse_timestamp),
        reason: as_text(raw.reason.as_ref()).filter(|r| !r.is_empty()),
        city: as_text(raw.city.as_ref()),
        street: as_text(raw.street.as_ref()),
        gps,
        camera_index: raw.camera.as_ref().and_then(as_index),
    })
}

/// ISO datetime, with or without offset. Offsets are dropped: clip names are local time too.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

fn as_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn as_index(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            // leading digits, like parseInt
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}
