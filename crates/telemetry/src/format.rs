//! Human-readable telemetry values for overlays and the CLI

use contracts::{TelemetryField, TelemetrySample};

/// Standard gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Fields shown in overlays, in display order
const DISPLAY_ORDER: [TelemetryField; 15] = [
    TelemetryField::Version,
    TelemetryField::GearState,
    TelemetryField::VehicleSpeedMps,
    TelemetryField::AcceleratorPedalPosition,
    TelemetryField::SteeringWheelAngle,
    TelemetryField::BlinkerOnLeft,
    TelemetryField::BlinkerOnRight,
    TelemetryField::BrakeApplied,
    TelemetryField::AutopilotState,
    TelemetryField::LatitudeDeg,
    TelemetryField::LongitudeDeg,
    TelemetryField::HeadingDeg,
    TelemetryField::LinearAccelerationMps2X,
    TelemetryField::LinearAccelerationMps2Y,
    TelemetryField::LinearAccelerationMps2Z,
];

/// One overlay row
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedField {
    pub field: TelemetryField,
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

fn label(field: TelemetryField) -> (&'static str, &'static str) {
    match field {
        TelemetryField::Version => ("Version", ""),
        TelemetryField::GearState => ("Gear", ""),
        TelemetryField::FrameSeqNo => ("Frame", ""),
        TelemetryField::VehicleSpeedMps => ("Speed", "km/h"),
        TelemetryField::AcceleratorPedalPosition => ("Accelerator", "%"),
        TelemetryField::SteeringWheelAngle => ("Steering", "°"),
        TelemetryField::BlinkerOnLeft => ("Left blinker", ""),
        TelemetryField::BlinkerOnRight => ("Right blinker", ""),
        TelemetryField::BrakeApplied => ("Brake", ""),
        TelemetryField::AutopilotState => ("Autopilot", ""),
        TelemetryField::LatitudeDeg => ("Latitude", "°"),
        TelemetryField::LongitudeDeg => ("Longitude", "°"),
        TelemetryField::HeadingDeg => ("Heading", "°"),
        TelemetryField::LinearAccelerationMps2X => ("Accel X", "m/s²"),
        TelemetryField::LinearAccelerationMps2Y => ("Accel Y", "m/s²"),
        TelemetryField::LinearAccelerationMps2Z => ("Accel Z", "m/s²"),
    }
}

/// Gear code to letter; unknown codes print as the number
pub fn gear_name(code: f64) -> String {
    match code as i64 {
        0 => "P".into(),
        1 => "D".into(),
        2 => "R".into(),
        3 => "N".into(),
        other => other.to_string(),
    }
}

/// Autopilot code to name; unknown codes print as the number
pub fn autopilot_name(code: f64) -> String {
    match code as i64 {
        0 => "OFF".into(),
        1 => "FSD".into(),
        2 => "Autosteer".into(),
        3 => "TACC".into(),
        other => other.to_string(),
    }
}

fn on_off(flag: bool) -> String {
    if flag { "ON" } else { "OFF" }.to_string()
}

/// Format one field's value; `None` when the sample lacks it
pub fn format_value(sample: &TelemetrySample, field: TelemetryField) -> Option<String> {
    let raw = sample.get(field)?;
    let n = raw.as_f64();
    Some(match field {
        TelemetryField::GearState => gear_name(n),
        TelemetryField::AutopilotState => autopilot_name(n),
        TelemetryField::VehicleSpeedMps => format!("{:.1}", n * 3.6),
        TelemetryField::AcceleratorPedalPosition => format!("{:.0}", n * 100.0),
        TelemetryField::SteeringWheelAngle | TelemetryField::HeadingDeg => format!("{n:.1}"),
        TelemetryField::BlinkerOnLeft
        | TelemetryField::BlinkerOnRight
        | TelemetryField::BrakeApplied => on_off(raw.as_bool()),
        TelemetryField::LatitudeDeg | TelemetryField::LongitudeDeg => format!("{n:.6}"),
        TelemetryField::LinearAccelerationMps2X
        | TelemetryField::LinearAccelerationMps2Y
        | TelemetryField::LinearAccelerationMps2Z => format!("{n:.2}"),
        TelemetryField::Version | TelemetryField::FrameSeqNo => format!("{n}"),
    })
}

/// All present fields as overlay rows, in display order
pub fn format_sample(sample: &TelemetrySample) -> Vec<FormattedField> {
    DISPLAY_ORDER
        .iter()
        .filter_map(|&field| {
            let value = format_value(sample, field)?;
            let (label, unit) = label(field);
            Some(FormattedField {
                field,
                label,
                value,
                unit,
            })
        })
        .collect()
}

/// Planar acceleration felt by the driver, in G
pub fn total_g(sample: &TelemetrySample) -> Option<f64> {
    let x = sample.number(TelemetryField::LinearAccelerationMps2X)?;
    let y = sample.number(TelemetryField::LinearAccelerationMps2Y)?;
    Some(x.hypot(y) / STANDARD_GRAVITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TelemetryValue;

    fn sample(fields: &[(TelemetryField, TelemetryValue)]) -> TelemetrySample {
        TelemetrySample {
            frame_index: 0,
            fields: fields.iter().copied().collect(),
        }
    }

    #[test]
    fn test_value_formats() {
        let s = sample(&[
            (TelemetryField::VehicleSpeedMps, TelemetryValue::Float(27.78)),
            (TelemetryField::GearState, TelemetryValue::Unsigned(1)),
            (TelemetryField::AutopilotState, TelemetryValue::Unsigned(3)),
            (TelemetryField::AcceleratorPedalPosition, TelemetryValue::Float(0.424)),
            (TelemetryField::BrakeApplied, TelemetryValue::Flag(true)),
            (TelemetryField::LatitudeDeg, TelemetryValue::Float(25.0339641)),
        ]);
        let v = |f| format_value(&s, f).unwrap();
        assert_eq!(v(TelemetryField::VehicleSpeedMps), "100.0");
        assert_eq!(v(TelemetryField::GearState), "D");
        assert_eq!(v(TelemetryField::AutopilotState), "TACC");
        assert_eq!(v(TelemetryField::AcceleratorPedalPosition), "42");
        assert_eq!(v(TelemetryField::BrakeApplied), "ON");
        assert_eq!(v(TelemetryField::LatitudeDeg), "25.033964");
        assert!(format_value(&s, TelemetryField::HeadingDeg).is_none());
    }

    #[test]
    fn test_format_sample_order() {
        let s = sample(&[
            (TelemetryField::HeadingDeg, TelemetryValue::Float(12.0)),
            (TelemetryField::GearState, TelemetryValue::Unsigned(7)),
            (TelemetryField::FrameSeqNo, TelemetryValue::Unsigned(99)),
        ]);
        let rows = format_sample(&s);
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Gear", "Heading"]);
        assert_eq!(rows[0].value, "7");
    }

    #[test]
    fn test_total_g() {
        let s = sample(&[
            (TelemetryField::LinearAccelerationMps2X, TelemetryValue::Float(3.0)),
            (TelemetryField::LinearAccelerationMps2Y, TelemetryValue::Float(4.0)),
        ]);
        let g = total_g(&s).unwrap();
        assert!((g - 5.0 / STANDARD_GRAVITY).abs() < 1e-12);
        assert!(total_g(&TelemetrySample::default()).is_none());
    }
}
