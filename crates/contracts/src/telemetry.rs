//! TelemetrySample - Telemetry extractor output
//!
//! Vehicle state decoded from the SEI payloads embedded in a clip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named vehicle-state attribute; discriminants are the wire field numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TelemetryField {
    Version = 1,
    GearState = 2,
    FrameSeqNo = 3,
    VehicleSpeedMps = 4,
    AcceleratorPedalPosition = 5,
    SteeringWheelAngle = 6,
    BlinkerOnLeft = 7,
    BlinkerOnRight = 8,
    BrakeApplied = 9,
    AutopilotState = 10,
    LatitudeDeg = 11,
    LongitudeDeg = 12,
    HeadingDeg = 13,
    #[serde(rename = "linearAccelerationMps2X")]
    LinearAccelerationMps2X = 14,
    #[serde(rename = "linearAccelerationMps2Y")]
    LinearAccelerationMps2Y = 15,
    #[serde(rename = "linearAccelerationMps2Z")]
    LinearAccelerationMps2Z = 16,
}

impl TelemetryField {
    /// All fields in wire order.
    pub const ALL: [TelemetryField; 16] = [
        TelemetryField::Version,
        TelemetryField::GearState,
        TelemetryField::FrameSeqNo,
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

    /// Map a wire field number (1..=16)
    pub fn from_field_number(number: u64) -> Option<Self> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// Wire field number
    pub fn field_number(self) -> u32 {
        self as u32
    }

    /// Boolean flag fields: any non-zero value means `true`
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            TelemetryField::BlinkerOnLeft
                | TelemetryField::BlinkerOnRight
                | TelemetryField::BrakeApplied
        )
    }

    /// camelCase attribute name
    pub fn name(self) -> &'static str {
        match self {
            TelemetryField::Version => "version",
            TelemetryField::GearState => "gearState",
            TelemetryField::FrameSeqNo => "frameSeqNo",
            TelemetryField::VehicleSpeedMps => "vehicleSpeedMps",
            TelemetryField::AcceleratorPedalPosition => "acceleratorPedalPosition",
            TelemetryField::SteeringWheelAngle => "steeringWheelAngle",
            TelemetryField::BlinkerOnLeft => "blinkerOnLeft",
            TelemetryField::BlinkerOnRight => "blinkerOnRight",
            TelemetryField::BrakeApplied => "brakeApplied",
            TelemetryField::AutopilotState => "autopilotState",
            TelemetryField::LatitudeDeg => "latitudeDeg",
            TelemetryField::LongitudeDeg => "longitudeDeg",
            TelemetryField::HeadingDeg => "headingDeg",
            TelemetryField::LinearAccelerationMps2X => "linearAccelerationMps2X",
            TelemetryField::LinearAccelerationMps2Y => "linearAccelerationMps2Y",
            TelemetryField::LinearAccelerationMps2Z => "linearAccelerationMps2Z",
        }
    }
}

/// Raw decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Flag(bool),
    Unsigned(u64),
    Float(f64),
}

impl TelemetryValue {
    /// Numeric view; flags read as 0/1
    pub fn as_f64(self) -> f64 {
        match self {
            TelemetryValue::Flag(b) => f64::from(u8::from(b)),
            TelemetryValue::Unsigned(v) => v as f64,
            TelemetryValue::Float(v) => v,
        }
    }

    /// Boolean view; non-zero numbers are `true`
    pub fn as_bool(self) -> bool {
        match self {
            TelemetryValue::Flag(b) => b,
            TelemetryValue::Unsigned(v) => v != 0,
            TelemetryValue::Float(v) => v != 0.0,
        }
    }
}

/// One decoded SEI record, tagged with the coded-frame counter at decode time.
///
/// Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Video frames (coded slices) seen before this record
    pub frame_index: u64,

    /// Decoded fields; absent fields were not present in the payload
    pub fields: BTreeMap<TelemetryField, TelemetryValue>,
}

impl TelemetrySample {
    /// Raw value for a field
    pub fn get(&self, field: TelemetryField) -> Option<TelemetryValue> {
        self.fields.get(&field).copied()
    }

    /// Numeric value for a field
    pub fn number(&self, field: TelemetryField) -> Option<f64> {
        self.get(field).map(TelemetryValue::as_f64)
    }

    /// Boolean value for a field
    pub fn flag(&self, field: TelemetryField) -> Option<bool> {
        self.get(field).map(TelemetryValue::as_bool)
    }

    pub fn vehicle_speed_mps(&self) -> Option<f64> {
        self.number(TelemetryField::VehicleSpeedMps)
    }

    pub fn steering_wheel_angle(&self) -> Option<f64> {
        self.number(TelemetryField::SteeringWheelAngle)
    }

    /// (latitude, longitude) when both are present
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((
            self.number(TelemetryField::LatitudeDeg)?,
            self.number(TelemetryField::LongitudeDeg)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_numbers() {
        assert_eq!(TelemetryField::from_field_number(0), None);
        assert_eq!(
            TelemetryField::from_field_number(4),
            Some(TelemetryField::VehicleSpeedMps)
        );
        assert_eq!(
            TelemetryField::from_field_number(16),
            Some(TelemetryField::LinearAccelerationMps2Z)
        );
        assert_eq!(TelemetryField::from_field_number(17), None);
        for (i, f) in TelemetryField::ALL.iter().enumerate() {
            assert_eq!(f.field_number() as usize, i + 1);
        }
    }

    #[test]
    fn test_serialized_names_match_name() {
        for f in TelemetryField::ALL {
            let json = serde_json::to_string(&f).unwrap();
            assert_eq!(json, format!("\"{}\"", f.name()));
        }
    }

    #[test]
    fn test_value_views() {
        assert!(TelemetryValue::Unsigned(2).as_bool());
        assert!(!TelemetryValue::Float(0.0).as_bool());
        assert_eq!(TelemetryValue::Flag(true).as_f64(), 1.0);
    }

    #[test]
    fn test_position_requires_both() {
        let mut sample = TelemetrySample::default();
        sample
            .fields
            .insert(TelemetryField::LatitudeDeg, TelemetryValue::Float(25.03));
        assert_eq!(sample.position(), None);
        sample
            .fields
            .insert(TelemetryField::LongitudeDeg, TelemetryValue::Float(121.56));
        assert_eq!(sample.position(), Some((25.03, 121.56)));
    }
}
