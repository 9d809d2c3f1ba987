//! Protobuf-style tag stream decoding
//!
//! The payload is a flat record list with no nested messages. Decoding stops at
//! the first truncated value and keeps everything read before it.

use bytes::Buf;
use std::collections::BTreeMap;
use tracing::trace;

use contracts::{TelemetryField, TelemetryValue};

const WIRE_VARINT: u64 = 0;
const WIRE_FIXED64: u64 = 1;
const WIRE_LEN: u64 = 2;
const WIRE_FIXED32: u64 = 5;

/// Longest valid varint encoding of a u64
const MAX_VARINT_BYTES: usize = 10;

/// Read a base-128 varint; `None` if the buffer ends mid-value or it is overlong
fn read_varint(buf: &mut &[u8]) -> Option<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_BYTES {
        if !buf.has_remaining() {
            return None;
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

/// Decode one record's value, or `None` if the stream is exhausted or broken
fn read_value(buf: &mut &[u8], wire_type: u64) -> Option<Option<TelemetryValue>> {
    match wire_type {
        WIRE_VARINT => read_varint(buf).map(|v| Some(TelemetryValue::Unsigned(v))),
        WIRE_FIXED64 => {
            if buf.remaining() < 8 {
                return None;
            }
            Some(Some(TelemetryValue::Float(buf.get_f64_le())))
        }
        WIRE_FIXED32 => {
            if buf.remaining() < 4 {
                return None;
            }
            Some(Some(TelemetryValue::Float(f64::from(buf.get_f32_le()))))
        }
        WIRE_LEN => {
            let len = read_varint(buf)?;
            let skip = usize::try_from(len).map_or(buf.remaining(), |l| l.min(buf.remaining()));
            buf.advance(skip);
            Some(None)
        }
        // groups and reserved types carry no value we can size; skip the tag only
        _ => Some(None),
    }
}

/// Decode a cleaned SEI payload into named fields.
///
/// Unknown field numbers are consumed and dropped; a repeated field keeps the last value.
pub fn decode_fields(payload: &[u8]) -> BTreeMap<TelemetryField, TelemetryValue> {
    let mut buf = payload;
    let mut fields = BTreeMap::new();

    while buf.has_remaining() {
        let Some(tag) = read_varint(&mut buf) else {
            trace!("truncated tag, stopping decode");
            break;
        };
        let field_number = tag >> 3;
        let wire_type = tag & 0x7;

        let Some(value) = read_value(&mut buf, wire_type) else {
            trace!(field_number, wire_type, "truncated value, stopping decode");
            break;
        };
        let Some(value) = value else { continue };
        let Some(field) = TelemetryField::from_field_number(field_number) else {
            continue;
        };

        let value = if field.is_flag() {
            TelemetryValue::Flag(value.as_bool())
        } else {
            value
        };
        fields.insert(field, value);
    }

    fields
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn varint(mut v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                out.push(byte);
                return out;
            }
            out.push(byte | 0x80);
        }
    }

    pub(crate) fn tag(field: u64, wire: u64) -> Vec<u8> {
        varint((field << 3) | wire)
    }

    pub(crate) fn float_field(field: u64, v: f32) -> Vec<u8> {
        let mut out = tag(field, 5);
        out.extend_from_slice(&v.to_le_bytes());
        out
    }

    #[test]
    fn test_varint() {
        let mut b: &[u8] = &[0xAC, 0x02];
        assert_eq!(read_varint(&mut b), Some(300));
        let mut b: &[u8] = &[0x80];
        assert_eq!(read_varint(&mut b), None);
    }

    #[test]
    fn test_decode_mixed_types() {
        let mut p = tag(2, 0);
        p.extend(varint(1));
        p.extend(float_field(4, 27.78));
        p.extend(tag(11, 1));
        p.extend_from_slice(&25.033_964_f64.to_le_bytes());
        let fields = decode_fields(&p);
        assert_eq!(
            fields.get(&TelemetryField::GearState),
            Some(&TelemetryValue::Unsigned(1))
        );
        match fields.get(&TelemetryField::VehicleSpeedMps) {
            Some(TelemetryValue::Float(v)) => assert!((v - 27.78).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            fields.get(&TelemetryField::LatitudeDeg),
            Some(&TelemetryValue::Float(25.033_964))
        );
    }

    #[test]
    fn test_flags_coerced() {
        let mut p = tag(7, 0);
        p.extend(varint(2));
        p.extend(tag(9, 0));
        p.extend(varint(0));
        let fields = decode_fields(&p);
        assert_eq!(
            fields.get(&TelemetryField::BlinkerOnLeft),
            Some(&TelemetryValue::Flag(true))
        );
        assert_eq!(
            fields.get(&TelemetryField::BrakeApplied),
            Some(&TelemetryValue::Flag(false))
        );
    }

    #[test]
    fn test_length_delimited_skipped() {
        let mut p = tag(20, 2);
        p.extend(varint(3));
        p.extend_from_slice(b"abc");
        p.extend(float_field(6, -12.5));
        let fields = decode_fields(&p);
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields.get(&TelemetryField::SteeringWheelAngle),
            Some(&TelemetryValue::Float(-12.5))
        );
    }

    #[test]
    fn test_truncated_value_keeps_prefix() {
        let mut p = float_field(13, 90.0);
        p.extend(tag(14, 1));
        p.extend_from_slice(&[0, 0, 0]);
        let fields = decode_fields(&p);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key(&TelemetryField::HeadingDeg));
    }

    #[test]
    fn test_unknown_field_dropped() {
        let mut p = tag(40, 0);
        p.extend(varint(5));
        p.extend(tag(1, 0));
        p.extend(varint(3));
        let fields = decode_fields(&p);
        assert_eq!(
            fields.into_iter().collect::<Vec<_>>(),
            vec![(TelemetryField::Version, TelemetryValue::Unsigned(3))]
        );
    }
}
