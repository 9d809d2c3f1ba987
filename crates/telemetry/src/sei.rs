//! Vendor SEI payload location
//!
//! Layout of a telemetry SEI NAL:
//! `[nal header][payload type][payload size] 0x42.. 0x69 <escaped tag stream> [stop byte]`

/// Filler repeated before the payload-start marker
pub const MARKER_FILL: u8 = 0x42;
/// Payload-start marker
pub const MARKER_START: u8 = 0x69;

/// Offset of the first marker byte: NAL header, payload type and size precede it
const MARKER_OFFSET: usize = 3;

/// Escaped tag stream of a telemetry SEI NAL, or `None` if the marker is absent.
///
/// At least one fill byte is required, and the trailing stop byte is excluded.
pub fn locate_payload(nal: &[u8]) -> Option<&[u8]> {
    if nal.len() <= MARKER_OFFSET {
        return None;
    }
    let fill = nal[MARKER_OFFSET..]
        .iter()
        .take_while(|&&b| b == MARKER_FILL)
        .count();
    let marker = MARKER_OFFSET + fill;
    if fill == 0 || marker + 1 >= nal.len() || nal[marker] != MARKER_START {
        return None;
    }
    Some(&nal[marker + 1..nal.len() - 1])
}

/// Remove H.264 emulation-prevention bytes (`00 00 03` -> `00 00`)
pub fn strip_emulation_prevention(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut zeros = 0usize;
    for &byte in data {
        if zeros >= 2 && byte == 0x03 {
            zeros = 0;
            continue;
        }
        out.push(byte);
        zeros = if byte == 0 { zeros + 1 } else { 0 };
    }
    out
}
