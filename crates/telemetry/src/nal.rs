//! AVCC NAL unit framing

use bytes::Buf;
use tracing::trace;

/// Coded slice of a non-IDR picture
pub const NAL_SLICE: u8 = 1;
/// Coded slice of an IDR picture
pub const NAL_IDR_SLICE: u8 = 5;
/// Supplemental enhancement information
pub const NAL_SEI: u8 = 6;

/// NAL unit type from the header byte
#[inline]
pub fn nal_type(header: u8) -> u8 {
    header & 0x1f
}

/// Whether a NAL type carries a coded picture
#[inline]
pub fn is_coded_slice(kind: u8) -> bool {
    kind == NAL_SLICE || kind == NAL_IDR_SLICE
}

/// Iterator over length-prefixed (4-byte big-endian) NAL units.
///
/// A zero length or a unit running past the end terminates the walk.
pub struct NalUnits<'a> {
    rest: &'a [u8],
}

impl<'a> NalUnits<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { rest: payload }
    }
}

impl<'a> Iterator for NalUnits<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.remaining() < 4 {
            return None;
        }
        let mut cursor = self.rest;
        let len = cursor.get_u32() as usize;
        if len < 1 || len > cursor.remaining() {
            trace!(
                declared = len,
                available = cursor.remaining(),
                "malformed NAL length, ending walk"
            );
            self.rest = &[];
            return None;
        }
        let (unit, rest) = cursor.split_at(len);
        self.rest = rest;
        Some(unit)
    }
}
