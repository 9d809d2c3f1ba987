//! ISO-BMFF box scanning
//!
//! Only what extraction and the duration probe need: walk sibling boxes,
//! locate `mdat`, and read `moov/mvhd`.

use bytes::Buf;
use std::ops::Range;
use tracing::trace;

use crate::TelemetryError;

/// Header of one box, with absolute offsets into the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    pub kind: [u8; 4],
    /// Offset of the size field
    pub start: usize,
    /// 8, or 16 with an extended size
    pub header_len: usize,
    /// End of the box, clamped to the scanned range
    pub end: usize,
}

impl BoxHeader {
    /// Payload byte range
    pub fn payload(&self) -> Range<usize> {
        (self.start + self.header_len)..self.end
    }

    pub fn is(&self, kind: &[u8; 4]) -> bool {
        &self.kind == kind
    }

    pub fn kind_str(&self) -> String {
        String::from_utf8_lossy(&self.kind).into_owned()
    }
}

/// Iterator over sibling boxes inside `range` of `data`.
///
/// Stops at the first header that does not fit or declares an impossible size.
pub struct Boxes<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Boxes<'a> {
    /// Top-level boxes of a whole file
    pub fn new(data: &'a [u8]) -> Self {
        Self::within(data, 0..data.len())
    }

    /// Child boxes of a payload range
    pub fn within(data: &'a [u8], range: Range<usize>) -> Self {
        let end = range.end.min(data.len());
        Self {
            data,
            pos: range.start.min(end),
            end,
        }
    }
}

impl Iterator for Boxes<'_> {
    type Item = BoxHeader;

    fn next(&mut self) -> Option<BoxHeader> {
        if self.end - self.pos < 8 {
            return None;
        }
        let start = self.pos;
        let mut buf = &self.data[start..self.end];
        let size32 = buf.get_u32();
        let mut kind = [0u8; 4];
        buf.copy_to_slice(&mut kind);

        let (size, header_len) = match size32 {
            0 => ((self.end - start) as u64, 8),
            1 => {
                if buf.remaining() < 8 {
                    self.pos = self.end;
                    return None;
                }
                (buf.get_u64(), 16)
            }
            n => (u64::from(n), 8),
        };

        if size < header_len as u64 {
            trace!(offset = start, size, "box size smaller than its header, stopping scan");
            self.pos = self.end;
            return None;
        }

        let end = usize::try_from(size)
            .ok()
            .and_then(|s| start.checked_add(s))
            .map_or(self.end, |e| e.min(self.end));

        self.pos = end;
        Some(BoxHeader {
            kind,
            start,
            header_len,
            end,
        })
    }
}

/// First sibling box of the given type
pub fn find_box(data: &[u8], range: Range<usize>, kind: &[u8; 4]) -> Option<BoxHeader> {
    Boxes::within(data, range).find(|b| b.is(kind))
}

/// Payload range of the top-level `mdat` box
pub fn mdat_payload(data: &[u8]) -> Option<Range<usize>> {
    find_box(data, 0..data.len(), b"mdat").map(|b| b.payload())
}

/// Movie duration in seconds from `moov/mvhd` (version 0 or 1)
pub fn probe_duration(data: &[u8]) -> Result<f64, TelemetryError> {
    let moov = find_box(data, 0..data.len(), b"moov")
        .ok_or_else(|| TelemetryError::box_not_found("moov"))?;
    let mvhd = find_box(data, moov.payload(), b"mvhd")
        .ok_or_else(|| TelemetryError::box_not_found("mvhd"))?;

    let mut buf = &data[mvhd.payload()];
    if buf.remaining() < 4 {
        return Err(TelemetryError::malformed("mvhd", "missing version"));
    }
    let version = buf.get_u8();
    buf.advance(3); // flags

    let (timescale, duration) = match version {
        0 => {
            if buf.remaining() < 16 {
                return Err(TelemetryError::malformed("mvhd", "truncated v0 header"));
            }
            buf.advance(8); // creation + modification
            (buf.get_u32(), u64::from(buf.get_u32()))
        }
        1 => {
            if buf.remaining() < 28 {
                return Err(TelemetryError::malformed("mvhd", "truncated v1 header"));
            }
            buf.advance(16);
            (buf.get_u32(), buf.get_u64())
        }
        v => {
            return Err(TelemetryError::malformed(
                "mvhd",
                format!("unsupported version {v}"),
            ))
        }
    };

    if timescale == 0 {
        return Err(TelemetryError::malformed("mvhd", "timescale is zero"));
    }
    Ok(duration as f64 / f64::from(timescale))
}
