use std::ops::Range;

use crate::bits;
use crate::decode::DecodeError;
use crate::pdu::{Header, Protocol};

/// Bounds-checked access to the region of the frame a decoder works on.
///
/// Offsets passed in are relative to the start of the region; the header
/// views handed back are absolute positions in the frame.
pub(crate) struct HeaderReader<'a> {
    protocol: Protocol,
    frame: &'a [u8],
    region: Range<usize>,
}

impl<'a> HeaderReader<'a> {
    pub(crate) fn new(protocol: Protocol, frame: &'a [u8], region: Range<usize>) -> Self {
        let end = region.end.min(frame.len());
        let start = region.start.min(end);
        Self {
            protocol,
            frame,
            region: start..end,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.region.len()
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::TruncatedFrame {
            protocol: self.protocol,
            needed,
            actual: self.len(),
        }
    }

    pub(crate) fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.len() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    fn slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        if range.end > self.len() || range.start > range.end {
            return Err(self.truncated(range.end));
        }
        let base = self.region.start;
        Ok(&self.frame[base + range.start..base + range.end])
    }

    pub(crate) fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        let bytes = self.slice(offset..offset + 1)?;
        Ok(bytes[0])
    }

    /// Read a bit range, counted from the first bit of the region.
    pub(crate) fn read_bits(&self, range: Range<usize>) -> Result<u64, DecodeError> {
        let bytes = self.slice(0..range.end.div_ceil(8))?;
        Ok(bits::extract_uint(bytes, range.start, range.end))
    }

    /// Byte-aligned header view.
    pub(crate) fn bytes(&self, range: Range<usize>) -> Result<Header, DecodeError> {
        self.slice(range.clone())?;
        Ok(Header::bytes(self.region.start + range.start, range.len()))
    }

    /// Sub-byte header view, counted from the first bit of the region.
    pub(crate) fn bits(&self, range: Range<usize>) -> Result<Header, DecodeError> {
        self.slice(0..range.end.div_ceil(8))?;
        Ok(Header::bits(
            self.region.start * 8 + range.start,
            range.end.saturating_sub(range.start),
        ))
    }

    /// Everything from `offset` to the end of the region.
    pub(crate) fn rest(&self, offset: usize) -> Result<Header, DecodeError> {
        self.bytes(offset..self.len())
    }
}
