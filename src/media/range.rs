//! `Range` header parsing for audio streaming.
//!
//! Only a single `bytes=<start>-[<end>]` range is understood. Suffix ranges
//! (`bytes=-500`) and multi-range requests are refused, as is anything that
//! does not parse. Parsing happens in two steps because the header must be
//! checked before the object store is probed for the resource size.

use crate::media::MediaError;

/// A syntactically valid range request, not yet checked against a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    start: u64,
    end: Option<u64>,
}

impl RangeRequest {
    /// Parse the raw `Range` header value. A missing header is an error.
    pub fn from_header(header: Option<&str>) -> Result<Self, MediaError> {
        let header = header.ok_or(MediaError::RangeRequired)?;
        let spec = header
            .trim()
            .strip_prefix("bytes=")
            .ok_or(MediaError::RangeNotSatisfiable)?;
        let (start, end) = spec
            .split_once('-')
            .ok_or(MediaError::RangeNotSatisfiable)?;

        let start = parse_offset(start).ok_or(MediaError::RangeNotSatisfiable)?;
        let end = match end.trim() {
            "" => None,
            end => Some(parse_offset(end).ok_or(MediaError::RangeNotSatisfiable)?),
        };

        Ok(Self { start, end })
    }

    /// Resolve against the resource size, defaulting the end to the last byte.
    pub fn resolve(self, total_size: u64) -> Result<ByteRange, MediaError> {
        let end = match self.end {
            Some(end) => end,
            None => total_size
                .checked_sub(1)
                .ok_or(MediaError::RangeNotSatisfiable)?,
        };

        if self.start >= total_size || end >= total_size || self.start > end {
            return Err(MediaError::RangeNotSatisfiable);
        }

        Ok(ByteRange {
            start: self.start,
            end,
        })
    }
}

fn parse_offset(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Inclusive byte interval within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value sent to the client.
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }

    /// `Range` value sent to the object store.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// True when the range spans the whole resource.
    pub fn is_full(&self, total_size: u64) -> bool {
        self.start == 0 && self.end + 1 == total_size
    }
}

/// Parse and resolve in one step.
pub fn parse_range(header: Option<&str>, total_size: u64) -> Result<ByteRange, MediaError> {
    RangeRequest::from_header(header)?.resolve(total_size)
}
