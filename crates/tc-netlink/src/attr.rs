//! Netlink attribute building and parsing.
//!
//! Netlink uses a TLV (Type-Length-Value) format for attributes:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Length (2 bytes) │  Type (2 bytes)     │  <- header (4 bytes)
//! ├─────────────────────────────────────────┤
//! │  Value (variable length, padded to 4)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The length covers the header and value but not the trailing padding.
#![expect(
    clippy::host_endian_bytes,
    reason = "netlink carries attribute values in host byte order"
)]

use crate::consts::{NLA_ALIGNTO, NLA_HDRLEN, NLA_TYPE_MASK};

/// Rounds `len` up to the netlink alignment.
#[must_use]
pub const fn align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Builds a complete attribute (header, value and padding).
#[must_use]
pub fn build_attr(kind: u16, value: &[u8]) -> Vec<u8> {
    let attr_len = NLA_HDRLEN + value.len();
    let mut buf = Vec::with_capacity(align(attr_len));
    buf.extend_from_slice(&encode_len(attr_len).to_ne_bytes());
    buf.extend_from_slice(&kind.to_ne_bytes());
    buf.extend_from_slice(value);
    buf.resize(align(attr_len), 0);
    buf
}

/// Converts an attribute length into its 16-bit header field, saturating on
/// overflow so an oversized attribute is rejected by the kernel rather than
/// silently wrapping.
pub(crate) fn encode_len(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

/// Iterates over the attributes packed in `buf`.
#[must_use]
pub const fn attributes(buf: &[u8]) -> AttrIter<'_> {
    AttrIter { buf }
}

/// Iterator over `(type, value)` pairs of a packed attribute buffer.
///
/// Iteration stops at the first malformed header.
#[derive(Debug, Clone)]
pub struct AttrIter<'a> {
    buf: &'a [u8],
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let len = usize::from(read_u16(self.buf.get(0..2)?)?);
        let kind = read_u16(self.buf.get(2..4)?)?;
        if len < NLA_HDRLEN {
            self.buf = &[];
            return None;
        }
        let Some(value) = self.buf.get(NLA_HDRLEN..len) else {
            self.buf = &[];
            return None;
        };
        self.buf = self.buf.get(align(len)..).unwrap_or(&[]);
        Some((kind & NLA_TYPE_MASK, value))
    }
}

/// Reads a native-endian `u16` from the start of `value`.
#[must_use]
pub fn read_u16(value: &[u8]) -> Option<u16> {
    let bytes: [u8; 2] = value.get(0..2)?.try_into().ok()?;
    Some(u16::from_ne_bytes(bytes))
}

/// Reads a native-endian `u32` from the start of `value`.
#[must_use]
pub fn read_u32(value: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = value.get(0..4)?.try_into().ok()?;
    Some(u32::from_ne_bytes(bytes))
}

/// Reads a native-endian `i32` from the start of `value`.
#[must_use]
pub fn read_i32(value: &[u8]) -> Option<i32> {
    let bytes: [u8; 4] = value.get(0..4)?.try_into().ok()?;
    Some(i32::from_ne_bytes(bytes))
}

/// Reads a native-endian `u64` from the start of `value`.
#[must_use]
pub fn read_u64(value: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = value.get(0..8)?.try_into().ok()?;
    Some(u64::from_ne_bytes(bytes))
}

/// Interprets a string attribute, dropping the trailing NUL.
#[must_use]
pub fn read_str(value: &[u8]) -> Option<&str> {
    let trimmed = value.split(|byte| *byte == 0).next().unwrap_or(value);
    std::str::from_utf8(trimmed).ok()
}
