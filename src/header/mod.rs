//! Fixed-layout SEG-Y headers: textual (3200 B), binary (400 B) and the
//! per-trace header (240 B).
//!
//! # Field access
//! Every named field is a [`Field`] constant: a byte offset relative to the
//! start of its header plus a fixed-width [`FieldKind`].  Reads and writes go
//! through [`Field::read`] / [`Field::write`], which touch exactly
//! `kind.width()` bytes at `offset` and nothing else.  Readers and writers
//! therefore share one layout table and a file written by this crate can
//! always be re-read by it.
//!
//! # Endianness
//! All integer fields are big-endian.  No byte-order detection is performed.

use byteorder::{BigEndian, ByteOrder};

pub mod binary;
pub mod textual;
pub mod trace;

pub use binary::{BinaryHeader, BinaryHeaderDetails, SegyRevision, TraceGeometry};
pub use textual::{TextEncoding, TextualHeader};
pub use trace::TraceHeader;

/// Size of the textual (EBCDIC/ASCII card image) header.
pub const TEXTUAL_HEADER_SIZE: usize = 3200;
/// Size of the binary file header.
pub const BINARY_HEADER_SIZE:  usize = 400;
/// Offset of the first trace header: textual + binary header.
pub const FILE_HEADER_SIZE:    usize = TEXTUAL_HEADER_SIZE + BINARY_HEADER_SIZE;
/// Size of every trace header.
pub const TRACE_HEADER_SIZE:   usize = 240;
/// Every sample slot is four bytes wide, before and after standardization.
pub const SAMPLE_SIZE:         usize = 4;

/// Size in bytes of one trace carrying `num_samples` four-byte samples.
#[inline]
pub fn trace_size_for(num_samples: u16) -> u64 {
    TRACE_HEADER_SIZE as u64 + num_samples as u64 * SAMPLE_SIZE as u64
}

// ── Field descriptors ────────────────────────────────────────────────────────

/// On-disk representation of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    I16,
    U16,
    I32,
    U32,
    U64,
}

impl FieldKind {
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            FieldKind::I16 | FieldKind::U16 => 2,
            FieldKind::I32 | FieldKind::U32 => 4,
            FieldKind::U64                  => 8,
        }
    }
}

/// A named fixed-offset, fixed-width big-endian integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name:   &'static str,
    pub offset: usize,
    pub kind:   FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    /// Byte range covered by this field inside its header.
    #[inline]
    pub const fn range(self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.kind.width()
    }

    /// Read the field from `buf`, widening to `i64`.
    ///
    /// `U64` values above `i64::MAX` wrap; no SEG-Y count gets there.
    pub fn read(self, buf: &[u8]) -> i64 {
        let bytes = &buf[self.range()];
        match self.kind {
            FieldKind::I16 => BigEndian::read_i16(bytes) as i64,
            FieldKind::U16 => BigEndian::read_u16(bytes) as i64,
            FieldKind::I32 => BigEndian::read_i32(bytes) as i64,
            FieldKind::U32 => BigEndian::read_u32(bytes) as i64,
            FieldKind::U64 => BigEndian::read_u64(bytes) as i64,
        }
    }

    /// Write `value` into `buf`, truncating it to the field width.
    pub fn write(self, buf: &mut [u8], value: i64) {
        let bytes = &mut buf[self.range()];
        match self.kind {
            FieldKind::I16 => BigEndian::write_i16(bytes, value as i16),
            FieldKind::U16 => BigEndian::write_u16(bytes, value as u16),
            FieldKind::I32 => BigEndian::write_i32(bytes, value as i32),
            FieldKind::U32 => BigEndian::write_u32(bytes, value as u32),
            FieldKind::U64 => BigEndian::write_u64(bytes, value as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_size_matches_layout() {
        assert_eq!(trace_size_for(0), 240);
        assert_eq!(trace_size_for(500), 2240);
        assert_eq!(trace_size_for(u16::MAX), 240 + 65535 * 4);
    }

    #[test]
    fn field_write_touches_only_its_bytes() {
        let mut buf = [0xAAu8; 16];
        Field::new("probe", 4, FieldKind::I32).write(&mut buf, -2);
        assert_eq!(&buf[..4], &[0xAA; 4]);
        assert_eq!(&buf[4..8], &[0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(&buf[8..], &[0xAA; 8]);
    }

    #[test]
    fn signed_and_unsigned_views_differ() {
        let buf = [0xFF, 0xFF];
        assert_eq!(Field::new("s", 0, FieldKind::I16).read(&buf), -1);
        assert_eq!(Field::new("u", 0, FieldKind::U16).read(&buf), 65535);
    }
}
