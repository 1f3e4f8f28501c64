//! Sample codec: decode one four-byte sample slot, re-encode as IEEE float32.
//!
//! # Decoding rules
//! | Code | Interpretation of the 4-byte slot |
//! |------|-----------------------------------|
//! | 1 | first two bytes as big-endian `i16` |
//! | 2 | big-endian `i32` |
//! | 3, 5 | big-endian IEEE-754 `f32` |
//! | other | `0.0` |
//!
//! Code 1 is IBM float in the SEG-Y standard.  It is read as a 16-bit integer
//! here because existing outputs of this tool were produced that way.
//!
//! A slot shorter than four bytes is zero-padded on the right before
//! decoding.  Decoding never fails.
//!
//! # Encoding
//! Always big-endian IEEE-754 `f32` (format code 5), whatever the source.

use byteorder::{BigEndian, ByteOrder};

use crate::header::SAMPLE_SIZE;

/// Format code written into every standardized header.
pub const IEEE_FLOAT32: u16 = 5;

/// Format codes the analyzer accepts without raising an issue.
pub const SANCTIONED_FORMAT_CODES: [u16; 6] = [1, 2, 3, 4, 5, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Code 1: leading two bytes as `i16`.
    Int16Slot,
    /// Code 2: `i32`.
    Int32,
    /// Codes 3 and 5: IEEE `f32`.
    Float32,
    /// Anything else decodes to zero.
    Unsupported(u16),
}

impl SampleFormat {
    pub fn from_code(code: u16) -> Self {
        match code {
            1     => SampleFormat::Int16Slot,
            2     => SampleFormat::Int32,
            3 | 5 => SampleFormat::Float32,
            c     => SampleFormat::Unsupported(c),
        }
    }

    /// Human-readable name (diagnostics only).
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::Int16Slot      => "int16 (leading half of slot)",
            SampleFormat::Int32          => "int32",
            SampleFormat::Float32        => "ieee float32",
            SampleFormat::Unsupported(_) => "unsupported",
        }
    }

    /// Decode one slot.  Short slots are zero-padded.
    pub fn decode(self, chunk: &[u8]) -> f64 {
        let mut slot = [0u8; SAMPLE_SIZE];
        let n = chunk.len().min(SAMPLE_SIZE);
        slot[..n].copy_from_slice(&chunk[..n]);
        match self {
            SampleFormat::Int16Slot      => BigEndian::read_i16(&slot[..2]) as f64,
            SampleFormat::Int32          => BigEndian::read_i32(&slot) as f64,
            SampleFormat::Float32        => BigEndian::read_f32(&slot) as f64,
            SampleFormat::Unsupported(_) => 0.0,
        }
    }
}

/// Decode one slot according to a binary-header format code.
#[inline]
pub fn decode_sample(chunk: &[u8], format_code: u16) -> f64 {
    SampleFormat::from_code(format_code).decode(chunk)
}

/// Encode a value as big-endian IEEE `f32`.
#[inline]
pub fn encode_sample(value: f64) -> [u8; SAMPLE_SIZE] {
    let mut out = [0u8; SAMPLE_SIZE];
    BigEndian::write_f32(&mut out, value as f32);
    out
}

/// Re-encode every slot of `src` as float32, appending to `out`.
///
/// A trailing partial slot still produces one full output sample.
pub fn convert_samples(src: &[u8], format: SampleFormat, out: &mut Vec<u8>) {
    out.reserve(src.len().div_ceil(SAMPLE_SIZE) * SAMPLE_SIZE);
    for chunk in src.chunks(SAMPLE_SIZE) {
        out.extend_from_slice(&encode_sample(format.decode(chunk)));
    }
}
