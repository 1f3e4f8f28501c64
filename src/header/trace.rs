//! 240-byte trace header preceding every trace's sample payload.
//!
//! Only the fields the rewriters touch are named; the remaining bytes are
//! copied through verbatim.

use std::io::{self, Read, Write};

use super::{Field, FieldKind, TRACE_HEADER_SIZE};

pub const NUM_SAMPLES:     Field = Field::new("num_samples",     114, FieldKind::U16);
pub const SAMPLE_INTERVAL: Field = Field::new("sample_interval", 116, FieldKind::U16);
pub const CDP_X:           Field = Field::new("cdp_x",           180, FieldKind::I32);
pub const CDP_Y:           Field = Field::new("cdp_y",           184, FieldKind::I32);
pub const INLINE:          Field = Field::new("inline",          188, FieldKind::U16);
pub const CROSSLINE:       Field = Field::new("crossline",       192, FieldKind::U16);

pub const FIELDS: [Field; 6] = [NUM_SAMPLES, SAMPLE_INTERVAL, CDP_X, CDP_Y, INLINE, CROSSLINE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceHeader {
    pub bytes: [u8; TRACE_HEADER_SIZE],
}

impl Default for TraceHeader {
    fn default() -> Self {
        Self { bytes: [0u8; TRACE_HEADER_SIZE] }
    }
}

impl TraceHeader {
    pub fn from_bytes(bytes: [u8; TRACE_HEADER_SIZE]) -> Self {
        Self { bytes }
    }

    /// Read a header from the current stream position.
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut bytes = [0u8; TRACE_HEADER_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.bytes)
    }

    #[inline]
    pub fn get(&self, field: Field) -> i64 {
        field.read(&self.bytes)
    }

    #[inline]
    pub fn set(&mut self, field: Field, value: i64) {
        field.write(&mut self.bytes, value)
    }

    pub fn num_samples(&self)     -> u16 { self.get(NUM_SAMPLES) as u16 }
    pub fn sample_interval(&self) -> u16 { self.get(SAMPLE_INTERVAL) as u16 }
    pub fn cdp_x(&self)           -> i32 { self.get(CDP_X) as i32 }
    pub fn cdp_y(&self)           -> i32 { self.get(CDP_Y) as i32 }
    pub fn inline(&self)          -> u16 { self.get(INLINE) as u16 }
    pub fn crossline(&self)       -> u16 { self.get(CROSSLINE) as u16 }

    pub fn set_num_samples(&mut self, v: u16)     { self.set(NUM_SAMPLES, v as i64) }
    pub fn set_sample_interval(&mut self, v: u16) { self.set(SAMPLE_INTERVAL, v as i64) }
    pub fn set_cdp_x(&mut self, v: i32)           { self.set(CDP_X, v as i64) }
    pub fn set_cdp_y(&mut self, v: i32)           { self.set(CDP_Y, v as i64) }
    pub fn set_inline(&mut self, v: u16)          { self.set(INLINE, v as i64) }
    pub fn set_crossline(&mut self, v: u16)       { self.set(CROSSLINE, v as i64) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_table() {
        let expected = [
            ("num_samples",     114, 2),
            ("sample_interval", 116, 2),
            ("cdp_x",           180, 4),
            ("cdp_y",           184, 4),
            ("inline",          188, 2),
            ("crossline",       192, 2),
        ];
        for (field, (name, offset, width)) in FIELDS.iter().zip(expected) {
            assert_eq!(field.name, name);
            assert_eq!(field.offset, offset, "{name}");
            assert_eq!(field.kind.width(), width, "{name}");
        }
    }

    #[test]
    fn setters_roundtrip_and_preserve_other_bytes() {
        let mut h = TraceHeader::from_bytes([0x11u8; TRACE_HEADER_SIZE]);
        h.set_num_samples(1500);
        h.set_sample_interval(4003);
        h.set_cdp_x(-200);
        h.set_cdp_y(700);
        h.set_inline(12);
        h.set_crossline(34);

        assert_eq!(h.num_samples(), 1500);
        assert_eq!(h.sample_interval(), 4003);
        assert_eq!(h.cdp_x(), -200);
        assert_eq!(h.cdp_y(), 700);
        assert_eq!(h.inline(), 12);
        assert_eq!(h.crossline(), 34);

        // 1-based SEG-Y bytes 115-116 hold the sample count.
        assert_eq!(&h.bytes[114..116], &1500u16.to_be_bytes());
        assert_eq!(h.bytes[113], 0x11);
        assert_eq!(&h.bytes[190..192], &[0x11, 0x11]);
        assert_eq!(h.bytes[194], 0x11);
    }
}
