//! Binary file header: 400 bytes at offset 3200.
//!
//! Held as a raw byte buffer so unknown and vendor-specific bytes survive a
//! rewrite.  Named fields are the [`Field`] constants below; offsets are
//! relative to the start of the binary header.
//!
//! | Field | Offset | Type |
//! |-------|--------|------|
//! | job id | 0 | i32 |
//! | line number | 4 | i32 |
//! | reel number | 8 | i32 |
//! | traces per ensemble | 12 | i16 |
//! | aux traces per ensemble | 14 | i16 |
//! | sample interval (µs) | 16 | u16 |
//! | original sample interval | 18 | i16 |
//! | samples per trace | 20 | u16 |
//! | original samples per trace | 22 | i16 |
//! | sample format code | 24 | u16 |
//! | revision code | 300 | u16 |
//! | fixed-length trace flag | 302 | u16 |
//! | extended textual header count | 304 | u16 |
//! | total trace count | 312 | u64 |

use std::io::{self, Read, Seek, SeekFrom, Write};

use serde::Serialize;

use super::{trace_size_for, Field, FieldKind, BINARY_HEADER_SIZE, SAMPLE_SIZE,
            TEXTUAL_HEADER_SIZE, TRACE_HEADER_SIZE};

pub const JOB_ID:                  Field = Field::new("job_id",                   0, FieldKind::I32);
pub const LINE_NUM:                Field = Field::new("line_num",                 4, FieldKind::I32);
pub const REEL_NUM:                Field = Field::new("reel_num",                 8, FieldKind::I32);
pub const TRACES_PER_ENSEMBLE:     Field = Field::new("traces_per_ensemble",     12, FieldKind::I16);
pub const AUX_TRACES_PER_ENSEMBLE: Field = Field::new("aux_traces_per_ensemble", 14, FieldKind::I16);
pub const SAMPLE_INTERVAL:         Field = Field::new("sample_interval",         16, FieldKind::U16);
pub const ORIG_SAMPLE_INTERVAL:    Field = Field::new("original_sample_interval",18, FieldKind::I16);
pub const NUM_SAMPLES:             Field = Field::new("num_samples",             20, FieldKind::U16);
pub const ORIG_NUM_SAMPLES:        Field = Field::new("original_num_samples",    22, FieldKind::I16);
pub const FORMAT_CODE:             Field = Field::new("format_code",             24, FieldKind::U16);
pub const REVISION:                Field = Field::new("revision",               300, FieldKind::U16);
pub const FIXED_LENGTH_TRACES:     Field = Field::new("fixed_length_traces",    302, FieldKind::U16);
pub const EXTENDED_HEADER_COUNT:   Field = Field::new("extended_header_count",  304, FieldKind::U16);
/// SEG-Y rev 2 "number of traces in this file".
pub const TOTAL_TRACE_COUNT:       Field = Field::new("total_trace_count",      312, FieldKind::U64);

/// Every named binary header field, in offset order.
pub const FIELDS: [Field; 14] = [
    JOB_ID, LINE_NUM, REEL_NUM, TRACES_PER_ENSEMBLE, AUX_TRACES_PER_ENSEMBLE,
    SAMPLE_INTERVAL, ORIG_SAMPLE_INTERVAL, NUM_SAMPLES, ORIG_NUM_SAMPLES,
    FORMAT_CODE, REVISION, FIXED_LENGTH_TRACES, EXTENDED_HEADER_COUNT,
    TOTAL_TRACE_COUNT,
];

/// Revision code written by both rewriters.
pub const REVISION_2: u16 = 2;

// ── Revision ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegyRevision {
    Rev0,
    Rev1,
    Rev2,
    Unknown(u16),
}

impl SegyRevision {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => SegyRevision::Rev0,
            1 => SegyRevision::Rev1,
            2 => SegyRevision::Rev2,
            c => SegyRevision::Unknown(c),
        }
    }
}

impl std::fmt::Display for SegyRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegyRevision::Rev0       => write!(f, "SEG-Y Rev 0"),
            SegyRevision::Rev1       => write!(f, "SEG-Y Rev 1"),
            SegyRevision::Rev2       => write!(f, "SEG-Y Rev 2"),
            SegyRevision::Unknown(c) => write!(f, "Unknown SEG-Y Revision (code: {c})"),
        }
    }
}

// ── Details ──────────────────────────────────────────────────────────────────

/// Read-only snapshot of the descriptive binary header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryHeaderDetails {
    pub job_id:                   i32,
    pub line_num:                 i32,
    pub reel_num:                 i32,
    pub traces_per_ensemble:      i16,
    pub aux_traces_per_ensemble:  i16,
    pub sample_interval:          u16,
    pub original_sample_interval: i16,
    pub num_samples:              u16,
    pub original_num_samples:     i16,
    pub format_code:              u16,
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Trace layout implied by the binary header alone, assuming every sample
/// occupies a four-byte slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceGeometry {
    pub num_samples:       u16,
    pub sample_interval:   u16,
    pub format_code:       u16,
    pub trace_size:        u64,
    pub trace_header_size: usize,
    pub sample_size:       usize,
}

impl TraceGeometry {
    /// Payload bytes per trace.
    #[inline]
    pub fn data_size(&self) -> u64 {
        self.num_samples as u64 * self.sample_size as u64
    }

    /// Whole traces that fit after the file headers, ignoring any remainder.
    pub fn traces_in(&self, file_size: u64) -> u64 {
        file_size.saturating_sub(super::FILE_HEADER_SIZE as u64) / self.trace_size
    }
}

// ── BinaryHeader ─────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq)]
pub struct BinaryHeader {
    pub bytes: [u8; BINARY_HEADER_SIZE],
}

impl std::fmt::Debug for BinaryHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryHeader")
            .field("num_samples", &self.num_samples())
            .field("format_code", &self.format_code())
            .field("revision",    &self.revision())
            .finish_non_exhaustive()
    }
}

impl Default for BinaryHeader {
    fn default() -> Self {
        Self { bytes: [0u8; BINARY_HEADER_SIZE] }
    }
}

impl BinaryHeader {
    pub fn from_bytes(bytes: [u8; BINARY_HEADER_SIZE]) -> Self {
        Self { bytes }
    }

    /// Seek to offset 3200 and read the 400-byte header.  No range checks.
    pub fn read<R: Read + Seek>(reader: &mut R) -> io::Result<Self> {
        reader.seek(SeekFrom::Start(TEXTUAL_HEADER_SIZE as u64))?;
        let mut bytes = [0u8; BINARY_HEADER_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self { bytes })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.bytes)
    }

    // ── Generic access ───────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, field: Field) -> i64 {
        field.read(&self.bytes)
    }

    #[inline]
    pub fn set(&mut self, field: Field, value: i64) {
        field.write(&mut self.bytes, value)
    }

    // ── Typed accessors ──────────────────────────────────────────────────────

    pub fn sample_interval(&self) -> u16 { self.get(SAMPLE_INTERVAL) as u16 }
    pub fn num_samples(&self)     -> u16 { self.get(NUM_SAMPLES) as u16 }
    pub fn format_code(&self)     -> u16 { self.get(FORMAT_CODE) as u16 }
    pub fn revision_code(&self)   -> u16 { self.get(REVISION) as u16 }
    pub fn total_trace_count(&self) -> u64 { self.get(TOTAL_TRACE_COUNT) as u64 }

    pub fn revision(&self) -> SegyRevision {
        SegyRevision::from_code(self.revision_code())
    }

    pub fn set_sample_interval(&mut self, v: u16)   { self.set(SAMPLE_INTERVAL, v as i64) }
    pub fn set_num_samples(&mut self, v: u16)       { self.set(NUM_SAMPLES, v as i64) }
    pub fn set_format_code(&mut self, v: u16)       { self.set(FORMAT_CODE, v as i64) }
    pub fn set_revision_code(&mut self, v: u16)     { self.set(REVISION, v as i64) }
    pub fn set_total_trace_count(&mut self, v: u32) { self.set(TOTAL_TRACE_COUNT, v as i64) }

    pub fn details(&self) -> BinaryHeaderDetails {
        BinaryHeaderDetails {
            job_id:                   self.get(JOB_ID) as i32,
            line_num:                 self.get(LINE_NUM) as i32,
            reel_num:                 self.get(REEL_NUM) as i32,
            traces_per_ensemble:      self.get(TRACES_PER_ENSEMBLE) as i16,
            aux_traces_per_ensemble:  self.get(AUX_TRACES_PER_ENSEMBLE) as i16,
            sample_interval:          self.sample_interval(),
            original_sample_interval: self.get(ORIG_SAMPLE_INTERVAL) as i16,
            num_samples:              self.num_samples(),
            original_num_samples:     self.get(ORIG_NUM_SAMPLES) as i16,
            format_code:              self.format_code(),
        }
    }

    pub fn geometry(&self) -> TraceGeometry {
        TraceGeometry {
            num_samples:       self.num_samples(),
            sample_interval:   self.sample_interval(),
            format_code:       self.format_code(),
            trace_size:        trace_size_for(self.num_samples()),
            trace_header_size: TRACE_HEADER_SIZE,
            sample_size:       SAMPLE_SIZE,
        }
    }
}
