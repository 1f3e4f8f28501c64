//! Tolerant trace scanner: discover trace boundaries from trace headers.
//!
//! # How it works
//!
//! The scanner starts at `FILE_HEADER_SIZE` (offset 3600) and reads one
//! 240-byte trace header at a time.  The header's sample count (bytes
//! 115-116) gives the trace size `240 + n * 4`; a count of zero is replaced by
//! the binary header's global sample count.  The scanner then jumps to the
//! next trace without reading the payload.
//!
//! ## Stop conditions
//!
//! The walk ends, without error, as soon as either holds:
//! - fewer than 240 bytes remain for the next trace header ([`header_fits`]);
//! - the declared trace would run past end of file ([`trace_fits`]).
//!
//! A truncated or corrupt file therefore yields a shorter list, never a
//! fault.  Only genuine I/O errors propagate.
//!
//! The scanner is restartable: [`TraceScanner::rewind`] (or a fresh scanner)
//! over an unmodified file reproduces the same sequence.

use std::io::{self, Read, Seek, SeekFrom};

use serde::Serialize;

use crate::header::{trace_size_for, TraceHeader, FILE_HEADER_SIZE, TRACE_HEADER_SIZE};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Index entry for one discovered trace.  Does not hold sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Absolute offset of the trace header.
    pub position:              u64,
    /// Header plus payload, in bytes.
    pub size:                  u64,
    /// Sample count after zero-substitution.
    pub declared_sample_count: u16,
}

impl TraceRecord {
    /// Absolute offset of the first sample.
    #[inline]
    pub fn data_position(&self) -> u64 {
        self.position + TRACE_HEADER_SIZE as u64
    }

    /// Absolute offset just past this trace.
    #[inline]
    pub fn end(&self) -> u64 {
        self.position + self.size
    }
}

/// A record plus the header it was derived from.
#[derive(Debug, Clone)]
pub struct ScannedTrace {
    pub record: TraceRecord,
    pub header: TraceHeader,
    /// The header declared zero samples and the global count was used.
    pub substituted: bool,
}

// ── Stop predicates ───────────────────────────────────────────────────────────

/// Room for a full trace header at `pos`.
#[inline]
pub fn header_fits(pos: u64, file_size: u64) -> bool {
    pos + TRACE_HEADER_SIZE as u64 <= file_size
}

/// Room for a whole trace of `size` bytes at `pos`.
#[inline]
pub fn trace_fits(pos: u64, size: u64, file_size: u64) -> bool {
    pos + size <= file_size
}

// ── Scanner ───────────────────────────────────────────────────────────────────

pub struct TraceScanner<R> {
    reader:           R,
    file_size:        u64,
    fallback_samples: u16,
    next_pos:         u64,
    finished:         bool,
}

impl<R: Read + Seek> TraceScanner<R> {
    /// # Arguments
    /// * `reader`           seekable stream; its position is ignored.
    /// * `file_size`        total stream length in bytes.
    /// * `fallback_samples` sample count used when a trace header says 0.
    pub fn new(reader: R, file_size: u64, fallback_samples: u16) -> Self {
        Self {
            reader,
            file_size,
            fallback_samples,
            next_pos: FILE_HEADER_SIZE as u64,
            finished: false,
        }
    }

    /// Restart from the first trace.
    pub fn rewind(&mut self) {
        self.next_pos = FILE_HEADER_SIZE as u64;
        self.finished = false;
    }

    /// Offset the next trace header is expected at.
    pub fn position(&self) -> u64 {
        self.next_pos
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Advance to the next trace, or `Ok(None)` once a stop condition holds.
    pub fn next_trace(&mut self) -> io::Result<Option<ScannedTrace>> {
        if self.finished || !header_fits(self.next_pos, self.file_size) {
            self.finished = true;
            return Ok(None);
        }

        let pos = self.next_pos;
        self.reader.seek(SeekFrom::Start(pos))?;
        let header = match TraceHeader::read(&mut self.reader) {
            Ok(h) => h,
            // The stream was shorter than `file_size` claimed.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.finished = true;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let declared    = header.num_samples();
        let substituted = declared == 0;
        let samples     = if substituted { self.fallback_samples } else { declared };
        let size        = trace_size_for(samples);

        if !trace_fits(pos, size, self.file_size) {
            self.finished = true;
            return Ok(None);
        }

        self.next_pos = pos + size;
        Ok(Some(ScannedTrace {
            record: TraceRecord { position: pos, size, declared_sample_count: samples },
            header,
            substituted,
        }))
    }
}

impl<R: Read + Seek> Iterator for TraceScanner<R> {
    type Item = io::Result<ScannedTrace>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_trace() {
            Ok(Some(t)) => Some(Ok(t)),
            Ok(None)    => None,
            Err(e)      => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Scan every trace from offset 3600 and collect the records.
pub fn scan_traces<R: Read + Seek>(
    reader:           &mut R,
    file_size:        u64,
    fallback_samples: u16,
) -> io::Result<Vec<TraceRecord>> {
    TraceScanner::new(reader, file_size, fallback_samples)
        .map(|t| t.map(|t| t.record))
        .collect()
}
