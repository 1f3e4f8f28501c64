//! Grid-Standardize rewrite: place traces on a synthetic square grid.
//!
//! The input's own geometry is ignored.  With `total = (size - 3600) /
//! trace_size` and `grid = floor(sqrt(total))`, trace `k` in file order
//! becomes cell `(k / grid, k % grid)` and receives:
//!
//! | Trace header field | Value |
//! |--------------------|-------|
//! | inline | `row + 1` |
//! | crossline | `col + 1` |
//! | CDP X | `row * 100` |
//! | CDP Y | `col * 100` |
//! | sample count | binary header sample count |
//! | sample interval | 4003 |
//!
//! At most `grid²` traces are written; surplus traces are dropped and a
//! short input simply stops early.
//!
//! # Precondition
//! Samples are copied verbatim, cut or zero-padded to `n * 4` bytes, and
//! the header is relabelled as format 5.  The input must therefore already
//! hold float32 samples in uniform traces; run [`fixup`](super::fixup)
//! first otherwise.

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use super::{require_samples, Progress, ProgressFn};
use crate::error::Result;
use crate::file::SegyFile;
use crate::header::binary::REVISION_2;
use crate::header::{BinaryHeader, TextualHeader, TraceGeometry, TraceHeader,
                    FILE_HEADER_SIZE, TEXTUAL_HEADER_SIZE, TRACE_HEADER_SIZE};
use crate::sample::IEEE_FLOAT32;

/// Sample interval stamped into every header by this rewrite.
pub const GRID_SAMPLE_INTERVAL: u16 = 4003;
/// Coordinate spacing between neighbouring grid cells.
pub const GRID_SPACING: i32 = 100;

/// `floor(sqrt(n))`.
pub fn grid_size_for(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while r > 0 && r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Inline and crossline ids for a 0-based grid cell, or `None` once either
/// no longer fits the 16-bit header field.
pub fn cell_ids(row: u64, col: u64) -> Option<(u16, u16)> {
    Some((u16::try_from(row + 1).ok()?, u16::try_from(col + 1).ok()?))
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GridPlan {
    pub textual:      TextualHeader,
    /// Binary header as it will be written; the trace count is patched in
    /// after the traces.
    pub binary:       BinaryHeader,
    pub geometry:     TraceGeometry,
    pub file_size:    u64,
    pub total_traces: u64,
    pub grid_size:    u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSummary {
    pub traces_written: u64,
    pub total_traces:   u64,
    pub grid_size:      u64,
    pub num_samples:    u16,
    /// Traces whose payload ran out before `num_samples * 4` bytes.
    pub short_traces:   u64,
}

impl GridPlan {
    pub fn prepare<R: Read + Seek>(file: &SegyFile<R>) -> Result<Self> {
        require_samples(&file.binary)?;
        let geometry     = file.geometry();
        let total_traces = geometry.traces_in(file.file_size);
        let grid_size    = grid_size_for(total_traces);

        info!("Samples per trace: {}", geometry.num_samples);
        info!("Trace size: {} bytes", geometry.trace_size);
        info!("Sample interval: {} μs", geometry.sample_interval);

        let mut binary = file.binary.clone();
        binary.set_num_samples(geometry.num_samples);
        binary.set_format_code(IEEE_FLOAT32);
        binary.set_sample_interval(GRID_SAMPLE_INTERVAL);
        binary.set_revision_code(REVISION_2);

        Ok(Self {
            textual: file.textual.clone(),
            binary,
            geometry,
            file_size: file.file_size,
            total_traces,
            grid_size,
        })
    }

    /// Most traces the grid can hold.
    pub fn capacity(&self) -> u64 {
        self.grid_size * self.grid_size
    }

    pub fn write<R, W>(
        &self,
        file:     &mut SegyFile<R>,
        writer:   W,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<GridSummary>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        let mut out      = BufWriter::new(writer);
        let mut progress = Progress::new(progress, self.total_traces);

        self.textual.write(&mut out)?;
        self.binary.write(&mut out)?;

        let data_size   = self.geometry.data_size();
        let mut payload = Vec::with_capacity(data_size as usize);
        let mut pos     = FILE_HEADER_SIZE as u64;
        let mut short   = 0u64;

        'grid: for row in 0..self.grid_size {
            for col in 0..self.grid_size {
                if pos >= self.file_size {
                    break 'grid;
                }
                let Some((inline, crossline)) = cell_ids(row, col) else {
                    warn!("Grid cell ({row}, {col}) exceeds the 16-bit inline/crossline range; stopping");
                    break 'grid;
                };
                let reader = file.reader_mut();
                reader.seek(SeekFrom::Start(pos))?;
                let mut header = match TraceHeader::read(&mut *reader) {
                    Ok(h) => h,
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break 'grid,
                    Err(e) => return Err(e.into()),
                };

                header.set_inline(inline);
                header.set_crossline(crossline);
                header.set_cdp_x(row as i32 * GRID_SPACING);
                header.set_cdp_y(col as i32 * GRID_SPACING);
                header.set_num_samples(self.geometry.num_samples);
                header.set_sample_interval(GRID_SAMPLE_INTERVAL);
                header.write(&mut out)?;

                payload.clear();
                let got = (&mut *reader).take(data_size).read_to_end(&mut payload)? as u64;
                if got < data_size {
                    short += 1;
                    payload.resize(data_size as usize, 0);
                }
                out.write_all(&payload)?;

                pos += TRACE_HEADER_SIZE as u64 + got;
                progress.advance();
            }
        }

        let written = progress.done();
        if written < self.capacity() {
            warn!("Input exhausted after {written} of {} grid cells", self.capacity());
        }
        if short > 0 {
            warn!("{short} trace(s) had truncated sample data and were zero-padded");
        }

        // Patch the trace count now that it is known.
        let mut binary = self.binary.clone();
        binary.set_total_trace_count(u32::try_from(written).unwrap_or(u32::MAX));
        out.seek(SeekFrom::Start(TEXTUAL_HEADER_SIZE as u64))?;
        binary.write(&mut out)?;
        out.seek(SeekFrom::End(0))?;
        out.flush()?;

        info!("Standardization completed:");
        info!("- Total traces: {written}");
        info!("- Grid size: {0}x{0}", self.grid_size);
        info!("- Samples per trace: {}", self.geometry.num_samples);

        Ok(GridSummary {
            traces_written: written,
            total_traces:   self.total_traces,
            grid_size:      self.grid_size,
            num_samples:    self.geometry.num_samples,
            short_traces:   short,
        })
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

pub fn standardize_grid<R, W>(
    reader:   R,
    writer:   W,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<GridSummary>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut file = SegyFile::from_reader(reader)?;
    let plan     = GridPlan::prepare(&file)?;
    plan.write(&mut file, writer, progress)
}

/// Grid-standardize `input` into `output`; `output` is created only after
/// the input passes its pre-flight checks.
pub fn standardize_grid_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input:    P,
    output:   Q,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<GridSummary> {
    let mut file = SegyFile::open(input)?;
    let plan     = GridPlan::prepare(&file)?;
    plan.write(&mut file, File::create(output)?, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegyError;
    use crate::scanner::TraceScanner;
    use crate::testutil::SegyBuilder;
    use std::io::Cursor;

    fn run(bytes: Vec<u8>) -> (Vec<u8>, GridSummary) {
        let mut out = Cursor::new(Vec::new());
        let summary = standardize_grid(Cursor::new(bytes), &mut out, None).unwrap();
        (out.into_inner(), summary)
    }

    fn headers(out: &[u8]) -> Vec<TraceHeader> {
        let len = out.len() as u64;
        TraceScanner::new(Cursor::new(out), len, 0)
            .map(|t| t.unwrap().header)
            .collect()
    }

    #[test]
    fn cell_ids_stop_at_u16_range() {
        assert_eq!(cell_ids(0, 0), Some((1, 1)));
        assert_eq!(cell_ids(65_534, 2), Some((65_535, 3)));
        assert_eq!(cell_ids(65_535, 0), None);
        assert_eq!(cell_ids(0, 65_535), None);
    }

    #[test]
    fn grid_size_is_floor_sqrt() {
        let cases = [(0, 0), (1, 1), (3, 1), (4, 2), (8, 2), (9, 3), (10, 3), (99, 9), (100, 10)];
        for (n, g) in cases {
            assert_eq!(grid_size_for(n), g, "n={n}");
        }
        assert_eq!(grid_size_for(u32::MAX as u64), 65_535);
    }

    #[test]
    fn nine_traces_fill_three_by_three() {
        let bytes = SegyBuilder::new(4, 5).uniform_traces(9).build();
        let (out, summary) = run(bytes);
        assert_eq!(summary.grid_size, 3);
        assert_eq!(summary.traces_written, 9);
        assert_eq!(out.len(), FILE_HEADER_SIZE + 9 * 256);

        let hs = headers(&out);
        assert_eq!(hs.len(), 9);
        for row in 0..3u16 {
            let xlines: Vec<u16> = hs[row as usize * 3..][..3].iter().map(|h| h.crossline()).collect();
            assert_eq!(xlines, vec![1, 2, 3]);
            for (col, h) in hs[row as usize * 3..][..3].iter().enumerate() {
                assert_eq!(h.inline(), row + 1);
                assert_eq!(h.cdp_x(), row as i32 * 100);
                assert_eq!(h.cdp_y(), col as i32 * 100);
                assert_eq!(h.num_samples(), 4);
                assert_eq!(h.sample_interval(), GRID_SAMPLE_INTERVAL);
            }
        }
    }

    #[test]
    fn binary_header_is_relabelled_and_counted() {
        let bytes = SegyBuilder::new(4, 5).uniform_traces(5).build();
        let (out, summary) = run(bytes);
        let b = BinaryHeader::read(&mut Cursor::new(&out)).unwrap();
        assert_eq!(b.num_samples(), 4);
        assert_eq!(b.format_code(), 5);
        assert_eq!(b.sample_interval(), GRID_SAMPLE_INTERVAL);
        assert_eq!(b.revision_code(), 2);
        assert_eq!(b.total_trace_count(), summary.traces_written);
    }

    #[test]
    fn surplus_traces_are_dropped() {
        let bytes = SegyBuilder::new(4, 5).uniform_traces(10).build();
        let (out, summary) = run(bytes);
        assert_eq!(summary.total_traces, 10);
        assert_eq!(summary.grid_size, 3);
        assert_eq!(summary.traces_written, 9);
        assert!(summary.traces_written <= summary.grid_size * summary.grid_size);
        assert_eq!(out.len(), FILE_HEADER_SIZE + 9 * 256);
    }

    #[test]
    fn samples_copied_verbatim() {
        let bytes = SegyBuilder::new(3, 5).uniform_traces(4).build();
        let (out, _) = run(bytes.clone());
        let src = &bytes[FILE_HEADER_SIZE + 252 + 240..FILE_HEADER_SIZE + 2 * 252];
        let dst = &out[FILE_HEADER_SIZE + 252 + 240..FILE_HEADER_SIZE + 2 * 252];
        assert_eq!(src, dst);
    }

    #[test]
    fn truncated_tail_is_ignored() {
        let mut bytes = SegyBuilder::new(4, 5).uniform_traces(5).build();
        bytes.truncate(bytes.len() - 8);
        let (out, summary) = run(bytes);
        // Four whole traces remain: a 2x2 grid built from complete traces.
        assert_eq!(summary.total_traces, 4);
        assert_eq!(summary.grid_size, 2);
        assert_eq!(summary.traces_written, 4);
        assert_eq!(summary.short_traces, 0);
        assert_eq!(out.len(), FILE_HEADER_SIZE + 4 * 256);
    }

    #[test]
    fn zero_samples_rejected_before_output() {
        let bytes = SegyBuilder::new(0, 5).build_with_tail(&[0u8; 480]);
        let mut out = Cursor::new(Vec::new());
        let err = standardize_grid(Cursor::new(bytes), &mut out, None).unwrap_err();
        assert!(matches!(err, SegyError::InvalidSampleCount(0)));
        assert!(out.get_ref().is_empty());
    }

    #[test]
    fn empty_trace_region() {
        let bytes = SegyBuilder::new(4, 5).build();
        let (out, summary) = run(bytes);
        assert_eq!(summary.grid_size, 0);
        assert_eq!(summary.traces_written, 0);
        assert_eq!(out.len(), FILE_HEADER_SIZE);
    }
}
