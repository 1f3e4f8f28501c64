//! Fix-Up rewrite: uniform trace size, float32 samples, consistent counts.
//!
//! # Output layout
//! - textual header, byte-for-byte;
//! - binary header with revision 2, the input's sample count, format code 5
//!   and the total-trace-count field set to the number of scanned traces;
//! - one trace per scanned input trace, each exactly `240 + n * 4` bytes,
//!   where `n` is the binary header's sample count.
//!
//! Each trace header keeps its original bytes except the sample count.
//! Samples are decoded with the input's format code and re-encoded as
//! float32.  Traces shorter than `n` are zero-padded; longer ones are cut.
//!
//! # Failure
//! Too-small files, undecodable textual headers and a zero sample count are
//! rejected by [`FixUpPlan::prepare`], before any output exists.  Odd sample
//! values never fail the run.

use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use super::{require_samples, Progress, ProgressFn};
use crate::error::Result;
use crate::file::SegyFile;
use crate::header::{trace_size_for, BinaryHeader, TextualHeader, FILE_HEADER_SIZE, SAMPLE_SIZE};
use crate::header::binary::REVISION_2;
use crate::sample::{convert_samples, SampleFormat, IEEE_FLOAT32};
use crate::scanner::TraceRecord;

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Everything the write phase needs, gathered before the output is opened.
#[derive(Debug, Clone)]
pub struct FixUpPlan {
    pub textual:         TextualHeader,
    /// Binary header as it will be written.
    pub binary:          BinaryHeader,
    pub num_samples:     u16,
    pub source_format:   SampleFormat,
    /// Trace count implied by file size alone.
    pub expected_traces: u64,
    /// Traces found by the tolerant scan, in file order.
    pub traces:          Vec<TraceRecord>,
}

/// Outcome of a Fix-Up write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixUpSummary {
    pub traces_written:  u64,
    pub expected_traces: u64,
    pub num_samples:     u16,
    pub trace_size:      u64,
    /// Traces that carried fewer samples than `num_samples`.
    pub padded_traces:   u64,
    pub bytes_written:   u64,
}

impl FixUpPlan {
    pub fn prepare<R: Read + Seek>(file: &mut SegyFile<R>) -> Result<Self> {
        let num_samples     = require_samples(&file.binary)?;
        let standard_size   = trace_size_for(num_samples);
        let expected_traces = file.geometry().traces_in(file.file_size);
        let traces          = file.scan_traces()?;

        info!("File size: {} bytes", file.file_size);
        info!("Standard trace size: {standard_size} bytes");
        info!("Expected traces: {expected_traces}");
        info!("Actual traces found: {}", traces.len());

        let mut binary = file.binary.clone();
        binary.set_revision_code(REVISION_2);
        binary.set_num_samples(num_samples);
        binary.set_format_code(IEEE_FLOAT32);
        binary.set_total_trace_count(u32::try_from(traces.len()).unwrap_or(u32::MAX));

        Ok(Self {
            textual: file.textual.clone(),
            binary,
            num_samples,
            source_format: SampleFormat::from_code(file.binary.format_code()),
            expected_traces,
            traces,
        })
    }

    pub fn trace_size(&self) -> u64 {
        trace_size_for(self.num_samples)
    }

    /// Exact length of the file [`write`](Self::write) produces.
    pub fn output_size(&self) -> u64 {
        FILE_HEADER_SIZE as u64 + self.traces.len() as u64 * self.trace_size()
    }

    /// Emit the standardized file.  `file` must be the stream the plan was
    /// prepared from.
    pub fn write<R, W>(
        &self,
        file:     &mut SegyFile<R>,
        writer:   W,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<FixUpSummary>
    where
        R: Read + Seek,
        W: Write,
    {
        debug!("Fix-up source format: {}", self.source_format.name());
        let mut out      = BufWriter::new(writer);
        let mut progress = Progress::new(progress, self.traces.len() as u64);

        self.textual.write(&mut out)?;
        self.binary.write(&mut out)?;

        let target_len    = self.num_samples as usize * SAMPLE_SIZE;
        let mut raw       = Vec::with_capacity(target_len);
        let mut converted = Vec::with_capacity(target_len);
        let mut padded    = 0u64;

        for record in &self.traces {
            let mut header = file.read_trace_header(record)?;
            header.set_num_samples(self.num_samples);
            header.write(&mut out)?;

            let present = record.declared_sample_count.min(self.num_samples) as usize;
            raw.resize(present * SAMPLE_SIZE, 0);
            file.reader_mut().read_exact(&mut raw)?;

            converted.clear();
            convert_samples(&raw, self.source_format, &mut converted);
            if converted.len() < target_len {
                padded += 1;
                converted.resize(target_len, 0);
            }
            out.write_all(&converted)?;
            progress.advance();
        }
        out.flush()?;

        let summary = FixUpSummary {
            traces_written:  progress.done(),
            expected_traces: self.expected_traces,
            num_samples:     self.num_samples,
            trace_size:      self.trace_size(),
            padded_traces:   padded,
            bytes_written:   self.output_size(),
        };
        info!("Fix-up wrote {} traces of {} bytes", summary.traces_written, summary.trace_size);
        Ok(summary)
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Fix up `reader` into `writer`.
pub fn fix_up<R, W>(
    reader:   R,
    writer:   W,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<FixUpSummary>
where
    R: Read + Seek,
    W: Write,
{
    let mut file = SegyFile::from_reader(reader)?;
    let plan     = FixUpPlan::prepare(&mut file)?;
    plan.write(&mut file, writer, progress)
}

/// Fix up `input` into `output`.  `output` is only created once the input
/// has passed every pre-flight check.
pub fn fix_up_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input:    P,
    output:   Q,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<FixUpSummary> {
    let mut file = SegyFile::open(input)?;
    let plan     = FixUpPlan::prepare(&mut file)?;
    plan.write(&mut file, File::create(output)?, progress)
}
