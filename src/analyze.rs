//! Read-only diagnostics for a SEG-Y file.
//!
//! [`analyze`] parses both file headers, walks the traces with the tolerant
//! scanner and collects a [`ConversionReport`]: expected vs. actual trace
//! counts, the set of trace sizes, inline/crossline ranges and a list of
//! [`Issue`]s.  Nothing is written, so the same call can be pointed at a
//! conversion's input and its output.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, Seek};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SegyError};
use crate::file::SegyFile;
use crate::header::{BinaryHeaderDetails, SegyRevision, TextEncoding};
use crate::sample::SANCTIONED_FORMAT_CODES;
use crate::validate::validate_structure;

// ── Issues ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Issue {
    NonUniformTraceSizes(Vec<u64>),
    TraceCountMismatch { expected: u64, found: u64 },
    UnusualFormatCode(u16),
    /// The strict validator rejects the file size.
    SizeMismatch { file_size: u64, trace_size: u64 },
    /// Traces whose header declared zero samples.
    ZeroSampleTraces(u64),
    /// Bytes after the last trace the scanner could place.
    TrailingBytes(u64),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::NonUniformTraceSizes(sizes) =>
                write!(f, "Non-uniform trace sizes: {sizes:?}"),
            Issue::TraceCountMismatch { expected, found } =>
                write!(f, "Trace count mismatch (Expected: {expected}, Found: {found})"),
            Issue::UnusualFormatCode(code) =>
                write!(f, "Unusual data format code: {code}"),
            Issue::SizeMismatch { file_size, trace_size } =>
                write!(f, "File size {file_size} is not a whole number of {trace_size}-byte traces"),
            Issue::ZeroSampleTraces(n) =>
                write!(f, "{n} trace(s) declare zero samples"),
            Issue::TrailingBytes(n) =>
                write!(f, "{n} trailing byte(s) after the last complete trace"),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub file_size:           u64,
    pub textual_encoding:    TextEncoding,
    pub textual_header:      String,
    pub revision:            SegyRevision,
    pub header:              BinaryHeaderDetails,
    pub expected_trace_size: u64,
    pub expected_traces:     u64,
    pub actual_traces:       u64,
    pub trace_sizes:         BTreeSet<u64>,
    pub inline_range:        Option<(u16, u16)>,
    pub crossline_range:     Option<(u16, u16)>,
    /// Distinct inline ids × distinct crossline ids.
    pub grid_dimensions:     (usize, usize),
    pub zero_sample_traces:  u64,
    pub trailing_bytes:      u64,
    pub issues:              Vec<Issue>,
}

impl ConversionReport {
    pub fn is_uniform(&self) -> bool {
        self.trace_sizes.len() <= 1
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Multi-line human-readable report.
    pub fn render(&self) -> String {
        let h = &self.header;
        let mut s = String::new();
        let mut line = |l: String| {
            s.push_str(&l);
            s.push('\n');
        };

        line("SEG-Y File Analysis Report".into());
        line("=".repeat(50));
        line(format!("File size: {} bytes", self.file_size));
        line(format!("Textual header encoding: {}", self.textual_encoding.name()));
        let first_card: String = self.textual_header.chars().take(80).collect();
        line(format!("Textual header: {}", first_card.trim_end()));
        line(format!("SEG-Y Format: {}", self.revision));
        line(String::new());
        line("Binary Header Information:".into());
        line("-".repeat(30));
        line(format!("job_id: {}", h.job_id));
        line(format!("line_num: {}", h.line_num));
        line(format!("reel_num: {}", h.reel_num));
        line(format!("traces_per_ensemble: {}", h.traces_per_ensemble));
        line(format!("aux_traces_per_ensemble: {}", h.aux_traces_per_ensemble));
        line(format!("sample_interval: {}", h.sample_interval));
        line(format!("original_sample_interval: {}", h.original_sample_interval));
        line(format!("num_samples: {}", h.num_samples));
        line(format!("original_num_samples: {}", h.original_num_samples));
        line(format!("format_code: {}", h.format_code));
        line(String::new());
        line("Trace Structure Analysis:".into());
        line("-".repeat(30));
        line(format!("Expected trace size: {} bytes", self.expected_trace_size));
        line(format!("Expected number of traces: {}", self.expected_traces));
        line(format!("Actual traces found: {}", self.actual_traces));
        line(format!("Unique trace sizes: {}", self.trace_sizes.len()));
        if !self.is_uniform() {
            line("WARNING: Non-uniform trace sizes detected!".into());
            line(format!("Size variations: {:?}", self.trace_sizes));
        }
        line(String::new());
        line("Inline/Crossline Analysis:".into());
        line("-".repeat(30));
        match (self.inline_range, self.crossline_range) {
            (Some((il0, il1)), Some((xl0, xl1))) => {
                line(format!("Inline range: {il0} to {il1}"));
                line(format!("Crossline range: {xl0} to {xl1}"));
            }
            _ => line("No traces to analyze".into()),
        }
        line(format!("Grid dimensions: {}x{}", self.grid_dimensions.0, self.grid_dimensions.1));
        line(String::new());
        line("Validation Summary:".into());
        line("-".repeat(30));
        if self.issues.is_empty() {
            line("No major issues detected".into());
        } else {
            line("Issues found:".into());
            for issue in &self.issues {
                line(format!("- {issue}"));
            }
        }
        s
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

fn range_of(ids: &BTreeSet<u16>) -> Option<(u16, u16)> {
    Some((*ids.first()?, *ids.last()?))
}

pub fn analyze_file<R: Read + Seek>(file: &mut SegyFile<R>) -> Result<ConversionReport> {
    let (textual_header, textual_encoding) = file.textual.decode()?;
    let geometry  = file.geometry();
    let file_size = file.file_size;
    let expected_traces = geometry.traces_in(file_size);

    let mut actual_traces      = 0u64;
    let mut zero_sample_traces = 0u64;
    let mut end_of_traces      = crate::header::FILE_HEADER_SIZE as u64;
    let mut trace_sizes        = BTreeSet::new();
    let mut inlines            = BTreeSet::new();
    let mut crosslines         = BTreeSet::new();

    for trace in file.scanner() {
        let trace = trace?;
        actual_traces += 1;
        if trace.substituted {
            zero_sample_traces += 1;
        }
        end_of_traces = trace.record.end();
        trace_sizes.insert(trace.record.size);
        inlines.insert(trace.header.inline());
        crosslines.insert(trace.header.crossline());
    }
    let trailing_bytes = file_size - end_of_traces;

    let mut issues = Vec::new();
    if trace_sizes.len() > 1 {
        issues.push(Issue::NonUniformTraceSizes(trace_sizes.iter().copied().collect()));
    }
    if actual_traces != expected_traces {
        issues.push(Issue::TraceCountMismatch { expected: expected_traces, found: actual_traces });
    }
    if !SANCTIONED_FORMAT_CODES.contains(&geometry.format_code) {
        issues.push(Issue::UnusualFormatCode(geometry.format_code));
    }
    match validate_structure(&file.binary, file_size) {
        Ok(_) => {}
        Err(SegyError::Structural { file_size, trace_size }) =>
            issues.push(Issue::SizeMismatch { file_size, trace_size }),
        Err(e) => return Err(e),
    }
    if zero_sample_traces > 0 {
        issues.push(Issue::ZeroSampleTraces(zero_sample_traces));
    }
    if trailing_bytes > 0 {
        issues.push(Issue::TrailingBytes(trailing_bytes));
    }

    Ok(ConversionReport {
        file_size,
        textual_encoding,
        textual_header,
        revision: file.binary.revision(),
        header: file.binary.details(),
        expected_trace_size: geometry.trace_size,
        expected_traces,
        actual_traces,
        trace_sizes,
        inline_range: range_of(&inlines),
        crossline_range: range_of(&crosslines),
        grid_dimensions: (inlines.len(), crosslines.len()),
        zero_sample_traces,
        trailing_bytes,
        issues,
    })
}

pub fn analyze<R: Read + Seek>(reader: R) -> Result<ConversionReport> {
    analyze_file(&mut SegyFile::from_reader(reader)?)
}

pub fn analyze_path<P: AsRef<Path>>(path: P) -> Result<ConversionReport> {
    analyze_file(&mut SegyFile::open(path)?)
}
