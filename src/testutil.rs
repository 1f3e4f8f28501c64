//! Synthetic SEG-Y images for unit tests.

use crate::header::{BinaryHeader, TraceHeader, TEXTUAL_HEADER_SIZE};

pub(crate) struct SegyBuilder {
    binary: BinaryHeader,
    traces: Vec<u8>,
    count:  u32,
}

impl SegyBuilder {
    pub fn new(num_samples: u16, format_code: u16) -> Self {
        let mut binary = BinaryHeader::default();
        binary.set_sample_interval(2000);
        binary.set_num_samples(num_samples);
        binary.set_format_code(format_code);
        binary.set_revision_code(1);
        Self { binary, traces: Vec::new(), count: 0 }
    }

    pub fn binary_mut(&mut self) -> &mut BinaryHeader {
        &mut self.binary
    }

    /// Trace whose header declares `declared` samples, followed by `actual`
    /// float32 samples valued `trace_index * 1000 + j`.
    pub fn trace_declaring(self, declared: u16, actual: u16) -> Self {
        let mut header = TraceHeader::default();
        header.set_num_samples(declared);
        header.set_inline(100 + self.count as u16);
        header.set_crossline(200);
        let payload: Vec<u8> = (0..actual)
            .flat_map(|j| ((self.count * 1000 + j as u32) as f32).to_be_bytes())
            .collect();
        self.raw_trace(&header, &payload)
    }

    pub fn trace(self, num_samples: u16) -> Self {
        self.trace_declaring(num_samples, num_samples)
    }

    pub fn uniform_traces(mut self, count: usize) -> Self {
        let n = self.binary.num_samples();
        for _ in 0..count {
            self = self.trace(n);
        }
        self
    }

    pub fn raw_trace(mut self, header: &TraceHeader, payload: &[u8]) -> Self {
        self.traces.extend_from_slice(&header.bytes);
        self.traces.extend_from_slice(payload);
        self.count += 1;
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.build_with_tail(&[])
    }

    pub fn build_with_tail(self, tail: &[u8]) -> Vec<u8> {
        // EBCDIC blanks
        let mut out = vec![0x40u8; TEXTUAL_HEADER_SIZE];
        out.extend_from_slice(&self.binary.bytes);
        out.extend_from_slice(&self.traces);
        out.extend_from_slice(tail);
        out
    }
}
