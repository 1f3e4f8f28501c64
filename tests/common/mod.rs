//! On-disk SEG-Y fixtures shared by the integration tests.

use std::path::{Path, PathBuf};

use segyfix::header::{BinaryHeader, TraceHeader, TEXTUAL_HEADER_SIZE};

/// Header-consistent file with `traces` float32 traces of `num_samples`
/// samples, sample `j` of trace `i` holding `i * 1000 + j`.
pub fn uniform_segy(num_samples: u16, traces: u32) -> Vec<u8> {
    let sizes: Vec<u16> = (0..traces).map(|_| num_samples).collect();
    segy_with_traces(num_samples, 5, &sizes)
}

/// File whose binary header declares `num_samples` / `format_code` and whose
/// traces declare and carry `sizes[i]` samples each.
pub fn segy_with_traces(num_samples: u16, format_code: u16, sizes: &[u16]) -> Vec<u8> {
    let mut binary = BinaryHeader::default();
    binary.set_sample_interval(1000);
    binary.set_num_samples(num_samples);
    binary.set_format_code(format_code);
    binary.set_revision_code(1);

    let mut out = vec![0x40u8; TEXTUAL_HEADER_SIZE];
    out.extend_from_slice(&binary.bytes);
    for (i, &n) in sizes.iter().enumerate() {
        let mut header = TraceHeader::default();
        header.set_num_samples(n);
        header.set_inline(10 + i as u16);
        header.set_crossline(20);
        out.extend_from_slice(&header.bytes);
        for j in 0..n as u32 {
            out.extend_from_slice(&((i as u32 * 1000 + j) as f32).to_be_bytes());
        }
    }
    out
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
