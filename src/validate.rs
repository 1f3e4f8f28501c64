//! Strict structural pre-flight check.
//!
//! Assumes every trace is `240 + num_samples * 4` bytes, with `num_samples`
//! taken from the binary header, and fails when the trace region is not a
//! whole multiple of that size.  This is independent of the tolerant
//! [`scanner`](crate::scanner); on irregular files the two may disagree, and
//! the analyzer reports the disagreement instead of failing.

use std::io::{Read, Seek};

use serde::Serialize;

use crate::error::{Result, SegyError};
use crate::file::SegyFile;
use crate::header::{BinaryHeader, FILE_HEADER_SIZE};

/// What the binary header says the file should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructureInfo {
    pub num_samples:     u16,
    pub format_code:     u16,
    pub expected_traces: u64,
    pub trace_size:      u64,
}

/// Check `file_size` against the layout declared by `binary`.
pub fn validate_structure(binary: &BinaryHeader, file_size: u64) -> Result<StructureInfo> {
    if file_size < FILE_HEADER_SIZE as u64 {
        return Err(SegyError::TooSmall { size: file_size });
    }
    let geometry  = binary.geometry();
    let remaining = file_size - FILE_HEADER_SIZE as u64;
    if remaining % geometry.trace_size != 0 {
        return Err(SegyError::Structural { file_size, trace_size: geometry.trace_size });
    }
    Ok(StructureInfo {
        num_samples:     geometry.num_samples,
        format_code:     geometry.format_code,
        expected_traces: remaining / geometry.trace_size,
        trace_size:      geometry.trace_size,
    })
}

pub fn validate_file<R: Read + Seek>(file: &SegyFile<R>) -> Result<StructureInfo> {
    validate_structure(&file.binary, file.file_size)
}

/// Open `path` and validate it.
pub fn validate_path<P: AsRef<std::path::Path>>(path: P) -> Result<StructureInfo> {
    validate_file(&SegyFile::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::SegyBuilder;
    use std::io::Cursor;

    #[test]
    fn ten_trace_file_passes() {
        let bytes = SegyBuilder::new(500, 5).uniform_traces(10).build();
        let f = SegyFile::from_reader(Cursor::new(bytes)).unwrap();
        let info = validate_file(&f).unwrap();
        assert_eq!(info.expected_traces, 10);
        assert_eq!(info.trace_size, 2240);
        assert_eq!(info.num_samples, 500);
        assert_eq!(info.format_code, 5);
    }

    #[test]
    fn remainder_is_structural_error() {
        let bytes = SegyBuilder::new(10, 5).uniform_traces(3).build_with_tail(&[0u8; 7]);
        let f = SegyFile::from_reader(Cursor::new(bytes)).unwrap();
        match validate_file(&f) {
            Err(SegyError::Structural { file_size, trace_size }) => {
                assert_eq!(trace_size, 280);
                assert_eq!(file_size, 3600 + 3 * 280 + 7);
            }
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn irregular_but_divisible_file_passes() {
        // 248 + 264 bytes happens to equal two 256-byte traces.
        let bytes = SegyBuilder::new(4, 5).trace(2).trace(6).build();
        let f = SegyFile::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(validate_file(&f).unwrap().expected_traces, 2);
    }

    #[test]
    fn header_only_file_has_zero_expected_traces() {
        let h = BinaryHeader::default();
        assert_eq!(validate_structure(&h, 3600).unwrap().expected_traces, 0);
    }

    #[test]
    fn too_small() {
        let h = BinaryHeader::default();
        assert!(matches!(validate_structure(&h, 12), Err(SegyError::TooSmall { size: 12 })));
    }
}
