use std::io;
use thiserror::Error;

use crate::header::FILE_HEADER_SIZE;

/// Every fatal condition the engine can surface to a caller.
///
/// Per-sample decode anomalies are deliberately absent: they degrade to a
/// zero sample and never abort a rewrite.
#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Unknown encoding of textual header")]
    Encoding,
    #[error("Invalid number of samples: {0}")]
    InvalidSampleCount(u16),
    #[error("File size {file_size} is not consistent with trace size {trace_size}")]
    Structural { file_size: u64, trace_size: u64 },
    #[error("Invalid SEG-Y file: too small ({size} bytes, need at least {FILE_HEADER_SIZE})")]
    TooSmall { size: u64 },
}

pub type Result<T> = std::result::Result<T, SegyError>;
