pub mod error;
pub mod header;
pub mod sample;
pub mod file;
pub mod scanner;
pub mod validate;
pub mod rewrite;
pub mod analyze;
pub mod convert;

#[cfg(test)]
mod testutil;

pub use error::{Result, SegyError};
pub use header::{BinaryHeader, TextualHeader, TraceHeader, TraceGeometry};
pub use file::SegyFile;
pub use scanner::{scan_traces, TraceRecord, TraceScanner};
pub use validate::{validate_file, validate_path, StructureInfo};
pub use rewrite::{fix_up, fix_up_file, standardize_grid, standardize_grid_file};
pub use analyze::{analyze, analyze_path, ConversionReport, Issue};
pub use convert::{convert, ConvertOptions, RewriteMode};
