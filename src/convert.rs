//! File-to-file conversion pipeline: analyze the input, rewrite it, analyze
//! the result.

use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::analyze::{analyze_path, ConversionReport};
use crate::error::Result;
use crate::rewrite::{fix_up_file, standardize_grid_file, FixUpSummary, GridSummary, ProgressFn};

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RewriteMode {
    #[default]
    Grid,
    FixUp,
}

impl RewriteMode {
    pub fn name(self) -> &'static str {
        match self {
            RewriteMode::Grid  => "grid",
            RewriteMode::FixUp => "fixup",
        }
    }

    /// Parse from a CLI string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grid"                     => Some(RewriteMode::Grid),
            "fixup" | "fix-up" | "fix" => Some(RewriteMode::FixUp),
            _                          => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input:     PathBuf,
    pub output:    PathBuf,
    pub mode:      RewriteMode,
    /// Accepted for compatibility; no sample scaling is performed.
    pub normalize: bool,
    /// Accepted for compatibility; no sample clipping is performed.
    pub clip:      bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input:     PathBuf::from("input.segy"),
            output:    PathBuf::from("output.segy"),
            mode:      RewriteMode::default(),
            normalize: false,
            clip:      false,
        }
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewriteSummary {
    FixUp(FixUpSummary),
    Grid(GridSummary),
}

impl RewriteSummary {
    pub fn traces_written(&self) -> u64 {
        match self {
            RewriteSummary::FixUp(s) => s.traces_written,
            RewriteSummary::Grid(s)  => s.traces_written,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome {
    pub input_report:  ConversionReport,
    pub rewrite:       RewriteSummary,
    pub output_report: ConversionReport,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the full pipeline described by `opts`.
///
/// The input report is produced before any output exists, so an input the
/// analyzer cannot open leaves nothing behind.
pub fn convert(opts: &ConvertOptions, progress: Option<&mut ProgressFn<'_>>) -> Result<ConversionOutcome> {
    if opts.normalize {
        warn!("normalize requested; samples are written unscaled");
    }
    if opts.clip {
        warn!("clip requested; samples are written unclipped");
    }

    info!("Analyzing input {}", opts.input.display());
    let input_report = analyze_path(&opts.input)?;
    for issue in &input_report.issues {
        warn!("input: {issue}");
    }

    info!("Rewriting ({}) into {}", opts.mode.name(), opts.output.display());
    let rewrite = match opts.mode {
        RewriteMode::FixUp => RewriteSummary::FixUp(fix_up_file(&opts.input, &opts.output, progress)?),
        RewriteMode::Grid  => RewriteSummary::Grid(standardize_grid_file(&opts.input, &opts.output, progress)?),
    };

    info!("Analyzing output {}", opts.output.display());
    let output_report = analyze_path(&opts.output)?;
    for issue in &output_report.issues {
        warn!("output: {issue}");
    }

    Ok(ConversionOutcome { input_report, rewrite, output_report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegyError;
    use crate::testutil::SegyBuilder;
    use tempfile::tempdir;

    #[test]
    fn mode_names() {
        for mode in [RewriteMode::Grid, RewriteMode::FixUp] {
            assert_eq!(RewriteMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(RewriteMode::from_name("Fix-Up"), Some(RewriteMode::FixUp));
        assert_eq!(RewriteMode::from_name("zstd"), None);
        assert_eq!(ConvertOptions::default().mode, RewriteMode::Grid);
    }

    #[test]
    fn grid_pipeline_reports_both_sides() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.segy");
        std::fs::write(&input, SegyBuilder::new(8, 5).uniform_traces(10).build()).unwrap();

        let opts = ConvertOptions {
            input,
            output: dir.path().join("out.segy"),
            ..Default::default()
        };
        let outcome = convert(&opts, None).unwrap();

        assert_eq!(outcome.input_report.actual_traces, 10);
        assert_eq!(outcome.rewrite.traces_written(), 9);
        assert_eq!(outcome.output_report.actual_traces, 9);
        assert_eq!(outcome.output_report.grid_dimensions, (3, 3));
        assert_eq!(outcome.output_report.inline_range, Some((1, 3)));
        assert!(outcome.output_report.is_clean(), "{:?}", outcome.output_report.issues);
    }

    #[test]
    fn fixup_pipeline_cleans_irregular_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.segy");
        let bytes = SegyBuilder::new(4, 2).trace(4).trace(2).trace(6).build();
        std::fs::write(&input, bytes).unwrap();

        let opts = ConvertOptions {
            input,
            output: dir.path().join("out.segy"),
            mode: RewriteMode::FixUp,
            normalize: true,
            clip: true,
        };
        let outcome = convert(&opts, None).unwrap();

        assert!(!outcome.input_report.is_clean());
        assert!(matches!(outcome.rewrite, RewriteSummary::FixUp(s) if s.traces_written == 3));
        assert_eq!(outcome.output_report.actual_traces, 3);
        assert!(outcome.output_report.is_clean(), "{:?}", outcome.output_report.issues);
    }

    #[test]
    fn too_small_input_creates_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.segy");
        std::fs::write(&input, [0u8; 100]).unwrap();
        let output = dir.path().join("out.segy");

        let opts = ConvertOptions { input, output: output.clone(), ..Default::default() };
        assert!(matches!(convert(&opts, None), Err(SegyError::TooSmall { size: 100 })));
        assert!(!output.exists());
    }
}
