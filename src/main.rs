use clap::{Parser, Subcommand};
use segyfix::analyze::{analyze_path, ConversionReport};
use segyfix::convert::{convert, ConvertOptions, RewriteMode};
use segyfix::rewrite::{fix_up_file, standardize_grid_file};
use segyfix::validate::validate_path;
use segyfix::SegyFile;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "segyfix", about = "Inspect, validate and rewrite SEG-Y files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the input, rewrite it and analyze the result
    Convert {
        input:  PathBuf,
        output: PathBuf,
        /// Rewrite mode: grid (default), fixup
        #[arg(short, long, default_value = "grid", value_parser = parse_mode)]
        mode: RewriteMode,
        /// Accepted for compatibility; has no effect on samples
        #[arg(long)]
        normalize: bool,
        /// Accepted for compatibility; has no effect on samples
        #[arg(long)]
        clip: bool,
        /// Print the outcome as JSON instead of text reports
        #[arg(long)]
        json: bool,
    },
    /// Rewrite into uniform float32 traces with consistent counts
    Fix {
        input:  PathBuf,
        output: PathBuf,
    },
    /// Re-label float32 traces onto a synthetic square grid
    Grid {
        input:  PathBuf,
        output: PathBuf,
    },
    /// Print a diagnostic report
    Analyze {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Strict size check against the binary header's trace layout
    Validate {
        input: PathBuf,
    },
    /// List every trace the tolerant scanner finds
    Scan {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    match Cli::parse().command {

        // ── Convert ──────────────────────────────────────────────────────────
        Commands::Convert { input, output, mode, normalize, clip, json } => {
            let opts = ConvertOptions {
                input,
                output,
                mode,
                normalize,
                clip,
            };
            let outcome = convert(&opts, None)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Input Analysis:");
                print_report(&outcome.input_report);
                println!("Output Analysis:");
                print_report(&outcome.output_report);
                println!("Wrote {} traces → {}",
                    outcome.rewrite.traces_written(), opts.output.display());
            }
        }

        // ── Fix ──────────────────────────────────────────────────────────────
        Commands::Fix { input, output } => {
            let s = fix_up_file(&input, &output, None)?;
            println!("Fixed {} traces ({} samples, {} B each, {} padded) → {}",
                s.traces_written, s.num_samples, s.trace_size, s.padded_traces, output.display());
        }

        // ── Grid ─────────────────────────────────────────────────────────────
        Commands::Grid { input, output } => {
            let s = standardize_grid_file(&input, &output, None)?;
            println!("Placed {} of {} traces on a {}x{} grid → {}",
                s.traces_written, s.total_traces, s.grid_size, s.grid_size, output.display());
        }

        // ── Analyze ──────────────────────────────────────────────────────────
        Commands::Analyze { input, json } => {
            let report = analyze_path(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        // ── Validate ─────────────────────────────────────────────────────────
        Commands::Validate { input } => {
            let info = validate_path(&input)?;
            println!("── SEG-Y structure ──────────────────────────────────────");
            println!("  Path            {}", input.display());
            println!("  Samples/trace   {}", info.num_samples);
            println!("  Format code     {}", info.format_code);
            println!("  Trace size      {} B", info.trace_size);
            println!("  Expected traces {}", info.expected_traces);
        }

        // ── Scan ─────────────────────────────────────────────────────────────
        Commands::Scan { input } => {
            let mut file = SegyFile::open(&input)?;
            let traces = file.scan_traces()?;
            println!("Scan found {} trace(s):", traces.len());
            println!("{:>8} {:>12} {:>8} {:>8}", "Index", "Offset", "Size", "Samples");
            for (i, t) in traces.iter().enumerate() {
                println!("{:>8} {:>12} {:>8} {:>8}", i, t.position, t.size, t.declared_sample_count);
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn print_report(report: &ConversionReport) {
    print!("{}", report.render());
    println!();
}

fn parse_mode(s: &str) -> Result<RewriteMode, String> {
    RewriteMode::from_name(s)
        .ok_or_else(|| format!("unknown mode '{}' (expected grid or fixup)", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_mode(args: &[&str]) -> Result<RewriteMode, clap::Error> {
        let argv = ["segyfix", "convert", "in.segy", "out.segy"].iter().chain(args).copied();
        match Cli::try_parse_from(argv)?.command {
            Commands::Convert { mode, .. } => Ok(mode),
            _ => unreachable!(),
        }
    }

    #[test]
    fn mode_defaults_to_grid() {
        assert_eq!(convert_mode(&[]).unwrap(), RewriteMode::Grid);
        assert_eq!(convert_mode(&["--mode", "fixup"]).unwrap(), RewriteMode::FixUp);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(convert_mode(&["--mode", "gird"]).is_err());
        assert!(parse_mode("zstd").is_err());
    }
}
