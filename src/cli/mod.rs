//! Command-line parsing for the Master Sintering Curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::QSpacing;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "msc", version, about = "Master Sintering Curve activation-energy (Q) estimator")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sweep Q over measured data, print the optimum, and optionally plot/export.
    ///
    /// Without `--input`, prompts for the data on stdin.
    Fit(FitArgs),
    /// Generate a synthetic experiment with a known Q and run the same sweep.
    Demo(DemoArgs),
    /// Re-render charts from a previously exported result JSON.
    Plot(PlotArgs),
}

/// Options for fitting measured data.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// CSV file with `time`, `temperature`, `response` columns.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub sweep: SweepArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for the synthetic demo run.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Q used to generate the synthetic response.
    #[arg(long, default_value_t = 250.0)]
    pub q0: f64,

    /// Number of synthetic samples.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub points: usize,

    /// Standard deviation of Gaussian noise added to the response.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub sweep: SweepArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Candidate-Q selection.
///
/// Precedence: `--q` list, then the `--q-min/--q-max` grid, then the default
/// set `{100, 150, ..., 450}`.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    /// Explicit candidate Q values (comma-separated).
    #[arg(long = "q", value_delimiter = ',', value_name = "Q,...", conflicts_with_all = ["q_min", "q_max"])]
    pub q: Vec<f64>,

    /// Lower end of a generated candidate grid.
    #[arg(long, requires = "q_max")]
    pub q_min: Option<f64>,

    /// Upper end of a generated candidate grid.
    #[arg(long, requires = "q_min")]
    pub q_max: Option<f64>,

    /// Number of grid points (with `--q-min/--q-max`).
    #[arg(long, default_value_t = 8)]
    pub q_steps: usize,

    /// Grid spacing (with `--q-min/--q-max`).
    #[arg(long, value_enum, default_value_t = QSpacing::Linear)]
    pub q_spacing: QSpacing,
}

/// Presentation and export options shared by `fit` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,

    /// Write both charts to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export the per-Q sweep table to CSV.
    #[arg(long = "export-sweep", value_name = "CSV")]
    pub export_sweep: Option<PathBuf>,

    /// Export master-curve points at the optimal Q to CSV.
    #[arg(long = "export-curve", value_name = "CSV")]
    pub export_curve: Option<PathBuf>,

    /// Export measurements + full result to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved result.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Result JSON file produced by `msc fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,

    /// Write both charts to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}
