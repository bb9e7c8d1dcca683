//! Command-line parsing for the lab curve plotter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! ingest/fit/plot code. Conversion into option structs lives in `app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{BlankRowPolicy, DEFAULT_PANEL_SIZE_IN, Experiment, ShapePolicy, TransformKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lab", version, about = "Plot and fit paired x/y lab measurements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot every x/y column pair of a delimited file as its own panel.
    Plot(PlotArgs),
    /// Overlay all runs of every experiment file in a directory.
    Scan(ScanArgs),
    /// Write a synthetic experiment file.
    Sample(SampleArgs),
}

/// Options for the panel plot.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Delimited file with interleaved x/y columns.
    pub file: PathBuf,

    /// Field separator.
    #[arg(long, default_value_t = ',')]
    pub sep: char,

    /// Figure title.
    #[arg(long, default_value = "Graph")]
    pub title: String,

    /// X-axis label.
    #[arg(long = "x-label", default_value = "x")]
    pub x_label: String,

    /// Y-axis label.
    #[arg(long = "y-label", default_value = "y")]
    pub y_label: String,

    /// Panel edge length in inches.
    #[arg(long = "panel-size", default_value_t = DEFAULT_PANEL_SIZE_IN)]
    pub panel_size: f64,

    /// Do not fit or draw fit curves.
    #[arg(long)]
    pub no_fit: bool,

    /// Polynomial degree (1 = line through the origin).
    #[arg(long, default_value_t = 1)]
    pub degree: usize,

    /// Transform applied to each series before fitting.
    #[arg(long, value_enum, default_value_t = TransformKind::Identity)]
    pub transform: TransformKind,

    /// Plate distance in metres (required by `charge-density`).
    #[arg(long = "plate-distance")]
    pub plate_distance: Option<f64>,

    /// What to do with rows whose cells are all empty.
    #[arg(long = "blank-rows", value_enum, default_value_t = BlankRowPolicy::Keep)]
    pub blank_rows: BlankRowPolicy,

    /// What to do when the data does not split evenly into pairs.
    #[arg(long, value_enum, default_value_t = ShapePolicy::Strict)]
    pub shape: ShapePolicy,

    /// Directory to save the figure into.
    #[arg(long = "save-dir")]
    pub save_dir: Option<PathBuf>,

    /// File name (without extension) for the saved figure.
    #[arg(long = "save-name")]
    pub save_name: Option<String>,

    /// Write fit coefficients and curves to JSON.
    #[arg(long = "export-fits")]
    pub export_fits: Option<PathBuf>,

    /// Do not open the interactive viewer.
    #[arg(long)]
    pub no_show: bool,
}

/// Options for the experiment directory scan.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// Directory containing experiment CSV files.
    pub dir: PathBuf,

    /// Experiment kind (selects the file prefix and column names).
    #[arg(short = 'e', long, value_enum, default_value_t = Experiment::Vq)]
    pub experiment: Experiment,

    /// Field separator.
    #[arg(long, default_value_t = ',')]
    pub sep: char,

    /// Save one SVG per file.
    #[arg(long)]
    pub save: bool,

    /// Output directory for saved figures.
    #[arg(long = "figures-dir", default_value = "figures")]
    pub figures_dir: PathBuf,

    /// Horizontal error bar half-width.
    #[arg(long, allow_negative_numbers = true)]
    pub xerr: Option<f64>,

    /// Vertical error bar half-width.
    #[arg(long, allow_negative_numbers = true)]
    pub yerr: Option<f64>,

    /// Plot against 1/x.
    #[arg(long)]
    pub inverse: bool,

    /// Add a linear extrapolation (only with `--inverse`).
    #[arg(long)]
    pub extrapolate: bool,

    /// Do not open the interactive viewer.
    #[arg(long)]
    pub no_show: bool,
}

/// Options for synthetic file generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    pub out: PathBuf,

    #[arg(short = 'e', long, value_enum, default_value_t = Experiment::Vq)]
    pub experiment: Experiment,

    /// Number of runs (column pairs).
    #[arg(long, default_value_t = 2)]
    pub runs: usize,

    /// Points in the first run.
    #[arg(long, default_value_t = 10)]
    pub points: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the additive noise.
    #[arg(long, default_value_t = 0.2)]
    pub noise: f64,
}
