//! Shared domain types.
//!
//! The tabular types (`RawTable`, `FlatSamples`, `MeasurementSeries`) are
//! in-memory only. Fit outputs are serializable so they can be exported to JSON.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::transform::Transform;

/// Number of points used to draw a fitted curve over `[0, max(x)]`.
pub const FIT_GRID_POINTS: usize = 100;

/// Number of points used to draw an extrapolated interpolant over `[0, max(x)]`.
pub const EXTRAPOLATION_GRID_POINTS: usize = 1000;

/// Resolution used to size saved figures.
pub const SAVE_DPI: u32 = 600;

/// Default width and height of one panel, in inches.
pub const DEFAULT_PANEL_SIZE_IN: f64 = 5.0;

/// Vacuum permittivity ε0 in F/m.
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;

/// What to do with rows whose every cell is missing.
///
/// `Keep` is the default: the rows survive into the flattened output
/// and show up as zero-filled samples at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BlankRowPolicy {
    #[default]
    Keep,
    Drop,
}

/// What to do when the flattened samples don't split evenly into `2 * pair_count` strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShapePolicy {
    /// Fail with `AppError::ShapeMismatch`.
    #[default]
    Strict,
    /// Slice anyway and cut x/y to the shorter of the two.
    Truncate,
}

/// CLI-facing selector for `data::transform::Transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    #[default]
    Identity,
    Inverse,
    ChargeDensity,
}

/// The three capacitor experiments and their file/column conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Experiment {
    /// Voltage vs. number of charge transfers.
    Vq,
    /// Voltage vs. radius.
    Vr,
    /// Voltage vs. plate distance.
    Vx,
}

impl Experiment {
    /// Data files for this experiment start with this prefix.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Experiment::Vq => "VQ",
            Experiment::Vr => "VR",
            Experiment::Vx => "VX",
        }
    }

    pub fn x_quantity(self) -> &'static str {
        match self {
            Experiment::Vq => "Number",
            Experiment::Vr => "Radius",
            Experiment::Vx => "Distance",
        }
    }

    pub fn y_quantity(self) -> &'static str {
        "Voltage"
    }

    pub fn title(self) -> &'static str {
        match self {
            Experiment::Vq => "",
            Experiment::Vr => "Voltage V vs radius r",
            Experiment::Vx => "Voltage V vs distance x",
        }
    }

    pub fn axis_labels(self, inverse: bool) -> (&'static str, &'static str) {
        match (self, inverse) {
            (Experiment::Vq, false) => ("Number of charge transfers", "Capacitor voltage, V"),
            (Experiment::Vq, true) => ("Inv number of charge transfers", "Inv capacitor voltage"),
            (Experiment::Vr, false) => ("Radius", "Voltage"),
            (Experiment::Vr, true) => ("Inv radius", "Inv voltage"),
            (Experiment::Vx, false) => ("Distance", "Voltage"),
            (Experiment::Vx, true) => ("Inv distance", "Inv voltage"),
        }
    }

    /// Fixed tick spacing `(x, y)`, when the experiment uses one.
    pub fn tick_steps(self) -> Option<(f64, f64)> {
        match self {
            Experiment::Vq => Some((1.0, 5.0)),
            Experiment::Vr | Experiment::Vx => None,
        }
    }

    /// Extra room above the largest y-value.
    pub fn y_headroom(self) -> f64 {
        match self {
            Experiment::Vq => 2.0,
            Experiment::Vr | Experiment::Vx => 0.0,
        }
    }
}

/// A delimited text file parsed into memory.
///
/// Rows are stored row-major and always have exactly `headers.len()` cells.
/// Missing cells are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.get(idx).copied().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Row-major flattened samples with missing values already replaced by `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSamples {
    pub samples: Vec<f64>,
    /// `column_count / 2`, truncated.
    pub pair_count: usize,
    pub column_count: usize,
}

/// One (x-column, y-column) pair found by name in a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPair {
    /// 1-based index shared by both column names (`Voltage #3` -> 3).
    pub index: usize,
    pub x_column: usize,
    pub y_column: usize,
    pub x_name: String,
    pub y_name: String,
}

/// Paired x/y samples for one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    /// 1-based measurement index.
    pub index: usize,
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl MeasurementSeries {
    pub fn new(index: usize, label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            index,
            label: label.into(),
            x,
            y,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }

    pub fn max_x(&self) -> Option<f64> {
        self.x.iter().copied().filter(|v| v.is_finite()).reduce(f64::max)
    }

    /// Sort the (x, y) pairs by x, then y.
    pub fn sort_by_x(&mut self) {
        let mut pts = self.points();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        let (x, y): (Vec<f64>, Vec<f64>) = pts.into_iter().unzip();
        self.x = x;
        self.y = y;
    }
}

/// Polynomial fit for one measurement.
///
/// Coefficients are ordered from the highest power down to the constant term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub index: usize,
    pub degree: usize,
    pub coefficients: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
}

impl FitResult {
    /// Slope of a through-origin line fit.
    pub fn slope(&self) -> Option<f64> {
        if self.degree == 1 {
            self.coefficients.first().copied()
        } else {
            None
        }
    }
}

/// Where and whether to show/save a figure.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Write the figure to this path.
    pub save_path: Option<PathBuf>,
    /// Open the interactive viewer.
    pub show: bool,
}

/// Options for the per-measurement panel plot.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub separator: u8,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Size of each square panel, in inches.
    pub panel_size: f64,
    pub show_fit: bool,
    pub degree: usize,
    pub transform: Transform,
    pub blank_rows: BlankRowPolicy,
    pub shape: ShapePolicy,
    pub export_fits: Option<PathBuf>,
    pub output: OutputOptions,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            title: "Graph".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            panel_size: DEFAULT_PANEL_SIZE_IN,
            show_fit: true,
            degree: 1,
            transform: Transform::Identity,
            blank_rows: BlankRowPolicy::Keep,
            shape: ShapePolicy::Strict,
            export_fits: None,
            output: OutputOptions::default(),
        }
    }
}

/// Options for scanning a directory of experiment files.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub experiment: Experiment,
    pub separator: u8,
    /// Symmetric x error-bar magnitude; bars are drawn only when both are set.
    pub xerr: Option<f64>,
    pub yerr: Option<f64>,
    pub inverse: bool,
    pub extrapolate: bool,
    /// Save each figure as `<figures_dir>/<file stem>.svg`.
    pub figures_dir: Option<PathBuf>,
    pub show: bool,
}

impl ScanOptions {
    pub fn error_bars(&self) -> Option<(f64, f64)> {
        match (self.xerr, self.yerr) {
            (Some(xe), Some(ye)) if xe >= 0.0 && ye >= 0.0 => Some((xe, ye)),
            _ => None,
        }
    }
}

/// Synthetic data generation settings.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub experiment: Experiment,
    pub runs: usize,
    pub points: usize,
    pub seed: u64,
    /// Standard deviation of the additive voltage noise.
    pub noise: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_x_keeps_pairs_together() {
        let mut s = MeasurementSeries::new(1, "m", vec![3.0, 1.0, 2.0], vec![30.0, 10.0, 20.0]);
        s.sort_by_x();
        assert_eq!(s.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.y, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn error_bars_need_both_magnitudes() {
        let mut opts = ScanOptions {
            experiment: Experiment::Vq,
            separator: b',',
            xerr: Some(0.0),
            yerr: None,
            inverse: false,
            extrapolate: false,
            figures_dir: None,
            show: false,
        };
        assert_eq!(opts.error_bars(), None);
        opts.yerr = Some(1.0);
        assert_eq!(opts.error_bars(), Some((0.0, 1.0)));
        opts.xerr = Some(-1.0);
        assert_eq!(opts.error_bars(), None);
    }

    #[test]
    fn inverse_plots_get_inverse_labels_for_every_experiment() {
        for experiment in [Experiment::Vq, Experiment::Vr, Experiment::Vx] {
            let (x, y) = experiment.axis_labels(true);
            assert!(x.starts_with("Inv "), "{experiment:?}: {x}");
            assert!(y.starts_with("Inv "), "{experiment:?}: {y}");
            assert!(!experiment.axis_labels(false).0.starts_with("Inv "));
        }
    }

    #[test]
    fn max_x_ignores_non_finite() {
        let s = MeasurementSeries::new(1, "m", vec![1.0, f64::INFINITY, 4.0], vec![0.0; 3]);
        assert_eq!(s.max_x(), Some(4.0));
    }
}
