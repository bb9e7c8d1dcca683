//! Export fitted coefficients to JSON.
//!
//! The export is the portable record of a `lab plot` run: per-measurement
//! coefficients, fit quality, and the evaluated curve used for the overlay.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{FitResult, MeasurementSeries};
use crate::error::AppError;
use crate::fit::fit_curve;

/// Top-level JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitsFile {
    pub tool: String,
    pub generated: DateTime<Local>,
    pub source: PathBuf,
    pub transform: String,
    pub fits: Vec<FitRecord>,
}

/// One measurement's fit plus the curve grid drawn for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitRecord {
    #[serde(flatten)]
    pub fit: FitResult,
    pub n_points: usize,
    pub curve_x: Vec<f64>,
    pub curve_y: Vec<f64>,
}

/// Write fits to a pretty-printed JSON file.
pub fn write_fits_json(
    path: &Path,
    source: &Path,
    transform: &str,
    series: &[MeasurementSeries],
    fits: &[FitResult],
) -> Result<(), AppError> {
    let records = series
        .iter()
        .zip(fits)
        .map(|(s, fit)| {
            let (curve_x, curve_y): (Vec<f64>, Vec<f64>) = fit_curve(fit, s.max_x().unwrap_or(0.0)).into_iter().unzip();
            FitRecord {
                fit: fit.clone(),
                n_points: s.len(),
                curve_x,
                curve_y,
            }
        })
        .collect();

    let doc = FitsFile {
        tool: "lab".to_string(),
        generated: Local::now(),
        source: source.to_path_buf(),
        transform: transform.to_string(),
        fits: records,
    };

    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create fits JSON '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, &doc)?;
    Ok(())
}

/// Read a fits JSON file.
pub fn read_fits_json(path: &Path) -> Result<FitsFile, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(format!("Failed to open fits JSON '{}'", path.display()), e))?;
    Ok(serde_json::from_reader(file)?)
}
