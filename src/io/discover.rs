//! Experiment file discovery and named column pairing.
//!
//! Lab exports name their columns `<Quantity> #<n>`, e.g. `Number #1`,
//! `Voltage #1`, `Number #2`, … . We resolve the full ordered list of pairs
//! once from the header row and then slice columns from the in-memory table.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::domain::{ColumnPair, MeasurementSeries, RawTable};
use crate::error::AppError;

/// Column name for quantity `quantity` and run `n`.
pub fn column_name(quantity: &str, n: usize) -> String {
    format!("{quantity} #{n}")
}

/// List `*.csv` files in `dir` whose name starts with `prefix`, sorted by name.
pub fn find_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, AppError> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::FileNotFound {
            path: dir.to_path_buf(),
        },
        _ => AppError::io(format!("Failed to read directory '{}'", dir.display()), e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io(format!("Failed to read directory '{}'", dir.display()), e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if name.starts_with(prefix) && is_csv {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        info!("no '{prefix}*.csv' files in '{}'", dir.display());
    }
    Ok(files)
}

/// Resolve `<x_quantity> #n` / `<y_quantity> #n` pairs for `n = 1, 2, …`.
///
/// Probing stops at the first `n` with no x column. An x column whose y
/// partner is missing is an error.
pub fn discover_pairs(headers: &[String], x_quantity: &str, y_quantity: &str) -> Result<Vec<ColumnPair>, AppError> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let mut pairs = Vec::new();
    for n in 1.. {
        let x_name = column_name(x_quantity, n);
        let Some(x_column) = position(&x_name) else {
            break;
        };
        let y_name = column_name(y_quantity, n);
        let y_column = position(&y_name).ok_or_else(|| AppError::MissingColumn { name: y_name.clone() })?;

        pairs.push(ColumnPair {
            index: n,
            x_column,
            y_column,
            x_name,
            y_name,
        });
    }

    debug!("found {} '{x_quantity}'/'{y_quantity}' pairs", pairs.len());
    Ok(pairs)
}

/// Slice one named pair out of a table.
///
/// Rows where either cell is missing are dropped, so x and y stay aligned.
pub fn named_series(table: &RawTable, pair: &ColumnPair, sort_by_x: bool) -> MeasurementSeries {
    let (x, y): (Vec<f64>, Vec<f64>) = table
        .column(pair.x_column)
        .into_iter()
        .zip(table.column(pair.y_column))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .unzip();

    let mut series = MeasurementSeries::new(pair.index, format!("Run: {}", pair.index), x, y);
    if sort_by_x {
        series.sort_by_x();
    }
    series
}
