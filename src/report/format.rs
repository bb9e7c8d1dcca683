//! Formatted terminal output.
//!
//! We keep formatting code in one place so the fitting code stays clean and
//! output changes are localized.

use std::path::Path;

use crate::domain::{FitResult, FlatSamples, MeasurementSeries};

/// One diagnostic line per fit: `Slope <i>: <k>` for lines through the
/// origin, `Fit <i>: [a_n, …, a_0]` for higher degrees.
pub fn format_fit_line(fit: &FitResult) -> String {
    match fit.slope() {
        Some(k) => format!("Slope {}: {k}", fit.index),
        None => {
            let parts: Vec<String> = fit.coefficients.iter().map(|c| format!("{c}")).collect();
            format!("Fit {}: [{}]", fit.index, parts.join(", "))
        }
    }
}

pub fn format_fit_lines(fits: &[FitResult]) -> Vec<String> {
    fits.iter().map(format_fit_line).collect()
}

/// Short header describing what was loaded.
pub fn format_load_summary(source: &Path, flat: &FlatSamples, series: &[MeasurementSeries]) -> String {
    let mut out = format!(
        "{}: {} columns, {} samples, {} measurement pairs",
        source.display(),
        flat.column_count,
        flat.samples.len(),
        flat.pair_count
    );
    for s in series {
        out.push_str(&format!("\n  {}: n={}", s.label, s.len()));
        if let Some(max_x) = s.max_x() {
            out.push_str(&format!(", max x={max_x:.4}"));
        }
    }
    out
}

/// Fit quality table, one row per measurement.
pub fn format_fit_table(fits: &[FitResult]) -> String {
    let mut out = String::from("measurement | degree | sse | rmse\n");
    for fit in fits {
        out.push_str(&format!(
            "{:>11} | {:>6} | {:.6} | {:.6}\n",
            fit.index, fit.degree, fit.sse, fit.rmse
        ));
    }
    out
}
