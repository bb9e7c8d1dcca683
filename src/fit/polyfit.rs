//! Polynomial least squares fitting for a single measurement.
//!
//! Given samples `(x_i, y_i)` and a degree `d`:
//!
//! - `d == 1`: fit a line through the origin, `y = k·x` (no intercept)
//! - `d >= 2`: fit a full polynomial with intercept on the Vandermonde matrix
//!
//! Both return coefficients highest power first, so a degree-1 fit is `[k, 0]`.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{FIT_GRID_POINTS, FitResult, MeasurementSeries};
use crate::error::AppError;
use crate::math::{linspace, solve_least_squares, solve_through_origin};
use crate::models::{fill_design_row, predict};

/// Fit a polynomial of the given degree to one measurement.
pub fn fit_polynomial(series: &MeasurementSeries, degree: usize) -> Result<FitResult, AppError> {
    if degree == 0 {
        return Err(AppError::InvalidConfig("Fit degree must be >= 1.".to_string()));
    }

    let n = series.len();
    if n == 0 {
        return Err(AppError::Fit(format!(
            "Measurement {} has no samples to fit.",
            series.index
        )));
    }

    let x = &series.x[..n];
    let y = &series.y[..n];

    let coefficients = if degree == 1 {
        let k = solve_through_origin(x, y).ok_or_else(|| {
            AppError::Fit(format!("Non-finite slope for measurement {}.", series.index))
        })?;
        vec![k, 0.0]
    } else {
        fit_with_intercept(x, y, degree).ok_or_else(|| {
            AppError::Fit(format!(
                "Least squares failed for measurement {} (degree {degree}).",
                series.index
            ))
        })?
    };

    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = yi - predict(&coefficients, xi);
            r * r
        })
        .sum();
    let rmse = (sse / n as f64).sqrt();

    debug!(
        "measurement {}: degree {degree}, n={n}, coefficients={coefficients:?}, rmse={rmse:.6}",
        series.index
    );

    Ok(FitResult {
        index: series.index,
        degree,
        coefficients,
        sse,
        rmse,
    })
}

/// Fit every measurement with the same degree.
pub fn fit_all(series: &[MeasurementSeries], degree: usize) -> Result<Vec<FitResult>, AppError> {
    series.iter().map(|s| fit_polynomial(s, degree)).collect()
}

/// Evaluate a fit over `FIT_GRID_POINTS` evenly spaced points in `[0, max_x]`.
pub fn fit_curve(fit: &FitResult, max_x: f64) -> Vec<(f64, f64)> {
    linspace(0.0, max_x, FIT_GRID_POINTS)
        .into_iter()
        .map(|x| (x, predict(&fit.coefficients, x)))
        .collect()
}

fn fit_with_intercept(x: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
    let k = degree + 1;
    let mut design = DMatrix::<f64>::zeros(x.len(), k);
    let mut row = vec![0.0; k];
    for (i, &xi) in x.iter().enumerate() {
        fill_design_row(degree, xi, &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }
    let target = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &target)?;
    Some(beta.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(x: Vec<f64>, y: Vec<f64>) -> MeasurementSeries {
        MeasurementSeries::new(1, "Measurement 1", x, y)
    }

    #[test]
    fn linear_fit_recovers_slope_through_origin() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();

        let fit = fit_polynomial(&series(x, y), 1).unwrap();
        assert!((fit.coefficients[0] - 3.0).abs() < 1e-9);
        assert_eq!(fit.coefficients[1], 0.0);
        assert_eq!(fit.slope(), Some(fit.coefficients[0]));
        assert!(fit.sse < 1e-18);
    }

    #[test]
    fn linear_fit_ignores_offset() {
        // y = x + 1 has no exact through-origin fit; k = Σxy / Σx².
        let fit = fit_polynomial(&series(vec![1.0, 2.0], vec![2.0, 3.0]), 1).unwrap();
        assert!((fit.coefficients[0] - 8.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn quadratic_fit_recovers_coefficients() {
        let x: Vec<f64> = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v + 1.0).collect();

        let fit = fit_polynomial(&series(x, y), 2).unwrap();
        assert_eq!(fit.coefficients.len(), 3);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-6);
        assert!(fit.coefficients[1].abs() < 1e-6);
        assert!((fit.coefficients[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degree_zero_is_rejected() {
        let err = fit_polynomial(&series(vec![1.0], vec![1.0]), 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn empty_series_is_a_fit_error() {
        let err = fit_polynomial(&series(vec![], vec![]), 1).unwrap_err();
        assert!(matches!(err, AppError::Fit(_)));
    }

    #[test]
    fn curve_spans_zero_to_max_x() {
        let fit = fit_polynomial(&series(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]), 1).unwrap();
        let curve = fit_curve(&fit, 3.0);
        assert_eq!(curve.len(), FIT_GRID_POINTS);
        assert_eq!(curve[0], (0.0, 0.0));
        let (x_last, y_last) = curve[FIT_GRID_POINTS - 1];
        assert_eq!(x_last, 3.0);
        assert!((y_last - 6.0).abs() < 1e-12);
    }
}
