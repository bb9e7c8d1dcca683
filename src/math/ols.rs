//! Least squares solvers.
//!
//! Two problem shapes show up when fitting lab data:
//!
//! ```text
//! minimize ‖y - k·x‖²      (line through the origin, scalar k)
//! minimize ‖y - V β‖²      (polynomial with intercept, V = Vandermonde matrix)
//! ```
//!
//! The general case is solved via SVD so that tall (more rows than columns)
//! and rank-deficient design matrices are handled without panicking.
//! Small singular values are treated as zero, which yields the minimum-norm
//! solution for degenerate inputs (e.g. every x equal to zero).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the solution has non-finite entries.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // Scale the cutoff with the largest singular value so that badly scaled
    // Vandermonde columns (x^n for large x) don't get truncated.
    let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    for &rel in &[1e-12, 1e-10, 1e-8] {
        let eps = (rel * max_sv).max(f64::MIN_POSITIVE);
        if let Ok(beta) = svd.solve(y, eps) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve `minimize Σ (y_i - k x_i)²` for the scalar `k`.
///
/// When every `x_i` is zero the problem is degenerate and the minimum-norm
/// answer `k = 0` is returned.
pub fn solve_through_origin(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n == 0 {
        return None;
    }

    let sxx: f64 = x[..n].iter().map(|v| v * v).sum();
    let sxy: f64 = x[..n].iter().zip(&y[..n]).map(|(a, b)| a * b).sum();

    if sxx == 0.0 {
        return Some(0.0);
    }
    let k = sxy / sxx;
    k.is_finite().then_some(k)
}
