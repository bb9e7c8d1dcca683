//! Polynomial model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given x and degree (for least squares)
//! - predict y(x) given coefficients (for residuals and plotted curves)
//!
//! Coefficients are ordered from the highest power down to the constant term,
//! so `[2.0, 0.0, 1.0]` is `2x² + 1`.

/// Fill a Vandermonde design row `[x^d, x^(d-1), …, x, 1]`.
///
/// # Panics
/// Panics if `out` does not have length `degree + 1`.
pub fn fill_design_row(degree: usize, x: f64, out: &mut [f64]) {
    assert_eq!(out.len(), degree + 1, "design row must have degree + 1 entries");

    let mut power = 1.0;
    for slot in out.iter_mut().rev() {
        *slot = power;
        power *= x;
    }
}

/// Evaluate the polynomial at `x` using Horner's scheme.
pub fn predict(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_is_highest_power_first() {
        let mut row = [0.0; 4];
        fill_design_row(3, 2.0, &mut row);
        assert_eq!(row, [8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn predict_matches_manual_evaluation() {
        // 2x² + 1
        let c = [2.0, 0.0, 1.0];
        assert_eq!(predict(&c, 0.0), 1.0);
        assert_eq!(predict(&c, 3.0), 19.0);
        // Line through the origin.
        assert_eq!(predict(&[2.5, 0.0], 0.0), 0.0);
        assert_eq!(predict(&[], 4.0), 0.0);
    }
}
