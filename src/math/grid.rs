//! Evenly spaced grids and piecewise-linear interpolation.

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// `n == 1` yields `[start]`, `n == 0` yields an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Piecewise-linear interpolant that extends its end segments linearly.
///
/// Knots are sorted by x on construction. Duplicate x-values keep the first
/// occurrence.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Returns `None` when fewer than two distinct finite knots remain.
    pub fn new(x: &[f64], y: &[f64]) -> Option<Self> {
        let mut pts: Vec<(f64, f64)> = x
            .iter()
            .copied()
            .zip(y.iter().copied())
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .collect();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts.dedup_by(|a, b| a.0 == b.0);

        if pts.len() < 2 {
            return None;
        }

        let (xs, ys) = pts.into_iter().unzip();
        Some(Self { xs, ys })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Segment index `i` such that xs[i] <= x < xs[i + 1], clamped to the end segments.
        let i = match self.xs.partition_point(|&k| k <= x) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
