//! Per-series transforms applied before fitting and plotting.

use log::warn;

use crate::domain::{MeasurementSeries, TransformKind, VACUUM_PERMITTIVITY};
use crate::error::AppError;

/// Maps raw measurements to the quantity that gets fitted and drawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum Transform {
    #[default]
    Identity,
    /// `x' = 1/x`, `y' = 1/y`.
    Inverse,
    /// Surface charge density of a parallel-plate capacitor, `σ = ε0 · V / d`.
    ChargeDensity { plate_distance_m: f64 },
    /// Caller-supplied `y' = f(x, y)`.
    Custom(fn(f64, f64) -> f64),
}

impl Transform {
    /// Build a transform from its CLI selector.
    pub fn from_kind(kind: TransformKind, plate_distance_m: Option<f64>) -> Result<Self, AppError> {
        match kind {
            TransformKind::Identity => Ok(Transform::Identity),
            TransformKind::Inverse => Ok(Transform::Inverse),
            TransformKind::ChargeDensity => {
                let d = plate_distance_m.ok_or_else(|| {
                    AppError::InvalidConfig("`--transform charge-density` requires `--plate-distance`.".to_string())
                })?;
                if !(d.is_finite() && d > 0.0) {
                    return Err(AppError::InvalidConfig(
                        "Plate distance must be finite and > 0.".to_string(),
                    ));
                }
                Ok(Transform::ChargeDensity { plate_distance_m: d })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Inverse => "inverse",
            Transform::ChargeDensity { .. } => "charge-density",
            Transform::Custom(_) => "custom",
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Transform::Identity)
    }

    /// Map a single point.
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Transform::Identity => (x, y),
            Transform::Inverse => (1.0 / x, 1.0 / y),
            Transform::ChargeDensity { plate_distance_m } => (x, VACUUM_PERMITTIVITY * y / plate_distance_m),
            Transform::Custom(f) => (x, f(x, y)),
        }
    }

    /// Map a whole series. Points that become non-finite are dropped.
    pub fn apply(&self, series: MeasurementSeries) -> MeasurementSeries {
        if self.is_identity() {
            return series;
        }

        let n = series.len();
        let (x, y): (Vec<f64>, Vec<f64>) = series
            .points()
            .into_iter()
            .map(|(x, y)| self.apply_point(x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .unzip();

        if x.len() < n {
            warn!(
                "{}: {} of {n} points are not finite after the {} transform; dropped",
                series.label,
                n - x.len(),
                self.name()
            );
        }

        MeasurementSeries { x, y, ..series }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(x: Vec<f64>, y: Vec<f64>) -> MeasurementSeries {
        MeasurementSeries::new(1, "Run: 1", x, y)
    }

    #[test]
    fn identity_is_a_no_op() {
        let s = series(vec![0.0, 1.0], vec![0.0, 2.0]);
        assert_eq!(Transform::Identity.apply(s.clone()), s);
    }

    #[test]
    fn inverse_drops_zero_points() {
        let out = Transform::Inverse.apply(series(vec![0.0, 2.0, 4.0], vec![1.0, 4.0, 8.0]));
        assert_eq!(out.x, vec![0.5, 0.25]);
        assert_eq!(out.y, vec![0.25, 0.125]);
    }

    #[test]
    fn charge_density_scales_voltage() {
        let t = Transform::from_kind(TransformKind::ChargeDensity, Some(0.002)).unwrap();
        let (x, y) = t.apply_point(3.0, 10.0);
        assert_eq!(x, 3.0);
        assert!((y - VACUUM_PERMITTIVITY * 5000.0).abs() < 1e-20);
    }

    #[test]
    fn charge_density_requires_positive_distance() {
        assert!(Transform::from_kind(TransformKind::ChargeDensity, None).is_err());
        assert!(Transform::from_kind(TransformKind::ChargeDensity, Some(0.0)).is_err());
    }

    #[test]
    fn custom_sees_both_coordinates() {
        let t = Transform::Custom(|x, y| x * y);
        let out = t.apply(series(vec![2.0, 3.0], vec![5.0, 7.0]));
        assert_eq!(out.x, vec![2.0, 3.0]);
        assert_eq!(out.y, vec![10.0, 21.0]);
    }
}
