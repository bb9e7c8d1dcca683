//! Synthetic experiment data in the `<Quantity> #<n>` column layout.
//!
//! The generated files look like real lab exports: one x/y column pair per run,
//! later runs slightly shorter than earlier ones (so trailing cells are blank),
//! and Gaussian noise on the voltage readings.

use std::fs::File;
use std::path::Path;

use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Experiment, RawTable, SampleConfig};
use crate::error::AppError;
use crate::io::column_name;
use crate::math::linspace;

/// Volts per charge transfer for the first VQ run.
const VQ_SLOPE: f64 = 2.0;
/// Scale of the `k / r` potential for VR runs (V·cm).
const VR_SCALE: f64 = 40.0;
/// Saturation voltage and half-saturation distance (mm) for VX runs.
const VX_V_MAX: f64 = 30.0;
const VX_HALF: f64 = 3.0;

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            experiment: Experiment::Vq,
            runs: 2,
            points: 10,
            seed: 42,
            noise: 0.2,
        }
    }
}

/// Generate a table of `runs` x/y column pairs.
pub fn generate_sample(config: &SampleConfig) -> Result<RawTable, AppError> {
    if config.runs == 0 {
        return Err(AppError::InvalidConfig("Run count must be > 0.".to_string()));
    }
    if config.points < 2 {
        return Err(AppError::InvalidConfig("Point count must be >= 2.".to_string()));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::InvalidConfig("Noise must be finite and >= 0.".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::InvalidConfig(format!("Noise distribution error: {e}")))?;

    let experiment = config.experiment;
    let mut headers = Vec::with_capacity(2 * config.runs);
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(2 * config.runs);

    for run in 1..=config.runs {
        let n = config.points.saturating_sub(run - 1).max(2);
        let x = run_grid(experiment, n);
        // Each run is a slightly different setup (e.g. plate distance).
        let scale = 1.0 + 0.25 * (run - 1) as f64;
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| ideal_voltage(experiment, xi, scale) + normal.sample(&mut rng))
            .collect();

        headers.push(column_name(experiment.x_quantity(), run));
        headers.push(column_name(experiment.y_quantity(), run));
        columns.push(x);
        columns.push(y);
    }

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..height)
        .map(|r| {
            columns
                .iter()
                .map(|c| c.get(r).copied().unwrap_or(f64::NAN))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

/// Write a table as CSV; missing cells become empty fields.
pub fn write_table_csv(path: &Path, table: &RawTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create sample CSV '{}'", path.display()), e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| if v.is_nan() { String::new() } else { format!("{v:.4}") }))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write sample CSV '{}'", path.display()), e))?;

    info!(
        "wrote {} rows x {} columns to '{}'",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(())
}

fn run_grid(experiment: Experiment, n: usize) -> Vec<f64> {
    match experiment {
        Experiment::Vq => (1..=n).map(|i| i as f64).collect(),
        Experiment::Vr => linspace(1.0, 10.0, n),
        Experiment::Vx => linspace(1.0, 2.0 * n as f64, n),
    }
}

fn ideal_voltage(experiment: Experiment, x: f64, scale: f64) -> f64 {
    match experiment {
        Experiment::Vq => VQ_SLOPE * scale * x,
        Experiment::Vr => VR_SCALE * scale / x,
        // 1/V is linear in 1/x, which is what the inverse plot shows.
        Experiment::Vx => VX_V_MAX * x / (x + VX_HALF * scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_interleaved_named_columns() {
        let table = generate_sample(&SampleConfig {
            experiment: Experiment::Vr,
            runs: 3,
            ..SampleConfig::default()
        })
        .unwrap();
        assert_eq!(
            table.headers,
            vec!["Radius #1", "Voltage #1", "Radius #2", "Voltage #2", "Radius #3", "Voltage #3"]
        );
        assert_eq!(table.row_count(), 10);
        // Run 3 is two points shorter, so its trailing cells are blank.
        assert!(table.rows[9][4].is_nan());
        assert!(table.rows[7][4].is_finite());
    }

    #[test]
    fn sample_is_deterministic_per_seed() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        // Blank cells are NaN, so compare the rendered form.
        assert_eq!(format!("{a:?}"), format!("{b:?}"));

        let c = generate_sample(&SampleConfig { seed: 7, ..config }).unwrap();
        assert_ne!(format!("{:?}", a.rows), format!("{:?}", c.rows));
    }

    #[test]
    fn noiseless_vq_is_exactly_linear() {
        let table = generate_sample(&SampleConfig {
            noise: 0.0,
            runs: 1,
            ..SampleConfig::default()
        })
        .unwrap();
        for row in &table.rows {
            assert_eq!(row[1], VQ_SLOPE * row[0]);
        }
    }

    #[test]
    fn rejects_zero_runs() {
        let err = generate_sample(&SampleConfig {
            runs: 0,
            ..SampleConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }
}
