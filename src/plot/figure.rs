//! Render-only chart description.
//!
//! All series, bounds and labels are computed here, outside any drawing code,
//! so the SVG writer and the terminal viewer draw exactly the same thing and
//! the data prep can be tested without a backend.

use crate::domain::{
    EXTRAPOLATION_GRID_POINTS, Experiment, FitResult, MeasurementSeries, PlotOptions, ScanOptions,
};
use crate::fit::fit_curve;
use crate::math::{LinearInterpolant, linspace};

/// Width and height of one panel in inches for overlay figures.
const OVERLAY_PANEL_IN: (f64, f64) = (6.4, 4.8);

/// Fraction of the data span added on each side of a panel.
const PAD_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Black markers, no line.
    Scatter,
    /// Thick red fitted curve.
    Fit,
    /// Palette-colored polyline.
    Line,
    /// Palette-colored markers joined by a thin line, with optional error bars.
    Markers,
    /// Thin palette-colored curve for extrapolated interpolants.
    Extrapolation,
}

#[derive(Debug, Clone)]
pub struct SeriesPlot {
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
    /// Symmetric `(x, y)` error-bar magnitudes.
    pub error_bars: Option<(f64, f64)>,
    /// Palette slot; series derived from the same run share it.
    pub color: usize,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesPlot>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Fixed tick spacing `(x, y)`; `None` lets the backend choose.
    pub tick_steps: Option<(f64, f64)>,
    pub legend: bool,
}

impl Panel {
    /// Number of ticks for an axis with fixed spacing, capped for readability.
    pub fn tick_count(&self) -> Option<(usize, usize)> {
        let (sx, sy) = self.tick_steps?;
        let count = |b: [f64; 2], step: f64| (((b[1] - b[0]) / step).floor() as usize + 1).clamp(2, 50);
        Some((count(self.x_bounds, sx), count(self.y_bounds, sy)))
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub panels: Vec<Panel>,
    /// Size of one panel, `(width, height)` in inches.
    pub panel_size_in: (f64, f64),
}

impl Figure {
    /// Total figure size in inches; panels sit side by side.
    pub fn size_in(&self) -> (f64, f64) {
        let n = self.panels.len().max(1) as f64;
        (self.panel_size_in.0 * n, self.panel_size_in.1)
    }
}

/// One panel per measurement: raw scatter plus the optional fitted curve.
pub fn panel_figure(series: &[MeasurementSeries], fits: Option<&[FitResult]>, options: &PlotOptions) -> Figure {
    let panels = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut plots = vec![SeriesPlot {
                label: s.label.clone(),
                style: SeriesStyle::Scatter,
                points: s.points(),
                error_bars: None,
                color: i,
            }];

            if let Some(fit) = fits.and_then(|f| f.iter().find(|f| f.index == s.index)) {
                plots.push(SeriesPlot {
                    label: format!("Fit {}", s.index),
                    style: SeriesStyle::Fit,
                    points: fit_curve(fit, s.max_x().unwrap_or(0.0)),
                    error_bars: None,
                    color: i,
                });
            }

            let (x_bounds, y_bounds) = bounds(&plots, 0.0);
            Panel {
                title: s.label.clone(),
                x_label: options.x_label.clone(),
                y_label: options.y_label.clone(),
                series: plots,
                x_bounds,
                y_bounds,
                tick_steps: None,
                legend: false,
            }
        })
        .collect();

    Figure {
        title: options.title.clone(),
        panels,
        panel_size_in: (options.panel_size, options.panel_size),
    }
}

/// All runs of one file overlaid in a single panel.
pub fn overlay_figure(title: &str, runs: &[MeasurementSeries], options: &ScanOptions) -> Figure {
    let experiment = options.experiment;
    let (x_label, y_label) = experiment.axis_labels(options.inverse);
    let error_bars = options.error_bars();

    let mut plots = Vec::with_capacity(runs.len() * 2);
    for (i, run) in runs.iter().enumerate() {
        plots.push(SeriesPlot {
            label: run.label.clone(),
            style: if error_bars.is_some() {
                SeriesStyle::Markers
            } else {
                SeriesStyle::Line
            },
            points: run.points(),
            error_bars,
            color: i,
        });

        if options.extrapolate && options.inverse {
            if let Some(curve) = extrapolated_curve(run) {
                plots.push(SeriesPlot {
                    label: format!("{} (extrapolated)", run.label),
                    style: SeriesStyle::Extrapolation,
                    points: curve,
                    error_bars: None,
                    color: i,
                });
            }
        }
    }

    let (x_bounds, y_bounds) = bounds(&plots, experiment.y_headroom());
    let (x_bounds, y_bounds) = match experiment.tick_steps() {
        // Fixed ticks start at zero.
        Some(_) => ([x_bounds[0].min(0.0), x_bounds[1]], [y_bounds[0].min(0.0), y_bounds[1]]),
        None => (x_bounds, y_bounds),
    };

    Figure {
        title: if experiment == Experiment::Vq {
            title.to_string()
        } else {
            experiment.title().to_string()
        },
        panels: vec![Panel {
            title: String::new(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: plots,
            x_bounds,
            y_bounds,
            tick_steps: experiment.tick_steps(),
            legend: experiment == Experiment::Vq,
        }],
        panel_size_in: OVERLAY_PANEL_IN,
    }
}

/// Piecewise-linear interpolant of a run, extended linearly over `[0, max(x)]`.
pub fn extrapolated_curve(run: &MeasurementSeries) -> Option<Vec<(f64, f64)>> {
    let f = LinearInterpolant::new(&run.x, &run.y)?;
    let max_x = run.max_x()?;
    Some(
        linspace(0.0, max_x, EXTRAPOLATION_GRID_POINTS)
            .into_iter()
            .map(|x| (x, f.eval(x)))
            .collect(),
    )
}

/// Padded x/y bounds over every point (and error bar) in the panel.
fn bounds(plots: &[SeriesPlot], y_headroom: f64) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];

    for plot in plots {
        let (xe, ye) = plot.error_bars.unwrap_or((0.0, 0.0));
        for &(px, py) in &plot.points {
            if !(px.is_finite() && py.is_finite()) {
                continue;
            }
            x = [x[0].min(px - xe), x[1].max(px + xe)];
            y = [y[0].min(py - ye), y[1].max(py + ye)];
        }
    }

    if !(x[0].is_finite() && y[0].is_finite()) {
        return ([0.0, 1.0], [0.0, 1.0]);
    }

    y[1] += y_headroom;
    (pad_range(x), pad_range(y))
}

fn pad_range(r: [f64; 2]) -> [f64; 2] {
    let span = r[1] - r[0];
    if span.abs() < 1e-12 {
        let half = r[0].abs().max(1.0) * 0.5;
        return [r[0] - half, r[1] + half];
    }
    let pad = span * PAD_FRACTION;
    [r[0] - pad, r[1] + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit_all;

    fn runs() -> Vec<MeasurementSeries> {
        vec![
            MeasurementSeries::new(1, "Run: 1", vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]),
            MeasurementSeries::new(2, "Run: 2", vec![1.0, 2.0], vec![3.0, 7.0]),
        ]
    }

    fn scan(experiment: Experiment) -> ScanOptions {
        ScanOptions {
            experiment,
            separator: b',',
            xerr: None,
            yerr: None,
            inverse: false,
            extrapolate: false,
            figures_dir: None,
            show: false,
        }
    }

    #[test]
    fn panel_figure_has_one_panel_per_measurement() {
        let series: Vec<_> = runs()
            .into_iter()
            .map(|mut s| {
                s.label = format!("Measurement {}", s.index);
                s
            })
            .collect();
        let fits = fit_all(&series, 1).unwrap();
        let fig = panel_figure(&series, Some(&fits), &PlotOptions::default());

        assert_eq!(fig.panels.len(), 2);
        assert_eq!(fig.size_in(), (10.0, 5.0));
        assert_eq!(fig.panels[1].title, "Measurement 2");
        let styles: Vec<_> = fig.panels[0].series.iter().map(|s| s.style).collect();
        assert_eq!(styles, vec![SeriesStyle::Scatter, SeriesStyle::Fit]);
        // The fitted curve starts at the origin.
        assert_eq!(fig.panels[0].series[1].points[0], (0.0, 0.0));
    }

    #[test]
    fn panel_figure_without_fit_only_scatters() {
        let fig = panel_figure(&runs(), None, &PlotOptions::default());
        assert!(fig.panels.iter().all(|p| p.series.len() == 1));
    }

    #[test]
    fn vq_overlay_has_headroom_ticks_and_legend() {
        let fig = overlay_figure("VQ1", &runs(), &scan(Experiment::Vq));
        let panel = &fig.panels[0];
        assert!(panel.legend);
        assert_eq!(panel.tick_steps, Some((1.0, 5.0)));
        assert!(panel.y_bounds[1] >= 9.0);
        assert!(panel.x_bounds[0] <= 0.0);
        assert_eq!(fig.title, "VQ1");
    }

    #[test]
    fn error_bars_switch_to_markers_and_widen_bounds() {
        let mut opts = scan(Experiment::Vr);
        opts.xerr = Some(0.0);
        opts.yerr = Some(10.0);
        let fig = overlay_figure("VR1", &runs(), &opts);
        let panel = &fig.panels[0];
        assert!(panel.series.iter().all(|s| s.style == SeriesStyle::Markers));
        assert!(panel.y_bounds[0] < -7.0);
    }

    #[test]
    fn extrapolation_only_applies_to_inverse_plots() {
        let mut opts = scan(Experiment::Vx);
        opts.extrapolate = true;
        assert_eq!(overlay_figure("VX1", &runs(), &opts).panels[0].series.len(), 2);

        opts.inverse = true;
        let fig = overlay_figure("VX1", &runs(), &opts);
        let extra: Vec<_> = fig.panels[0]
            .series
            .iter()
            .filter(|s| s.style == SeriesStyle::Extrapolation)
            .collect();
        assert_eq!(extra.len(), 2);
        assert_eq!(extra[0].points.len(), EXTRAPOLATION_GRID_POINTS);
        // Run 1 is y = 2x, so the extension reaches the origin.
        assert!(extra[0].points[0].1.abs() < 1e-12);
    }

    #[test]
    fn tick_count_is_derived_from_bounds() {
        let fig = overlay_figure("VQ1", &runs(), &scan(Experiment::Vq));
        let (nx, ny) = fig.panels[0].tick_count().unwrap();
        assert!(nx >= 3);
        assert!(ny >= 2);
    }
}
