//! Vector figure output.
//!
//! Figures are sized from their physical size in inches at `SAVE_DPI`, and
//! fonts and strokes are given in points and scaled to match, so a 5 inch panel
//! looks the same regardless of the pixel grid it lands on.

use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::domain::SAVE_DPI;
use crate::error::AppError;
use crate::plot::figure::{Figure, Panel, SeriesPlot, SeriesStyle};

/// Series colors, cycled by `SeriesPlot::color`.
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

const FIT_COLOR: RGBColor = RGBColor(220, 0, 0);

/// Converts point sizes to backend pixels.
#[derive(Debug, Clone, Copy)]
struct Scale {
    px_per_pt: f64,
}

impl Scale {
    fn new(dpi: u32) -> Self {
        Self {
            px_per_pt: dpi as f64 / 72.0,
        }
    }

    fn px(&self, pt: f64) -> u32 {
        (pt * self.px_per_pt).round().max(1.0) as u32
    }

    fn font(&self, pt: f64) -> f64 {
        pt * self.px_per_pt
    }
}

/// Pixel size of a figure at `dpi`.
pub fn pixel_size(figure: &Figure, dpi: u32) -> (u32, u32) {
    let (w, h) = figure.size_in();
    ((w * dpi as f64).round() as u32, (h * dpi as f64).round() as u32)
}

/// Write a figure as SVG at the fixed save resolution.
pub fn write_svg(figure: &Figure, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}'", parent.display()), e))?;
    }

    let size = pixel_size(figure, SAVE_DPI);
    {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_figure(&root, figure, Scale::new(SAVE_DPI))?;
        root.present()?;
    }

    info!("saved figure to '{}'", path.display());
    Ok(())
}

/// Render a figure to an SVG string (used by tests and callers that embed the output).
pub fn render_svg_string(figure: &Figure, dpi: u32) -> Result<String, AppError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, pixel_size(figure, dpi)).into_drawing_area();
        draw_figure(&root, figure, Scale::new(dpi))?;
        root.present()?;
    }
    Ok(out)
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    scale: Scale,
) -> Result<(), AppError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let body = if figure.title.is_empty() {
        root.clone()
    } else {
        root.titled(
            &figure.title,
            ("sans-serif", scale.font(14.0)).into_font().style(FontStyle::Bold),
        )?
    };

    let areas = body.split_evenly((1, figure.panels.len().max(1)));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        draw_panel(area, panel, scale)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    scale: Scale,
) -> Result<(), AppError>
where
    DB::ErrorType: 'static,
{
    let [x0, x1] = panel.x_bounds;
    let [y0, y1] = panel.y_bounds;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scale.px(8.0))
        .x_label_area_size(scale.px(30.0))
        .y_label_area_size(scale.px(40.0));
    if !panel.title.is_empty() {
        builder.caption(&panel.title, ("sans-serif", scale.font(11.0)).into_font());
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .label_style(("sans-serif", scale.font(9.0)).into_font())
        .light_line_style(&BLACK.mix(0.08))
        .bold_line_style(&BLACK.mix(0.2));
    if let Some((nx, ny)) = panel.tick_count() {
        mesh.x_labels(nx).y_labels(ny);
    }
    mesh.draw()?;

    for plot in &panel.series {
        draw_series(&mut chart, plot, scale)?;
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .label_font(("sans-serif", scale.font(9.0)).into_font())
            .border_style(&BLACK.mix(0.4))
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
    }

    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    plot: &SeriesPlot,
    scale: Scale,
) -> Result<(), AppError>
where
    DB::ErrorType: 'static,
{
    let color = PALETTE[plot.color % PALETTE.len()];
    let points = plot.points.iter().copied().filter(|(x, y)| x.is_finite() && y.is_finite());
    let marker = scale.px(3.0);

    match plot.style {
        SeriesStyle::Scatter => {
            chart.draw_series(points.map(|p| Circle::new(p, marker, BLACK.filled())))?;
        }
        SeriesStyle::Fit => {
            chart.draw_series(LineSeries::new(points, FIT_COLOR.stroke_width(scale.px(2.0))))?;
        }
        SeriesStyle::Line | SeriesStyle::Extrapolation => {
            let width = if plot.style == SeriesStyle::Line { 1.5 } else { 0.75 };
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(scale.px(width))))?
                .label(plot.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        SeriesStyle::Markers => {
            chart
                .draw_series(LineSeries::new(points.clone(), color.mix(0.6).stroke_width(scale.px(0.75))))?
                .label(plot.label.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
            chart.draw_series(points.clone().map(|p| Circle::new(p, marker, color.filled())))?;

            if let Some((xe, ye)) = plot.error_bars {
                let cap = scale.px(2.0);
                let stroke = color.stroke_width(scale.px(0.75));
                if ye > 0.0 {
                    chart.draw_series(
                        points
                            .clone()
                            .map(|(x, y)| ErrorBar::new_vertical(x, y - ye, y, y + ye, stroke, cap)),
                    )?;
                }
                if xe > 0.0 {
                    chart.draw_series(
                        points.map(|(x, y)| ErrorBar::new_horizontal(y, x - xe, x, x + xe, stroke, cap)),
                    )?;
                }
            }
        }
    }
    Ok(())
}
