//! Plotters-powered panel widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`, so the terminal view and the SVG file share the
//! same `Panel` description.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{Panel, SeriesStyle};

/// Terminal-friendly palette; indices line up with `plot::svg::PALETTE`.
const TERM_PALETTE: [RGBColor; 6] = [
    RGBColor(0, 255, 255),
    RGBColor(255, 165, 0),
    RGBColor(0, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(180, 140, 255),
    RGBColor(255, 255, 0),
];

pub struct PanelChart<'a> {
    pub panel: &'a Panel,
}

impl Widget for PanelChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let panel = self.panel;
        let [x0, x1] = panel.x_bounds;
        let [y0, y1] = panel.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Terminal cells are coarse; axes and labels without mesh lines read best.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(panel.x_label.as_str())
                .y_desc(panel.y_label.as_str())
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format_tick(*v))
                .y_label_formatter(&|v| format_tick(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for plot in &panel.series {
                let color = TERM_PALETTE[plot.color % TERM_PALETTE.len()];
                let points = plot.points.iter().copied().filter(|(x, y)| x.is_finite() && y.is_finite());
                match plot.style {
                    SeriesStyle::Fit => {
                        chart.draw_series(LineSeries::new(points, &RED))?;
                    }
                    SeriesStyle::Line | SeriesStyle::Extrapolation => {
                        chart.draw_series(LineSeries::new(points, &color))?;
                    }
                    // `Circle` radii are mapped incorrectly by the ratatui backend,
                    // so markers are drawn as single pixels.
                    SeriesStyle::Scatter => {
                        chart.draw_series(points.map(|p| Pixel::new(p, WHITE)))?;
                    }
                    SeriesStyle::Markers => {
                        chart.draw_series(points.map(|p| Pixel::new(p, color)))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-2..1e4).contains(&a) {
        format!("{v:.1e}")
    } else {
        format!("{v:.2}")
    }
}
