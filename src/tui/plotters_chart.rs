//! Plotters-powered overlay chart widget for Ratatui.
//!
//! Plotters handles axes, tick placement, and label formatting better than
//! Ratatui's built-in `Chart`, and the same chart description could later be
//! rendered to a PNG/SVG backend. `plotters-ratatui-backend` bridges the
//! Plotters drawing calls into the terminal buffer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One line trace to draw: samples on the shared frequency axis plus a color.
pub struct ChartTrace<'a> {
    pub values: &'a [f64],
    pub color: RGBColor,
}

/// A render-only chart description.
///
/// All series and bounds are computed before the widget is built; `render()`
/// only draws. Trace order is draw order, so the observation goes first and
/// the molecule traces paint over it.
pub struct OverlayChart<'a> {
    /// Shared x axis (the observed grid), sorted ascending.
    pub frequency: &'a [f64],
    /// Traces in draw order: the observation first, then one per molecule.
    pub traces: &'a [ChartTrace<'a>],
    /// X bounds (frequency in MHz).
    pub x_bounds: [f64; 2],
    /// Y bounds (flux units of the observation).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: String,
    /// Tick label formatting.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for OverlayChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters can fail to lay out a chart in a tiny area; show a hint
        // instead of panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // The crate-provided `widget_fn` helper keeps us off the backend's
        // internal types; it routes the Plotters primitives through Ratatui's
        // `Canvas` widget into the buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Label areas cost terminal rows; keep them minimal.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are too busy at terminal resolution; axes and tick
            // labels carry enough structure on their own.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(&self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for trace in self.traces {
                chart.draw_series(LineSeries::new(
                    self.frequency
                        .iter()
                        .zip(trace.values.iter())
                        .map(|(&x, &y)| (x, y)),
                    &trace.color,
                ))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
