//! Plotters-powered price history chart widget for Ratatui.
//!
//! A single line series over the observation index. The y range follows the
//! data (it is not forced to include zero). Tick labels are drawn by the TUI
//! around the chart rect, so this widget only draws axes, series and cursor.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::detail::ChartSeries;

/// Line color of the price series (`#3498db`).
pub const SERIES_COLOR: RGBColor = RGBColor(52, 152, 219);

const CURSOR_COLOR: RGBColor = RGBColor(255, 255, 0);

/// A render-only chart description; bounds are computed by [`PriceChart::new`].
pub struct PriceChart<'a> {
    pub values: &'a [f64],
    /// Highlighted observation (the tooltip position).
    pub cursor: Option<usize>,
    pub y_bounds: [f64; 2],
}

impl<'a> PriceChart<'a> {
    pub fn new(series: &'a ChartSeries, cursor: Option<usize>) -> Self {
        let y_bounds = series
            .value_range()
            .map(|(lo, hi)| padded_bounds(lo, hi))
            .unwrap_or([0.0, 1.0]);
        Self {
            values: &series.values,
            cursor,
            y_bounds,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.values.len().max(2) - 1) as f64]
    }
}

/// 5% headroom on each side; a flat series gets a band around its value.
pub fn padded_bounds(lo: f64, hi: f64) -> [f64; 2] {
    let span = hi - lo;
    let span = if span.abs() < 1e-9 { lo.abs().max(1.0) } else { span };
    let pad = span * 0.05;
    [lo - pad, hi + pad]
}

impl<'a> Widget for PriceChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x1 = self.x_bounds()[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 1)
                .set_label_area_size(LabelAreaPosition::Bottom, 1)
                .build_cartesian_2d(0.0..x1, y0..y1)?;

            // Axes only: no mesh and no plotters-side tick text.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            let points: Vec<(f64, f64)> = self
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &v)| (i as f64, v))
                .collect();

            let cursor = self
                .cursor
                .and_then(|c| points.iter().find(|(px, _)| *px as usize == c).copied());

            // Guide line under the series, marker on top of it.
            if let Some((x, _)) = cursor {
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &RGBColor(90, 90, 90)))?;
            }
            chart.draw_series(LineSeries::new(points.iter().copied(), &SERIES_COLOR))?;
            if let Some((x, y)) = cursor {
                chart.draw_series(std::iter::once(Pixel::new((x, y), CURSOR_COLOR)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
