//! Plotters-powered chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
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

use crate::chart::{ChartSpec, date_to_x, x_to_date};

/// Series palette, as rgb tuples shared with the Ratatui-side legend.
const PALETTE: [(u8, u8, u8); 9] = [
    (31, 119, 180),  // blue
    (255, 127, 14),  // orange
    (44, 160, 44),   // green
    (214, 39, 40),   // red
    (148, 103, 189), // purple
    (140, 86, 75),   // brown
    (227, 119, 194), // pink
    (188, 189, 34),  // olive
    (23, 190, 207),  // teal
];

/// Color of the `index`-th of `count` traces.
///
/// The last trace of a multi-trace chart is the observed series in overlays;
/// it renders white so it stands out against the colored predictions.
pub fn trace_color(index: usize, count: usize) -> (u8, u8, u8) {
    if count > 1 && index + 1 == count {
        (255, 255, 255)
    } else {
        PALETTE[index % PALETTE.len()]
    }
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the spec and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct DashPlottersChart<'a> {
    pub spec: &'a ChartSpec,
    /// X bounds (days on the date axis, see `chart::date_to_x`).
    pub x_bounds: [f64; 2],
    /// Y bounds (value units of the plotted columns).
    pub y_bounds: [f64; 2],
}

impl Widget for DashPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
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

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.spec.x_label.as_str())
                .y_desc(self.spec.y_label.as_str())
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_axis_date(*v))
                .y_label_formatter(&|v| fmt_axis_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // One line series per gap-free segment, so `NaN` cells break the
            // line instead of bridging it. Single-point segments still get a
            // visible dot.
            let count = self.spec.traces.len();
            for (index, trace) in self.spec.traces.iter().enumerate() {
                let (r, g, b) = trace_color(index, count);
                let color = RGBColor(r, g, b);
                for segment in trace.segments() {
                    if segment.len() == 1 {
                        chart.draw_series(
                            segment
                                .iter()
                                .map(|&(d, v)| Pixel::new((date_to_x(d), v), color)),
                        )?;
                    } else {
                        chart.draw_series(LineSeries::new(
                            segment.iter().map(|&(d, v)| (date_to_x(d), v)),
                            &color,
                        ))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Tick label for the date axis: year-month is plenty at terminal resolution.
fn fmt_axis_date(v: f64) -> String {
    match x_to_date(v) {
        Some(date) => date.format("%Y-%m").to_string(),
        None => String::new(),
    }
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() < 1.0 {
        format!("{v:.3}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{GRID_CHART_HEIGHT, Trace, X_AXIS_LABEL, Y_AXIS_LABEL};
    use chrono::NaiveDate;

    fn spec() -> ChartSpec {
        ChartSpec {
            title: "RYAAY price".to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            height: GRID_CHART_HEIGHT,
            traces: vec![Trace {
                name: "RYAAY price".to_string(),
                points: vec![
                    (NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(), 100.0),
                    (NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(), 101.5),
                ],
            }],
        }
    }

    #[test]
    fn last_of_many_traces_is_white() {
        assert_eq!(trace_color(5, 6), (255, 255, 255));
        assert_ne!(trace_color(5, 7), (255, 255, 255));
        // Single-trace charts keep the palette color.
        assert_eq!(trace_color(0, 1), PALETTE[0]);
    }

    #[test]
    fn date_ticks_render_year_month() {
        let d = NaiveDate::from_ymd_opt(2021, 6, 30).unwrap();
        assert_eq!(fmt_axis_date(date_to_x(d)), "2021-06");
        assert_eq!(fmt_axis_date(f64::NAN), "");
    }

    #[test]
    fn value_ticks_use_more_precision_below_one() {
        assert_eq!(fmt_axis_value(0.0123), "0.012");
        assert_eq!(fmt_axis_value(101.55), "101.6");
    }

    #[test]
    fn tiny_areas_show_a_resize_hint() {
        let spec = spec();
        let widget = DashPlottersChart {
            spec: &spec,
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
        };
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "C");
    }

    #[test]
    fn renders_into_a_buffer_without_panicking() {
        let spec = spec();
        let (first, last) = spec.x_range().unwrap();
        let widget = DashPlottersChart {
            spec: &spec,
            x_bounds: [date_to_x(first), date_to_x(last)],
            y_bounds: [99.0, 102.0],
        };
        let area = Rect::new(0, 0, 48, 14);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
