//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Traces are drawn with one glyph each, cycling through [`GLYPHS`]. Cells
//! are first-wins, so traces are drawn in reverse order and the last trace
//! of a spec (the ground truth in overlays) ends up on top.

use crate::chart::{ChartSpec, Trace, date_to_x};

const GLYPHS: [char; 8] = ['-', '*', '+', 'x', '=', '~', 'o', '#'];

/// Glyph of the `index`-th trace of a chart.
pub fn trace_glyph(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()]
}

/// Render one chart as a fixed-size character grid.
pub fn render_chart_ascii(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((first, last)) = spec.x_range() else {
        return format!("{}: (no data)\n", spec.title);
    };
    let (mut x_min, mut x_max) = (date_to_x(first), date_to_x(last));
    if x_max <= x_min {
        // Single-date specs still need a nonzero span to map into columns.
        x_max = x_min + 1.0;
        x_min -= 1.0;
    }

    let (y_min, y_max) = spec.y_range().unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (index, trace) in spec.traces.iter().enumerate().rev() {
        draw_trace(
            &mut grid,
            trace,
            trace_glyph(index),
            x_min,
            x_max,
            y_min,
            y_max,
        );
    }

    // Final string: a small header with ranges, the grid, then a legend when
    // one glyph per trace needs naming.
    let mut out = String::new();
    out.push_str(&format!(
        "{}: x=[{first}, {last}] | y=[{y_min:.2}, {y_max:.2}]\n",
        spec.title
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if spec.show_legend() {
        for (index, trace) in spec.traces.iter().enumerate() {
            out.push_str(&format!("  {} {}\n", trace_glyph(index), trace.name));
        }
    }

    out
}

fn draw_trace(
    grid: &mut [Vec<char>],
    trace: &Trace,
    glyph: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    for segment in trace.segments() {
        let mut prev = None;
        for &(date, value) in segment {
            let x = map_x(date_to_x(date), x_min, x_max, width);
            let y = map_y(value, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(grid, x0, y0, x, y, glyph);
            } else if grid[y][x] == ' ' {
                grid[y][x] = glyph;
            }
            prev = Some((x, y));
        }
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
