//! Renderable chart descriptions.
//!
//! A [`ChartSpec`] is the backend-neutral output of composition: titles, axis
//! labels, a display-height hint, and named traces over the shared date axis.
//! Renderers (terminal widget, ASCII plot, JSON export) all consume this one
//! shape.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, PredictionType, ViewMode};

/// Charts per row in the time-series grid.
pub const GRID_COLUMNS: usize = 2;

/// Display-height hint for one grid cell.
pub const GRID_CHART_HEIGHT: u32 = 300;

/// Display-height hint for the regression overlay.
pub const OVERLAY_CHART_HEIGHT: u32 = 600;

pub const X_AXIS_LABEL: &str = "Date";
pub const Y_AXIS_LABEL: &str = "Value";

/// One named line over the date axis. `NaN` values are gaps; renderers break
/// the line there instead of bridging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Trace {
    /// Contiguous runs of finite points, split at the gaps.
    pub fn segments(&self) -> Vec<&[(NaiveDate, f64)]> {
        let mut runs = Vec::new();
        let mut start = None;
        for (i, (_, value)) in self.points.iter().enumerate() {
            if value.is_finite() {
                if start.is_none() {
                    start = Some(i);
                }
            } else if let Some(s) = start.take() {
                runs.push(&self.points[s..i]);
            }
        }
        if let Some(s) = start {
            runs.push(&self.points[s..]);
        }
        runs
    }

    /// Copy with the gap rows removed. JSON cannot carry `NaN`, so exports
    /// serialize the compacted form.
    pub fn compact(&self) -> Trace {
        Trace {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .copied()
                .filter(|(_, v)| v.is_finite())
                .collect(),
        }
    }
}

/// One renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Display-height hint in pixels for raster backends; terminal renderers
    /// use it only as a relative weight.
    pub height: u32,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    /// Date span over all traces.
    pub fn x_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut min: Option<NaiveDate> = None;
        let mut max: Option<NaiveDate> = None;
        for trace in &self.traces {
            for (date, _) in &trace.points {
                min = Some(min.map_or(*date, |m| m.min(*date)));
                max = Some(max.map_or(*date, |m| m.max(*date)));
            }
        }
        Some((min?, max?))
    }

    /// Value span over all finite points of all traces.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for trace in &self.traces {
            for (_, value) in &trace.points {
                if value.is_finite() {
                    min = min.min(*value);
                    max = max.max(*value);
                }
            }
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }

    /// Single-trace charts carry their name in the title already.
    pub fn show_legend(&self) -> bool {
        self.traces.len() > 1
    }

    pub fn compact(&self) -> ChartSpec {
        ChartSpec {
            title: self.title.clone(),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            height: self.height,
            traces: self.traces.iter().map(Trace::compact).collect(),
        }
    }
}

/// The time-series view: one chart per selected variable, laid out
/// [`GRID_COLUMNS`] wide in selection order. A partial last row keeps its
/// charts at full row height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGrid {
    pub charts: Vec<ChartSpec>,
}

impl ChartGrid {
    pub fn row_count(&self) -> usize {
        self.charts.len().div_ceil(GRID_COLUMNS)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ChartSpec]> {
        self.charts.chunks(GRID_COLUMNS)
    }
}

/// On-disk schema of a chart export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSetFile {
    pub tool: String,
    pub frequency: Frequency,
    pub view: ViewMode,
    /// Present for the regression view only.
    pub prediction: Option<PredictionType>,
    pub charts: Vec<ChartSpec>,
}

/// Date position on a numeric x axis (days since the common era).
pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Inverse of [`date_to_x`], for tick labels.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}
