//! Export composed charts to JSON.
//!
//! Chart JSON is the "portable" representation of the current view: exactly
//! the specs the renderers draw, plus the selection coordinates they were
//! composed under. Gap rows are compacted out so the file is plain JSON.
//!
//! The schema is defined by `chart::ChartSetFile`.

use std::fs::File;
use std::path::Path;

use crate::chart::{ChartSetFile, ChartSpec};
use crate::domain::{Frequency, PredictionType, ViewMode};
use crate::error::AppError;

/// Write a chart JSON file.
pub fn write_charts_json(
    path: &Path,
    frequency: Frequency,
    view: ViewMode,
    prediction: Option<PredictionType>,
    charts: &[ChartSpec],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create chart JSON '{}': {e}",
            path.display()
        ))
    })?;

    let set = ChartSetFile {
        tool: "rdash".to_string(),
        frequency,
        view,
        prediction,
        charts: charts.iter().map(ChartSpec::compact).collect(),
    };

    serde_json::to_writer_pretty(file, &set)
        .map_err(|e| AppError::input(format!("Failed to write chart JSON: {e}")))?;

    Ok(())
}

/// Read a chart JSON file.
pub fn read_charts_json(path: &Path) -> Result<ChartSetFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open chart JSON '{}': {e}",
            path.display()
        ))
    })?;
    let set: ChartSetFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid chart JSON: {e}")))?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{GRID_CHART_HEIGHT, Trace, X_AXIS_LABEL, Y_AXIS_LABEL};
    use chrono::NaiveDate;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("rdash_export_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn gapped_chart() -> ChartSpec {
        ChartSpec {
            title: "RYAAY price".to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            height: GRID_CHART_HEIGHT,
            traces: vec![Trace {
                name: "RYAAY price".to_string(),
                points: vec![
                    (NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(), 100.0),
                    (NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(), f64::NAN),
                    (NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(), 99.8),
                ],
            }],
        }
    }

    #[test]
    fn write_and_read_roundtrip_compacts_gaps() {
        let dir = temp_dir();
        let path = dir.join("charts.json");

        write_charts_json(
            &path,
            Frequency::Monthly,
            ViewMode::TimeSeries,
            None,
            &[gapped_chart()],
        )
        .unwrap();

        let set = read_charts_json(&path).unwrap();
        assert_eq!(set.tool, "rdash");
        assert_eq!(set.frequency, Frequency::Monthly);
        assert_eq!(set.view, ViewMode::TimeSeries);
        assert!(set.prediction.is_none());
        assert_eq!(set.charts.len(), 1);
        assert_eq!(set.charts[0].traces[0].points.len(), 2);
        assert_eq!(set.charts[0].traces[0].points[1].1, 99.8);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn regression_exports_carry_the_prediction_type() {
        let dir = temp_dir();
        let path = dir.join("charts.json");

        write_charts_json(
            &path,
            Frequency::Weekly,
            ViewMode::RegressionResults,
            Some(PredictionType::LogReturns),
            &[gapped_chart()],
        )
        .unwrap();

        let set = read_charts_json(&path).unwrap();
        assert_eq!(set.frequency, Frequency::Weekly);
        assert_eq!(set.prediction, Some(PredictionType::LogReturns));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_chart_json_is_an_input_error() {
        let dir = temp_dir();
        let path = dir.join("charts.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_charts_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let _ = fs::remove_dir_all(&dir);
    }
}
