//! Selection to chart specs.
//!
//! Composition reads columns from a loaded table and produces renderable
//! specs. Empty selections compose to `None`; callers decide how to show the
//! matching prompt.

use crate::chart::{
    ChartGrid, ChartSpec, GRID_CHART_HEIGHT, OVERLAY_CHART_HEIGHT, Trace, X_AXIS_LABEL,
    Y_AXIS_LABEL,
};
use crate::data::DataTable;
use crate::domain::PredictionType;
use crate::error::AppError;
use crate::registry;

/// Shown in place of the grid when no variable is selected.
pub const EMPTY_VARIABLES_PROMPT: &str = "Select at least one variable to plot.";

/// Shown in place of the overlay when no model is selected.
pub const EMPTY_MODELS_PROMPT: &str = "Select at least one model to plot.";

/// One single-trace chart per selected variable, in selection order.
pub fn compose_grid(
    table: &DataTable,
    variables: &[String],
) -> Result<Option<ChartGrid>, AppError> {
    if variables.is_empty() {
        return Ok(None);
    }

    let mut charts = Vec::with_capacity(variables.len());
    for id in variables {
        let column = table
            .column(id)
            .ok_or_else(|| AppError::input(format!("Unknown variable column `{id}`.")))?;
        let label = registry::display_label(column.class, id)?;
        charts.push(ChartSpec {
            title: label.to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            height: GRID_CHART_HEIGHT,
            traces: vec![Trace {
                name: label.to_string(),
                points: table.series(column),
            }],
        });
    }
    Ok(Some(ChartGrid { charts }))
}

/// Selected model predictions overlaid with the observed target series.
///
/// The ground truth is appended last so renderers draw it on top.
pub fn compose_overlay(
    table: &DataTable,
    prediction: PredictionType,
    models: &[String],
) -> Result<Option<ChartSpec>, AppError> {
    if models.is_empty() {
        return Ok(None);
    }

    let mut traces = Vec::with_capacity(models.len() + 1);
    for id in models {
        let column = table
            .column(id)
            .ok_or_else(|| AppError::input(format!("Unknown model column `{id}`.")))?;
        let label = registry::model_label(id)?;
        traces.push(Trace {
            name: label.to_string(),
            points: table.series(column),
        });
    }

    let target_id = prediction.target_column();
    let target = table.column(target_id).ok_or_else(|| {
        AppError::input(format!(
            "Dataset is missing the observed series `{target_id}` for {} predictions.",
            prediction.display_name()
        ))
    })?;
    let target_label = registry::variable_label(target_id)?;
    traces.push(Trace {
        name: target_label.to_string(),
        points: table.series(target),
    });

    Ok(Some(ChartSpec {
        title: format!("{} predictions", prediction.display_name()),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        height: OVERLAY_CHART_HEIGHT,
        traces,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::domain::classify;
    use chrono::NaiveDate;

    fn col(id: &str, values: Vec<f64>) -> Column {
        Column {
            id: id.to_string(),
            class: classify(id),
            values,
        }
    }

    fn fixture() -> DataTable {
        DataTable {
            dates: vec![
                NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(),
            ],
            columns: vec![
                col("ryaay", vec![100.0, 101.5]),
                col("dln_ryaay", vec![f64::NAN, 0.0149]),
                col("avg_rating", vec![4.2, 4.3]),
                col("rating_sent_only_logpred", vec![f64::NAN, 0.01]),
                col("time_dummies_logpred", vec![f64::NAN, 0.02]),
                col("rating_sent_only_levelpred", vec![f64::NAN, 101.0]),
            ],
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_variable_selection_composes_to_none() {
        let table = fixture();
        assert!(compose_grid(&table, &[]).unwrap().is_none());
    }

    #[test]
    fn grid_has_one_labeled_chart_per_variable_in_selection_order() {
        let table = fixture();
        let grid = compose_grid(&table, &ids(&["avg_rating", "ryaay"]))
            .unwrap()
            .unwrap();
        assert_eq!(grid.charts.len(), 2);
        assert_eq!(grid.charts[0].title, "Avg. TP rating");
        assert_eq!(grid.charts[1].title, "RYAAY price");
        assert_eq!(grid.charts[0].height, GRID_CHART_HEIGHT);
        assert_eq!(grid.charts[0].traces.len(), 1);
        assert_eq!(grid.charts[0].x_label, "Date");
        assert_eq!(grid.charts[0].y_label, "Value");
    }

    #[test]
    fn unknown_variable_is_an_input_error() {
        let table = fixture();
        let err = compose_grid(&table, &ids(&["guests"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`guests`"));
    }

    #[test]
    fn empty_model_selection_composes_to_none() {
        let table = fixture();
        assert!(
            compose_overlay(&table, PredictionType::LogReturns, &[])
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn overlay_appends_ground_truth_last() {
        let table = fixture();
        let spec = compose_overlay(
            &table,
            PredictionType::LogReturns,
            &ids(&["rating_sent_only_logpred", "time_dummies_logpred"]),
        )
        .unwrap()
        .unwrap();

        assert_eq!(spec.title, "Log returns predictions");
        assert_eq!(spec.height, OVERLAY_CHART_HEIGHT);
        let names: Vec<&str> = spec.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Rating & sentiment only ",
                "~ with time dummies ",
                "Log return RYAAY"
            ]
        );
    }

    #[test]
    fn level_overlay_targets_the_price_series() {
        let table = fixture();
        let spec = compose_overlay(
            &table,
            PredictionType::LevelPrice,
            &ids(&["rating_sent_only_levelpred"]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(spec.title, "Level price predictions");
        assert_eq!(spec.traces.last().unwrap().name, "RYAAY price");
        assert_eq!(spec.traces.last().unwrap().points[0].1, 100.0);
    }

    #[test]
    fn missing_target_column_is_reported() {
        let mut table = fixture();
        table.columns.retain(|c| c.id != "dln_ryaay");
        let err = compose_overlay(
            &table,
            PredictionType::LogReturns,
            &ids(&["rating_sent_only_logpred"]),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`dln_ryaay`"));
    }
}
