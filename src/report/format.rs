//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - loading/composition code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::data::DataTable;
use crate::domain::ViewMode;
use crate::error::AppError;
use crate::registry;
use crate::select::SelectionState;

/// Format the column inventory of a loaded dataset.
pub fn format_columns(table: &DataTable, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== rdash - dataset columns ===\n");
    out.push_str(&format!("Source: {source}\n"));
    match table.date_range() {
        Some((first, last)) => {
            out.push_str(&format!(
                "Rows: n={} | dates=[{first}, {last}]\n",
                table.len()
            ));
        }
        None => out.push_str("Rows: n=0\n"),
    }
    out.push('\n');

    out.push_str(
        format!(
            "{:<38} {:<22} {:>5} {}\n",
            "id", "class", "n", "label"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<38} {:-<22} {:-<5} {:-<24}\n", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for column in &table.columns {
        let finite = column.values.iter().filter(|v| v.is_finite()).count();
        let label = registry::display_label(column.class, &column.id).unwrap_or("");
        out.push_str(
            format!(
                "{:<38} {:<22} {:>5} {}\n",
                truncate(&column.id, 38),
                column.class.display_name(),
                finite,
                label.trim_end(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the active selection, one line per visible control.
pub fn format_selection(state: &SelectionState) -> Result<String, AppError> {
    let mut out = String::new();

    out.push_str(&format!("Frequency: {}\n", state.frequency.display_name()));
    out.push_str(&format!("View: {}\n", state.view.display_name()));

    match state.view {
        ViewMode::TimeSeries => {
            out.push_str(&format!(
                "Variables: {}\n",
                labeled_list(&state.variables, registry::variable_label)?
            ));
        }
        ViewMode::RegressionResults => {
            out.push_str(&format!(
                "Prediction: {}\n",
                state.prediction.display_name()
            ));
            out.push_str(&format!(
                "Models: {}\n",
                labeled_list(&state.models, registry::model_label)?
            ));
        }
    }

    Ok(out)
}

fn labeled_list(
    ids: &[String],
    label_of: impl Fn(&str) -> Result<&'static str, AppError>,
) -> Result<String, AppError> {
    if ids.is_empty() {
        return Ok("(none)".to_string());
    }
    let mut parts = Vec::with_capacity(ids.len());
    for id in ids {
        // Trailing spaces distinguish duplicate chart labels; a flat listing
        // does not need them.
        parts.push(label_of(id)?.trim_end());
    }
    Ok(parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::domain::{Frequency, PredictionType, classify};
    use chrono::NaiveDate;

    fn fixture() -> DataTable {
        DataTable {
            dates: vec![
                NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(),
            ],
            columns: vec![
                Column {
                    id: "ryaay".to_string(),
                    class: classify("ryaay"),
                    values: vec![100.0, 101.5],
                },
                Column {
                    id: "quarter".to_string(),
                    class: classify("quarter"),
                    values: vec![1.0, 1.0],
                },
                Column {
                    id: "rating_sent_only_logpred".to_string(),
                    class: classify("rating_sent_only_logpred"),
                    values: vec![f64::NAN, 0.01],
                },
            ],
        }
    }

    #[test]
    fn column_listing_names_source_classes_and_labels() {
        let out = format_columns(&fixture(), "data/ts_monthly.csv");
        assert!(out.contains("Source: data/ts_monthly.csv"));
        assert!(out.contains("Rows: n=2 | dates=[2021-01-31, 2021-02-28]"));
        assert!(out.contains("ryaay"));
        assert!(out.contains("raw variable"));
        assert!(out.contains("RYAAY price"));
        assert!(out.contains("calendar"));
        assert!(out.contains("log-return prediction"));
        assert!(out.contains("Rating & sentiment only"));
    }

    #[test]
    fn gap_cells_do_not_count_as_observations() {
        let out = format_columns(&fixture(), "t");
        let pred_line = out
            .lines()
            .find(|l| l.starts_with("rating_sent_only_logpred"))
            .unwrap();
        assert!(pred_line.contains(" 1 "));
    }

    #[test]
    fn time_series_summary_lists_variables() {
        let state = SelectionState {
            frequency: Frequency::Monthly,
            view: ViewMode::TimeSeries,
            prediction: PredictionType::LevelPrice,
            variables: vec!["ryaay".to_string(), "dln_ryaay".to_string()],
            models: vec![],
        };
        let out = format_selection(&state).unwrap();
        assert!(out.contains("Frequency: Monthly"));
        assert!(out.contains("View: Time series"));
        assert!(out.contains("Variables: RYAAY price, Log return RYAAY"));
        assert!(!out.contains("Models:"));
    }

    #[test]
    fn regression_summary_lists_prediction_and_models() {
        let state = SelectionState {
            frequency: Frequency::Weekly,
            view: ViewMode::RegressionResults,
            prediction: PredictionType::LogReturns,
            variables: vec!["ryaay".to_string()],
            models: vec!["weekly_rating_sent_only_logpred".to_string()],
        };
        let out = format_selection(&state).unwrap();
        assert!(out.contains("Prediction: Log returns"));
        assert!(out.contains("Models: Rating & sentiment only"));
        assert!(!out.contains("only ,"));
        assert!(!out.contains("Variables:"));
    }

    #[test]
    fn empty_selection_reads_none() {
        let state = SelectionState {
            frequency: Frequency::Monthly,
            view: ViewMode::TimeSeries,
            prediction: PredictionType::LevelPrice,
            variables: vec![],
            models: vec![],
        };
        let out = format_selection(&state).unwrap();
        assert!(out.contains("Variables: (none)"));
    }
}
