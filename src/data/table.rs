//! In-memory dataset model.
//!
//! A [`DataTable`] is one loaded CSV: a shared, strictly increasing date axis
//! plus every non-date column as a dense `f64` series. Missing cells are
//! `NaN`, so all columns stay aligned to the same axis and renderers can
//! break lines at the gaps.

use chrono::NaiveDate;

use crate::domain::{ColumnClass, PredictionType};

/// One named series of a dataset, aligned to the table's date axis.
#[derive(Debug, Clone)]
pub struct Column {
    /// Raw header name from the CSV, e.g. `dln_ryaay`.
    pub id: String,
    /// Role assigned at load time from the identifier alone.
    pub class: ColumnClass,
    /// One value per date; `NaN` where the cell was empty.
    pub values: Vec<f64>,
}

impl Column {
    /// True if any cell holds a real number.
    pub fn has_data(&self) -> bool {
        self.values.iter().any(|v| v.is_finite())
    }
}

/// A fully loaded dataset for one frequency.
///
/// Column order is file order, which the UI preserves everywhere lists of
/// variables or models are shown.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Strictly increasing observation dates.
    pub dates: Vec<NaiveDate>,
    /// Every column except `date`, in file order.
    pub columns: Vec<Column>,
}

impl DataTable {
    /// Number of observations (rows).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Look up a column by its raw identifier.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    /// First and last observation dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    /// Columns a user may plot as time series, in file order.
    ///
    /// Calendar and indicator columns and model predictions are filtered out.
    pub fn selectable_variables(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.class.is_selectable_variable())
            .collect()
    }

    /// Model-prediction columns matching the given prediction type, in file
    /// order.
    pub fn prediction_columns(&self, prediction: PredictionType) -> Vec<&Column> {
        let class = prediction.prediction_class();
        self.columns.iter().filter(|c| c.class == class).collect()
    }

    /// The series of a column as `(date, value)` pairs, `NaN` gaps included.
    pub fn series(&self, column: &Column) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .copied()
            .zip(column.values.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify;

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
                NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(),
            ],
            columns: vec![
                col("ryaay", vec![100.0, 101.5, 99.8]),
                col("dln_ryaay", vec![f64::NAN, 0.0149, -0.0169]),
                col("quarter", vec![1.0, 1.0, 1.0]),
                col("war", vec![0.0, 0.0, 0.0]),
                col("rating_sent_only_logpred", vec![f64::NAN, 0.01, -0.02]),
                col("rating_sent_only_levelpred", vec![f64::NAN, 101.0, 99.0]),
            ],
        }
    }

    #[test]
    fn column_lookup_by_id() {
        let table = fixture();
        assert!(table.has_column("ryaay"));
        assert!(!table.has_column("missing"));
        assert_eq!(table.column("dln_ryaay").unwrap().values.len(), 3);
    }

    #[test]
    fn date_range_spans_first_to_last() {
        let table = fixture();
        let (first, last) = table.date_range().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2021, 1, 31).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2021, 3, 31).unwrap());

        let empty = DataTable {
            dates: vec![],
            columns: vec![],
        };
        assert!(empty.date_range().is_none());
    }

    #[test]
    fn selectable_variables_exclude_calendar_indicator_and_predictions() {
        let table = fixture();
        let ids: Vec<&str> = table
            .selectable_variables()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ryaay", "dln_ryaay"]);
    }

    #[test]
    fn prediction_columns_filter_by_type() {
        let table = fixture();
        let logs: Vec<&str> = table
            .prediction_columns(PredictionType::LogReturns)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(logs, vec!["rating_sent_only_logpred"]);

        let levels: Vec<&str> = table
            .prediction_columns(PredictionType::LevelPrice)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(levels, vec!["rating_sent_only_levelpred"]);
    }

    #[test]
    fn series_pairs_dates_with_values() {
        let table = fixture();
        let column = table.column("ryaay").unwrap();
        let series = table.series(column);
        assert_eq!(series.len(), 3);
        assert_eq!(
            series[1],
            (NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(), 101.5)
        );
    }

    #[test]
    fn has_data_sees_through_nan() {
        let all_nan = col("d_guests", vec![f64::NAN, f64::NAN]);
        assert!(!all_nan.has_data());
        let mixed = col("d_guests", vec![f64::NAN, 0.3]);
        assert!(mixed.has_data());
    }
}
