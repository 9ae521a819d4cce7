//! CSV ingest and normalization.
//!
//! This module turns a time-series CSV into a clean [`DataTable`] that is safe
//! to plot.
//!
//! Design goals:
//! - **Strict schema** for the `date` axis (clear errors + exit code 2)
//! - **Dense columns**: empty cells become `NaN`, never dropped rows
//! - **Classification at load**: every column gets its role up front
//! - **Registry validation at load**: unlabeled selectable columns abort the
//!   load (exit code 3) instead of surfacing mid-interaction
//! - **Separation of concerns**: no chart logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::data::{Column, DataTable};
use crate::domain::classify;
use crate::error::AppError;
use crate::registry;

/// Header name of the shared x-axis column.
pub const DATE_COLUMN: &str = "date";

/// Open and parse a dataset file.
pub fn load_table(path: &Path) -> Result<DataTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open dataset '{}': {e}", path.display()))
    })?;
    read_table(file, &path.display().to_string())
}

/// Parse a dataset from any reader. `source` names it in error messages.
pub fn read_table(input: impl Read, source: &str) -> Result<DataTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers of '{source}': {e}")))?
        .clone();

    let names: Vec<String> = headers.iter().map(normalize_header_name).collect();

    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(AppError::input(format!(
                "Duplicate column `{name}` in '{source}'."
            )));
        }
    }

    let date_idx = names.iter().position(|n| n == DATE_COLUMN).ok_or_else(|| {
        AppError::input(format!(
            "Missing required column `{DATE_COLUMN}` in '{source}'."
        ))
    })?;

    // Cell index -> column slot, with the date axis skipped.
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(names.len());
    let mut columns: Vec<Column> = Vec::new();
    for (i, name) in names.iter().enumerate() {
        if i == date_idx {
            slots.push(None);
        } else {
            slots.push(Some(columns.len()));
            columns.push(Column {
                id: name.clone(),
                class: classify(name),
                values: Vec::new(),
            });
        }
    }

    let mut dates: Vec<NaiveDate> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result
            .map_err(|e| AppError::input(format!("{source}: line {line}: CSV parse error: {e}")))?;

        let raw_date = record
            .get(date_idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::input(format!(
                    "{source}: line {line}: Missing `{DATE_COLUMN}` value."
                ))
            })?;
        let date = parse_date(raw_date)
            .map_err(|msg| AppError::input(format!("{source}: line {line}: {msg}")))?;

        if let Some(prev) = dates.last() {
            if date <= *prev {
                return Err(AppError::input(format!(
                    "{source}: line {line}: Dates must be strictly increasing ({date} follows {prev})."
                )));
            }
        }
        dates.push(date);

        for (i, slot) in slots.iter().enumerate() {
            let Some(k) = slot else { continue };
            let cell = record.get(i).map(str::trim).unwrap_or("");
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                parse_value(cell).map_err(|msg| {
                    AppError::input(format!(
                        "{source}: line {line}: column `{}`: {msg}",
                        columns[*k].id
                    ))
                })?
            };
            columns[*k].values.push(value);
        }
    }

    if dates.is_empty() {
        return Err(AppError::input(format!(
            "Dataset '{source}' has no data rows."
        )));
    }

    let table = DataTable { dates, columns };
    ensure_labels_registered(&table, source)?;
    Ok(table)
}

/// Every column the UI would ever label must have a registry entry.
fn ensure_labels_registered(table: &DataTable, source: &str) -> Result<(), AppError> {
    let mut unmapped: Vec<&str> = Vec::new();
    for column in &table.columns {
        let labeled = if column.class.is_prediction() {
            registry::model_label(&column.id).is_ok()
        } else if column.class.is_selectable_variable() {
            registry::variable_label(&column.id).is_ok()
        } else {
            true
        };
        if !labeled {
            unmapped.push(&column.id);
        }
    }
    if unmapped.is_empty() {
        return Ok(());
    }
    Err(AppError::drift(format!(
        "Dataset '{source}' has columns with no display label: {}.",
        unmapped.join(", ")
    )))
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but spreadsheet exports often use
    // `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common formats to
    // reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_value(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid numeric value '{s}'."))?;
    // Literal NaN/inf tokens behave like empty cells.
    if v.is_finite() { Ok(v) } else { Ok(f64::NAN) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnClass;
    use std::io::Cursor;

    fn read(body: &str) -> Result<DataTable, AppError> {
        read_table(Cursor::new(body.to_string()), "test.csv")
    }

    #[test]
    fn loads_columns_in_file_order_with_classes() {
        let table = read(
            "date,ryaay,dln_ryaay,quarter,war,rating_sent_only_logpred\n\
             2021-01-31,100.0,,1,0,\n\
             2021-02-28,101.5,0.0149,1,0,0.01\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let ids: Vec<&str> = table.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ryaay", "dln_ryaay", "quarter", "war", "rating_sent_only_logpred"]
        );
        assert_eq!(table.column("quarter").unwrap().class, ColumnClass::Calendar);
        assert_eq!(table.column("war").unwrap().class, ColumnClass::Indicator);
        assert_eq!(
            table.column("rating_sent_only_logpred").unwrap().class,
            ColumnClass::LogPrediction
        );
    }

    #[test]
    fn empty_cells_become_nan() {
        let table = read(
            "date,ryaay\n\
             2021-01-31,\n\
             2021-02-28,101.5\n",
        )
        .unwrap();
        let values = &table.column("ryaay").unwrap().values;
        assert!(values[0].is_nan());
        assert_eq!(values[1], 101.5);
    }

    #[test]
    fn short_records_pad_with_nan() {
        let table = read(
            "date,ryaay,avg_rating\n\
             2021-01-31,100.0\n\
             2021-02-28,101.5,4.3\n",
        )
        .unwrap();
        assert!(table.column("avg_rating").unwrap().values[0].is_nan());
        assert_eq!(table.column("avg_rating").unwrap().values[1], 4.3);
    }

    #[test]
    fn headers_are_normalized() {
        let table = read(
            "\u{feff}Date,RYAAY\n\
             2021-01-31,100.0\n",
        )
        .unwrap();
        assert!(table.has_column("ryaay"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn accepts_common_date_formats() {
        let table = read(
            "date,ryaay\n\
             2021-01-31,100.0\n\
             28/02/2021,101.5\n\
             31-03-2021,99.8\n\
             2021/04/30,102.2\n",
        )
        .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.date_range().unwrap().1,
            NaiveDate::from_ymd_opt(2021, 4, 30).unwrap()
        );
    }

    #[test]
    fn missing_date_column_is_an_input_error() {
        let err = read("ryaay,avg_rating\n100.0,4.2\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`date`"));
    }

    #[test]
    fn unordered_dates_are_rejected_with_the_line() {
        let err = read(
            "date,ryaay\n\
             2021-02-28,101.5\n\
             2021-01-31,100.0\n",
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let err = read(
            "date,ryaay\n\
             2021-01-31,100.0\n\
             2021-01-31,100.5\n",
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn malformed_numbers_name_line_and_column() {
        let err = read(
            "date,ryaay,avg_rating\n\
             2021-01-31,100.0,4.2\n\
             2021-02-28,oops,4.3\n",
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("`ryaay`"));
        assert!(msg.contains("'oops'"));
    }

    #[test]
    fn headers_without_rows_are_an_input_error() {
        let err = read("date,ryaay\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = read("date,ryaay,ryaay\n2021-01-31,1.0,2.0\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`ryaay`"));
    }

    #[test]
    fn unlabeled_selectable_columns_abort_the_load() {
        let err = read(
            "date,ryaay,mystery\n\
             2021-01-31,100.0,1.0\n",
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn unlabeled_calendar_and_indicator_columns_are_fine() {
        let table = read(
            "date,ryaay,quarter,year,week,month,war,lockdown\n\
             2021-01-31,100.0,1,2021,4,1,0,1\n",
        )
        .unwrap();
        assert_eq!(table.columns.len(), 7);
    }

    #[test]
    fn literal_nan_tokens_become_gaps() {
        let table = read(
            "date,ryaay\n\
             2021-01-31,NaN\n\
             2021-02-28,101.5\n",
        )
        .unwrap();
        assert!(table.column("ryaay").unwrap().values[0].is_nan());
    }
}
