//! Static display registries.
//!
//! Two read-only identifier → label tables humanize raw column names in the
//! UI: one for observed/derived variables, one for model-prediction columns.
//! Both are fixed at build time.
//!
//! Lookups fail loudly. A selectable column without a registry entry means
//! the dataset and this file have drifted apart; silently falling back to the
//! raw identifier would hide that, so the miss is surfaced as an error naming
//! the identifier (exit code 3).

use crate::domain::ColumnClass;
use crate::error::AppError;

/// Observed and derived variables.
pub const VARIABLE_LABELS: &[(&str, &str)] = &[
    ("ryaay", "RYAAY price"),
    ("dln_ryaay", "Log return RYAAY"),
    ("avg_rating", "Avg. TP rating"),
    ("avg_sentiment", "Avg. TP sentiment"),
    ("guests", "No. of guests (mn)"),
    ("load_factor", "Load factor (ratio)"),
    ("d_avg_rating", "FD of avg. TP rating"),
    ("d_avg_sentiment", "FD of avg. TP sentiment"),
    ("d_guests", "FD of no. of guests (mn)"),
    ("d_load_factor", "FD of load factor (ratio)"),
    ("sd_guests", "Seasonal diff. of guests (mn)"),
];

/// Model-prediction columns, duplicated per frequency (`weekly_` prefix).
///
/// The trailing space on the log-return labels is deliberate: it keeps the
/// log and level variants of one specification distinct as display strings.
pub const MODEL_LABELS: &[(&str, &str)] = &[
    ("rating_sent_only_logpred", "Rating & sentiment only "),
    ("time_dummies_logpred", "~ with time dummies "),
    ("guests_qinteraction_logpred", "~ with guests x quarter "),
    ("sd_guests_model_logpred", "~ with SD of guests "),
    ("guests_loadf_qinteraction_logpred", "~ with guests & load fact. x quarter "),
    ("sd_guests_loadf_qinteraction_logpred", "~ with SD of guests and load fact. x quarter "),
    ("rating_sent_only_levelpred", "Rating & sentiment only"),
    ("time_dummies_levelpred", "~ with time dummies"),
    ("guests_qinteraction_levelpred", "~ with guests x quarter"),
    ("sd_guests_model_levelpred", "~ with SD of guests"),
    ("guests_loadf_qinteraction_levelpred", "~ with guests & load fact. x quarter"),
    ("sd_guests_loadf_qinteraction_levelpred", "~ with SD of guests and load fact. x quarter"),
    ("weekly_rating_sent_only_logpred", "Rating & sentiment only "),
    ("weekly_time_dummies_logpred", "~ with time dummies "),
    ("weekly_rating_sent_only_levelpred", "Rating & sentiment only"),
    ("weekly_time_dummies_levelpred", "~ with time dummies"),
];

fn lookup(table: &'static [(&str, &str)], id: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, label)| *label)
}

/// Display label of an observed/derived variable.
pub fn variable_label(id: &str) -> Result<&'static str, AppError> {
    lookup(VARIABLE_LABELS, id).ok_or_else(|| {
        AppError::drift(format!(
            "No display label registered for variable column `{id}` (dataset/registry drift)."
        ))
    })
}

/// Display label of a model-prediction column.
pub fn model_label(id: &str) -> Result<&'static str, AppError> {
    lookup(MODEL_LABELS, id).ok_or_else(|| {
        AppError::drift(format!(
            "No display label registered for model column `{id}` (dataset/registry drift)."
        ))
    })
}

/// Display label of any selectable column, dispatched by its class.
pub fn display_label(class: ColumnClass, id: &str) -> Result<&'static str, AppError> {
    if class.is_prediction() {
        model_label(id)
    } else {
        variable_label(id)
    }
}
