//! Selection state and transitions.
//!
//! Everything the UI lets the user choose lives here: frequency, view,
//! prediction type, and the checked variable/model lists. Transition rules
//! are centralized so the terminal UI and the one-shot CLI paths behave
//! identically:
//!
//! - switching frequency keeps the variables that exist in the new dataset
//!   and falls back to the defaults when none survive
//! - switching frequency or prediction type resets the model list to the
//!   default model for the new pair, because the offered model columns change
//! - variable and model lists keep toggle order, which is the order charts
//!   are drawn in

use crate::data::DataTable;
use crate::domain::{Frequency, PredictionType, ViewMode};
use crate::error::AppError;
use crate::registry;

/// Variables preselected on startup.
pub const DEFAULT_VARIABLES: &[&str] = &["ryaay", "dln_ryaay"];

/// The model preselected for a frequency/prediction pair.
pub fn default_model(frequency: Frequency, prediction: PredictionType) -> &'static str {
    match (frequency, prediction) {
        (Frequency::Monthly, PredictionType::LevelPrice) => "rating_sent_only_levelpred",
        (Frequency::Monthly, PredictionType::LogReturns) => "rating_sent_only_logpred",
        (Frequency::Weekly, PredictionType::LevelPrice) => "weekly_rating_sent_only_levelpred",
        (Frequency::Weekly, PredictionType::LogReturns) => "weekly_rating_sent_only_logpred",
    }
}

/// One offered checkbox row: raw column id plus its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: &'static str,
}

/// Plottable variables of a dataset, in file order.
pub fn variable_choices(table: &DataTable) -> Result<Vec<Choice>, AppError> {
    table
        .selectable_variables()
        .into_iter()
        .map(|c| {
            Ok(Choice {
                id: c.id.clone(),
                label: registry::variable_label(&c.id)?,
            })
        })
        .collect()
}

/// Model columns of a dataset matching the prediction type, in file order.
pub fn model_choices(
    table: &DataTable,
    prediction: PredictionType,
) -> Result<Vec<Choice>, AppError> {
    table
        .prediction_columns(prediction)
        .into_iter()
        .map(|c| {
            Ok(Choice {
                id: c.id.clone(),
                label: registry::model_label(&c.id)?,
            })
        })
        .collect()
}

/// The complete user selection driving both views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub frequency: Frequency,
    pub view: ViewMode,
    pub prediction: PredictionType,
    /// Checked variables, in toggle order.
    pub variables: Vec<String>,
    /// Checked models, in toggle order.
    pub models: Vec<String>,
}

impl SelectionState {
    /// Startup selection: monthly time series of the default variables, with
    /// the default model checked for when the user switches view.
    pub fn initial(table: &DataTable) -> Self {
        Self::with_defaults(
            table,
            Frequency::Monthly,
            ViewMode::TimeSeries,
            PredictionType::LevelPrice,
        )
    }

    /// Default variable and model lists for an arbitrary coordinate triple.
    pub fn with_defaults(
        table: &DataTable,
        frequency: Frequency,
        view: ViewMode,
        prediction: PredictionType,
    ) -> Self {
        Self {
            frequency,
            view,
            prediction,
            variables: default_variables_in(table),
            models: default_models_in(table, frequency, prediction),
        }
    }

    /// Switch dataset frequency. `table` is the newly loaded dataset.
    pub fn set_frequency(&mut self, frequency: Frequency, table: &DataTable) {
        self.frequency = frequency;
        self.variables.retain(|id| table.has_column(id));
        if self.variables.is_empty() {
            self.variables = default_variables_in(table);
        }
        self.models = default_models_in(table, frequency, self.prediction);
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Switch prediction space. The offered model columns change with it, so
    /// the model list resets; variables are untouched.
    pub fn set_prediction(&mut self, prediction: PredictionType, table: &DataTable) {
        self.prediction = prediction;
        self.models = default_models_in(table, self.frequency, prediction);
    }

    pub fn toggle_variable(&mut self, id: &str) {
        toggle(&mut self.variables, id);
    }

    pub fn toggle_model(&mut self, id: &str) {
        toggle(&mut self.models, id);
    }

    pub fn select_all_variables(&mut self, table: &DataTable) {
        self.variables = table
            .selectable_variables()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
    }

    pub fn select_all_models(&mut self, table: &DataTable) {
        self.models = table
            .prediction_columns(self.prediction)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    pub fn clear_models(&mut self) {
        self.models.clear();
    }
}

fn toggle(list: &mut Vec<String>, id: &str) {
    if let Some(pos) = list.iter().position(|x| x == id) {
        list.remove(pos);
    } else {
        list.push(id.to_string());
    }
}

fn default_variables_in(table: &DataTable) -> Vec<String> {
    DEFAULT_VARIABLES
        .iter()
        .filter(|id| table.has_column(id))
        .map(|id| id.to_string())
        .collect()
}

fn default_models_in(
    table: &DataTable,
    frequency: Frequency,
    prediction: PredictionType,
) -> Vec<String> {
    let id = default_model(frequency, prediction);
    if table.has_column(id) {
        vec![id.to_string()]
    } else {
        Vec::new()
    }
}

/// Validate user-supplied variable ids against a dataset. Order is kept,
/// duplicates collapse to their first mention.
pub fn resolve_variables(table: &DataTable, ids: &[String]) -> Result<Vec<String>, AppError> {
    let mut resolved: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let column = table
            .column(id)
            .ok_or_else(|| AppError::input(format!("Unknown variable column `{id}`.")))?;
        if !column.class.is_selectable_variable() {
            return Err(AppError::input(format!(
                "Column `{id}` is a {} column and cannot be plotted as a variable.",
                column.class.display_name()
            )));
        }
        if !resolved.contains(id) {
            resolved.push(id.clone());
        }
    }
    Ok(resolved)
}

/// Validate user-supplied model ids against a dataset and prediction type.
pub fn resolve_models(
    table: &DataTable,
    prediction: PredictionType,
    ids: &[String],
) -> Result<Vec<String>, AppError> {
    let mut resolved: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let column = table
            .column(id)
            .ok_or_else(|| AppError::input(format!("Unknown model column `{id}`.")))?;
        if column.class != prediction.prediction_class() {
            return Err(AppError::input(format!(
                "Column `{id}` is a {} column, not a {} prediction.",
                column.class.display_name(),
                prediction.display_name()
            )));
        }
        if !resolved.contains(id) {
            resolved.push(id.clone());
        }
    }
    Ok(resolved)
}
