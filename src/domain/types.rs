//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - carried through selection state and chart composition
//! - exported to JSON alongside composed charts
//! - parsed straight off the CLI (`ValueEnum`)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Temporal granularity of the dataset.
///
/// Each frequency maps to one fixed CSV file under the data directory; the two
/// are mutually exclusive in the UI and cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Weekly,
}

impl Frequency {
    /// Human-readable label for titles and the settings panel.
    pub fn display_name(self) -> &'static str {
        match self {
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
        }
    }

    /// File name of the dataset for this frequency (under the data directory).
    pub fn file_name(self) -> &'static str {
        match self {
            Frequency::Monthly => "ts_monthly.csv",
            Frequency::Weekly => "ts_weekly.csv",
        }
    }

    pub fn toggled(self) -> Frequency {
        match self {
            Frequency::Monthly => Frequency::Weekly,
            Frequency::Weekly => Frequency::Monthly,
        }
    }
}

/// Which of the two dashboard views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// One chart per selected variable, arranged in a 2-column grid.
    TimeSeries,
    /// Selected model predictions overlaid with the observed target series.
    RegressionResults,
}

impl ViewMode {
    pub fn display_name(self) -> &'static str {
        match self {
            ViewMode::TimeSeries => "Time series",
            ViewMode::RegressionResults => "Regression results",
        }
    }

    pub fn toggled(self) -> ViewMode {
        match self {
            ViewMode::TimeSeries => ViewMode::RegressionResults,
            ViewMode::RegressionResults => ViewMode::TimeSeries,
        }
    }
}

/// Which space model predictions are displayed in (regression view only).
///
/// The prediction type also pins the ground-truth series that is always
/// overlaid with the selected models: log returns compare against
/// `dln_ryaay`, level prices against `ryaay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionType {
    LevelPrice,
    LogReturns,
}

impl PredictionType {
    pub fn display_name(self) -> &'static str {
        match self {
            PredictionType::LevelPrice => "Level price",
            PredictionType::LogReturns => "Log returns",
        }
    }

    /// Column identifier of the observed series predictions are compared to.
    pub fn target_column(self) -> &'static str {
        match self {
            PredictionType::LevelPrice => "ryaay",
            PredictionType::LogReturns => "dln_ryaay",
        }
    }

    /// Column class carrying this prediction type's model outputs.
    pub fn prediction_class(self) -> ColumnClass {
        match self {
            PredictionType::LevelPrice => ColumnClass::LevelPrediction,
            PredictionType::LogReturns => ColumnClass::LogPrediction,
        }
    }

    pub fn toggled(self) -> PredictionType {
        match self {
            PredictionType::LevelPrice => PredictionType::LogReturns,
            PredictionType::LogReturns => PredictionType::LevelPrice,
        }
    }
}

/// Calendar columns carried by the datasets (unselectable).
pub const CALENDAR_COLUMNS: &[&str] = &["quarter", "year", "week", "month"];

/// Binary event-flag columns carried by the datasets (unselectable).
pub const INDICATOR_COLUMNS: &[&str] = &["war", "lockdown"];

/// Naming markers distinguishing prediction columns from observed variables.
pub const LOG_PREDICTION_MARKER: &str = "logpred";
pub const LEVEL_PREDICTION_MARKER: &str = "levelpred";

/// Explicit classification of a dataset column.
///
/// Assigned exactly once, at load time, so the rest of the crate never
/// re-derives a column's role from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnClass {
    /// Directly observed variable (price, rating, sentiment, traffic).
    Raw,
    /// Differenced/engineered variable (`dln_`, `d_`, `sd_` prefixes).
    Derived,
    /// Calendar bookkeeping (quarter/year/week/month).
    Calendar,
    /// Binary event flag (war, lockdown).
    Indicator,
    /// Model prediction in log-return space.
    LogPrediction,
    /// Model prediction in price-level space.
    LevelPrediction,
}

impl ColumnClass {
    pub fn display_name(self) -> &'static str {
        match self {
            ColumnClass::Raw => "raw variable",
            ColumnClass::Derived => "derived variable",
            ColumnClass::Calendar => "calendar",
            ColumnClass::Indicator => "indicator",
            ColumnClass::LogPrediction => "log-return prediction",
            ColumnClass::LevelPrediction => "level-price prediction",
        }
    }

    /// Whether the Time-series view offers this column for plotting.
    pub fn is_selectable_variable(self) -> bool {
        matches!(self, ColumnClass::Raw | ColumnClass::Derived)
    }

    pub fn is_prediction(self) -> bool {
        matches!(self, ColumnClass::LogPrediction | ColumnClass::LevelPrediction)
    }
}

/// Classify a column identifier.
///
/// Order matters: prediction markers win over the `d_`/`sd_` prefixes
/// (e.g. `sd_guests_model_logpred` is a prediction, not a derived variable).
pub fn classify(id: &str) -> ColumnClass {
    if id.contains(LOG_PREDICTION_MARKER) {
        return ColumnClass::LogPrediction;
    }
    if id.contains(LEVEL_PREDICTION_MARKER) {
        return ColumnClass::LevelPrediction;
    }
    if CALENDAR_COLUMNS.contains(&id) {
        return ColumnClass::Calendar;
    }
    if INDICATOR_COLUMNS.contains(&id) {
        return ColumnClass::Indicator;
    }
    if id.starts_with("dln_") || id.starts_with("d_") || id.starts_with("sd_") {
        return ColumnClass::Derived;
    }
    ColumnClass::Raw
}

/// Process-wide configuration resolved at startup.
///
/// Precedence for the data directory: `--data-dir` flag, then the
/// `RDASH_DATA_DIR` environment variable (a `.env` file is honored), then
/// `data` relative to the working directory.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub data_dir: PathBuf,
}

impl DashConfig {
    pub fn from_env(flag: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        let data_dir = flag
            .or_else(|| std::env::var_os("RDASH_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("data"));
        Self { data_dir }
    }

    /// Path of the CSV backing the given frequency.
    pub fn dataset_path(&self, frequency: Frequency) -> PathBuf {
        self.data_dir.join(frequency.file_name())
    }
}
