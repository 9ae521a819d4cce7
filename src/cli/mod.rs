//! Command-line parsing for the RYAAY dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/chart code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Frequency, PredictionType, ViewMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rdash",
    version,
    about = "RYAAY price & TripAdvisor signal dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI.
    ///
    /// This uses the same dataset/selection pipeline as the one-shot
    /// subcommands, but renders charts in a terminal UI using Ratatui.
    Tui(SelectArgs),
    /// List the columns of a dataset (ids, classes, labels).
    Columns(SelectArgs),
    /// Render the selected view as ASCII charts.
    Plot(PlotArgs),
    /// Export the selected view as chart JSON.
    Export(ExportArgs),
}

/// Selection options shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct SelectArgs {
    /// Dataset frequency.
    #[arg(short = 'f', long, value_enum, default_value_t = Frequency::Monthly)]
    pub freq: Frequency,

    /// View to compose.
    #[arg(long, value_enum, default_value_t = ViewMode::TimeSeries)]
    pub view: ViewMode,

    /// Prediction space for the regression view.
    #[arg(long, value_enum, default_value_t = PredictionType::LevelPrice)]
    pub pred: PredictionType,

    /// Variables to plot, as comma-separated column ids (default: ryaay,dln_ryaay).
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    pub vars: Option<Vec<String>>,

    /// Models to overlay, as comma-separated column ids (default: the pair's default model).
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    pub models: Option<Vec<String>>,

    /// Directory holding ts_monthly.csv / ts_weekly.csv (default: $RDASH_DATA_DIR or ./data).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Options for ASCII plotting.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for chart JSON export.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output path of the chart JSON.
    #[arg(short = 'o', long, value_name = "JSON", default_value = "charts.json")]
    pub out: PathBuf,
}
