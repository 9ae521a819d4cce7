//! Shared view pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> dataset load (cached) -> selection -> chart composition
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::sync::Arc;

use crate::chart::{
    ChartGrid, ChartSpec, EMPTY_MODELS_PROMPT, EMPTY_VARIABLES_PROMPT, compose_grid,
    compose_overlay,
};
use crate::cli::SelectArgs;
use crate::data::{DataTable, DatasetCache};
use crate::domain::{DashConfig, Frequency, ViewMode};
use crate::error::AppError;
use crate::select::{self, SelectionState};

/// Config plus the dataset cache every front-end loads through.
#[derive(Debug)]
pub struct Session {
    pub config: DashConfig,
    pub cache: DatasetCache,
}

impl Session {
    pub fn new(config: DashConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
        }
    }

    /// The dataset for a frequency, loaded at most once per process.
    pub fn load(&mut self, frequency: Frequency) -> Result<Arc<DataTable>, AppError> {
        let path = self.config.dataset_path(frequency);
        self.cache.load(&path)
    }
}

/// What the active view composes to.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutput {
    Grid(ChartGrid),
    Overlay(ChartSpec),
    /// Nothing checked; front-ends show this prompt instead of charts.
    Empty { prompt: &'static str },
}

impl ViewOutput {
    pub fn charts(&self) -> Vec<&ChartSpec> {
        match self {
            ViewOutput::Grid(grid) => grid.charts.iter().collect(),
            ViewOutput::Overlay(spec) => vec![spec],
            ViewOutput::Empty { .. } => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewOutput::Empty { .. })
    }
}

/// Compose the active view of a selection against its loaded table.
pub fn compose_view(table: &DataTable, state: &SelectionState) -> Result<ViewOutput, AppError> {
    match state.view {
        ViewMode::TimeSeries => match compose_grid(table, &state.variables)? {
            Some(grid) => Ok(ViewOutput::Grid(grid)),
            None => Ok(ViewOutput::Empty {
                prompt: EMPTY_VARIABLES_PROMPT,
            }),
        },
        ViewMode::RegressionResults => {
            match compose_overlay(table, state.prediction, &state.models)? {
                Some(spec) => Ok(ViewOutput::Overlay(spec)),
                None => Ok(ViewOutput::Empty {
                    prompt: EMPTY_MODELS_PROMPT,
                }),
            }
        }
    }
}

/// Build the selection for a one-shot command: explicit ids are validated
/// against the table, absent ones fall back to the defaults.
pub fn selection_from_args(
    table: &DataTable,
    args: &SelectArgs,
) -> Result<SelectionState, AppError> {
    let mut state = SelectionState::with_defaults(table, args.freq, args.view, args.pred);
    if let Some(ids) = &args.vars {
        state.variables = select::resolve_variables(table, ids)?;
    }
    if let Some(ids) = &args.models {
        state.models = select::resolve_models(table, args.pred, ids)?;
    }
    Ok(state)
}
