//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the user-facing selector enums (`Frequency`, `ViewMode`, `PredictionType`)
//! - the load-time column taxonomy (`ColumnClass`, `classify`)
//! - process configuration (`DashConfig`)

pub mod types;

pub use types::*;
