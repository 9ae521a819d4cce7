//! Dataset cache.
//!
//! Loading and parsing a CSV is the expensive step of every interaction, so
//! loaded tables are memoized by path for the lifetime of the process.
//! Entries are never invalidated; a changed file on disk is only picked up by
//! a new process. Keys are the paths as given by the configuration, which
//! produces the same path for the same frequency every time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::DataTable;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<PathBuf, Arc<DataTable>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of datasets currently held.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Return the table for `path`, reading and parsing the file only on the
    /// first request. Failed loads are not cached, so a fixed file can be
    /// retried without restarting.
    pub fn load(&mut self, path: &Path) -> Result<Arc<DataTable>, AppError> {
        if let Some(table) = self.tables.get(path) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(crate::io::load_table(path)?);
        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}
