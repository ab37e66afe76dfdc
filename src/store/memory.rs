//! In-memory store. Nothing survives a restart.

use crate::ledger::model::{Egg, EggRow};

use super::{delete_row, update_row, EggStore, StoreError};

/// Row list held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<EggRow>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with rows.
    pub fn with_rows(rows: Vec<EggRow>) -> Self {
        Self { rows }
    }
}

impl EggStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn rows(&self) -> Result<Vec<EggRow>, StoreError> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, rows: Vec<EggRow>) -> Result<usize, StoreError> {
        let first = self.rows.len();
        self.rows.extend(rows);
        Ok(first)
    }

    fn update(&mut self, row_index: usize, egg: Egg) -> Result<(), StoreError> {
        update_row(&mut self.rows, row_index, egg)
    }

    fn delete(&mut self, row_index: usize) -> Result<EggRow, StoreError> {
        delete_row(&mut self.rows, row_index)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.len())
    }
}
