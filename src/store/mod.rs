//! Persistence
//!
//! The egg log is a flat list of rows, addressed by position the way a
//! spreadsheet addresses rows. Deleting a row shifts every later row up.
//! Backends implement [`EggStore`]; the service never sees which one it has.

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::ledger::model::{Egg, EggRow, EggValidationError};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not valid JSON for the ledger layout.
    #[error("corrupt ledger file: {0}")]
    Json(#[from] serde_json::Error),

    /// No row at the given index.
    #[error("row {row_index} not found ({len} rows)")]
    RowNotFound {
        /// Requested row.
        row_index: usize,
        /// Rows currently stored.
        len: usize,
    },

    /// A submitted egg failed validation.
    #[error("invalid egg: {0}")]
    InvalidEgg(#[from] EggValidationError),

    /// An add request carried no eggs.
    #[error("no eggs to add")]
    EmptyBatch,
}

/// Storage backend for egg rows.
pub trait EggStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &'static str;

    /// All rows, in row order.
    fn rows(&self) -> Result<Vec<EggRow>, StoreError>;

    /// Append rows and return the index of the first appended row.
    fn append(&mut self, rows: Vec<EggRow>) -> Result<usize, StoreError>;

    /// Replace the egg at `row_index`, keeping its date.
    fn update(&mut self, row_index: usize, egg: Egg) -> Result<(), StoreError>;

    /// Remove the row at `row_index` and return it.
    fn delete(&mut self, row_index: usize) -> Result<EggRow, StoreError>;

    /// Number of rows.
    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows()?.len())
    }

    /// Whether the log is empty.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// Replace the egg at `row_index` in an in-memory row list.
pub(crate) fn update_row(rows: &mut [EggRow], row_index: usize, egg: Egg) -> Result<(), StoreError> {
    let len = rows.len();
    let row = rows
        .get_mut(row_index)
        .ok_or(StoreError::RowNotFound { row_index, len })?;
    row.egg = egg;
    Ok(())
}

/// Remove the row at `row_index` from an in-memory row list.
pub(crate) fn delete_row(rows: &mut Vec<EggRow>, row_index: usize) -> Result<EggRow, StoreError> {
    if row_index >= rows.len() {
        return Err(StoreError::RowNotFound {
            row_index,
            len: rows.len(),
        });
    }
    Ok(rows.remove(row_index))
}
