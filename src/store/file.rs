//! JSON file store.
//!
//! The whole log is kept in memory and rewritten on every mutation. Writes go
//! to a sibling temp file first and are renamed over the original, so a crash
//! mid-write leaves the previous version intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ledger::model::{Egg, EggRow};

use super::{delete_row, update_row, EggStore, StoreError};

/// On-disk layout version.
pub const LEDGER_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    rows: Vec<EggRow>,
}

/// Row list persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    rows: Vec<EggRow>,
}

impl FileStore {
    /// Open the ledger at `path`, creating an empty one if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            let store = Self { path, rows: Vec::new() };
            store.flush()?;
            info!("Created empty ledger at {}", store.path.display());
            return Ok(store);
        }

        let text = fs::read_to_string(&path)?;
        let file: LedgerFile = serde_json::from_str(&text)?;
        info!("Loaded {} rows from {}", file.rows.len(), path.display());

        Ok(Self { path, rows: file.rows })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = LedgerFile {
            version: LEDGER_FILE_VERSION,
            rows: self.rows.clone(),
        };
        let text = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Flushed {} rows to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}

impl EggStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn rows(&self) -> Result<Vec<EggRow>, StoreError> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, rows: Vec<EggRow>) -> Result<usize, StoreError> {
        let first = self.rows.len();
        self.rows.extend(rows);
        if let Err(e) = self.flush() {
            self.rows.truncate(first);
            return Err(e);
        }
        Ok(first)
    }

    fn update(&mut self, row_index: usize, egg: Egg) -> Result<(), StoreError> {
        let previous = self.rows.get(row_index).map(|row| row.egg.clone());
        update_row(&mut self.rows, row_index, egg)?;
        if let Err(e) = self.flush() {
            if let Some(previous) = previous {
                self.rows[row_index].egg = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, row_index: usize) -> Result<EggRow, StoreError> {
        let removed = delete_row(&mut self.rows, row_index)?;
        if let Err(e) = self.flush() {
            self.rows.insert(row_index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("egg-tracker-{}", uuid::Uuid::new_v4()))
            .join("eggs.json")
    }

    fn row(day: u32, weight: f64, seed: Option<u32>) -> EggRow {
        EggRow {
            date: NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            egg: Egg {
                weight,
                color: "#f0d6a3".into(),
                speckled: seed.is_some(),
                seed,
            },
        }
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_open_creates_file() {
        let path = temp_path();
        let store = FileStore::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.is_empty().unwrap());
        assert_eq!(store.path(), path.as_path());

        cleanup(&path);
    }

    #[test]
    fn test_persists_across_reopen() {
        let path = temp_path();
        {
            let mut store = FileStore::open(&path).unwrap();
            store.append(vec![row(1, 60.0, None), row(2, 65.0, Some(4242))]).unwrap();
            store.update(0, row(1, 58.0, None).egg).unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].egg.weight, 58.0);
        assert_eq!(rows[1].egg.seed, Some(4242));

        cleanup(&path);
    }

    #[test]
    fn test_delete_persists() {
        let path = temp_path();
        {
            let mut store = FileStore::open(&path).unwrap();
            store.append(vec![row(1, 60.0, None), row(1, 61.0, None)]).unwrap();
            store.delete(0).unwrap();
        }

        let rows = FileStore::open(&path).unwrap().rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].egg.weight, 61.0);

        cleanup(&path);
    }

    #[test]
    fn test_corrupt_file_rejected() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Json(_))));

        cleanup(&path);
    }

    #[test]
    fn test_failed_flush_rolls_back() {
        let path = temp_path();
        let mut store = FileStore::open(&path).unwrap();
        store.append(vec![row(1, 60.0, None), row(2, 65.0, None)]).unwrap();

        // A directory where the temp file should go makes every flush fail.
        let blocker = path.with_extension("json.tmp");
        fs::create_dir_all(&blocker).unwrap();

        assert!(matches!(
            store.append(vec![row(3, 70.0, None)]),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.len().unwrap(), 2);

        assert!(matches!(store.update(0, row(1, 50.0, None).egg), Err(StoreError::Io(_))));
        assert_eq!(store.rows().unwrap()[0].egg.weight, 60.0);

        assert!(matches!(store.delete(0), Err(StoreError::Io(_))));
        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].egg.weight, 60.0);
        assert_eq!(rows[1].egg.weight, 65.0);

        // Memory and disk still agree once the blocker is gone.
        fs::remove_dir(&blocker).unwrap();
        assert_eq!(FileStore::open(&path).unwrap().rows().unwrap(), rows);

        cleanup(&path);
    }

    #[test]
    fn test_file_layout() {
        let path = temp_path();
        let mut store = FileStore::open(&path).unwrap();
        store.append(vec![row(2, 67.0, None)]).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], LEDGER_FILE_VERSION);
        assert_eq!(json["rows"][0]["date"], "2023-10-02");
        assert_eq!(json["rows"][0]["weight"], 67.0);

        cleanup(&path);
    }
}
