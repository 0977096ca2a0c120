//! Progress stores
//!
//! [`JsonFileStore`] keeps one pretty-printed file per level,
//! `<dir>/level<id>.json`. [`MemoryStore`] keeps records in a map and is
//! what tests and headless runs without a data directory use.

use super::types::*;
use crate::level::LevelId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Synchronous per-level record storage
pub trait PersistenceStore {
    /// `Ok(None)` when nothing has been saved for `level_id` yet.
    fn load(&self, level_id: LevelId) -> Result<Option<LevelProgressRecord>, StoreError>;

    fn save(&mut self, level_id: LevelId, record: &LevelProgressRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `directory`, creating it if it doesn't exist.
    ///
    /// Failing to create the directory is the one unrecoverable store error.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, StoreError> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }
        if !directory.is_dir() {
            return Err(StoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Not a directory: {}", directory.display()),
            )));
        }

        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn record_path(&self, level_id: LevelId) -> PathBuf {
        self.directory.join(format!("level{}.json", level_id))
    }

    pub fn has_record(&self, level_id: LevelId) -> bool {
        self.record_path(level_id).exists()
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&self, level_id: LevelId) -> Result<Option<LevelProgressRecord>, StoreError> {
        let path = self.record_path(level_id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let file: ProgressFile = serde_json::from_str(&json)
            .map_err(|e| StoreError::CorruptedData(format!("{}: {}", path.display(), e)))?;

        if file.version > CURRENT_PROGRESS_VERSION {
            return Err(StoreError::InvalidVersion(file.version));
        }

        Ok(Some(file.record))
    }

    fn save(&mut self, level_id: LevelId, record: &LevelProgressRecord) -> Result<(), StoreError> {
        let path = self.record_path(level_id);
        let json = serde_json::to_string_pretty(&ProgressFile::new(*record))?;
        fs::write(&path, json)?;

        log::debug!("Progress for level {} saved to {}", level_id, path.display());
        Ok(())
    }
}

/// In-memory store; also counts writes so callers can assert on them
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<LevelId, LevelProgressRecord>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without counting it as a write.
    pub fn with_record(mut self, level_id: LevelId, record: LevelProgressRecord) -> Self {
        self.records.insert(level_id, record);
        self
    }

    pub fn get(&self, level_id: LevelId) -> Option<&LevelProgressRecord> {
        self.records.get(&level_id)
    }

    pub fn contains(&self, level_id: LevelId) -> bool {
        self.records.contains_key(&level_id)
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self, level_id: LevelId) -> Result<Option<LevelProgressRecord>, StoreError> {
        Ok(self.records.get(&level_id).copied())
    }

    fn save(&mut self, level_id: LevelId, record: &LevelProgressRecord) -> Result<(), StoreError> {
        self.records.insert(level_id, *record);
        self.writes += 1;
        Ok(())
    }
}
