//! State persistence
//!
//! Loads and saves the whole `BoardState` as one JSON document under a
//! single durable key. Loading is forgiving: a missing or unparsable slot
//! yields the initial state, and fields absent from older saves take their
//! defaults. Also handles export to and import from dated JSON files.

use super::kv::KeyValueStorage;
use crate::config::{EXPORT_FILE_PREFIX, STATE_STORAGE_KEY, UNREADABLE_BACKUP_SUFFIX};
use crate::error::{AppError, Result};
use crate::models::BoardState;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes the state blob through a key-value slot
pub struct StatePersistence {
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl StatePersistence {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, STATE_STORAGE_KEY)
    }

    pub fn with_key(storage: Box<dyn KeyValueStorage>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored state, reporting parse and storage failures
    pub fn try_load(&self) -> Result<Option<BoardState>> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        let state: BoardState = serde_json::from_str(&raw)?;
        Ok(Some(state))
    }

    /// Load the stored state or fall back to the initial state
    pub fn load(&self) -> BoardState {
        match self.try_load() {
            Ok(Some(state)) => {
                tracing::info!(
                    "Loaded state: {} boards, {} groups, {} columns, {} tasks",
                    state.boards.len(),
                    state.groups.len(),
                    state.columns.len(),
                    state.tasks.len()
                );
                state
            }
            Ok(None) => {
                tracing::info!("No saved state found, starting empty");
                BoardState::default()
            }
            Err(e) => {
                tracing::warn!("Saved state unreadable, starting empty: {}", e);
                if let Err(e) = self.back_up_unreadable() {
                    tracing::error!("Failed to back up unreadable state: {}", e);
                }
                BoardState::default()
            }
        }
    }

    /// Key holding a copy of a slot that failed to parse
    pub fn backup_key(&self) -> String {
        format!("{}{}", self.key, UNREADABLE_BACKUP_SUFFIX)
    }

    /// Copy the raw slot aside so the next save cannot destroy it
    fn back_up_unreadable(&self) -> Result<()> {
        if let Some(raw) = self.storage.get(&self.key)? {
            let backup_key = self.backup_key();
            self.storage.set(&backup_key, &raw)?;
            tracing::warn!("Copied unreadable state to {}", backup_key);
        }
        Ok(())
    }

    /// Serialize and write the full state
    pub fn save(&self, state: &BoardState) -> Result<()> {
        let content = serde_json::to_string(state)?;
        self.storage.set(&self.key, &content)?;
        tracing::debug!("State saved under {}", self.key);
        Ok(())
    }

    /// Remove the durable slot entirely
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)?;
        tracing::info!("Removed saved state {}", self.key);
        Ok(())
    }
}

/// Pretty-printed JSON dump of the full state
pub fn export_json(state: &BoardState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// File name of an export taken on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Write an export named with today's date into `dir`
pub fn export_to_dir(state: &BoardState, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let today = chrono::Local::now().date_naive();
    let path = dir.join(export_file_name(today));
    fs::write(&path, export_json(state)?)?;

    tracing::info!("Exported state to {:?}", path);
    Ok(path)
}

/// Parse an export file, dropping records that reference missing parents
pub fn read_export(path: &Path) -> Result<BoardState> {
    if !path.exists() {
        return Err(AppError::Import(format!("File not found: {:?}", path)));
    }

    let content = fs::read_to_string(path)?;
    let mut state: BoardState = serde_json::from_str(&content)
        .map_err(|e| AppError::Import(format!("Failed to parse export: {}", e)))?;

    let dropped = state.remove_orphans();
    if dropped > 0 {
        tracing::warn!("Dropped {} orphaned records from import", dropped);
    }

    Ok(state)
}
