//! Application state and initialization
//!
//! Resolves the data directory, reads the optional store configuration
//! and opens the board store once at startup. The resulting `AppState`
//! is handed to every consumer by reference.

use crate::config::{StoreConfig, APP_DIR_NAME, DATA_DIR_ENV};
use crate::error::{AppError, Result};
use crate::services::BoardStore;
use crate::storage::{FileStorage, StatePersistence};
use std::path::{Path, PathBuf};

/// File holding `StoreConfig` inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Central application state holding the store
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub store: BoardStore,
}

impl AppState {
    pub fn exports_dir(&self) -> PathBuf {
        self.app_data_dir.join("exports")
    }
}

/// Pick the data directory: explicit path, then environment, then platform default
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AppError::Generic("Failed to get app data dir".to_string()))
}

/// Read `config.json` from `dir`; a missing file means defaults
pub fn load_store_config(dir: &Path) -> Result<StoreConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(StoreConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: StoreConfig = serde_json::from_str(&content)
        .map_err(|e| AppError::Generic(format!("Failed to parse {:?}: {}", path, e)))?;

    tracing::info!("Loaded store config from {:?}", path);
    Ok(config)
}

/// Application setup - called once on startup
pub fn setup(data_dir: Option<PathBuf>) -> Result<AppState> {
    tracing::info!("Initializing application");

    let app_data_dir = resolve_data_dir(data_dir)?;
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    let config = load_store_config(&app_data_dir)?;
    let storage = FileStorage::new(&app_data_dir)?;
    let store = BoardStore::open(StatePersistence::new(Box::new(storage)), config);

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        app_data_dir,
        store,
    })
}
