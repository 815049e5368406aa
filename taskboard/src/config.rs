//! Application configuration constants
//!
//! Central location for storage names, default values and the behaviour
//! flags that control cascade semantics of the store.

use serde::{Deserialize, Serialize};

// ===== Storage =====

/// Key of the single durable slot holding the whole state blob
pub const STATE_STORAGE_KEY: &str = "taskboard-state";

/// Appended to the state key for a copy of a slot that failed to parse
pub const UNREADABLE_BACKUP_SUFFIX: &str = "-unreadable";

/// Directory name used under the platform data directory
pub const APP_DIR_NAME: &str = "taskboard";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TASKBOARD_DATA_DIR";

/// Prefix of exported state files (`taskboard-export-YYYY-MM-DD.json`)
pub const EXPORT_FILE_PREFIX: &str = "taskboard-export";

// ===== Entity Defaults =====

/// Status assigned to every newly created task
pub const DEFAULT_TASK_STATUS: &str = "Pending";

/// Statuses (compared case-insensitively) that count a task as done
pub const DONE_STATUSES: &[&str] = &["done", "complete"];

/// Colour given to boards created without one
pub const DEFAULT_BOARD_COLOR: &str = "#579bfc";

/// Colour given to groups created through `create_group`
pub const DEFAULT_GROUP_COLOR: &str = "#579bfc";

/// Behaviour flags for the store engine.
///
/// The defaults reproduce the historical cascade rules, including the two
/// known asymmetries: deleting a column leaves its key in surviving tasks'
/// `data`, and deleting a board leaves tasks attached only by `column_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Remove the deleted column's key from every surviving task's `data`
    #[serde(default)]
    pub purge_column_data_on_delete: bool,
    /// Also delete tasks attached only via `column_id` when their board goes
    #[serde(default)]
    pub cascade_legacy_column_tasks: bool,
    /// Check cell values against the column type before writing them
    #[serde(default = "default_true")]
    pub validate_cell_values: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            purge_column_data_on_delete: false,
            cascade_legacy_column_tasks: false,
            validate_cell_values: true,
        }
    }
}

impl StoreConfig {
    /// Configuration with both cascade gaps closed
    pub fn strict_cascade() -> Self {
        Self {
            purge_column_data_on_delete: true,
            cascade_legacy_column_tasks: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_keeps_historical_cascades() {
        let config = StoreConfig::default();
        assert!(!config.purge_column_data_on_delete);
        assert!(!config.cascade_legacy_column_tasks);
        assert!(config.validate_cell_values);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"purgeColumnDataOnDelete":true}"#).unwrap();
        assert!(config.purge_column_data_on_delete);
        assert!(!config.cascade_legacy_column_tasks);
        assert!(config.validate_cell_values);
    }
}
