//! Board store
//!
//! Owns the in-memory `BoardState` and every mutation of it. Each mutator
//! validates first, then applies its change in one step and writes the
//! new state through `StatePersistence`. A missing target id leaves state
//! untouched, skips the write and comes back as a not-found error that UI
//! callers are free to ignore.
//!
//! Persistence is best effort: a failed write is logged and remembered in
//! `last_save_error`, never returned from the mutator. `flush` re-saves and
//! reports the failure for callers that need to know.

use super::templates;
use crate::config::{StoreConfig, DEFAULT_BOARD_COLOR, DEFAULT_GROUP_COLOR, DEFAULT_TASK_STATUS};
use crate::error::{AppError, Result};
use crate::models::{
    validate_cell, Board, BoardPatch, BoardState, CellValue, Column, ColumnPatch, ColumnSettings,
    ColumnType, Group, GroupPatch, SettingsPatch, Task, TaskPatch, TemplateType,
};
use crate::storage::persistence::{self, StatePersistence};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Single-user board store with write-through persistence
pub struct BoardStore {
    state: BoardState,
    persistence: StatePersistence,
    config: StoreConfig,
    last_save_error: Option<String>,
}

impl BoardStore {
    /// Load saved state (or the initial state) and take ownership of it
    pub fn open(persistence: StatePersistence, config: StoreConfig) -> Self {
        let state = persistence.load();
        Self {
            state,
            persistence,
            config,
            last_save_error: None,
        }
    }

    /// Read-only view for derived queries
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Message of the most recent failed write, cleared by the next success
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Write the current state and report any failure
    pub fn flush(&mut self) -> Result<()> {
        let result = self.persistence.save(&self.state);
        self.last_save_error = result.as_ref().err().map(|e| e.to_string());
        result
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!("Failed to persist board state: {}", e);
        }
    }

    // ===== Boards =====

    /// Create a board seeded with its template's groups, columns and tasks
    pub fn create_board(&mut self, name: &str, template: TemplateType, color: Option<&str>) -> Board {
        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.unwrap_or(DEFAULT_BOARD_COLOR).to_string(),
            icon: template.icon().to_string(),
            pinned: false,
            archived: false,
            template_type: template,
            last_opened_at: now,
            created_at: now,
        };

        let seed = templates::seed(template, &board.id, now);

        self.state.boards.push(board.clone());
        self.state.groups.extend(seed.groups);
        self.state.columns.extend(seed.columns);
        self.state.tasks.extend(seed.tasks);
        self.persist();

        tracing::info!("Created {} board {}: {}", template.as_str(), board.id, board.name);
        board
    }

    pub fn update_board(&mut self, id: &str, patch: BoardPatch) -> Result<()> {
        let board = self
            .state
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::BoardNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            board.name = name;
        }
        if let Some(color) = patch.color {
            board.color = color;
        }
        if let Some(icon) = patch.icon {
            board.icon = icon;
        }
        if let Some(pinned) = patch.pinned {
            board.pinned = pinned;
        }
        if let Some(archived) = patch.archived {
            board.archived = archived;
        }
        if let Some(template_type) = patch.template_type {
            board.template_type = template_type;
        }

        self.persist();
        tracing::debug!("Updated board: {}", id);
        Ok(())
    }

    /// Delete a board with its groups, columns and the tasks of its groups
    pub fn delete_board(&mut self, id: &str) -> Result<()> {
        if self.state.board(id).is_none() {
            return Err(AppError::BoardNotFound(id.to_string()));
        }

        let group_ids: Vec<String> = self
            .state
            .groups
            .iter()
            .filter(|g| g.board_id == id)
            .map(|g| g.id.clone())
            .collect();
        let column_ids: Vec<String> = self
            .state
            .columns
            .iter()
            .filter(|c| c.board_id == id)
            .map(|c| c.id.clone())
            .collect();
        let cascade_legacy = self.config.cascade_legacy_column_tasks;

        let state = &mut self.state;
        state.boards.retain(|b| b.id != id);
        state.groups.retain(|g| g.board_id != id);
        state.columns.retain(|c| c.board_id != id);
        state.tasks.retain(|t| match &t.group_id {
            Some(group_id) => !group_ids.contains(group_id),
            None => !(cascade_legacy && column_ids.contains(&t.column_id)),
        });

        self.persist();
        tracing::info!(
            "Deleted board {} ({} groups, {} columns)",
            id,
            group_ids.len(),
            column_ids.len()
        );
        Ok(())
    }

    /// Mark a board as opened now
    pub fn open_board(&mut self, id: &str) -> Result<()> {
        let board = self
            .state
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::BoardNotFound(id.to_string()))?;
        board.last_opened_at = Utc::now();

        self.persist();
        tracing::debug!("Opened board: {}", id);
        Ok(())
    }

    /// Flip `pinned`; returns the new value
    pub fn toggle_pin_board(&mut self, id: &str) -> Result<bool> {
        let board = self
            .state
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::BoardNotFound(id.to_string()))?;
        board.pinned = !board.pinned;
        let pinned = board.pinned;

        self.persist();
        tracing::debug!("Board {} pinned: {}", id, pinned);
        Ok(pinned)
    }

    // ===== Groups =====

    /// Append a group after the board's existing groups
    pub fn create_group(&mut self, board_id: &str, name: &str) -> Result<Group> {
        if self.state.board(board_id).is_none() {
            return Err(AppError::BoardNotFound(board_id.to_string()));
        }

        let siblings = self.state.groups.iter().filter(|g| g.board_id == board_id).count();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            board_id: board_id.to_string(),
            name: name.to_string(),
            color: DEFAULT_GROUP_COLOR.to_string(),
            position: siblings as i64,
        };

        self.state.groups.push(group.clone());
        self.persist();

        tracing::debug!("Created group {} on board {}", group.id, board_id);
        Ok(group)
    }

    pub fn update_group(&mut self, id: &str, patch: GroupPatch) -> Result<()> {
        let group = self
            .state
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| AppError::GroupNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            group.name = name;
        }
        if let Some(color) = patch.color {
            group.color = color;
        }
        if let Some(position) = patch.position {
            group.position = position;
        }

        self.persist();
        tracing::debug!("Updated group: {}", id);
        Ok(())
    }

    /// Delete a group and every task in it
    pub fn delete_group(&mut self, id: &str) -> Result<()> {
        if self.state.group(id).is_none() {
            return Err(AppError::GroupNotFound(id.to_string()));
        }

        self.state.groups.retain(|g| g.id != id);
        self.state.tasks.retain(|t| t.group_id.as_deref() != Some(id));

        self.persist();
        tracing::debug!("Deleted group: {}", id);
        Ok(())
    }

    // ===== Columns =====

    /// Append a column after the board's existing columns
    pub fn create_column(&mut self, board_id: &str, name: &str, column_type: ColumnType) -> Result<Column> {
        if self.state.board(board_id).is_none() {
            return Err(AppError::BoardNotFound(board_id.to_string()));
        }

        let siblings = self.state.columns.iter().filter(|c| c.board_id == board_id).count();
        let column = Column {
            id: Uuid::new_v4().to_string(),
            board_id: board_id.to_string(),
            name: name.to_string(),
            position: siblings as i64,
            column_type,
            settings: ColumnSettings::default(),
            formula: None,
            aggregation: None,
        };

        self.state.columns.push(column.clone());
        self.persist();

        tracing::debug!("Created {:?} column {} on board {}", column_type, column.id, board_id);
        Ok(column)
    }

    /// Update column fields. Existing cell values are not re-validated.
    pub fn update_column(&mut self, id: &str, patch: ColumnPatch) -> Result<()> {
        let column = self
            .state
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::ColumnNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            column.name = name;
        }
        if let Some(position) = patch.position {
            column.position = position;
        }
        if let Some(column_type) = patch.column_type {
            column.column_type = column_type;
        }
        if let Some(settings) = patch.settings {
            column.settings = settings;
        }
        if let Some(formula) = patch.formula {
            column.formula = formula;
        }
        if let Some(aggregation) = patch.aggregation {
            column.aggregation = aggregation;
        }

        self.persist();
        tracing::debug!("Updated column: {}", id);
        Ok(())
    }

    /// Delete a column and the tasks attached to it by `column_id`
    pub fn delete_column(&mut self, id: &str) -> Result<()> {
        if self.state.column(id).is_none() {
            return Err(AppError::ColumnNotFound(id.to_string()));
        }

        self.state.columns.retain(|c| c.id != id);
        self.state.tasks.retain(|t| t.column_id != id);
        if self.config.purge_column_data_on_delete {
            for task in &mut self.state.tasks {
                task.data.remove(id);
            }
        }

        self.persist();
        tracing::debug!("Deleted column: {}", id);
        Ok(())
    }

    // ===== Tasks =====

    /// Create a task at the end of its container.
    ///
    /// The container is `group_id` when given, otherwise `column_id`.
    pub fn create_task(&mut self, column_id: &str, title: &str, group_id: Option<&str>) -> Result<Task> {
        if let Some(group_id) = group_id {
            if self.state.group(group_id).is_none() {
                return Err(AppError::GroupNotFound(group_id.to_string()));
            }
        }
        if !column_id.is_empty() && self.state.column(column_id).is_none() {
            return Err(AppError::ColumnNotFound(column_id.to_string()));
        }
        if group_id.is_none() && column_id.is_empty() {
            return Err(AppError::Generic(
                "A task needs a group or a column".to_string(),
            ));
        }

        let position = self.next_task_position(column_id, group_id);
        let task = Task {
            id: Uuid::new_v4().to_string(),
            column_id: column_id.to_string(),
            group_id: group_id.map(str::to_string),
            title: title.to_string(),
            description: String::new(),
            due_date: None,
            tags: Vec::new(),
            position,
            status: DEFAULT_TASK_STATUS.to_string(),
            data: BTreeMap::new(),
            created_at: Utc::now(),
        };

        self.state.tasks.push(task.clone());
        self.persist();

        tracing::debug!("Created task {} in {}", task.id, task.container_id());
        Ok(task)
    }

    /// `1 + max(sibling positions)`, or 0 for an empty container
    fn next_task_position(&self, column_id: &str, group_id: Option<&str>) -> i64 {
        self.state
            .tasks
            .iter()
            .filter(|t| match group_id {
                Some(group_id) => t.group_id.as_deref() == Some(group_id),
                None => t.column_id == column_id,
            })
            .map(|t| t.position)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Merge fields into a task. `data` entries are merged one by one;
    /// a `Null` entry removes the value.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        if self.state.task(id).is_none() {
            return Err(AppError::TaskNotFound(id.to_string()));
        }

        let mirrored_status = match &patch.data {
            Some(data) => self.check_cells(data)?,
            None => None,
        };

        let task = self
            .state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        if let Some(position) = patch.position {
            task.position = position;
        }
        if let Some(data) = patch.data {
            merge_cells(&mut task.data, data);
        }
        if let Some(status) = mirrored_status {
            task.status = status;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }

        self.persist();
        tracing::debug!("Updated task: {}", id);
        Ok(())
    }

    /// Write one cell of a task
    pub fn set_task_value(&mut self, task_id: &str, column_id: &str, value: CellValue) -> Result<()> {
        let mut data = BTreeMap::new();
        data.insert(column_id.to_string(), value);
        self.update_task(
            task_id,
            TaskPatch {
                data: Some(data),
                ..TaskPatch::default()
            },
        )
    }

    /// Validate cell writes; returns the text to mirror into `status`
    /// when one of them targets a status column.
    fn check_cells(&self, data: &BTreeMap<String, CellValue>) -> Result<Option<String>> {
        let mut status = None;
        for (column_id, value) in data {
            let column = match self.state.column(column_id) {
                Some(column) => column,
                None if self.config.validate_cell_values => {
                    return Err(AppError::ColumnNotFound(column_id.clone()));
                }
                None => continue,
            };
            if self.config.validate_cell_values {
                validate_cell(column, value)?;
            }
            if column.column_type == ColumnType::Status {
                if let Some(text) = value.as_text() {
                    status = Some(text.to_string());
                }
            }
        }
        Ok(status)
    }

    /// Re-home a task into `group_id`, at `position` or after its new siblings
    pub fn move_task(&mut self, task_id: &str, group_id: &str, position: Option<i64>) -> Result<()> {
        let task = self
            .state
            .task(task_id)
            .ok_or_else(|| AppError::TaskNotFound(task_id.to_string()))?;
        let target_board = self
            .state
            .group(group_id)
            .map(|g| g.board_id.clone())
            .ok_or_else(|| AppError::GroupNotFound(group_id.to_string()))?;

        // Cell data is keyed by column id, so a task stays on its board
        let current_board = match task.group_id.as_deref() {
            Some(current) => self.state.group(current).map(|g| g.board_id.as_str()),
            None => self.state.column(&task.column_id).map(|c| c.board_id.as_str()),
        };
        if let Some(current_board) = current_board {
            if current_board != target_board {
                return Err(AppError::Generic(format!(
                    "Task {} cannot move to group {} on another board",
                    task_id, group_id
                )));
            }
        }

        let position = match position {
            Some(position) => position,
            None => self.next_task_position("", Some(group_id)),
        };

        if let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == task_id) {
            task.group_id = Some(group_id.to_string());
            task.column_id.clear();
            task.position = position;
        }

        self.persist();
        tracing::debug!("Moved task {} to group {} at {}", task_id, group_id, position);
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        if self.state.task(id).is_none() {
            return Err(AppError::TaskNotFound(id.to_string()));
        }

        self.state.tasks.retain(|t| t.id != id);

        self.persist();
        tracing::debug!("Deleted task: {}", id);
        Ok(())
    }

    // ===== Settings =====

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.state.settings.apply(patch);
        self.persist();
        tracing::info!("Settings updated");
    }

    // ===== Whole-state operations =====

    /// Pretty-printed JSON of the full state
    pub fn export_json(&self) -> Result<String> {
        persistence::export_json(&self.state)
    }

    /// Write a dated export file into `dir`
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        persistence::export_to_dir(&self.state, dir)
    }

    /// Replace all state with the contents of an export file
    pub fn import_from_path(&mut self, path: &Path) -> Result<()> {
        let imported = persistence::read_export(path)?;
        tracing::info!(
            "Importing {} boards from {:?}",
            imported.boards.len(),
            path
        );

        self.state = imported;
        self.persist();
        Ok(())
    }

    /// Reset to the initial state and remove the saved slot
    pub fn clear_all(&mut self) -> Result<()> {
        self.state = BoardState::default();
        self.last_save_error = None;
        self.persistence.clear()?;
        tracing::info!("Cleared all board data");
        Ok(())
    }
}

fn merge_cells(target: &mut BTreeMap<String, CellValue>, updates: BTreeMap<String, CellValue>) {
    for (column_id, value) in updates {
        if matches!(value, CellValue::Null) {
            target.remove(&column_id);
        } else {
            target.insert(column_id, value);
        }
    }
}
