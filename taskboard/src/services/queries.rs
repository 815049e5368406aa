//! Derived views over the board state
//!
//! Read-only computations used for rendering: ordered collections,
//! progress, counts and the current focus board. None of these mutate
//! state or touch storage.

use super::formula::{parse_formula, FormulaError};
use crate::models::{Board, BoardState, Column, Group, Task};

impl BoardState {
    /// Groups of a board in display order
    pub fn board_groups(&self, board_id: &str) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.iter().filter(|g| g.board_id == board_id).collect();
        groups.sort_by_key(|g| g.position);
        groups
    }

    /// Columns of a board in display order
    pub fn board_columns(&self, board_id: &str) -> Vec<&Column> {
        let mut columns: Vec<&Column> =
            self.columns.iter().filter(|c| c.board_id == board_id).collect();
        columns.sort_by_key(|c| c.position);
        columns
    }

    /// Tasks of a group in display order
    pub fn group_tasks(&self, group_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.group_id.as_deref() == Some(group_id))
            .collect();
        tasks.sort_by_key(|t| t.position);
        tasks
    }

    /// Tasks attached to a column through the legacy `column_id`
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.column_id == column_id).collect();
        tasks.sort_by_key(|t| t.position);
        tasks
    }

    /// Every task under any of the board's groups, group by group.
    ///
    /// Tasks attached only by `column_id` are not included.
    pub fn board_tasks(&self, board_id: &str) -> Vec<&Task> {
        self.board_groups(board_id)
            .into_iter()
            .flat_map(|g| self.group_tasks(&g.id))
            .collect()
    }

    /// Non-archived boards, pinned first, then most recently opened
    pub fn active_boards(&self) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self.boards.iter().filter(|b| !b.archived).collect();
        boards.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.last_opened_at.cmp(&a.last_opened_at))
        });
        boards
    }

    pub fn archived_boards(&self) -> Vec<&Board> {
        self.boards.iter().filter(|b| b.archived).collect()
    }

    /// Percentage (0..=100) of the board's group tasks that are done
    pub fn board_progress(&self, board_id: &str) -> u32 {
        let tasks = self.board_tasks(board_id);
        if tasks.is_empty() {
            return 0;
        }
        let done = tasks.iter().filter(|t| t.is_done()).count();
        (100.0 * done as f64 / tasks.len() as f64).round() as u32
    }

    pub fn board_task_count(&self, board_id: &str) -> usize {
        self.board_tasks(board_id).len()
    }

    /// The board the user is most likely working on
    pub fn current_focus_board(&self) -> Option<&Board> {
        self.active_boards().into_iter().next()
    }

    pub fn has_ai_keys(&self) -> bool {
        self.settings.has_ai_keys()
    }

    /// Board tasks whose title, description or a tag contains `query`
    pub fn search_board_tasks(&self, board_id: &str, query: &str) -> Vec<&Task> {
        let query_lower = query.to_lowercase();

        self.board_tasks(board_id)
            .into_iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&query_lower)
                    || task.description.to_lowercase().contains(&query_lower)
                    || task.tags.iter().any(|tag| tag.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Evaluate a column's formula over its board; `None` without a formula
    pub fn evaluate_column_formula(&self, column_id: &str) -> Option<Result<f64, FormulaError>> {
        let column = self.column(column_id)?;
        let formula = column.formula.as_deref()?;

        Some(parse_formula(
            formula,
            self.board_columns(&column.board_id),
            self.board_tasks(&column.board_id),
        ))
    }
}
