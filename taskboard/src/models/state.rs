//! The persisted state blob
//!
//! `BoardState` is the whole application state: every entity list plus the
//! settings singleton. It is written and read as one JSON document.

use super::entities::{Board, Column, Group, Task};
use super::settings::UserSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardState {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: UserSettings,
}

impl BoardState {
    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Drop records whose parent does not exist.
    ///
    /// Returns the number of records removed.
    pub fn remove_orphans(&mut self) -> usize {
        let before = self.groups.len() + self.columns.len() + self.tasks.len();

        let boards: Vec<String> = self.boards.iter().map(|b| b.id.clone()).collect();
        self.groups.retain(|g| boards.contains(&g.board_id));
        self.columns.retain(|c| boards.contains(&c.board_id));

        let groups: Vec<String> = self.groups.iter().map(|g| g.id.clone()).collect();
        let columns: Vec<String> = self.columns.iter().map(|c| c.id.clone()).collect();
        self.tasks.retain(|t| {
            let group_ok = t.group_id.as_ref().map_or(true, |g| groups.contains(g));
            let column_ok = t.column_id.is_empty() || columns.contains(&t.column_id);
            let has_container = t.group_id.is_some() || !t.column_id.is_empty();
            group_ok && column_ok && has_container
        });

        before - (self.groups.len() + self.columns.len() + self.tasks.len())
    }
}
