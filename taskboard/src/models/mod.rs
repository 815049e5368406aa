//! Data model
//!
//! This module provides the record types of the board store:
//! - Entities (boards, groups, columns, tasks) and their patches
//! - Typed cell values for per-column task data
//! - The user settings singleton
//! - The persisted state blob

pub mod cell;
pub mod entities;
pub mod settings;
pub mod state;

pub use cell::{validate_cell, CellValue};
pub use entities::*;
pub use settings::{SettingsPatch, UserSettings};
pub use state::BoardState;
