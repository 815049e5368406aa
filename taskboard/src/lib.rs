//! Taskboard library
//!
//! This library exposes the board store core: the data model, its
//! persistence, the mutating store and the derived views computed from it.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AppError, Result};
pub use services::BoardStore;
