//! Error types for the board store
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a UI layer as plain strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid value for column {column}: {reason}")]
    InvalidValue { column: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// True for the "mutation target does not exist" family.
    ///
    /// UI callers treat these as no-ops and may discard them.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::BoardNotFound(_)
                | AppError::GroupNotFound(_)
                | AppError::ColumnNotFound(_)
                | AppError::TaskNotFound(_)
        )
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family() {
        assert!(AppError::TaskNotFound("t1".to_string()).is_not_found());
        assert!(AppError::GroupNotFound("g1".to_string()).is_not_found());
        assert!(!AppError::Storage("quota exceeded".to_string()).is_not_found());
    }

    #[test]
    fn test_serializes_as_message() {
        let err = AppError::BoardNotFound("abc".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Board not found: abc\"");
    }
}
