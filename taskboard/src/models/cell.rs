//! Typed task cell values
//!
//! A task's `data` maps column ids to `CellValue`s. The value kind accepted
//! for a column depends on its `ColumnType` and is checked at write time.

use super::entities::{Column, ColumnType};
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Value stored in one cell of a task row.
///
/// Serialized untagged so the persisted blob holds plain JSON values.
/// `Json` keeps anything older saves contain that no other variant matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Json(serde_json::Value),
}

impl CellValue {
    pub fn text(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }

    /// Null and empty strings do not count as a value
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null | CellValue::Json(serde_json::Value::Null) => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading used by aggregates.
    ///
    /// Anything that does not read as a finite number counts as 0.
    pub fn as_number_lenient(&self) -> f64 {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Text(s) => parse_numeric_text(s),
            CellValue::List(items) if items.len() == 1 => parse_numeric_text(&items[0]),
            CellValue::Json(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            _ => 0.0,
        };
        if n.is_finite() {
            n
        } else {
            0.0
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::List(_) => "list",
            CellValue::Json(_) => "json",
        }
    }
}

fn parse_numeric_text(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

fn is_date_text(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(s).is_ok()
}

/// Check that `value` may be stored in `column`
pub fn validate_cell(column: &Column, value: &CellValue) -> Result<()> {
    let invalid = |reason: String| AppError::InvalidValue {
        column: column.name.clone(),
        reason,
    };

    if matches!(value, CellValue::Null) {
        return Ok(());
    }

    match (column.column_type, value) {
        (ColumnType::Number, CellValue::Number(n)) if n.is_finite() => Ok(()),
        (ColumnType::Number, CellValue::Number(_)) => Err(invalid("number must be finite".to_string())),
        (ColumnType::Checkbox, CellValue::Bool(_)) => Ok(()),
        (ColumnType::Tags, CellValue::List(_)) => Ok(()),
        (ColumnType::Date, CellValue::Text(s)) => {
            if s.is_empty() || is_date_text(s) {
                Ok(())
            } else {
                Err(invalid(format!("'{}' is not a date", s)))
            }
        }
        (ColumnType::Select | ColumnType::Status, CellValue::Text(s)) => {
            let options = &column.settings.options;
            if s.is_empty() || options.is_empty() || column.settings.has_option(s) {
                Ok(())
            } else {
                Err(invalid(format!("'{}' is not one of the column's options", s)))
            }
        }
        (
            ColumnType::Text
            | ColumnType::Link
            | ColumnType::File
            | ColumnType::Tool
            | ColumnType::Youtube
            | ColumnType::Priority
            | ColumnType::DevTool
            | ColumnType::YoutubePlaylist,
            CellValue::Text(_),
        ) => Ok(()),
        (column_type, other) => Err(invalid(format!(
            "{:?} column does not accept a {} value",
            column_type,
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entities::{ColumnSettings, SelectOption};

    fn column(column_type: ColumnType) -> Column {
        Column {
            id: "c1".to_string(),
            board_id: "b1".to_string(),
            name: "Field".to_string(),
            position: 0,
            column_type,
            settings: ColumnSettings::default(),
            formula: None,
            aggregation: None,
        }
    }

    #[test]
    fn test_untagged_parsing() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[null, true, 10, "abc", ["a","b"], {"url":"x"}]"#).unwrap();
        assert_eq!(values[0], CellValue::Null);
        assert_eq!(values[1], CellValue::Bool(true));
        assert_eq!(values[2], CellValue::Number(10.0));
        assert_eq!(values[3], CellValue::text("abc"));
        assert_eq!(values[4], CellValue::List(vec!["a".to_string(), "b".to_string()]));
        assert!(matches!(values[5], CellValue::Json(_)));
    }

    #[test]
    fn test_lenient_number_reading() {
        assert_eq!(CellValue::Number(4.5).as_number_lenient(), 4.5);
        assert_eq!(CellValue::text(" 12 ").as_number_lenient(), 12.0);
        assert_eq!(CellValue::text("abc").as_number_lenient(), 0.0);
        assert_eq!(CellValue::text("NaN").as_number_lenient(), 0.0);
        assert_eq!(CellValue::Bool(true).as_number_lenient(), 1.0);
    }

    #[test]
    fn test_infinite_text_reads_as_zero() {
        assert_eq!(CellValue::text("inf").as_number_lenient(), 0.0);
        assert_eq!(CellValue::text("Infinity").as_number_lenient(), 0.0);
        assert_eq!(CellValue::text("-infinity").as_number_lenient(), 0.0);
        assert_eq!(CellValue::List(vec!["INF".to_string()]).as_number_lenient(), 0.0);
    }

    #[test]
    fn test_emptiness() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::text("").is_empty());
        assert!(!CellValue::text("abc").is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_number_column_rejects_text() {
        let col = column(ColumnType::Number);
        assert!(validate_cell(&col, &CellValue::Number(3.0)).is_ok());
        let err = validate_cell(&col, &CellValue::text("abc")).unwrap_err();
        assert!(matches!(err, AppError::InvalidValue { .. }));
    }

    #[test]
    fn test_date_column() {
        let col = column(ColumnType::Date);
        assert!(validate_cell(&col, &CellValue::text("2024-05-01")).is_ok());
        assert!(validate_cell(&col, &CellValue::text("2024-05-01T10:00:00Z")).is_ok());
        assert!(validate_cell(&col, &CellValue::text("next week")).is_err());
    }

    #[test]
    fn test_status_column_checks_options() {
        let mut col = column(ColumnType::Status);
        assert!(validate_cell(&col, &CellValue::text("Anything")).is_ok());

        col.settings = ColumnSettings::with_options(vec![SelectOption::new("Done", "#00c875")]);
        assert!(validate_cell(&col, &CellValue::text("Done")).is_ok());
        assert!(validate_cell(&col, &CellValue::text("Blocked")).is_err());
    }

    #[test]
    fn test_null_always_accepted() {
        for column_type in [ColumnType::Number, ColumnType::Checkbox, ColumnType::Tags] {
            assert!(validate_cell(&column(column_type), &CellValue::Null).is_ok());
        }
    }
}
