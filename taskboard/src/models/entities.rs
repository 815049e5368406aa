//! Board entities
//!
//! Plain records for boards, groups, columns and tasks, plus the patch
//! structs used to update them. Field names serialize in camelCase so the
//! persisted blob keeps the layout UI collaborators expect.

use super::cell::CellValue;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Topology seeded into a new board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Blank,
    Todo,
    Software,
    Crm,
    Smart,
}

impl TemplateType {
    /// Icon name shown next to boards built from this template
    pub fn icon(self) -> &'static str {
        match self {
            TemplateType::Blank => "layout-grid",
            TemplateType::Todo => "check-square",
            TemplateType::Software => "code",
            TemplateType::Crm => "users",
            TemplateType::Smart => "target",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Blank => "blank",
            TemplateType::Todo => "todo",
            TemplateType::Software => "software",
            TemplateType::Crm => "crm",
            TemplateType::Smart => "smart",
        }
    }
}

impl std::str::FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blank" => Ok(TemplateType::Blank),
            "todo" => Ok(TemplateType::Todo),
            "software" => Ok(TemplateType::Software),
            "crm" => Ok(TemplateType::Crm),
            "smart" => Ok(TemplateType::Smart),
            other => Err(format!("unknown template type: {}", other)),
        }
    }
}

/// Kind of value a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Checkbox,
    Link,
    Select,
    Status,
    Tags,
    File,
    Tool,
    Youtube,
    Priority,
    DevTool,
    YoutubePlaylist,
}

/// Aggregation hint stored with a column. Not consulted by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// A top-level project board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub template_type: TemplateType,
    #[serde(default)]
    pub last_opened_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Task container inside a board (one table section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub board_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub position: i64,
}

/// One choice of a select or status column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectOptionRepr")]
pub struct SelectOption {
    pub label: String,
    pub color: String,
}

impl SelectOption {
    pub fn new(label: &str, color: &str) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

// Older saves stored bare option labels.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectOptionRepr {
    Label(String),
    Full {
        label: String,
        #[serde(default)]
        color: String,
    },
}

impl From<SelectOptionRepr> for SelectOption {
    fn from(repr: SelectOptionRepr) -> Self {
        match repr {
            SelectOptionRepr::Label(label) => Self {
                label,
                color: String::new(),
            },
            SelectOptionRepr::Full { label, color } => Self { label, color },
        }
    }
}

/// Per-column settings: known `options` plus any other keys verbatim
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ColumnSettings {
    pub fn with_options(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            extra: BTreeMap::new(),
        }
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o.label == label)
    }
}

/// A typed field shared by every task of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub board_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i64,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub settings: ColumnSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

/// A unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Legacy container reference; empty when the task lives in a group
    #[serde(default)]
    pub column_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub status: String,
    /// Column id -> value
    #[serde(default)]
    pub data: BTreeMap<String, CellValue>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Id of the container this task is ordered within
    pub fn container_id(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.column_id)
    }

    pub fn is_done(&self) -> bool {
        crate::config::DONE_STATUSES
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s))
    }
}

/// Update board request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub pinned: Option<bool>,
    pub archived: Option<bool>,
    pub template_type: Option<TemplateType>,
}

/// Update group request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: Option<i64>,
}

/// Update column request
///
/// `formula` and `aggregation` are doubly optional: `Some(None)` clears them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub position: Option<i64>,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    pub settings: Option<ColumnSettings>,
    pub formula: Option<Option<String>>,
    pub aggregation: Option<Option<Aggregation>>,
}

/// Accept RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC)
fn deserialize_due_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {}", raw)))
}

/// Update task request
///
/// `data` is shallow-merged into the task's existing data; a `Null` entry
/// removes that column's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub position: Option<i64>,
    pub status: Option<String>,
    pub data: Option<BTreeMap<String, CellValue>>,
}
