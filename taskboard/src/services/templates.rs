//! Board templates
//!
//! Each template defines the groups, columns and starter tasks a new board
//! is created with.

use crate::config::DEFAULT_TASK_STATUS;
use crate::models::{
    CellValue, Column, ColumnSettings, ColumnType, Group, SelectOption, Task, TemplateType,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Entities seeded into a freshly created board
#[derive(Debug, Default)]
pub struct Seed {
    pub groups: Vec<Group>,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

struct ColumnDef {
    name: &'static str,
    column_type: ColumnType,
    options: &'static [(&'static str, &'static str)],
}

const fn col(name: &'static str, column_type: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        column_type,
        options: &[],
    }
}

const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("Pending", "#c4c4c4"),
    ("Working on it", "#fdab3d"),
    ("Stuck", "#e2445c"),
    ("Done", "#00c875"),
];

const STAGE_OPTIONS: &[(&str, &str)] = &[
    ("Lead", "#c4c4c4"),
    ("Contacted", "#579bfc"),
    ("Proposal", "#fdab3d"),
    ("Won", "#00c875"),
    ("Lost", "#e2445c"),
];

const BLANK_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "Status",
        column_type: ColumnType::Status,
        options: STATUS_OPTIONS,
    },
    col("Due Date", ColumnType::Date),
];

const TODO_COLUMNS: &[ColumnDef] = &[
    col("Task", ColumnType::Text),
    ColumnDef {
        name: "Status",
        column_type: ColumnType::Status,
        options: STATUS_OPTIONS,
    },
];

const SOFTWARE_COLUMNS: &[ColumnDef] = &[
    col("Feature", ColumnType::Text),
    col("Dev Tool", ColumnType::DevTool),
    col("Course Link", ColumnType::YoutubePlaylist),
    ColumnDef {
        name: "Status",
        column_type: ColumnType::Status,
        options: STATUS_OPTIONS,
    },
];

const CRM_COLUMNS: &[ColumnDef] = &[
    col("Contact", ColumnType::Text),
    ColumnDef {
        name: "Stage",
        column_type: ColumnType::Status,
        options: STAGE_OPTIONS,
    },
    col("Value", ColumnType::Number),
    col("Last Contact", ColumnType::Date),
];

const SMART_COLUMNS: &[ColumnDef] = &[
    col("Specific", ColumnType::Text),
    col("Measurable", ColumnType::Text),
    col("Achievable", ColumnType::Checkbox),
    col("Relevant", ColumnType::Checkbox),
    col("Time-bound", ColumnType::Date),
];

/// Starter rows for the SMART board: (title, specific, measurable)
const SMART_TASKS: &[(&str, &str, &str)] = &[
    (
        "Define your goal",
        "State exactly what you want to accomplish, who is involved and where it happens.",
        "Name the number or milestone that tells you the goal is met.",
    ),
    (
        "Plan the first milestone",
        "Break the goal into the first concrete deliverable.",
        "Decide how progress on the milestone will be tracked each week.",
    ),
];

fn layout(template: TemplateType) -> (&'static str, &'static str, &'static [ColumnDef]) {
    match template {
        TemplateType::Blank => ("Main Table", "#579bfc", BLANK_COLUMNS),
        TemplateType::Todo => ("My Tasks", "#00c875", TODO_COLUMNS),
        TemplateType::Software => ("Development", "#a25ddc", SOFTWARE_COLUMNS),
        TemplateType::Crm => ("Leads", "#fdab3d", CRM_COLUMNS),
        TemplateType::Smart => ("Core Framework", "#037f4c", SMART_COLUMNS),
    }
}

/// Build the initial topology of a board created from `template`
pub fn seed(template: TemplateType, board_id: &str, now: DateTime<Utc>) -> Seed {
    let (group_name, group_color, column_defs) = layout(template);

    let group = Group {
        id: Uuid::new_v4().to_string(),
        board_id: board_id.to_string(),
        name: group_name.to_string(),
        color: group_color.to_string(),
        position: 0,
    };

    let columns: Vec<Column> = column_defs
        .iter()
        .enumerate()
        .map(|(i, def)| Column {
            id: Uuid::new_v4().to_string(),
            board_id: board_id.to_string(),
            name: def.name.to_string(),
            position: i as i64,
            column_type: def.column_type,
            settings: ColumnSettings::with_options(
                def.options
                    .iter()
                    .map(|(label, color)| SelectOption::new(label, color))
                    .collect(),
            ),
            formula: None,
            aggregation: None,
        })
        .collect();

    let tasks = if template == TemplateType::Smart {
        smart_tasks(&group, &columns, now)
    } else {
        Vec::new()
    };

    Seed {
        groups: vec![group],
        columns,
        tasks,
    }
}

fn smart_tasks(group: &Group, columns: &[Column], now: DateTime<Utc>) -> Vec<Task> {
    let column_id = |name: &str| {
        columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
            .unwrap_or_default()
    };
    let specific = column_id("Specific");
    let measurable = column_id("Measurable");
    let achievable = column_id("Achievable");
    let relevant = column_id("Relevant");

    SMART_TASKS
        .iter()
        .enumerate()
        .map(|(i, (title, specific_text, measurable_text))| {
            let mut data = BTreeMap::new();
            data.insert(specific.clone(), CellValue::text(specific_text));
            data.insert(measurable.clone(), CellValue::text(measurable_text));
            data.insert(achievable.clone(), CellValue::Bool(false));
            data.insert(relevant.clone(), CellValue::Bool(false));

            Task {
                id: Uuid::new_v4().to_string(),
                column_id: String::new(),
                group_id: Some(group.id.clone()),
                title: title.to_string(),
                description: String::new(),
                due_date: None,
                tags: Vec::new(),
                position: i as i64,
                status: DEFAULT_TASK_STATUS.to_string(),
                data,
                created_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(seed: &Seed) -> Vec<&str> {
        seed.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_blank_template() {
        let seed = seed(TemplateType::Blank, "b1", Utc::now());
        assert_eq!(seed.groups.len(), 1);
        assert_eq!(seed.groups[0].name, "Main Table");
        assert_eq!(names(&seed), vec!["Status", "Due Date"]);
        assert_eq!(seed.columns[0].column_type, ColumnType::Status);
        assert!(seed.columns[0].settings.has_option("Done"));
        assert!(seed.tasks.is_empty());
    }

    #[test]
    fn test_software_template_column_types() {
        let seed = seed(TemplateType::Software, "b1", Utc::now());
        let types: Vec<ColumnType> = seed.columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Text,
                ColumnType::DevTool,
                ColumnType::YoutubePlaylist,
                ColumnType::Status
            ]
        );
        let positions: Vec<i64> = seed.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_crm_template() {
        let seed = seed(TemplateType::Crm, "b1", Utc::now());
        assert_eq!(seed.groups[0].name, "Leads");
        assert_eq!(names(&seed), vec!["Contact", "Stage", "Value", "Last Contact"]);
        assert_eq!(seed.columns[2].column_type, ColumnType::Number);
    }

    #[test]
    fn test_smart_template_seeds_guidance_tasks() {
        let seed = seed(TemplateType::Smart, "b1", Utc::now());
        assert_eq!(seed.groups[0].name, "Core Framework");
        assert_eq!(seed.columns.len(), 5);
        assert_eq!(seed.tasks.len(), 2);

        let group_id = seed.groups[0].id.clone();
        for (i, task) in seed.tasks.iter().enumerate() {
            assert_eq!(task.group_id.as_deref(), Some(group_id.as_str()));
            assert_eq!(task.position, i as i64);
            assert_eq!(task.data.len(), 4);
            assert!(task.data.keys().all(|k| seed.columns.iter().any(|c| &c.id == k)));
        }
    }

    #[test]
    fn test_every_column_belongs_to_board() {
        for template in [
            TemplateType::Blank,
            TemplateType::Todo,
            TemplateType::Software,
            TemplateType::Crm,
            TemplateType::Smart,
        ] {
            let seed = seed(template, "board-x", Utc::now());
            assert!(seed.columns.iter().all(|c| c.board_id == "board-x"));
            assert!(seed.groups.iter().all(|g| g.board_id == "board-x"));
        }
    }
}
