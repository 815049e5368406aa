//! Integration tests for Taskboard
//!
//! These tests verify end-to-end functionality including:
//! - Board lifecycle and cascading deletes
//! - Persistence round-trips through file storage
//! - Export, import and clear-all workflows

use std::path::Path;
use taskboard::config::StoreConfig;
use taskboard::models::{BoardState, CellValue, ColumnPatch, ColumnType, TaskPatch, TemplateType};
use taskboard::services::BoardStore;
use taskboard::storage::{FileStorage, MemoryStorage, StatePersistence};
use tempfile::TempDir;

/// Helper to open a store backed by files in `dir`
fn open_file_store(dir: &Path) -> BoardStore {
    let storage = FileStorage::new(dir).unwrap();
    BoardStore::open(StatePersistence::new(Box::new(storage)), StoreConfig::default())
}

fn open_memory_store() -> BoardStore {
    let persistence = StatePersistence::new(Box::new(MemoryStorage::new()));
    BoardStore::open(persistence, StoreConfig::default())
}

#[test]
fn test_todo_board_progress_scenario() {
    let mut store = open_memory_store();

    let board = store.create_board("Chores", TemplateType::Todo, None);
    let group_id = store.state().board_groups(&board.id)[0].id.clone();

    let task = store.create_task("", "Take out trash", Some(&group_id)).unwrap();
    assert_eq!(store.state().board_progress(&board.id), 0);

    store
        .update_task(
            &task.id,
            TaskPatch {
                status: Some("Done".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert_eq!(store.state().board_progress(&board.id), 100);
    assert_eq!(store.state().board_task_count(&board.id), 1);
}

#[test]
fn test_delete_board_leaves_no_references() {
    let mut store = open_memory_store();

    let doomed = store.create_board("Doomed", TemplateType::Smart, None);
    let kept = store.create_board("Kept", TemplateType::Crm, None);
    let extra_group = store.create_group(&doomed.id, "Extra").unwrap();
    store.create_task("", "one more", Some(&extra_group.id)).unwrap();
    let kept_group = store.state().board_groups(&kept.id)[0].id.clone();
    let kept_task = store.create_task("", "survivor", Some(&kept_group)).unwrap();

    store.delete_board(&doomed.id).unwrap();

    let state = store.state();
    assert!(state.board(&doomed.id).is_none());
    assert!(state.groups.iter().all(|g| g.board_id != doomed.id));
    assert!(state.columns.iter().all(|c| c.board_id != doomed.id));
    for task in &state.tasks {
        let group_id = task.group_id.as_deref().unwrap();
        assert_eq!(state.group(group_id).unwrap().board_id, kept.id);
    }
    assert!(state.task(&kept_task.id).is_some());
    assert_eq!(state.board_columns(&kept.id).len(), 4);
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let (board_id, expected) = {
        let mut store = open_file_store(temp_dir.path());
        let board = store.create_board("Launch", TemplateType::Software, Some("#a25ddc"));
        let group_id = store.state().board_groups(&board.id)[0].id.clone();
        let status_col = store
            .state()
            .board_columns(&board.id)
            .into_iter()
            .find(|c| c.column_type == ColumnType::Status)
            .unwrap()
            .id
            .clone();

        let task = store.create_task("", "Write landing page", Some(&group_id)).unwrap();
        store
            .set_task_value(&task.id, &status_col, CellValue::text("Working on it"))
            .unwrap();
        store
            .update_task(
                &task.id,
                TaskPatch {
                    tags: Some(vec!["web".to_string(), "copy".to_string()]),
                    description: Some("Hero section and pricing".to_string()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        store.toggle_pin_board(&board.id).unwrap();

        (board.id, store.state().clone())
    };

    let reopened = open_file_store(temp_dir.path());
    assert_eq!(reopened.state(), &expected);
    assert!(reopened.state().board(&board_id).unwrap().pinned);
}

#[test]
fn test_save_then_load_is_identity() {
    let storage = MemoryStorage::new();
    let persistence = StatePersistence::new(Box::new(storage.clone()));
    let mut store = BoardStore::open(persistence, StoreConfig::default());

    for template in [
        TemplateType::Blank,
        TemplateType::Todo,
        TemplateType::Software,
        TemplateType::Crm,
        TemplateType::Smart,
    ] {
        let board = store.create_board(template.as_str(), template, None);
        let group = store.create_group(&board.id, "Backlog").unwrap();
        store.create_task("", "item", Some(&group.id)).unwrap();
    }
    let crm_board = store.state().boards[3].id.clone();
    let formula_col = store
        .create_column(&crm_board, "Total", ColumnType::Number)
        .unwrap();
    store
        .update_column(
            &formula_col.id,
            ColumnPatch {
                formula: Some(Some("=SUM(Value)".to_string())),
                ..ColumnPatch::default()
            },
        )
        .unwrap();

    let loaded = StatePersistence::new(Box::new(storage)).try_load().unwrap().unwrap();
    assert_eq!(&loaded, store.state());
}

#[test]
fn test_crm_formula_column() {
    let mut store = open_memory_store();
    let board = store.create_board("Pipeline", TemplateType::Crm, None);
    let group_id = store.state().board_groups(&board.id)[0].id.clone();
    let value_col = store
        .state()
        .board_columns(&board.id)
        .into_iter()
        .find(|c| c.name == "Value")
        .unwrap()
        .id
        .clone();

    for amount in [1200.0, 800.0, 500.0] {
        let task = store.create_task("", "Deal", Some(&group_id)).unwrap();
        store
            .set_task_value(&task.id, &value_col, CellValue::Number(amount))
            .unwrap();
    }
    store.create_task("", "No value yet", Some(&group_id)).unwrap();

    let total = store.create_column(&board.id, "Pipeline Total", ColumnType::Number).unwrap();
    store
        .update_column(
            &total.id,
            ColumnPatch {
                formula: Some(Some("=AVG(value)".to_string())),
                ..ColumnPatch::default()
            },
        )
        .unwrap();

    assert_eq!(store.state().evaluate_column_formula(&total.id), Some(Ok(2500.0 / 3.0)));
}

#[test]
fn test_export_import_and_clear_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");
    let export_dir = temp_dir.path().join("exports");

    let mut store = open_file_store(&data_dir);
    store.create_board("Work", TemplateType::Todo, None);
    store.create_board("Home", TemplateType::Blank, None);
    let snapshot = store.state().clone();

    let path = store.export_to_dir(&export_dir).unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("taskboard-export-"));
    assert!(file_name.ends_with(".json"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  \"boards\": ["));

    store.clear_all().unwrap();
    assert_eq!(store.state(), &BoardState::default());
    assert!(!data_dir.join("taskboard-state.json").exists());

    // A cleared store reopens empty
    assert_eq!(open_file_store(&data_dir).state(), &BoardState::default());

    store.import_from_path(&path).unwrap();
    assert_eq!(store.state(), &snapshot);
    assert_eq!(open_file_store(&data_dir).state(), &snapshot);
}

#[test]
fn test_import_drops_orphans() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
            "boards": [{"id": "b1", "name": "Legacy"}],
            "groups": [{"id": "g1", "boardId": "b1"}, {"id": "g9", "boardId": "gone"}],
            "tasks": [
                {"id": "t1", "groupId": "g1", "status": "done"},
                {"id": "t2", "groupId": "g9"}
            ]
        }"#,
    )
    .unwrap();

    let mut store = open_memory_store();
    store.import_from_path(&path).unwrap();

    assert_eq!(store.state().groups.len(), 1);
    assert_eq!(store.state().tasks.len(), 1);
    assert_eq!(store.state().board_progress("b1"), 100);
}

#[test]
fn test_corrupt_saved_state_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("taskboard-state.json"), "{\"boards\": [").unwrap();

    let mut store = open_file_store(temp_dir.path());
    assert_eq!(store.state(), &BoardState::default());

    // The next mutation overwrites the corrupt slot
    store.create_board("Fresh", TemplateType::Blank, None);
    assert_eq!(open_file_store(temp_dir.path()).state().boards.len(), 1);
}

#[test]
fn test_recently_opened_board_becomes_focus() {
    let mut store = open_memory_store();
    let first = store.create_board("First", TemplateType::Blank, None);
    store.create_board("Second", TemplateType::Blank, None);

    store.open_board(&first.id).unwrap();
    assert_eq!(store.state().current_focus_board().unwrap().id, first.id);

    let third = store.create_board("Third", TemplateType::Blank, None);
    store.toggle_pin_board(&third.id).unwrap();
    store.open_board(&first.id).unwrap();
    assert_eq!(store.state().current_focus_board().unwrap().id, third.id);
}
