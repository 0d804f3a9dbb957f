use std::fs;

use chrono::NaiveDate;
use taskboard_core::{
    Category, FileKeyValueStore, Persistence, Priority, TaskDraft, TaskService, Theme,
};

fn open(dir: &tempfile::TempDir) -> TaskService<FileKeyValueStore> {
    let store = FileKeyValueStore::new(Some(dir.path().to_path_buf())).unwrap();
    TaskService::open(store)
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = open(&dir);
    let milk = service
        .create(TaskDraft {
            title: "Buy milk".to_string(),
            priority: Priority::Low,
            category: Category::Shopping,
            due_date: NaiveDate::from_ymd_opt(2024, 5, 16),
            ..TaskDraft::default()
        })
        .unwrap()
        .unwrap();
    let report = service.create(TaskDraft::new("Report")).unwrap().unwrap();
    service.toggle_complete(&report.id).unwrap();
    service.set_theme(Theme::Dark).unwrap();
    drop(service);

    let reopened = open(&dir);
    assert_eq!(reopened.theme(), Theme::Dark);
    assert_eq!(reopened.tasks().len(), 2);
    assert_eq!(reopened.tasks()[0], milk);
    assert!(reopened.tasks()[1].completed);
}

#[test]
fn stored_layout_uses_two_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = open(&dir);
    service.create(TaskDraft::new("Buy milk")).unwrap();
    service.set_theme(Theme::Light).unwrap();

    let tasks = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&tasks).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["title"], "Buy milk");
    assert_eq!(first["dueDate"], "");
    assert_eq!(first["completed"], false);
    assert!(first["createdAt"].is_string());

    let theme = fs::read_to_string(dir.path().join("darkMode.json")).unwrap();
    assert_eq!(theme, "false");
}

#[test]
fn corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tasks.json"), "{ definitely not a list").unwrap();
    fs::write(dir.path().join("darkMode.json"), "true").unwrap();

    let service = open(&dir);
    assert!(service.tasks().is_empty());
    assert_eq!(service.theme(), Theme::Dark);
}

#[test]
fn loads_records_written_by_hand() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("tasks.json"),
        r#"[{"id":"01890a5d-ac96-774b-bcce-b302099a8057","title":"Report","description":"","priority":"high","category":"work","dueDate":"2024-06-30","completed":true,"createdAt":"2024-05-01T08:00:00.000Z"}]"#,
    )
    .unwrap();

    let store = FileKeyValueStore::new(Some(dir.path().to_path_buf())).unwrap();
    let snapshot = Persistence::new(store).load();
    assert_eq!(snapshot.tasks.len(), 1);
    let task = &snapshot.tasks[0];
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 30));
    assert!(task.completed);
}
