use std::fs;

use chamber_cli::commands::move_task;
use chamber_cli::datastore::DataStore;
use chamber_core::board::Lane;
use chamber_core::snapshot::ChamberSnapshot;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
  "meetings": [{ "id": 1, "title": "Board", "date": "2024-01-01", "end_date": "2024-01-01" }],
  "events": [{ "id": 1, "title": "Mixer", "start_date": "2024-02-01T18:00:00Z" }],
  "tasks": [
    { "id": 5, "title": "Print flyers", "status": "todo", "due_date": "2024-01-15" },
    { "id": 6, "title": "Order catering", "status": "in_progress" }
  ],
  "users": [{ "id": "u1", "name": "Ada", "email": "ada@example.org", "role": "board" }]
}"#;

#[test]
fn snapshot_roundtrip_and_drop_persist() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let snapshot = ChamberSnapshot::from_json_str(SNAPSHOT).expect("parse snapshot");
    store.save_snapshot(&snapshot).expect("seed datastore");

    let loaded = store.load_snapshot().expect("load snapshot");
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.calendar_items().len(), 2);

    assert!(move_task(&store, "5", Lane::Done).expect("move task"));
    assert!(!move_task(&store, "5", Lane::Done).expect("repeat move"));
    assert!(move_task(&store, "404", Lane::Done).is_err());

    let tasks = store.load_tasks().expect("reload tasks");
    assert_eq!(tasks[0].status, Lane::Done);
    assert_eq!(tasks[1].status, Lane::InProgress);
}

#[test]
fn missing_files_read_as_empty_and_bad_lines_fail() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    assert!(store.load_snapshot().expect("empty snapshot").is_empty());

    fs::write(&store.events_path, "{\"id\": 1}\nnot json\n").expect("write events");
    let err = store.load_snapshot().expect_err("malformed events");
    assert!(format!("{err:#}").contains("events.data"));
}
