use chamber_core::board::{KanbanBoard, Lane};
use chamber_core::calendar::{CalendarItemKind, combine_calendar_items};
use chamber_core::dashboard::DashboardSummary;
use chamber_core::datetime::parse_date_text;
use chamber_core::permissions::{Capability, Role, role_allows};
use chamber_core::snapshot::ChamberSnapshot;
use serde_json::json;

fn sample_snapshot() -> ChamberSnapshot {
    serde_json::from_value(json!({
        "meetings": [
            { "id": 1, "title": "Board meeting", "date": "2030-01-10T17:00:00Z",
              "end_date": "2030-01-10T18:00:00Z", "committee": "Executive", "location": "Hall A" },
            { "id": 2, "title": "Budget review", "date": "2020-01-01", "end_date": "2020-01-01" }
        ],
        "events": [
            { "id": 1, "title": "Gala", "start_date": "2030-02-01T19:00:00Z",
              "end_date": "2030-02-01T23:00:00Z", "committee": { "name": "Events" },
              "rsvps": [ { "user_id": 1, "attending": true }, { "user_id": 2, "attending": false } ] }
        ],
        "projects": [
            { "id": "p-9", "title": "Main street cleanup", "start_date": "2030-01-01",
              "end_date": "2030-03-01", "status": "active" }
        ],
        "tasks": [
            { "id": 10, "title": "Book venue", "status": "todo", "due_date": "2024-01-01", "project_id": "p-9" },
            { "id": 11, "title": "Send invites", "status": "in_progress",
              "due_date": { "__type": "Date", "value": "2024-06-03T00:00:00Z" } },
            { "id": 12, "title": "Archive minutes", "status": "done" }
        ],
        "users": [
            { "id": 1, "name": "Ada", "role": "superadmin" },
            { "id": 2, "name": "Lin", "role": "member" }
        ]
    }))
    .expect("snapshot fixture")
}

#[test]
fn aggregation_preserves_count_order_and_prefixed_ids() {
    let snapshot = sample_snapshot();
    let items = combine_calendar_items(&snapshot.meetings, &snapshot.events, &snapshot.projects);

    assert_eq!(
        items.len(),
        snapshot.meetings.len() + snapshot.events.len() + snapshot.projects.len()
    );
    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["meeting-1", "meeting-2", "event-1", "project-p-9"]);

    let project = &items[3];
    assert_eq!(project.kind, CalendarItemKind::Project);
    assert!(project.all_day);
    assert_eq!(project.color, "#F59E0B");
    assert_eq!(items[2].committee.as_deref(), Some("Events"));
    assert_eq!(items[2].color, "#8B5CF6");
    assert_eq!(items[0].location.as_deref(), Some("Hall A"));
}

#[test]
fn ids_stay_unique_when_source_ids_collide() {
    let snapshot = sample_snapshot();
    let items = snapshot.calendar_items();
    let mut ids: Vec<_> = items.iter().map(|item| item.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), items.len());
}

#[test]
fn dashboard_summarizes_snapshot() {
    let snapshot = sample_snapshot();
    let now = parse_date_text("2024-06-01T00:00:00Z").expect("now");
    let summary = DashboardSummary::build(&snapshot, now, 2, 7);

    assert_eq!(summary.meetings, 2);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.projects, 1);
    let upcoming: Vec<_> = summary.upcoming.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(upcoming, vec!["project-p-9", "meeting-1"]);
    assert_eq!(summary.overdue_tasks, 1);
    assert_eq!(summary.due_soon_tasks, 1);
    assert_eq!(summary.open_tasks(), 2);
    assert_eq!(summary.users_per_role.get(&Role::Member), Some(&1));
    assert_eq!(snapshot.events[0].attending_count(), 1);
}

#[test]
fn board_drop_respects_permissions_at_the_caller() {
    let snapshot = sample_snapshot();
    let mut board = KanbanBoard::from_tasks(&snapshot.tasks);

    assert!(!role_allows(Role::Member, Capability::Update));
    assert!(role_allows(Role::Staff, Capability::Update));

    assert!(board.move_task("10", Lane::Done).expect("move"));
    assert_eq!(board.lane(Lane::Done).len(), 2);
    assert_eq!(snapshot.tasks_for_project(&"p-9".into()).len(), 1);
}

#[test]
fn unknown_roles_and_statuses_do_not_fail_the_snapshot() {
    let snapshot = ChamberSnapshot::from_json_str(
        r#"{
            "meetings": [{ "id": 1, "title": "Board meeting", "date": "2030-01-10" }],
            "tasks": [{ "id": 7, "title": "Audit books", "status": "review" }],
            "users": [
                { "id": "u1", "name": "Grace", "role": "treasurer" },
                { "id": "u2", "name": "Lin", "role": "member" }
            ]
        }"#,
    )
    .expect("lenient snapshot");

    assert_eq!(snapshot.calendar_items().len(), 1);
    assert_eq!(snapshot.tasks[0].status, Lane::Todo);

    let treasurer = &snapshot.users[0];
    assert_eq!(treasurer.role, None);
    assert!(!treasurer.permissions().allows(Capability::Read));

    let now = parse_date_text("2024-06-01T00:00:00Z").expect("now");
    let summary = DashboardSummary::build(&snapshot, now, 5, 7);
    assert_eq!(summary.users_without_role, 1);
    assert_eq!(summary.users_per_role.get(&Role::Member), Some(&1));
}
