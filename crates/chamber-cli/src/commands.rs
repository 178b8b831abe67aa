use anyhow::{Context, anyhow};
use chamber_core::board::{KanbanBoard, Lane};
use chamber_core::calendar::CalendarItemKind;
use chamber_core::dashboard::DashboardSummary;
use chamber_core::due_date::{DueDate, DueDateField, normalize_due_date};
use chamber_core::permissions::{Capability, Role, role_allows};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::cli::Command;
use crate::config::Config;
use crate::datastore::DataStore;
use crate::render::Renderer;

#[instrument(skip(store, cfg, renderer))]
pub fn dispatch(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    let now = Utc::now();
    debug!(?command, "dispatching command");

    match command {
        Command::Calendar { json, kind } => cmd_calendar(store, renderer, json, kind),
        Command::Permissions { role } => {
            let roles = role.map(|role| vec![role]).unwrap_or_else(|| Role::ALL.to_vec());
            renderer.print_permissions(&roles)
        }
        Command::Can { role, capability } => {
            println!("{}", if role_allows(role, capability) { "yes" } else { "no" });
            Ok(())
        }
        Command::Due { value, json } => {
            let due = normalize_due_input(&value, json)?;
            renderer.print_due(due.as_ref())
        }
        Command::Board => {
            let board = KanbanBoard::from_tasks(&store.load_tasks()?);
            let soon_days = cfg.get_parsed::<i64>("dashboard.due_soon_days")?;
            renderer.print_board(&board, now, soon_days)
        }
        Command::Move { task_id, lane } => {
            require_capability(cfg, Capability::Update)?;
            if move_task(store, &task_id, lane)? {
                println!("moved task {task_id} to {}", lane.label());
            } else {
                println!("task {task_id} already in {}", lane.label());
            }
            Ok(())
        }
        Command::Dashboard { json } => cmd_dashboard(store, cfg, renderer, json, now),
        Command::Users => {
            require_capability(cfg, Capability::Read)?;
            let snapshot = store.load_snapshot()?;
            renderer.print_users(&snapshot.users)
        }
        Command::Show => cmd_show(cfg),
    }
}

fn cmd_calendar(
    store: &DataStore,
    renderer: &mut Renderer,
    json: bool,
    kind: Option<CalendarItemKind>,
) -> anyhow::Result<()> {
    let snapshot = store.load_snapshot()?;
    let items: Vec<_> = snapshot
        .calendar_items()
        .into_iter()
        .filter(|item| kind.is_none_or(|kind| item.kind == kind))
        .collect();
    info!(count = items.len(), "aggregated calendar items");

    if json {
        for item in &items {
            println!("{}", serde_json::to_string(item)?);
        }
        return Ok(());
    }
    renderer.print_calendar(&items)
}

fn cmd_dashboard(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    json: bool,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let snapshot = store.load_snapshot()?;
    let summary = DashboardSummary::build(
        &snapshot,
        now,
        cfg.get_parsed::<usize>("dashboard.upcoming")?,
        cfg.get_parsed::<i64>("dashboard.due_soon_days")?,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    renderer.print_dashboard(&summary)
}

fn cmd_show(cfg: &Config) -> anyhow::Result<()> {
    for file in &cfg.loaded_files {
        println!("# loaded {}", file.display());
    }
    for (key, value) in cfg.iter() {
        println!("{key}={value}");
    }
    Ok(())
}

/// Errors only on malformed `--json` input; the value itself always
/// normalizes to something or nothing.
pub fn normalize_due_input(raw: &str, json: bool) -> anyhow::Result<Option<DueDate>> {
    let field = if json {
        let value: Value = serde_json::from_str(raw)
            .with_context(|| format!("due value is not valid JSON: {raw}"))?;
        DueDateField::from_json(&value)
    } else if raw.trim().is_empty() {
        DueDateField::Missing
    } else {
        DueDateField::Text(raw.to_string())
    };
    Ok(normalize_due_date(&field))
}

/// Applies a board drop and persists it. Returns whether the lane changed.
#[instrument(skip(store))]
pub fn move_task(store: &DataStore, task_id: &str, lane: Lane) -> anyhow::Result<bool> {
    let mut board = KanbanBoard::from_tasks(&store.load_tasks()?);
    let changed = board.move_task(task_id, lane)?;
    if changed {
        store.save_tasks(board.tasks())?;
    }
    Ok(changed)
}

pub fn require_capability(cfg: &Config, capability: Capability) -> anyhow::Result<()> {
    let role = cfg.session_role()?;
    if role_allows(role, capability) {
        return Ok(());
    }
    Err(anyhow!(
        "role {role} is not allowed to {capability}; set session.role to a role that can"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strings_and_json_literals_normalize() {
        let due = normalize_due_input("2024-05-01T00:00:00Z", false)
            .expect("plain input")
            .and_then(|due| due.instant());
        assert_eq!(due.map(|at| at.to_rfc3339()), Some("2024-05-01T00:00:00+00:00".to_string()));

        assert_eq!(normalize_due_input("", false).expect("empty input"), None);
        assert_eq!(normalize_due_input("null", true).expect("null literal"), None);
        assert!(matches!(
            normalize_due_input(r#"{"__type":"Date","value":"2024-01-01"}"#, true)
                .expect("serialized literal"),
            Some(DueDate::Serialized(_))
        ));
        assert!(normalize_due_input("{oops", true).is_err());
    }

    #[test]
    fn member_session_cannot_update() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vec![("session.role".to_string(), "member".to_string())]);
        assert!(require_capability(&cfg, Capability::Read).is_ok());
        let err = require_capability(&cfg, Capability::Update).expect_err("member update");
        assert!(err.to_string().contains("not allowed to update"));
    }
}
