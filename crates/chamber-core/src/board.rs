use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  DateTime,
  Duration,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

use crate::due_date::normalize_due_value;
use crate::records::TaskRecord;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
  #[default]
  Todo,
  InProgress,
  Done
}

impl Lane {
  pub const ALL: [Lane; 3] =
    [Lane::Todo, Lane::InProgress, Lane::Done];

  pub fn as_str(self) -> &'static str {
    match self {
      | Lane::Todo => "todo",
      | Lane::InProgress => {
        "in_progress"
      }
      | Lane::Done => "done"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Lane::Todo => "To do",
      | Lane::InProgress => {
        "In progress"
      }
      | Lane::Done => "Done"
    }
  }

  pub fn next(self) -> Lane {
    match self {
      | Lane::Todo => Lane::InProgress,
      | Lane::InProgress => Lane::Done,
      | Lane::Done => Lane::Todo
    }
  }
}

impl fmt::Display for Lane {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Lane {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let normalized = s
      .trim()
      .to_ascii_lowercase()
      .replace(['-', ' '], "_");
    match normalized.as_str() {
      | "todo" | "to_do" => {
        Ok(Lane::Todo)
      }
      | "in_progress" | "doing"
      | "working" => Ok(Lane::InProgress),
      | "done" | "finished" => {
        Ok(Lane::Done)
      }
      | _ => {
        Err(anyhow!("unknown lane: {s}"))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum DueStatus {
  Overdue,
  DueSoon,
  Later,
  NoDueDate
}

impl DueStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      | DueStatus::Overdue => "overdue",
      | DueStatus::DueSoon => "due-soon",
      | DueStatus::Later => "later",
      | DueStatus::NoDueDate => "none"
    }
  }
}

/// Classifies a task's due date relative to `now`. Done tasks are never
/// overdue.
pub fn due_status(
  task: &TaskRecord,
  now: DateTime<Utc>,
  soon_days: i64
) -> DueStatus {
  let Some(due) = normalize_due_value(
    &task.due_date
  )
  .and_then(|due| due.instant()) else {
    return DueStatus::NoDueDate;
  };

  if task.status == Lane::Done {
    return DueStatus::Later;
  }
  if due < now {
    return DueStatus::Overdue;
  }
  // A window past the representable range has no upper bound.
  let horizon = Duration::try_days(soon_days)
    .and_then(|window| {
      now.checked_add_signed(window)
    });
  match horizon {
    | Some(horizon) if due > horizon => {
      DueStatus::Later
    }
    | _ => DueStatus::DueSoon
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
  tasks: Vec<TaskRecord>
}

impl KanbanBoard {
  pub fn from_tasks(
    tasks: &[TaskRecord]
  ) -> Self {
    Self {
      tasks: tasks.to_vec()
    }
  }

  pub fn tasks(&self) -> &[TaskRecord] {
    &self.tasks
  }

  pub fn into_tasks(
    self
  ) -> Vec<TaskRecord> {
    self.tasks
  }

  /// Tasks in `lane`, in board order.
  pub fn lane(
    &self,
    lane: Lane
  ) -> Vec<&TaskRecord> {
    self
      .tasks
      .iter()
      .filter(|task| task.status == lane)
      .collect()
  }

  pub fn lanes(
    &self
  ) -> Vec<(Lane, Vec<&TaskRecord>)> {
    Lane::ALL
      .into_iter()
      .map(|lane| (lane, self.lane(lane)))
      .collect()
  }

  /// Drop handler: moves the task whose id renders as `task_id` into
  /// `lane`. Returns whether anything changed.
  #[tracing::instrument(skip(self))]
  pub fn move_task(
    &mut self,
    task_id: &str,
    lane: Lane
  ) -> anyhow::Result<bool> {
    let task = self
      .tasks
      .iter_mut()
      .find(|task| {
        task.id.matches_text(task_id)
      })
      .ok_or_else(|| {
        anyhow!(
          "no task with id {task_id}"
        )
      })?;

    if task.status == lane {
      tracing::debug!(
        "task already in target lane"
      );
      return Ok(false);
    }

    tracing::info!(
      from = %task.status,
      to = %lane,
      "moved task"
    );
    task.status = lane;
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::datetime::parse_date_text;

  fn task(
    id: i64,
    status: &str,
    due: serde_json::Value
  ) -> TaskRecord {
    serde_json::from_value(json!({
      "id": id,
      "title": format!("Task {id}"),
      "status": status,
      "due_date": due
    }))
    .expect("task fixture")
  }

  #[test]
  fn lanes_keep_input_order() {
    let board = KanbanBoard::from_tasks(
      &[
        task(1, "todo", json!(null)),
        task(2, "done", json!(null)),
        task(3, "todo", json!(null)),
      ]
    );
    let todo: Vec<_> = board
      .lane(Lane::Todo)
      .into_iter()
      .map(|t| t.id.to_string())
      .collect();
    assert_eq!(todo, vec!["1", "3"]);
    assert!(
      board
        .lane(Lane::InProgress)
        .is_empty()
    );
  }

  #[test]
  fn move_task_changes_lane_once() {
    let mut board =
      KanbanBoard::from_tasks(&[task(
        1,
        "todo",
        json!(null)
      )]);

    assert!(
      board
        .move_task("1", Lane::Done)
        .expect("move")
    );
    assert!(
      !board
        .move_task("1", Lane::Done)
        .expect("noop move")
    );
    assert!(
      board
        .move_task("9", Lane::Todo)
        .is_err()
    );
    assert_eq!(
      board.lane(Lane::Done).len(),
      1
    );
  }

  #[test]
  fn due_status_uses_normalized_dates() {
    let now = parse_date_text(
      "2024-06-01T00:00:00Z"
    )
    .expect("now");

    assert_eq!(
      due_status(
        &task(1, "todo", json!("2024-05-01")),
        now,
        7
      ),
      DueStatus::Overdue
    );
    assert_eq!(
      due_status(
        &task(2, "todo", json!("2024-06-03")),
        now,
        7
      ),
      DueStatus::DueSoon
    );
    assert_eq!(
      due_status(
        &task(3, "done", json!("2024-05-01")),
        now,
        7
      ),
      DueStatus::Later
    );
    assert_eq!(
      due_status(
        &task(4, "todo", json!("garbage")),
        now,
        7
      ),
      DueStatus::NoDueDate
    );
  }

  #[test]
  fn oversized_soon_window_does_not_overflow() {
    let now = parse_date_text(
      "2024-01-01T00:00:00Z"
    )
    .expect("now");
    let far = task(
      1,
      "todo",
      json!("2030-01-01")
    );

    assert_eq!(
      due_status(&far, now, 1_000_000_000),
      DueStatus::DueSoon
    );
    assert_eq!(
      due_status(&far, now, i64::MAX),
      DueStatus::DueSoon
    );
    assert_eq!(
      due_status(
        &task(2, "todo", json!("2023-12-01")),
        now,
        i64::MAX
      ),
      DueStatus::Overdue
    );
  }

  #[test]
  fn lane_aliases_parse() {
    assert_eq!(
      "In Progress"
        .parse::<Lane>()
        .expect("lane"),
      Lane::InProgress
    );
    assert!("later".parse::<Lane>().is_err());
  }
}
