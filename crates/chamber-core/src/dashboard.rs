use std::collections::BTreeMap;

use chrono::{
  DateTime,
  Utc
};
use serde::Serialize;

use crate::board::{
  DueStatus,
  Lane,
  due_status
};
use crate::calendar::{
  CalendarItem,
  CalendarItemKind,
  upcoming
};
use crate::permissions::Role;
use crate::snapshot::ChamberSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
  pub meetings:       usize,
  pub events:         usize,
  pub projects:       usize,
  pub upcoming:       Vec<CalendarItem>,
  pub tasks_per_lane: BTreeMap<Lane, usize>,
  pub overdue_tasks:  usize,
  pub due_soon_tasks: usize,
  pub users_per_role: BTreeMap<Role, usize>,
  pub users_without_role: usize
}

impl DashboardSummary {
  #[tracing::instrument(skip(snapshot))]
  pub fn build(
    snapshot: &ChamberSnapshot,
    now: DateTime<Utc>,
    upcoming_limit: usize,
    soon_days: i64
  ) -> Self {
    let items = snapshot.calendar_items();
    let count = |kind: CalendarItemKind| {
      items
        .iter()
        .filter(|item| item.kind == kind)
        .count()
    };

    let mut tasks_per_lane: BTreeMap<
      Lane,
      usize
    > = Lane::ALL
      .into_iter()
      .map(|lane| (lane, 0))
      .collect();
    let mut overdue_tasks = 0;
    let mut due_soon_tasks = 0;
    for task in &snapshot.tasks {
      *tasks_per_lane
        .entry(task.status)
        .or_insert(0) += 1;
      match due_status(task, now, soon_days)
      {
        | DueStatus::Overdue => {
          overdue_tasks += 1
        }
        | DueStatus::DueSoon => {
          due_soon_tasks += 1
        }
        | DueStatus::Later
        | DueStatus::NoDueDate => {}
      }
    }

    let mut users_per_role =
      BTreeMap::new();
    let mut users_without_role = 0;
    for user in &snapshot.users {
      match user.role {
        | Some(role) => {
          *users_per_role
            .entry(role)
            .or_insert(0_usize) += 1
        }
        | None => users_without_role += 1
      }
    }

    Self {
      meetings: count(
        CalendarItemKind::Meeting
      ),
      events: count(
        CalendarItemKind::Event
      ),
      projects: count(
        CalendarItemKind::Project
      ),
      upcoming: upcoming(
        &items,
        now,
        upcoming_limit
      ),
      tasks_per_lane,
      overdue_tasks,
      due_soon_tasks,
      users_per_role,
      users_without_role
    }
  }

  pub fn open_tasks(&self) -> usize {
    self
      .tasks_per_lane
      .iter()
      .filter(|(lane, _)| {
        **lane != Lane::Done
      })
      .map(|(_, count)| *count)
      .sum()
  }
}
