use anyhow::Context;
use serde::{
  Deserialize,
  Serialize
};

use crate::calendar::{
  CalendarItem,
  combine_calendar_items
};
use crate::records::{
  EventRecord,
  MeetingRecord,
  ProjectRecord,
  RecordId,
  TaskRecord,
  UserRecord
};

/// Everything the views render, as handed over by the data layer.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Serialize,
  Deserialize,
)]
pub struct ChamberSnapshot {
  #[serde(default)]
  pub meetings: Vec<MeetingRecord>,
  #[serde(default)]
  pub events:   Vec<EventRecord>,
  #[serde(default)]
  pub projects: Vec<ProjectRecord>,
  #[serde(default)]
  pub tasks:    Vec<TaskRecord>,
  #[serde(default)]
  pub users:    Vec<UserRecord>
}

impl ChamberSnapshot {
  pub fn from_json_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    serde_json::from_str(raw).context(
      "failed to parse chamber snapshot"
    )
  }

  pub fn calendar_items(
    &self
  ) -> Vec<CalendarItem> {
    combine_calendar_items(
      &self.meetings,
      &self.events,
      &self.projects
    )
  }

  pub fn event(
    &self,
    id: &str
  ) -> Option<&EventRecord> {
    self
      .events
      .iter()
      .find(|event| event.id.matches_text(id))
  }

  pub fn tasks_for_project(
    &self,
    project_id: &RecordId
  ) -> Vec<&TaskRecord> {
    self
      .tasks
      .iter()
      .filter(|task| {
        task.project_id.as_ref()
          == Some(project_id)
      })
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.meetings.is_empty()
      && self.events.is_empty()
      && self.projects.is_empty()
      && self.tasks.is_empty()
      && self.users.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_snapshot_defaults_missing_lists()
  {
    let snapshot =
      ChamberSnapshot::from_json_str(
        r#"{"events":[{"id":"e1","title":"Gala","start_date":"2024-09-01T18:00:00Z"}]}"#
      )
      .expect("parse snapshot");

    assert!(snapshot.meetings.is_empty());
    assert_eq!(snapshot.events.len(), 1);
    assert!(snapshot.event("e1").is_some());
    assert_eq!(
      snapshot.calendar_items()[0].id,
      "event-e1"
    );
  }

  #[test]
  fn malformed_snapshot_is_an_error() {
    assert!(
      ChamberSnapshot::from_json_str(
        "{\"tasks\": 3}"
      )
      .is_err()
    );
  }
}
