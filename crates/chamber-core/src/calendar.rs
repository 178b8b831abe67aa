use std::fmt;

use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;

use crate::datetime::{
  from_epoch_millis,
  parse_date_text,
  to_project_date
};
use crate::records::{
  CommitteeRef,
  EventRecord,
  MeetingRecord,
  ProjectRecord,
  RecordId
};

pub const MEETING_COLOR: &str =
  "#10B981";
pub const EVENT_COLOR: &str = "#8B5CF6";
pub const PROJECT_COLOR: &str =
  "#F59E0B";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CalendarItemKind {
  Event,
  Meeting,
  Project
}

impl CalendarItemKind {
  pub fn as_str(self) -> &'static str {
    match self {
      | CalendarItemKind::Event => {
        "event"
      }
      | CalendarItemKind::Meeting => {
        "meeting"
      }
      | CalendarItemKind::Project => {
        "project"
      }
    }
  }

  pub fn color(self) -> &'static str {
    match self {
      | CalendarItemKind::Event => {
        EVENT_COLOR
      }
      | CalendarItemKind::Meeting => {
        MEETING_COLOR
      }
      | CalendarItemKind::Project => {
        PROJECT_COLOR
      }
    }
  }

  pub fn all_day(self) -> bool {
    matches!(
      self,
      CalendarItemKind::Project
    )
  }
}

impl fmt::Display for CalendarItemKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr
  for CalendarItemKind
{
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "event" | "events" => {
        Ok(CalendarItemKind::Event)
      }
      | "meeting" | "meetings" => {
        Ok(CalendarItemKind::Meeting)
      }
      | "project" | "projects" => {
        Ok(CalendarItemKind::Project)
      }
      | other => {
        Err(anyhow::anyhow!(
          "unknown calendar item kind: \
           {other}"
        ))
      }
    }
  }
}

/// A start or end value as read from a source record. Unparseable input is
/// kept as `Invalid` instead of being dropped, so callers decide how to
/// render it.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CalendarTime {
  At(DateTime<Utc>),
  Invalid { raw: Value }
}

impl CalendarTime {
  pub fn from_value(
    raw: &Value
  ) -> Self {
    let parsed = match raw {
      | Value::String(text) => {
        parse_date_text(text)
      }
      | Value::Number(number) => {
        match number.as_i64() {
          | Some(millis) => {
            from_epoch_millis(millis)
          }
          | None => {
            Err(anyhow::anyhow!(
              "non-integer timestamp"
            ))
          }
        }
      }
      | _ => {
        Err(anyhow::anyhow!(
          "not a date-like value"
        ))
      }
    };

    match parsed {
      | Ok(at) => CalendarTime::At(at),
      | Err(err) => {
        tracing::trace!(
          raw = %raw,
          error = %err,
          "keeping invalid calendar date"
        );
        CalendarTime::Invalid {
          raw: raw.clone()
        }
      }
    }
  }

  pub fn instant(
    &self
  ) -> Option<DateTime<Utc>> {
    match self {
      | CalendarTime::At(at) => Some(*at),
      | CalendarTime::Invalid {
        ..
      } => None
    }
  }

  pub fn is_valid(&self) -> bool {
    self.instant().is_some()
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct CalendarItem {
  pub id:        String,
  pub title:     String,
  pub start:     CalendarTime,
  pub end:       CalendarTime,
  pub all_day:   bool,
  pub kind:      CalendarItemKind,
  pub committee: Option<String>,
  pub location:  Option<String>,
  pub color:     String,
  pub entity_id: RecordId
}

struct SourceFields<'a> {
  id:        &'a RecordId,
  title:     Option<&'a str>,
  start:     &'a Value,
  end:       &'a Value,
  committee: Option<&'a CommitteeRef>,
  location:  Option<&'a str>
}

fn build_item(
  kind: CalendarItemKind,
  source: SourceFields<'_>
) -> CalendarItem {
  CalendarItem {
    id:        format!(
      "{}-{}",
      kind.as_str(),
      source.id
    ),
    title:     source
      .title
      .unwrap_or_default()
      .to_string(),
    start:     CalendarTime::from_value(
      source.start
    ),
    end:       CalendarTime::from_value(
      source.end
    ),
    all_day:   kind.all_day(),
    kind,
    committee: source
      .committee
      .map(|c| c.name().to_string()),
    location:  source
      .location
      .map(str::to_string),
    color:     kind.color().to_string(),
    entity_id: source.id.clone()
  }
}

/// Flattens the three calendar sources into one list.
///
/// Output order is meetings, then events, then projects, each in input
/// order. Nothing is sorted, validated or dropped.
#[tracing::instrument(skip_all, fields(
  meetings = meetings.len(),
  events = events.len(),
  projects = projects.len()
))]
pub fn combine_calendar_items(
  meetings: &[MeetingRecord],
  events: &[EventRecord],
  projects: &[ProjectRecord]
) -> Vec<CalendarItem> {
  let mut items = Vec::with_capacity(
    meetings.len()
      + events.len()
      + projects.len()
  );

  items.extend(meetings.iter().map(
    |meeting| {
      build_item(
        CalendarItemKind::Meeting,
        SourceFields {
          id:        &meeting.id,
          title:     meeting
            .title
            .as_deref(),
          start:     &meeting.date,
          end:       &meeting.end_date,
          committee: meeting
            .committee
            .as_ref(),
          location:  meeting
            .location
            .as_deref()
        }
      )
    }
  ));

  items.extend(events.iter().map(
    |event| {
      build_item(
        CalendarItemKind::Event,
        SourceFields {
          id:        &event.id,
          title:     event
            .title
            .as_deref(),
          start:     &event.start_date,
          end:       &event.end_date,
          committee: event
            .committee
            .as_ref(),
          location:  event
            .location
            .as_deref()
        }
      )
    }
  ));

  items.extend(projects.iter().map(
    |project| {
      build_item(
        CalendarItemKind::Project,
        SourceFields {
          id:        &project.id,
          title:     project
            .title
            .as_deref(),
          start:     &project.start_date,
          end:       &project.end_date,
          committee: project
            .committee
            .as_ref(),
          location:  project
            .location
            .as_deref()
        }
      )
    }
  ));

  let invalid = items
    .iter()
    .filter(|item| {
      !item.start.is_valid()
        || !item.end.is_valid()
    })
    .count();
  if invalid > 0 {
    tracing::debug!(
      invalid,
      "calendar items with unparseable dates"
    );
  }

  items
}

/// Items starting at or after `now`, soonest first. Items without a valid
/// start are skipped.
pub fn upcoming(
  items: &[CalendarItem],
  now: DateTime<Utc>,
  limit: usize
) -> Vec<CalendarItem> {
  let mut future: Vec<_> = items
    .iter()
    .filter(|item| {
      item
        .start
        .instant()
        .is_some_and(|at| at >= now)
    })
    .cloned()
    .collect();
  future.sort_by_key(|item| {
    item.start.instant()
  });
  future.truncate(limit);
  future
}

/// Items whose span covers `date` in the project timezone. An invalid end
/// is treated as a single-day item.
pub fn items_on(
  items: &[CalendarItem],
  date: NaiveDate
) -> Vec<&CalendarItem> {
  items
    .iter()
    .filter(|item| {
      let Some(start) =
        item.start.instant()
      else {
        return false;
      };
      let first = to_project_date(start);
      let last = item
        .end
        .instant()
        .map(to_project_date)
        .filter(|end| *end >= first)
        .unwrap_or(first);
      first <= date && date <= last
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn meeting(
    id: i64,
    date: &str
  ) -> MeetingRecord {
    serde_json::from_value(json!({
      "id": id,
      "title": format!("Meeting {id}"),
      "date": date,
      "end_date": date
    }))
    .expect("meeting fixture")
  }

  #[test]
  fn single_meeting_becomes_timed_green_item()
  {
    let items = combine_calendar_items(
      &[meeting(1, "2024-01-01")],
      &[],
      &[]
    );
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.id, "meeting-1");
    assert_eq!(
      item.kind,
      CalendarItemKind::Meeting
    );
    assert!(!item.all_day);
    assert_eq!(item.color, "#10B981");
    assert_eq!(
      item.entity_id,
      RecordId::Int(1)
    );
  }

  #[test]
  fn empty_inputs_yield_empty_output() {
    assert!(
      combine_calendar_items(
        &[],
        &[],
        &[]
      )
      .is_empty()
    );
  }

  #[test]
  fn unparseable_dates_are_kept_as_invalid()
  {
    let items = combine_calendar_items(
      &[meeting(2, "someday")],
      &[],
      &[]
    );
    assert_eq!(items.len(), 1);
    assert_eq!(
      items[0].start,
      CalendarTime::Invalid {
        raw: json!("someday")
      }
    );
  }

  #[test]
  fn numbers_are_epoch_millis() {
    let time = CalendarTime::from_value(
      &json!(1_704_067_200_000_i64)
    );
    assert_eq!(
      time
        .instant()
        .map(|at| at.to_rfc3339()),
      Some(
        "2024-01-01T00:00:00+00:00"
          .to_string()
      )
    );
  }

  #[test]
  fn upcoming_sorts_and_skips_past_and_invalid()
  {
    let items = combine_calendar_items(
      &[
        meeting(1, "2030-03-01"),
        meeting(2, "2020-01-01"),
        meeting(3, "bogus"),
        meeting(4, "2030-01-01"),
      ],
      &[],
      &[]
    );
    let now = parse_date_text(
      "2025-01-01T00:00:00Z"
    )
    .expect("now");
    let ids: Vec<_> =
      upcoming(&items, now, 10)
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![
      "meeting-4",
      "meeting-1"
    ]);
  }
}
