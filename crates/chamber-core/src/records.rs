use std::fmt;

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};
use serde_json::Value;

use crate::board::Lane;
use crate::permissions::{
  NO_ACCESS,
  Permissions,
  Role,
  permissions_for
};

/// Identifier carried by a source record. Upstream data is loosely typed, so
/// both numeric and string ids are accepted and rendered verbatim.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(untagged)]
pub enum RecordId {
  Int(i64),
  Text(String)
}

impl fmt::Display for RecordId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | RecordId::Int(value) => {
        write!(f, "{value}")
      }
      | RecordId::Text(value) => {
        f.write_str(value)
      }
    }
  }
}

impl From<i64> for RecordId {
  fn from(value: i64) -> Self {
    RecordId::Int(value)
  }
}

impl From<&str> for RecordId {
  fn from(value: &str) -> Self {
    RecordId::Text(value.to_string())
  }
}

impl RecordId {
  /// Matches ids typed by a user, where `7` and `"7"` name the same record.
  pub fn matches_text(
    &self,
    raw: &str
  ) -> bool {
    self.to_string() == raw.trim()
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(untagged)]
pub enum CommitteeRef {
  Name(String),
  Object { name: String }
}

impl CommitteeRef {
  pub fn name(&self) -> &str {
    match self {
      | CommitteeRef::Name(name) => name,
      | CommitteeRef::Object {
        name
      } => name
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct MeetingRecord {
  pub id:        RecordId,
  #[serde(default)]
  pub title:     Option<String>,
  #[serde(default)]
  pub date:      Value,
  #[serde(default)]
  pub end_date:  Value,
  #[serde(default)]
  pub committee: Option<CommitteeRef>,
  #[serde(default)]
  pub location:  Option<String>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Rsvp {
  pub user_id:   RecordId,
  #[serde(default)]
  pub attending: bool
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct EventRecord {
  pub id:          RecordId,
  #[serde(default)]
  pub title:       Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub start_date:  Value,
  #[serde(default)]
  pub end_date:    Value,
  #[serde(default)]
  pub committee:   Option<CommitteeRef>,
  #[serde(default)]
  pub location:    Option<String>,
  #[serde(default)]
  pub rsvps:       Vec<Rsvp>
}

impl EventRecord {
  pub fn attending_count(&self) -> usize {
    self
      .rsvps
      .iter()
      .filter(|rsvp| rsvp.attending)
      .count()
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct ProjectRecord {
  pub id:         RecordId,
  #[serde(default)]
  pub title:      Option<String>,
  #[serde(default)]
  pub status:     Option<String>,
  #[serde(default)]
  pub start_date: Value,
  #[serde(default)]
  pub end_date:   Value,
  #[serde(default)]
  pub committee:  Option<CommitteeRef>,
  #[serde(default)]
  pub location:   Option<String>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct TaskRecord {
  pub id:         RecordId,
  #[serde(default)]
  pub title:      String,
  #[serde(
    default,
    deserialize_with = "lenient_lane"
  )]
  pub status:     Lane,
  #[serde(default)]
  pub due_date:   Value,
  #[serde(default)]
  pub assignee:   Option<String>,
  #[serde(default)]
  pub project_id: Option<RecordId>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct UserRecord {
  pub id:    RecordId,
  pub name:  String,
  #[serde(default)]
  pub email: Option<String>,
  /// `None` when the stored role is missing or not one we know.
  #[serde(
    default,
    deserialize_with = "lenient_role"
  )]
  pub role:  Option<Role>
}

impl UserRecord {
  pub fn role_label(&self) -> &'static str {
    self
      .role
      .map_or("Unknown", Role::label)
  }

  /// Users without a recognised role get no capabilities.
  pub fn permissions(&self) -> Permissions {
    self
      .role
      .map_or(NO_ACCESS, permissions_for)
  }
}

fn raw_text(value: &Value) -> Option<&str> {
  value.as_str().map(str::trim)
}

fn lenient_role<'de, D>(
  deserializer: D
) -> Result<Option<Role>, D::Error>
where
  D: Deserializer<'de>
{
  let value = Value::deserialize(deserializer)?;
  if value.is_null() {
    return Ok(None);
  }
  match raw_text(&value)
    .map(str::parse::<Role>)
  {
    | Some(Ok(role)) => Ok(Some(role)),
    | _ => {
      tracing::warn!(
        role = %value,
        "unknown user role, granting no access"
      );
      Ok(None)
    }
  }
}

fn lenient_lane<'de, D>(
  deserializer: D
) -> Result<Lane, D::Error>
where
  D: Deserializer<'de>
{
  let value = Value::deserialize(deserializer)?;
  if value.is_null() {
    return Ok(Lane::default());
  }
  match raw_text(&value)
    .map(str::parse::<Lane>)
  {
    | Some(Ok(lane)) => Ok(lane),
    | _ => {
      tracing::warn!(
        status = %value,
        "unknown task status, placing in todo"
      );
      Ok(Lane::default())
    }
  }
}
