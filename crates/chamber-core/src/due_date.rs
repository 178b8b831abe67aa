//! Normalization of task due dates.
//!
//! Due dates reach the board in several shapes: an already parsed instant,
//! an object serialized by a data layer with a type tag (`{"__type": "Date",
//! "value": ".."}`, `{"type": "timestamp", "seconds": ..}`), a plain string,
//! or nothing at all. Integers are epoch milliseconds, as in calendar
//! aggregation. [`DueDateField`] names each shape and
//! [`normalize_due_date`] turns it into a [`DueDate`] or `None`.

use chrono::{
  DateTime,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};
use serde_json::{
  Map,
  Value
};

use crate::datetime::{
  format_project_date,
  from_epoch_millis,
  parse_date_text
};

const TYPE_TAG_KEYS: [&str; 2] =
  ["__type", "type"];

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct SerializedDate {
  pub kind:   String,
  pub fields: Map<String, Value>
}

impl SerializedDate {
  fn from_object(
    object: &Map<String, Value>
  ) -> Option<Self> {
    TYPE_TAG_KEYS.iter().find_map(
      |key| {
        object
          .get(*key)
          .and_then(Value::as_str)
          .map(|kind| SerializedDate {
            kind:   kind.to_string(),
            fields: object.clone()
          })
      }
    )
  }

  /// Best-effort instant: an ISO `value`/`iso` field, or `seconds` with
  /// optional `nanoseconds`.
  pub fn instant(
    &self
  ) -> Option<DateTime<Utc>> {
    for key in ["value", "iso"] {
      if let Some(text) = self
        .fields
        .get(key)
        .and_then(Value::as_str)
        && let Ok(at) =
          parse_date_text(text)
      {
        return Some(at);
      }
    }

    let seconds = self
      .fields
      .get("seconds")
      .and_then(Value::as_i64)?;
    let nanos = self
      .fields
      .get("nanoseconds")
      .and_then(Value::as_u64)
      .and_then(|n| u32::try_from(n).ok())
      .unwrap_or(0);
    DateTime::<Utc>::from_timestamp(
      seconds, nanos
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DueDateField {
  Date(DateTime<Utc>),
  Serialized(SerializedDate),
  Text(String),
  Missing,
  Unsupported(Value)
}

impl DueDateField {
  pub fn from_json(raw: &Value) -> Self {
    match raw {
      | Value::Null => {
        DueDateField::Missing
      }
      | Value::String(text) => {
        DueDateField::Text(text.clone())
      }
      | Value::Number(number) => {
        match number
          .as_i64()
          .map(from_epoch_millis)
        {
          | Some(Ok(at)) => {
            DueDateField::Date(at)
          }
          | _ => {
            DueDateField::Unsupported(
              raw.clone()
            )
          }
        }
      }
      | Value::Object(object) => {
        match SerializedDate::from_object(
          object
        ) {
          | Some(serialized) => {
            DueDateField::Serialized(
              serialized
            )
          }
          | None => {
            DueDateField::Unsupported(
              raw.clone()
            )
          }
        }
      }
      | other => {
        DueDateField::Unsupported(
          other.clone()
        )
      }
    }
  }
}

impl From<Option<DateTime<Utc>>>
  for DueDateField
{
  fn from(
    value: Option<DateTime<Utc>>
  ) -> Self {
    value.map_or(
      DueDateField::Missing,
      DueDateField::Date
    )
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DueDate {
  Instant(DateTime<Utc>),
  Serialized(SerializedDate)
}

impl DueDate {
  pub fn instant(
    &self
  ) -> Option<DateTime<Utc>> {
    match self {
      | DueDate::Instant(at) => Some(*at),
      | DueDate::Serialized(
        serialized
      ) => serialized.instant()
    }
  }

  /// Project-local `YYYY-MM-DD`, or the serialized tag when no instant can
  /// be recovered.
  pub fn display(&self) -> String {
    match self.instant() {
      | Some(at) => {
        format_project_date(at)
      }
      | None => match self {
        | DueDate::Serialized(
          serialized
        ) => {
          format!(
            "<{}>",
            serialized.kind
          )
        }
        | DueDate::Instant(at) => {
          format_project_date(*at)
        }
      }
    }
  }
}

/// Never fails: parse errors are logged and map to `None`.
pub fn normalize_due_date(
  field: &DueDateField
) -> Option<DueDate> {
  match field {
    | DueDateField::Date(at) => {
      Some(DueDate::Instant(*at))
    }
    | DueDateField::Serialized(
      serialized
    ) => {
      Some(DueDate::Serialized(
        serialized.clone()
      ))
    }
    | DueDateField::Text(text) => {
      match parse_date_text(text) {
        | Ok(at) => {
          Some(DueDate::Instant(at))
        }
        | Err(err) => {
          tracing::warn!(
            raw = %text,
            error = %err,
            "failed to normalize due date"
          );
          None
        }
      }
    }
    | DueDateField::Missing
    | DueDateField::Unsupported(_) => {
      None
    }
  }
}

pub fn normalize_due_value(
  raw: &Value
) -> Option<DueDate> {
  normalize_due_date(
    &DueDateField::from_json(raw)
  )
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn string_instant_is_parsed() {
    let normalized = normalize_due_date(
      &DueDateField::Text(
        "2024-05-01T00:00:00Z"
          .to_string()
      )
    );
    assert_eq!(
      normalized,
      Some(DueDate::Instant(
        Utc
          .with_ymd_and_hms(
            2024, 5, 1, 0, 0, 0
          )
          .single()
          .expect("valid instant")
      ))
    );
  }

  #[test]
  fn missing_and_garbage_are_none() {
    assert_eq!(
      normalize_due_date(
        &DueDateField::Missing
      ),
      None
    );
    assert_eq!(
      normalize_due_value(&json!(
        "not-a-date"
      )),
      None
    );
    assert_eq!(
      normalize_due_value(&json!(true)),
      None
    );
  }

  #[test]
  fn structured_date_passes_through() {
    let at = Utc
      .with_ymd_and_hms(
        2025, 12, 24, 18, 0, 0
      )
      .single()
      .expect("valid instant");
    assert_eq!(
      normalize_due_date(
        &DueDateField::from(Some(at))
      ),
      Some(DueDate::Instant(at))
    );
  }

  #[test]
  fn serialized_object_passes_through_untouched()
  {
    let raw = json!({
      "__type": "Date",
      "value": "2024-02-03T04:05:06Z"
    });
    let field =
      DueDateField::from_json(&raw);
    let Some(DueDate::Serialized(
      serialized
    )) = normalize_due_date(&field)
    else {
      panic!("expected serialized due date");
    };
    assert_eq!(serialized.kind, "Date");
    assert_eq!(
      Value::Object(
        serialized.fields.clone()
      ),
      raw
    );
    assert_eq!(
      serialized
        .instant()
        .map(|at| at.to_rfc3339()),
      Some(
        "2024-02-03T04:05:06+00:00"
          .to_string()
      )
    );
  }

  #[test]
  fn timestamp_objects_expose_seconds() {
    let due = normalize_due_value(
      &json!({
        "type": "timestamp",
        "seconds": 1_704_067_200,
        "nanoseconds": 0
      })
    )
    .expect("serialized timestamp");
    assert_eq!(
      due.instant().map(|at| {
        at.timestamp()
      }),
      Some(1_704_067_200)
    );
  }

  #[test]
  fn untagged_objects_are_unsupported() {
    assert!(matches!(
      DueDateField::from_json(
        &json!({ "value": "2024-01-01" })
      ),
      DueDateField::Unsupported(_)
    ));
  }

  #[test]
  fn integer_due_dates_are_epoch_millis() {
    assert_eq!(
      normalize_due_value(&json!(
        1_704_067_200_000_i64
      ))
      .and_then(|due| due.instant()),
      Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
    );
    assert!(matches!(
      DueDateField::from_json(&json!(1.5)),
      DueDateField::Unsupported(_)
    ));
  }
}
