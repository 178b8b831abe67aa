use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::anyhow;
use chrono::{
  DateTime,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use serde::Deserialize;

const TIMEZONE_CONFIG_FILE: &str =
  "chamber-time.toml";
const TIMEZONE_ENV_VAR: &str =
  "CHAMBER_TIMEZONE";
const TIMEZONE_CONFIG_ENV_VAR: &str =
  "CHAMBER_TIME_CONFIG";

const LOCAL_DATETIME_FORMATS: [&str;
  4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M"
];

#[derive(Debug, Deserialize)]
struct TimezoneConfig {
  timezone: Option<String>,
  time:     Option<TimezoneSection>
}

#[derive(Debug, Deserialize)]
struct TimezoneSection {
  timezone: Option<String>
}

/// Timezone used to read zone-less date strings and to print dates.
pub fn project_timezone() -> &'static Tz
{
  static PROJECT_TZ: OnceLock<Tz> =
    OnceLock::new();
  PROJECT_TZ.get_or_init(
    resolve_project_timezone
  )
}

#[must_use]
pub fn to_project_date(
  dt: DateTime<Utc>
) -> NaiveDate {
  dt.with_timezone(project_timezone())
    .date_naive()
}

#[must_use]
pub fn format_project_date(
  dt: DateTime<Utc>
) -> String {
  dt.with_timezone(project_timezone())
    .format("%Y-%m-%d")
    .to_string()
}

#[must_use]
pub fn format_project_datetime(
  dt: DateTime<Utc>
) -> String {
  dt.with_timezone(project_timezone())
    .format("%Y-%m-%d %H:%M")
    .to_string()
}

fn resolve_project_timezone() -> Tz {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) =
      parse_timezone(&raw, TIMEZONE_ENV_VAR)
  {
    return tz;
  }

  if let Some(path) =
    timezone_config_path()
    && let Some(tz) =
      load_timezone_from_file(&path)
  {
    return tz;
  }

  tracing::debug!(
    "no project timezone configured; \
     using UTC"
  );
  chrono_tz::UTC
}

fn timezone_config_path()
-> Option<PathBuf> {
  if let Ok(raw) = std::env::var(
    TIMEZONE_CONFIG_ENV_VAR
  ) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  std::env::current_dir().ok().map(
    |dir| {
      dir.join(TIMEZONE_CONFIG_FILE)
    }
  )
}

fn load_timezone_from_file(
  path: &PathBuf
) -> Option<Tz> {
  if !path.exists() {
    tracing::debug!(
      file = %path.display(),
      "timezone config file not found"
    );
    return None;
  }

  let raw = match fs::read_to_string(
    path
  ) {
    | Ok(raw) => raw,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed reading timezone config file"
      );
      return None;
    }
  };

  let parsed = match toml::from_str::<
    TimezoneConfig
  >(&raw)
  {
    | Ok(parsed) => parsed,
    | Err(err) => {
      tracing::error!(
        file = %path.display(),
        error = %err,
        "failed parsing timezone config file"
      );
      return None;
    }
  };

  let timezone =
    parsed.timezone.or_else(|| {
      parsed.time.and_then(|section| {
        section.timezone
      })
    });
  let Some(timezone) = timezone else {
    tracing::warn!(
      file = %path.display(),
      "timezone config had no timezone field"
    );
    return None;
  };

  parse_timezone(
    timezone.as_str(),
    &format!("file:{}", path.display())
  )
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured project timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

fn to_utc_from_project_local(
  local_naive: NaiveDateTime,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  match project_timezone()
    .from_local_datetime(&local_naive)
  {
    | LocalResult::Single(local_dt) => {
      Ok(local_dt.with_timezone(&Utc))
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::warn!(
        context,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      let chosen = if first <= second {
        first
      } else {
        second
      };
      Ok(chosen.with_timezone(&Utc))
    }
    | LocalResult::None => {
      Err(anyhow!(
        "local datetime does not \
         exist in configured \
         timezone: {context}"
      ))
    }
  }
}

/// Parses the date strings found in chamber records.
///
/// Accepted shapes, in order: RFC 3339 with an offset, a bare `YYYY-MM-DD`
/// (midnight UTC), and zone-less date-times, which are read in the project
/// timezone.
#[tracing::instrument(level = "trace")]
pub fn parse_date_text(
  input: &str
) -> anyhow::Result<DateTime<Utc>> {
  let token = input.trim();
  if token.is_empty() {
    return Err(anyhow!(
      "date string is empty"
    ));
  }

  if let Ok(parsed) =
    DateTime::parse_from_rfc3339(token)
  {
    return Ok(
      parsed.with_timezone(&Utc)
    );
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token, "%Y-%m-%d"
    )
  {
    let midnight = date
      .and_hms_opt(0, 0, 0)
      .ok_or_else(|| {
        anyhow!(
          "failed to construct \
           midnight for {token}"
        )
      })?;
    return Ok(midnight.and_utc());
  }

  for format in LOCAL_DATETIME_FORMATS
  {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        token, format
      )
    {
      return to_utc_from_project_local(
        naive, token
      );
    }
  }

  Err(anyhow!(
    "unrecognized date value: {token}"
  ))
}

pub fn from_epoch_millis(
  millis: i64
) -> anyhow::Result<DateTime<Utc>> {
  DateTime::<Utc>::from_timestamp_millis(
    millis
  )
  .ok_or_else(|| {
    anyhow!(
      "epoch milliseconds out of \
       range: {millis}"
    )
  })
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::*;

  #[test]
  fn parses_rfc3339_with_offset() {
    let parsed = parse_date_text(
      "2024-05-01T02:00:00+02:00"
    )
    .expect("parse rfc3339");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2024, 5, 1, 0, 0, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn bare_date_is_utc_midnight() {
    let parsed =
      parse_date_text("2024-01-01")
        .expect("parse date");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2024, 1, 1, 0, 0, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn zone_less_datetime_uses_project_timezone()
  {
    let parsed = parse_date_text(
      "2024-03-10 09:30"
    )
    .expect("parse local datetime");
    assert_eq!(
      parsed
        .with_timezone(
          project_timezone()
        )
        .format("%Y-%m-%d %H:%M")
        .to_string(),
      "2024-03-10 09:30"
    );
  }

  #[test]
  fn rejects_garbage_and_empty() {
    assert!(
      parse_date_text("not-a-date")
        .is_err()
    );
    assert!(
      parse_date_text("   ").is_err()
    );
  }

  #[test]
  fn epoch_millis_round_to_instant() {
    let parsed =
      from_epoch_millis(1_704_067_200_000)
        .expect("in range");
    assert_eq!(
      format_project_date(parsed).len(),
      10
    );
    assert!(
      from_epoch_millis(i64::MAX)
        .is_err()
    );
  }
}
