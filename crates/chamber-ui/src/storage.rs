use chamber_core::permissions::Role;
use chamber_core::records::TaskRecord;
use chamber_core::snapshot::ChamberSnapshot;
use serde::{
  Deserialize,
  Serialize
};

const SNAPSHOT_STORAGE_KEY: &str =
  "chamber.snapshot";
const SESSION_STORAGE_KEY: &str =
  "chamber.session";

#[derive(
  Clone,
  Debug,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Session {
  pub name: String,
  pub role: Role
}

fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

/// `Ok(None)` when nothing has been stored yet.
pub fn load_snapshot()
-> Result<Option<ChamberSnapshot>, String> {
  let Some(storage) = local_storage()
  else {
    return Err(
      "local storage is unavailable"
        .to_string()
    );
  };

  let stored = storage
    .get_item(SNAPSHOT_STORAGE_KEY)
    .map_err(|err| {
      format!(
        "failed reading snapshot: \
         {err:?}"
      )
    })?;

  match stored {
    | Some(raw) => {
      ChamberSnapshot::from_json_str(&raw)
        .map(Some)
        .map_err(|err| format!("{err:#}"))
    }
    | None => Ok(None)
  }
}

pub fn save_tasks(
  snapshot: &ChamberSnapshot,
  tasks: Vec<TaskRecord>
) -> Result<ChamberSnapshot, String> {
  let mut next = snapshot.clone();
  next.tasks = tasks;

  let raw = serde_json::to_string(&next)
    .map_err(|err| {
      format!(
        "failed encoding snapshot: {err}"
      )
    })?;
  let storage = local_storage()
    .ok_or_else(|| {
      "local storage is unavailable"
        .to_string()
    })?;
  storage
    .set_item(SNAPSHOT_STORAGE_KEY, &raw)
    .map_err(|err| {
      format!(
        "failed saving snapshot: {err:?}"
      )
    })?;

  Ok(next)
}

pub fn load_session() -> Option<Session>
{
  let raw = local_storage()
    .and_then(|storage| {
      storage
        .get_item(SESSION_STORAGE_KEY)
        .ok()
        .flatten()
    })?;

  match serde_json::from_str::<Session>(
    &raw
  ) {
    | Ok(session) => Some(session),
    | Err(error) => {
      tracing::warn!(
        %error,
        "discarding unreadable session"
      );
      None
    }
  }
}

pub fn save_session(
  session: Option<&Session>
) {
  let Some(storage) = local_storage()
  else {
    return;
  };

  let result = match session {
    | Some(session) => {
      match serde_json::to_string(session)
      {
        | Ok(raw) => storage.set_item(
          SESSION_STORAGE_KEY,
          &raw
        ),
        | Err(error) => {
          tracing::error!(
            %error,
            "failed encoding session"
          );
          return;
        }
      }
    }
    | None => storage
      .remove_item(SESSION_STORAGE_KEY)
  };

  if let Err(error) = result {
    tracing::warn!(
      ?error,
      "failed persisting session"
    );
  }
}
