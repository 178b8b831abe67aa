use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chamber_core::records::TaskRecord;
use chamber_core::snapshot::ChamberSnapshot;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// A directory of JSONL files, one record per line. Missing files read as
/// empty collections.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub meetings_path: PathBuf,
    pub events_path: PathBuf,
    pub projects_path: PathBuf,
    pub tasks_path: PathBuf,
    pub users_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let store = Self {
            meetings_path: data_dir.join("meetings.data"),
            events_path: data_dir.join("events.data"),
            projects_path: data_dir.join("projects.data"),
            tasks_path: data_dir.join("tasks.data"),
            users_path: data_dir.join("users.data"),
            data_dir,
        };

        info!(data_dir = %store.data_dir.display(), "opened datastore");
        Ok(store)
    }

    #[tracing::instrument(skip(self))]
    pub fn load_snapshot(&self) -> anyhow::Result<ChamberSnapshot> {
        Ok(ChamberSnapshot {
            meetings: load_jsonl(&self.meetings_path).context("failed to load meetings.data")?,
            events: load_jsonl(&self.events_path).context("failed to load events.data")?,
            projects: load_jsonl(&self.projects_path).context("failed to load projects.data")?,
            tasks: self.load_tasks()?,
            users: load_jsonl(&self.users_path).context("failed to load users.data")?,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> anyhow::Result<Vec<TaskRecord>> {
        load_jsonl(&self.tasks_path).context("failed to load tasks.data")
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save_tasks(&self, tasks: &[TaskRecord]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.tasks_path, tasks).context("failed to save tasks.data")
    }

    /// Writes every collection of `snapshot`; used to seed a data directory.
    #[tracing::instrument(skip(self, snapshot))]
    pub fn save_snapshot(&self, snapshot: &ChamberSnapshot) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.meetings_path, &snapshot.meetings)?;
        save_jsonl_atomic(&self.events_path, &snapshot.events)?;
        save_jsonl_atomic(&self.projects_path, &snapshot.projects)?;
        save_jsonl_atomic(&self.tasks_path, &snapshot.tasks)?;
        save_jsonl_atomic(&self.users_path, &snapshot.users)?;
        Ok(())
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        debug!(file = %path.display(), "jsonl file missing; treating as empty");
        return Ok(vec![]);
    }

    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: T = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(record);
    }

    debug!(count = out.len(), "loaded records from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, records))]
fn save_jsonl_atomic<T: Serialize>(path: &Path, records: &[T]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = records.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for record in records {
        let serialized = serde_json::to_string(record)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
