use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chamber_core::permissions::Role;
use tracing::{
  debug,
  info,
  trace,
  warn
};

const DEFAULTS: [(&str, &str); 5] = [
  ("data.location", "~/.chamber"),
  ("color", "on"),
  ("session.role", "staff"),
  ("dashboard.upcoming", "5"),
  ("dashboard.due_soon_days", "7")
];

#[derive(Debug, Clone)]
pub struct Config {
  map: BTreeMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      map:          DEFAULTS
        .iter()
        .map(|(k, v)| {
          (k.to_string(), v.to_string())
        })
        .collect(),
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc =
      resolve_chamberrc_path(rc_override)?;
    if let Some(path) = rc {
      info!(chamberrc = %path.display(), "loading chamberrc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no chamberrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn get_parsed<T>(
    &self,
    key: &str
  ) -> anyhow::Result<T>
  where
    T: std::str::FromStr,
    T::Err: std::fmt::Display
  {
    let raw = self.get(key).ok_or_else(
      || anyhow!("missing config key {key}")
    )?;
    raw.trim().parse::<T>().map_err(
      |err| {
        anyhow!(
          "invalid value for {key}: \
           {raw} ({err})"
        )
      }
    )
  }

  pub fn session_role(
    &self
  ) -> anyhow::Result<Role> {
    self.get_parsed("session.role")
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&String, &String)>
  {
    self.map.iter()
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(cfg_value) =
    cfg.get("data.location")
  {
    expand_tilde(Path::new(&cfg_value))
  } else {
    default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_chamberrc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var("CHAMBERRC")
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping chamberrc"
    );
    return Ok(None);
  };
  let candidate =
    home.join(".chamberrc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  Ok(home.join(".chamber"))
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn defaults_cover_session_and_dashboard() {
    let cfg = Config::default();
    assert_eq!(
      cfg.session_role().expect("role"),
      Role::Staff
    );
    assert_eq!(
      cfg
        .get_parsed::<usize>(
          "dashboard.upcoming"
        )
        .expect("limit"),
      5
    );
    assert_eq!(cfg.get_bool("color"), Some(true));
  }

  #[test]
  fn loads_file_with_comments_and_includes() {
    let dir = tempdir().expect("tempdir");
    let included = dir.path().join("extra.rc");
    fs::write(&included, "color = off\n")
      .expect("write include");

    let main = dir.path().join("main.rc");
    let mut file =
      fs::File::create(&main).expect("create rc");
    writeln!(file, "# chamber settings")
      .expect("write");
    writeln!(file, "session.role = board  # officers")
      .expect("write");
    writeln!(file, "include extra.rc")
      .expect("write");

    let cfg =
      Config::load(Some(&main)).expect("load rc");
    assert_eq!(
      cfg.session_role().expect("role"),
      Role::Board
    );
    assert_eq!(cfg.get_bool("color"), Some(false));
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn overrides_strip_rc_prefix_and_bad_roles_fail()
  {
    let mut cfg = Config::default();
    cfg.apply_overrides(vec![(
      "rc.session.role".to_string(),
      "treasurer".to_string()
    )]);
    assert!(cfg.session_role().is_err());
  }

  #[test]
  fn malformed_line_is_reported() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("bad.rc");
    fs::write(&rc, "just words\n")
      .expect("write rc");
    let err = Config::load(Some(&rc))
      .expect_err("malformed rc");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }
}
