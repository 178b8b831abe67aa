use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chamber_core::board::Lane;
use chamber_core::calendar::CalendarItemKind;
use chamber_core::permissions::{Capability, Role};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "chamber",
    version,
    about = "Chamber: calendar, board and membership views over a local data snapshot",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "chamberrc", global = true)]
    pub chamberrc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List meetings, events and projects as calendar items.
    Calendar {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        kind: Option<CalendarItemKind>,
    },
    /// Print the role permission table.
    Permissions { role: Option<Role> },
    /// Check a single capability for a role.
    Can { role: Role, capability: Capability },
    /// Normalize a task due-date value.
    Due {
        value: String,
        /// Treat VALUE as a JSON literal instead of a plain string.
        #[arg(long)]
        json: bool,
    },
    /// Show the kanban board.
    Board,
    /// Move a task to another lane.
    Move { task_id: String, lane: Lane },
    /// Summary of upcoming items, tasks and members.
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// List users with their roles.
    Users,
    /// Print the effective configuration.
    Show,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_subcommand_arguments() {
        let cli = GlobalCli::parse_from([
            "chamber",
            "--rc",
            "session.role=board",
            "move",
            "12",
            "in-progress",
        ]);
        assert_eq!(cli.rc_overrides[0].key, "session.role");
        assert_eq!(
            cli.command,
            Some(Command::Move {
                task_id: "12".to_string(),
                lane: Lane::InProgress,
            })
        );
    }

    #[test]
    fn rejects_unknown_roles() {
        let parsed = GlobalCli::try_parse_from(["chamber", "permissions", "mayor"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = GlobalCli::parse_from(["chamber", "calendar", "--kind", "event", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Calendar {
                json: false,
                kind: Some(CalendarItemKind::Event),
            })
        );
    }
}
