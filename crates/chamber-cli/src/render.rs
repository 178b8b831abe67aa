use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chamber_core::board::{DueStatus, KanbanBoard, due_status};
use chamber_core::calendar::{CalendarItem, CalendarTime};
use chamber_core::dashboard::DashboardSummary;
use chamber_core::datetime::{format_project_date, format_project_datetime};
use chamber_core::due_date::{DueDate, normalize_due_value};
use chamber_core::permissions::{Capability, Permissions, Role, permissions_for};
use chamber_core::records::UserRecord;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, items))]
    pub fn print_calendar(&mut self, items: &[CalendarItem]) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        let headers = header_row(&["ID", "Type", "Start", "End", "Title", "Committee", "Location"]);

        let rows = items
            .iter()
            .map(|item| {
                vec![
                    self.paint(&item.id, "33"),
                    item.kind.to_string(),
                    self.format_time(&item.start, item.all_day),
                    self.format_time(&item.end, item.all_day),
                    item.title.clone(),
                    item.committee.clone().unwrap_or_default(),
                    item.location.clone().unwrap_or_default(),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    pub fn print_permissions(&mut self, roles: &[Role]) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        let mut labels = vec!["Role"];
        labels.extend(Capability::ALL.iter().map(|cap| cap.as_str()));
        let headers = header_row(&labels);

        let rows = roles
            .iter()
            .map(|role| {
                let perms = permissions_for(*role);
                let mut row = vec![role.to_string()];
                row.extend(Capability::ALL.iter().map(|cap| self.flag(perms.allows(*cap))));
                row
            })
            .collect();

        write_table(out, headers, rows)
    }

    #[tracing::instrument(skip(self, board, now))]
    pub fn print_board(
        &mut self,
        board: &KanbanBoard,
        now: DateTime<Utc>,
        soon_days: i64,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        for (lane, tasks) in board.lanes() {
            writeln!(out, "{} ({})", self.paint(lane.label(), "1"), tasks.len())?;
            if tasks.is_empty() {
                writeln!(out, "  -")?;
                continue;
            }
            for task in tasks {
                let due = normalize_due_value(&task.due_date)
                    .map(|due| due.display())
                    .unwrap_or_default();
                let due = match due_status(task, now, soon_days) {
                    DueStatus::Overdue => self.paint(&due, "31"),
                    DueStatus::DueSoon => self.paint(&due, "33"),
                    DueStatus::Later | DueStatus::NoDueDate => due,
                };
                let assignee = task
                    .assignee
                    .as_deref()
                    .map(|name| format!(" @{name}"))
                    .unwrap_or_default();
                writeln!(out, "  [{}] {}{} {}", task.id, task.title, assignee, due)?;
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, summary))]
    pub fn print_dashboard(&mut self, summary: &DashboardSummary) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(
            out,
            "meetings {}  events {}  projects {}",
            summary.meetings, summary.events, summary.projects
        )?;
        writeln!(
            out,
            "open tasks {}  overdue {}  due soon {}",
            summary.open_tasks(),
            self.paint(&summary.overdue_tasks.to_string(), "31"),
            summary.due_soon_tasks
        )?;
        let mut members = summary
            .users_per_role
            .iter()
            .map(|(role, count)| format!("{role}:{count}"))
            .collect::<Vec<_>>();
        if summary.users_without_role > 0 {
            members.push(format!("unknown:{}", summary.users_without_role));
        }
        let members = members.join(" ");
        writeln!(out, "members {members}")?;
        writeln!(out)?;

        if summary.upcoming.is_empty() {
            writeln!(out, "No upcoming items.")?;
            return Ok(());
        }
        writeln!(out, "Upcoming")?;
        drop(out);
        self.print_calendar(&summary.upcoming)
    }

    pub fn print_users(&mut self, users: &[UserRecord]) -> anyhow::Result<()> {
        let out = io::stdout().lock();
        let headers = header_row(&["ID", "Name", "Email", "Role", "Capabilities"]);

        let rows = users
            .iter()
            .map(|user| {
                vec![
                    self.paint(&user.id.to_string(), "33"),
                    user.name.clone(),
                    user.email.clone().unwrap_or_default(),
                    user.role_label().to_string(),
                    capability_list(&user.permissions()),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    pub fn print_due(&mut self, due: Option<&DueDate>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        match due {
            Some(DueDate::Instant(at)) => writeln!(out, "{}", at.to_rfc3339())?,
            Some(serialized) => writeln!(out, "{}", serde_json::to_string(serialized)?)?,
            None => writeln!(out, "{}", self.paint("null", "2"))?,
        }
        Ok(())
    }

    fn format_time(&self, time: &CalendarTime, all_day: bool) -> String {
        match time {
            CalendarTime::At(at) if all_day => format_project_date(*at),
            CalendarTime::At(at) => format_project_datetime(*at),
            CalendarTime::Invalid { .. } => self.paint("invalid", "31"),
        }
    }

    fn flag(&self, allowed: bool) -> String {
        if allowed {
            self.paint("yes", "32")
        } else {
            "no".to_string()
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn header_row(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

fn capability_list(perms: &Permissions) -> String {
    perms
        .granted()
        .map(|cap| cap.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_by_visible_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            header_row(&["ID", "Title"]),
            vec![
                vec!["\x1b[33mmeeting-1\x1b[0m".to_string(), "Board".to_string()],
                vec!["event-22".to_string(), "Gala".to_string()],
            ],
        )
        .expect("write table");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<_> = text.lines().map(strip_ansi).collect();
        assert_eq!(lines[0], "ID        Title ");
        assert_eq!(lines[1], "--------- ----- ");
        assert_eq!(lines[3], "event-22  Gala  ");
    }

    #[test]
    fn capability_list_names_granted_flags() {
        assert_eq!(capability_list(&permissions_for(Role::Member)), "read,comment");
    }
}
