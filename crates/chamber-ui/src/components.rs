mod calendar_item_card;
mod kanban_board;
mod kanban_card;
mod kanban_column;
mod nav_bar;
mod stat_card;
mod status_views;

pub use calendar_item_card::CalendarItemCard;
use chamber_core::calendar::CalendarTime;
use chamber_core::datetime::{
  format_project_date,
  format_project_datetime
};
pub use kanban_board::KanbanBoardView;
pub use kanban_card::KanbanCard;
pub use kanban_column::KanbanColumn;
pub use nav_bar::NavBar;
pub use stat_card::StatCard;
pub use status_views::{
  EmptyView,
  ErrorView,
  LoadingView
};

/// Text for a calendar start/end. Invalid source dates are shown as such
/// rather than hidden.
pub fn format_calendar_time(
  time: &CalendarTime,
  all_day: bool
) -> String {
  match time {
    | CalendarTime::At(at) if all_day => {
      format_project_date(*at)
    }
    | CalendarTime::At(at) => {
      format_project_datetime(*at)
    }
    | CalendarTime::Invalid {
      ..
    } => "Invalid date".to_string()
  }
}

#[cfg(test)]
mod tests {
  use chamber_core::datetime::parse_date_text;
  use serde_json::json;

  use super::*;

  #[test]
  fn all_day_items_show_only_the_date() {
    let at = parse_date_text(
      "2024-07-04T00:00:00Z"
    )
    .expect("instant");
    let text = format_calendar_time(
      &CalendarTime::At(at),
      true
    );
    assert_eq!(text.len(), 10);
    assert_eq!(
      format_calendar_time(
        &CalendarTime::Invalid {
          raw: json!("soon")
        },
        false
      ),
      "Invalid date"
    );
  }
}
