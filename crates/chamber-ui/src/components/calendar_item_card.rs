use chamber_core::calendar::CalendarItem;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

use super::format_calendar_time;

#[derive(Properties, PartialEq)]
pub struct CalendarItemCardProps {
  pub item: CalendarItem
}

#[function_component(CalendarItemCard)]
pub fn calendar_item_card(
  props: &CalendarItemCardProps
) -> Html {
  let item = &props.item;
  let when = if item.all_day {
    format!(
      "{} – {} (all day)",
      format_calendar_time(&item.start, true),
      format_calendar_time(&item.end, true)
    )
  } else {
    format!(
      "{} – {}",
      format_calendar_time(&item.start, false),
      format_calendar_time(&item.end, false)
    )
  };

  html! {
      <div class="calendar-item" data-kind={item.kind.as_str()} style={format!("border-left-color:{};", item.color)}>
          <div class="calendar-item-title">{ &item.title }</div>
          <div class="calendar-item-when">{ when }</div>
          {
              if let Some(committee) = item.committee.clone() {
                  html! { <span class="badge">{ committee }</span> }
              } else {
                  html! {}
              }
          }
          {
              if let Some(location) = item.location.clone() {
                  html! { <span class="calendar-item-location">{ location }</span> }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
