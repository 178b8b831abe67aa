use chamber_core::calendar::{
  CalendarItem,
  items_on
};
use chamber_core::datetime::to_project_date;
use chrono::{
  Datelike,
  Months,
  NaiveDate,
  Utc
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_context,
  use_state
};

use super::render_snapshot;
use crate::app::AppContext;
use crate::components::{
  CalendarItemCard,
  EmptyView
};

fn first_of_month(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

fn month_days(
  first: NaiveDate
) -> Vec<NaiveDate> {
  first
    .iter_days()
    .take_while(|day| {
      day.month() == first.month()
    })
    .collect()
}

fn render_items(
  items: Vec<CalendarItem>
) -> Html {
  html! {
      <div class="calendar-list">
          {
              for items.into_iter().map(|item| {
                  html! { <CalendarItemCard key={item.id.clone()} {item} /> }
              })
          }
      </div>
  }
}

#[function_component(CalendarView)]
pub fn calendar_view() -> Html {
  let context = use_context::<AppContext>();
  let focus = use_state(|| {
    first_of_month(to_project_date(
      Utc::now()
    ))
  });

  let shift = |months: i32| {
    let focus = focus.clone();
    Callback::from(move |_: MouseEvent| {
      let next = if months < 0 {
        focus.checked_sub_months(
          Months::new(months.unsigned_abs())
        )
      } else {
        focus.checked_add_months(
          Months::new(months.unsigned_abs())
        )
      };
      if let Some(next) = next {
        focus.set(next);
      }
    })
  };
  let on_prev = shift(-1);
  let on_next = shift(1);
  let first = *focus;

  render_snapshot(context.as_ref(), |snapshot| {
    let items = snapshot.calendar_items();
    let undated: Vec<_> = items
      .iter()
      .filter(|item| !item.start.is_valid())
      .cloned()
      .collect();

    let days: Vec<_> = month_days(first)
      .into_iter()
      .filter_map(|day| {
        let on_day: Vec<_> = items_on(&items, day)
          .into_iter()
          .cloned()
          .collect();
        (!on_day.is_empty()).then_some((day, on_day))
      })
      .collect();

    html! {
        <section class="view calendar">
            <div class="calendar-toolbar">
                <button class="btn" onclick={on_prev}>{ "‹" }</button>
                <h1>{ first.format("%B %Y").to_string() }</h1>
                <button class="btn" onclick={on_next}>{ "›" }</button>
            </div>
            {
                if days.is_empty() {
                    html! { <EmptyView message="No meetings, events or projects this month." /> }
                } else {
                    html! {
                        <>
                            {
                                for days.into_iter().map(|(day, on_day)| {
                                    html! {
                                        <div class="calendar-day" key={day.to_string()}>
                                            <h3>{ day.format("%a %d").to_string() }</h3>
                                            { render_items(on_day) }
                                        </div>
                                    }
                                })
                            }
                        </>
                    }
                }
            }
            {
                if undated.is_empty() {
                    html! {}
                } else {
                    html! {
                        <div class="calendar-day undated">
                            <h3>{ "Missing or invalid dates" }</h3>
                            { render_items(undated) }
                        </div>
                    }
                }
            }
        </section>
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn month_days_cover_the_whole_month() {
    let first =
      NaiveDate::from_ymd_opt(2024, 2, 1)
        .expect("valid date");
    let days = month_days(first);
    assert_eq!(days.len(), 29);
    assert_eq!(
      days.last().copied(),
      NaiveDate::from_ymd_opt(2024, 2, 29)
    );
  }

  #[test]
  fn first_of_month_truncates_day() {
    let date =
      NaiveDate::from_ymd_opt(2024, 7, 19)
        .expect("valid date");
    assert_eq!(
      first_of_month(date),
      NaiveDate::from_ymd_opt(2024, 7, 1)
        .expect("valid date")
    );
  }
}
