use chamber_core::calendar::CalendarTime;
use yew::{
  Html,
  function_component,
  html,
  use_context
};
use yew_router::prelude::Link;

use super::render_snapshot;
use crate::app::{
  AppContext,
  Route
};
use crate::components::{
  EmptyView,
  format_calendar_time
};

#[function_component(EventsView)]
pub fn events_view() -> Html {
  let context = use_context::<AppContext>();

  render_snapshot(context.as_ref(), |snapshot| {
    if snapshot.events.is_empty() {
      return html! {
          <section class="view events">
              <h1>{ "Events" }</h1>
              <EmptyView message="No events yet." />
          </section>
      };
    }

    html! {
        <section class="view events">
            <h1>{ "Events" }</h1>
            <div class="card-list">
                {
                    for snapshot.events.iter().map(|event| {
                        let id = event.id.to_string();
                        let route = Route::EventDetail { id: id.clone() };
                        let starts = format_calendar_time(
                            &CalendarTime::from_value(&event.start_date),
                            false,
                        );
                        html! {
                            <div class="card event-card" key={id}>
                                <Link<Route> to={route}>
                                    { event.title.clone().unwrap_or_else(|| "Untitled event".to_string()) }
                                </Link<Route>>
                                <div class="card-meta">{ starts }</div>
                                <div class="card-meta">
                                    { event.location.clone().unwrap_or_default() }
                                </div>
                                <span class="badge">{ format!("{} attending", event.attending_count()) }</span>
                            </div>
                        }
                    })
                }
            </div>
        </section>
    }
  })
}
