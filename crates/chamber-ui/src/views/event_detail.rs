use chamber_core::calendar::CalendarTime;
use chamber_core::permissions::Capability;
use chamber_core::records::{
  EventRecord,
  UserRecord
};
use yew::{
  AttrValue,
  Html,
  Properties,
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

#[derive(Properties, PartialEq)]
pub struct EventDetailViewProps {
  pub id: AttrValue
}

fn details_section(
  event: &EventRecord
) -> Html {
  let starts = format_calendar_time(
    &CalendarTime::from_value(
      &event.start_date
    ),
    false
  );
  let ends = format_calendar_time(
    &CalendarTime::from_value(
      &event.end_date
    ),
    false
  );

  html! {
      <div class="detail-section">
          <h2>{ "Details" }</h2>
          <dl>
              <dt>{ "Starts" }</dt><dd>{ starts }</dd>
              <dt>{ "Ends" }</dt><dd>{ ends }</dd>
              <dt>{ "Where" }</dt>
              <dd>{ event.location.clone().unwrap_or_else(|| "TBA".to_string()) }</dd>
              <dt>{ "Committee" }</dt>
              <dd>
                  {
                      event
                          .committee
                          .as_ref()
                          .map(|committee| committee.name().to_string())
                          .unwrap_or_else(|| "—".to_string())
                  }
              </dd>
          </dl>
      </div>
  }
}

fn rsvp_section(
  event: &EventRecord,
  users: &[UserRecord]
) -> Html {
  if event.rsvps.is_empty() {
    return html! {
        <div class="detail-section">
            <h2>{ "RSVPs" }</h2>
            <EmptyView message="No RSVPs yet." />
        </div>
    };
  }

  html! {
      <div class="detail-section">
          <h2>{ format!("RSVPs ({} attending)", event.attending_count()) }</h2>
          <ul class="rsvp-list">
              {
                  for event.rsvps.iter().map(|rsvp| {
                      let name = users
                          .iter()
                          .find(|user| user.id == rsvp.user_id)
                          .map(|user| user.name.clone())
                          .unwrap_or_else(|| format!("User {}", rsvp.user_id));
                      let answer = if rsvp.attending { "Going" } else { "Not going" };
                      html! { <li>{ format!("{name}: {answer}") }</li> }
                  })
              }
          </ul>
      </div>
  }
}

#[function_component(EventDetailView)]
pub fn event_detail_view(
  props: &EventDetailViewProps
) -> Html {
  let context = use_context::<AppContext>();
  let can_comment = context
    .as_ref()
    .and_then(|ctx| ctx.session.as_ref())
    .is_some_and(|session| {
      chamber_core::permissions::role_allows(
        session.role,
        Capability::Comment
      )
    });
  let id = props.id.clone();

  render_snapshot(context.as_ref(), move |snapshot| {
    let Some(event) = snapshot.event(&id) else {
      return html! {
          <section class="view event-detail">
              <EmptyView message="Event not found." />
              <Link<Route> to={Route::Events}>{ "All events" }</Link<Route>>
          </section>
      };
    };

    html! {
        <section class="view event-detail">
            <Link<Route> to={Route::Events}>{ "‹ All events" }</Link<Route>>
            <h1>{ event.title.clone().unwrap_or_else(|| "Untitled event".to_string()) }</h1>
            { details_section(event) }
            {
                match event.description.as_deref() {
                    Some(text) if !text.trim().is_empty() => html! {
                        <div class="detail-section">
                            <h2>{ "About" }</h2>
                            <p>{ text.to_string() }</p>
                        </div>
                    },
                    _ => html! {},
                }
            }
            { rsvp_section(event, &snapshot.users) }
            {
                if can_comment {
                    html! { <div class="hint">{ "Your role can comment on this event." }</div> }
                } else {
                    html! {}
                }
            }
        </section>
    }
  })
}
