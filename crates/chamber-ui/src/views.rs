mod board;
mod calendar;
mod dashboard;
mod event_detail;
mod events;
mod login;
mod projects;
mod users;

pub use board::BoardView;
pub use calendar::CalendarView;
use chamber_core::snapshot::ChamberSnapshot;
pub use dashboard::DashboardView;
pub use event_detail::EventDetailView;
pub use events::EventsView;
pub use login::LoginView;
pub use projects::ProjectsView;
pub use users::UsersView;
use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::{
  AppContext,
  LoadState,
  Route
};
use crate::components::{
  EmptyView,
  ErrorView,
  LoadingView
};

/// Shared loading/error handling for views that need the snapshot.
fn render_snapshot(
  context: Option<&AppContext>,
  render: impl FnOnce(&ChamberSnapshot) -> Html
) -> Html {
  match context.map(|ctx| &ctx.snapshot) {
    | None => html! {
        <ErrorView message="application context is missing" />
    },
    | Some(LoadState::Loading) => {
      html! { <LoadingView /> }
    }
    | Some(LoadState::Failed(error)) => {
      html! { <ErrorView message={error.clone()} /> }
    }
    | Some(LoadState::Ready(snapshot)) => {
      render(snapshot)
    }
  }
}

#[function_component(NotFoundView)]
pub fn not_found_view() -> Html {
  html! {
      <section class="view">
          <EmptyView message="This page does not exist." />
          <Link<Route> to={Route::Dashboard}>{ "Back to dashboard" }</Link<Route>>
      </section>
  }
}
