use std::rc::Rc;

use chamber_core::records::TaskRecord;
use chamber_core::snapshot::ChamberSnapshot;
use yew::{
  Callback,
  ContextProvider,
  Html,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Routable,
  Switch
};

use crate::components::NavBar;
use crate::storage::{
  self,
  Session
};
use crate::views::{
  BoardView,
  CalendarView,
  DashboardView,
  EventDetailView,
  EventsView,
  LoginView,
  NotFoundView,
  ProjectsView,
  UsersView
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
  #[at("/")]
  Dashboard,
  #[at("/calendar")]
  Calendar,
  #[at("/events")]
  Events,
  #[at("/events/:id")]
  EventDetail { id: String },
  #[at("/projects")]
  Projects,
  #[at("/board")]
  Board,
  #[at("/users")]
  Users,
  #[at("/login")]
  Login,
  #[not_found]
  #[at("/404")]
  NotFound
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
  Loading,
  Ready(Rc<ChamberSnapshot>),
  Failed(String)
}

#[derive(Clone, PartialEq)]
pub struct AppContext {
  pub snapshot:    LoadState,
  pub session:     Option<Session>,
  pub on_session:  Callback<Option<Session>>,
  pub on_tasks:    Callback<Vec<TaskRecord>>
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Dashboard => {
      html! { <DashboardView /> }
    }
    | Route::Calendar => {
      html! { <CalendarView /> }
    }
    | Route::Events => {
      html! { <EventsView /> }
    }
    | Route::EventDetail {
      id
    } => {
      html! { <EventDetailView {id} /> }
    }
    | Route::Projects => {
      html! { <ProjectsView /> }
    }
    | Route::Board => {
      html! { <BoardView /> }
    }
    | Route::Users => {
      html! { <UsersView /> }
    }
    | Route::Login => {
      html! { <LoginView /> }
    }
    | Route::NotFound => {
      html! { <NotFoundView /> }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let snapshot =
    use_state(|| LoadState::Loading);
  let session =
    use_state(storage::load_session);

  {
    let snapshot = snapshot.clone();
    use_effect_with((), move |_| {
      let next =
        match storage::load_snapshot() {
          | Ok(Some(loaded)) => {
            tracing::info!(
              meetings = loaded.meetings.len(),
              events = loaded.events.len(),
              projects = loaded.projects.len(),
              tasks = loaded.tasks.len(),
              "loaded chamber snapshot"
            );
            LoadState::Ready(Rc::new(loaded))
          }
          | Ok(None) => {
            LoadState::Ready(Rc::new(
              ChamberSnapshot::default()
            ))
          }
          | Err(error) => {
            tracing::error!(
              %error,
              "failed loading snapshot"
            );
            LoadState::Failed(error)
          }
        };
      snapshot.set(next);
      || ()
    });
  }

  let on_session = {
    let session = session.clone();
    Callback::from(
      move |next: Option<Session>| {
        storage::save_session(
          next.as_ref()
        );
        session.set(next);
      }
    )
  };

  let on_tasks = {
    let snapshot = snapshot.clone();
    Callback::from(
      move |tasks: Vec<TaskRecord>| {
        let LoadState::Ready(current) =
          &*snapshot
        else {
          tracing::warn!(
            "task update before snapshot \
             was ready"
          );
          return;
        };
        match storage::save_tasks(
          current, tasks
        ) {
          | Ok(next) => snapshot.set(
            LoadState::Ready(Rc::new(next))
          ),
          | Err(error) => {
            tracing::error!(
              %error,
              "failed saving tasks"
            );
          }
        }
      }
    )
  };

  let context = AppContext {
    snapshot: (*snapshot).clone(),
    session: (*session).clone(),
    on_session,
    on_tasks
  };

  html! {
      <BrowserRouter>
          <ContextProvider<AppContext> {context}>
              <div class="shell">
                  <NavBar />
                  <main class="content">
                      <Switch<Route> render={switch} />
                  </main>
              </div>
          </ContextProvider<AppContext>>
      </BrowserRouter>
  }
}
