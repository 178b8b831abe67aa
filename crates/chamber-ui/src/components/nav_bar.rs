use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_context
};
use yew_router::prelude::Link;

use crate::app::{
  AppContext,
  Route
};

#[function_component(NavBar)]
pub fn nav_bar() -> Html {
  let context = use_context::<AppContext>();

  let session_block = match context {
    | Some(AppContext {
      session: Some(session),
      on_session,
      ..
    }) => {
      let on_sign_out =
        Callback::from(move |_: MouseEvent| {
          on_session.emit(None)
        });
      html! {
          <div class="session">
              <span>{ &session.name }</span>
              <span class="badge">{ session.role.label() }</span>
              <button class="btn" onclick={on_sign_out}>{ "Sign out" }</button>
          </div>
      }
    }
    | _ => html! {
        <div class="session">
            <Link<Route> to={Route::Login}>{ "Sign in" }</Link<Route>>
        </div>
    }
  };

  html! {
      <nav class="nav">
          <div class="brand">{ "Chamber" }</div>
          <Link<Route> to={Route::Dashboard}>{ "Dashboard" }</Link<Route>>
          <Link<Route> to={Route::Calendar}>{ "Calendar" }</Link<Route>>
          <Link<Route> to={Route::Events}>{ "Events" }</Link<Route>>
          <Link<Route> to={Route::Projects}>{ "Projects" }</Link<Route>>
          <Link<Route> to={Route::Board}>{ "Board" }</Link<Route>>
          <Link<Route> to={Route::Users}>{ "Users" }</Link<Route>>
          { session_block }
      </nav>
  }
}
