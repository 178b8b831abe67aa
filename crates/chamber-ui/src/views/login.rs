use std::str::FromStr;

use chamber_core::permissions::Role;
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  SubmitEvent,
  TargetCast,
  function_component,
  html,
  use_context,
  use_state
};
use yew_router::prelude::use_navigator;

use crate::app::{
  AppContext,
  Route
};
use crate::storage::Session;

fn build_session(
  name: &str,
  role: &str
) -> Result<Session, String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(
      "Enter your name to sign in."
        .to_string()
    );
  }
  let role = Role::from_str(role)
    .map_err(|err| format!("{err:#}"))?;
  Ok(Session {
    name: name.to_string(),
    role
  })
}

#[function_component(LoginView)]
pub fn login_view() -> Html {
  let context = use_context::<AppContext>();
  let navigator = use_navigator();
  let name = use_state(String::new);
  let role = use_state(|| {
    Role::Member.as_str().to_string()
  });
  let error = use_state(|| None::<String>);

  let on_name = {
    let name = name.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlInputElement =
        event.target_unchecked_into();
      name.set(input.value());
    })
  };

  let on_role = {
    let role = role.clone();
    Callback::from(move |event: Event| {
      let select: HtmlSelectElement =
        event.target_unchecked_into();
      role.set(select.value());
    })
  };

  let on_submit = {
    let name = name.clone();
    let role = role.clone();
    let error = error.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();
        match build_session(&name, &role) {
          | Ok(session) => {
            tracing::info!(
              role = %session.role,
              "signed in"
            );
            error.set(None);
            if let Some(ctx) = context.as_ref()
            {
              ctx
                .on_session
                .emit(Some(session));
            }
            if let Some(navigator) =
              navigator.as_ref()
            {
              navigator.push(&Route::Dashboard);
            }
          }
          | Err(message) => {
            error.set(Some(message))
          }
        }
      }
    )
  };

  html! {
      <section class="view login">
          <h1>{ "Sign in" }</h1>
          <form class="form" onsubmit={on_submit}>
              <label>
                  { "Name" }
                  <input type="text" value={(*name).clone()} oninput={on_name} />
              </label>
              <label>
                  { "Role" }
                  <select onchange={on_role}>
                      {
                          for Role::ALL.iter().map(|option| html! {
                              <option
                                  value={option.as_str()}
                                  selected={option.as_str() == role.as_str()}
                              >
                                  { option.label() }
                              </option>
                          })
                      }
                  </select>
              </label>
              {
                  if let Some(message) = (*error).clone() {
                      html! { <div class="notice">{ message }</div> }
                  } else {
                      html! {}
                  }
              }
              <button class="btn" type="submit">{ "Sign in" }</button>
          </form>
      </section>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_name_is_rejected() {
    assert!(build_session("  ", "member").is_err());
  }

  #[test]
  fn unknown_role_is_rejected() {
    assert!(build_session("Ada", "guest").is_err());
  }

  #[test]
  fn session_is_built_from_trimmed_name() {
    let session = build_session(" Ada ", "Board")
      .expect("valid session");
    assert_eq!(session.name, "Ada");
    assert_eq!(session.role, Role::Board);
  }
}
