use chamber_core::permissions::{
  Capability,
  PERMISSIONS,
  Permissions,
  role_allows
};
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
use crate::components::EmptyView;

fn capability_summary(
  permissions: &Permissions
) -> String {
  let granted = permissions
    .granted()
    .map(|cap| cap.as_str())
    .collect::<Vec<_>>();
  if granted.is_empty() {
    "none".to_string()
  } else {
    granted.join(", ")
  }
}

fn permission_matrix() -> Html {
  html! {
      <table class="table permission-matrix">
          <thead>
              <tr>
                  <th>{ "Role" }</th>
                  { for Capability::ALL.iter().map(|cap| html! { <th>{ cap.as_str() }</th> }) }
              </tr>
          </thead>
          <tbody>
              {
                  for PERMISSIONS.iter().map(|(role, permissions)| html! {
                      <tr key={role.as_str()}>
                          <td>{ role.label() }</td>
                          {
                              for Capability::ALL.iter().map(|cap| {
                                  let mark = if permissions.allows(*cap) { "yes" } else { "no" };
                                  html! { <td class={mark}>{ mark }</td> }
                              })
                          }
                      </tr>
                  })
              }
          </tbody>
      </table>
  }
}

#[function_component(UsersView)]
pub fn users_view() -> Html {
  let context = use_context::<AppContext>();
  let session = context
    .as_ref()
    .and_then(|ctx| ctx.session.clone());

  let Some(session) = session else {
    return html! {
        <section class="view users">
            <h1>{ "Members" }</h1>
            <EmptyView message="Sign in to see the member directory." />
            <Link<Route> to={Route::Login}>{ "Sign in" }</Link<Route>>
        </section>
    };
  };

  if !role_allows(
    session.role,
    Capability::Read
  ) {
    return html! {
        <section class="view users">
            <h1>{ "Members" }</h1>
            <EmptyView message="Your role cannot view members." />
        </section>
    };
  }

  render_snapshot(context.as_ref(), |snapshot| {
    let directory = if snapshot.users.is_empty() {
      html! { <EmptyView message="No members yet." /> }
    } else {
      html! {
          <table class="table">
              <thead>
                  <tr>
                      <th>{ "Name" }</th>
                      <th>{ "Email" }</th>
                      <th>{ "Role" }</th>
                      <th>{ "Can" }</th>
                  </tr>
              </thead>
              <tbody>
                  {
                      for snapshot.users.iter().map(|user| html! {
                          <tr key={user.id.to_string()}>
                              <td>{ &user.name }</td>
                              <td>{ user.email.clone().unwrap_or_default() }</td>
                              <td>{ user.role_label() }</td>
                              <td>{ capability_summary(&user.permissions()) }</td>
                          </tr>
                      })
                  }
              </tbody>
          </table>
      }
    };

    html! {
        <section class="view users">
            <h1>{ "Members" }</h1>
            { directory }
            <h2>{ "Role permissions" }</h2>
            { permission_matrix() }
        </section>
    }
  })
}

#[cfg(test)]
mod tests {
  use chamber_core::permissions::{
    Role,
    permissions_for
  };

  use super::*;

  #[test]
  fn summary_lists_granted_capabilities() {
    assert_eq!(
      capability_summary(&permissions_for(
        Role::Member
      )),
      "read, comment"
    );
  }
}
