use chamber_core::board::{
  KanbanBoard,
  Lane
};
use chamber_core::permissions::{
  Capability,
  role_allows
};
use gloo::timers::callback::Timeout;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_context,
  use_state
};

use super::render_snapshot;
use crate::app::{
  AppContext,
  LoadState
};
use crate::components::KanbanBoardView;

#[function_component(BoardView)]
pub fn board_view() -> Html {
  let context = use_context::<AppContext>();
  let is_submitting = use_state(|| false);
  let notice = use_state(|| None::<String>);

  let can_update = context
    .as_ref()
    .and_then(|ctx| ctx.session.as_ref())
    .is_some_and(|session| {
      role_allows(
        session.role,
        Capability::Update
      )
    });

  let on_move = {
    let context = context.clone();
    let is_submitting = is_submitting.clone();
    let notice = notice.clone();
    Callback::from(
      move |(task_id, lane): (String, Lane)| {
        let Some(ctx) = context.as_ref() else {
          return;
        };
        let LoadState::Ready(snapshot) =
          &ctx.snapshot
        else {
          return;
        };
        if !can_update {
          notice.set(Some(
            "Your role cannot move tasks."
              .to_string()
          ));
          return;
        }

        let mut board =
          KanbanBoard::from_tasks(
            &snapshot.tasks
          );
        match board.move_task(&task_id, lane)
        {
          | Ok(true) => {
            notice.set(None);
            is_submitting.set(true);
            let on_tasks =
              ctx.on_tasks.clone();
            let is_submitting =
              is_submitting.clone();
            Timeout::new(0, move || {
              on_tasks
                .emit(board.into_tasks());
              is_submitting.set(false);
            })
            .forget();
          }
          | Ok(false) => {}
          | Err(error) => {
            tracing::warn!(
              %error,
              "rejected board move"
            );
            notice.set(Some(format!(
              "{error:#}"
            )));
          }
        }
      }
    )
  };

  let submitting = *is_submitting;
  let notice_text = (*notice).clone();

  render_snapshot(context.as_ref(), move |snapshot| {
    html! {
        <section class="view board">
            <h1>{ "Task board" }</h1>
            {
                if let Some(text) = notice_text {
                    html! { <div class="notice">{ text }</div> }
                } else {
                    html! {}
                }
            }
            {
                if submitting {
                    html! { <div class="hint">{ "Saving…" }</div> }
                } else {
                    html! {}
                }
            }
            <KanbanBoardView
                board={KanbanBoard::from_tasks(&snapshot.tasks)}
                is_submitting={submitting}
                {on_move}
            />
        </section>
    }
  })
}
