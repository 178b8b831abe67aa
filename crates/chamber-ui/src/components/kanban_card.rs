use chamber_core::board::Lane;
use chamber_core::due_date::normalize_due_value;
use chamber_core::records::TaskRecord;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

use crate::drag::use_kanban_drag;

#[derive(Properties, PartialEq)]
pub struct KanbanCardProps {
  pub task:          TaskRecord,
  pub is_submitting: bool,
  pub on_move: Callback<(String, Lane)>
}

#[function_component(KanbanCard)]
pub fn kanban_card(
  props: &KanbanCardProps
) -> Html {
  let task_id = props.task.id.to_string();
  let drag = use_kanban_drag(
    task_id.clone(),
    props.task.title.clone(),
    props.is_submitting
  );

  let next_lane = props.task.status.next();
  let on_advance = {
    let on_move = props.on_move.clone();
    let task_id = task_id.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_move.emit((
          task_id.clone(),
          next_lane
        ));
      }
    )
  };

  let due = normalize_due_value(
    &props.task.due_date
  )
  .map(|due| due.display());

  html! {
      <div
          class={classes!("kanban-card", drag.is_dragging.then_some("dragging"))}
          draggable="true"
          ondragstart={drag.on_drag_start.clone()}
          ondragend={drag.on_drag_end.clone()}
      >
          <div class="kanban-card-title">{ &props.task.title }</div>
          <div class="kanban-card-meta">
              {
                  if let Some(due) = due {
                      html! { <span class="badge">{ format!("due:{due}") }</span> }
                  } else {
                      html! {}
                  }
              }
              {
                  if let Some(assignee) = props.task.assignee.clone() {
                      html! { <span class="badge">{ format!("@{assignee}") }</span> }
                  } else {
                      html! {}
                  }
              }
          </div>
          <button class="btn" disabled={props.is_submitting} onclick={on_advance}>
              { format!("Move to {}", next_lane.label()) }
          </button>
      </div>
  }
}
