use chamber_core::board::Lane;
use chamber_core::drag::TASK_ID_TRANSFER_KEY;
use chamber_core::records::TaskRecord;
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::KanbanCard;

#[derive(Properties, PartialEq)]
pub struct KanbanColumnProps {
  pub lane:          Lane,
  pub tasks:         Vec<TaskRecord>,
  pub is_submitting: bool,
  pub is_drop_hint:  bool,
  pub on_drag_over:  Callback<Lane>,
  pub on_move: Callback<(String, Lane)>
}

#[function_component(KanbanColumn)]
pub fn kanban_column(
  props: &KanbanColumnProps
) -> Html {
  let lane = props.lane;

  let ondragover = {
    let on_drag_over =
      props.on_drag_over.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        on_drag_over.emit(lane);
      }
    )
  };

  let ondrop = {
    let on_move = props.on_move.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        event.stop_propagation();
        let Some(data_transfer) =
          event.data_transfer()
        else {
          return;
        };
        match data_transfer
          .get_data(TASK_ID_TRANSFER_KEY)
        {
          | Ok(task_id)
            if !task_id.trim().is_empty() =>
          {
            on_move.emit((
              task_id.trim().to_string(),
              lane
            ));
          }
          | Ok(_) => {
            tracing::warn!(
              "drop without a task id"
            );
          }
          | Err(error) => {
            tracing::warn!(
              ?error,
              "failed reading drag data"
            );
          }
        }
      }
    )
  };

  html! {
      <div class={classes!("kanban-column", props.is_drop_hint.then_some("drop-hint"))} {ondragover} {ondrop}>
          <div class="kanban-column-header">
              <span>{ lane.label() }</span>
              <span class="badge">{ props.tasks.len() }</span>
          </div>
          <div class="kanban-column-body">
              {
                  if props.tasks.is_empty() {
                      html! { <div class="kanban-empty">{ "No tasks" }</div> }
                  } else {
                      html! {
                          <>
                              {
                                  for props.tasks.iter().cloned().map(|task| {
                                      html! {
                                          <KanbanCard
                                              key={task.id.to_string()}
                                              task={task}
                                              is_submitting={props.is_submitting}
                                              on_move={props.on_move.clone()}
                                          />
                                      }
                                  })
                              }
                          </>
                      }
                  }
              }
          </div>
      </div>
  }
}
