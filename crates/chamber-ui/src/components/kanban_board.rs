use chamber_core::board::{
  KanbanBoard,
  Lane
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_state
};

use super::KanbanColumn;

#[derive(Properties, PartialEq)]
pub struct KanbanBoardViewProps {
  pub board:         KanbanBoard,
  pub is_submitting: bool,
  pub on_move: Callback<(String, Lane)>
}

#[function_component(KanbanBoardView)]
pub fn kanban_board_view(
  props: &KanbanBoardViewProps
) -> Html {
  let drag_over_lane =
    use_state(|| None::<Lane>);

  let on_drag_over = {
    let drag_over_lane =
      drag_over_lane.clone();
    Callback::from(move |lane: Lane| {
      if *drag_over_lane != Some(lane) {
        drag_over_lane.set(Some(lane));
      }
    })
  };

  let on_move = {
    let on_move = props.on_move.clone();
    let drag_over_lane =
      drag_over_lane.clone();
    Callback::from(
      move |target: (String, Lane)| {
        drag_over_lane.set(None);
        on_move.emit(target);
      }
    )
  };

  html! {
      <div class="kanban-board">
          {
              for props.board.lanes().into_iter().map(|(lane, tasks)| {
                  html! {
                      <KanbanColumn
                          key={lane.as_str()}
                          lane={lane}
                          tasks={tasks.into_iter().cloned().collect::<Vec<_>>()}
                          is_submitting={props.is_submitting}
                          is_drop_hint={*drag_over_lane == Some(lane)}
                          on_drag_over={on_drag_over.clone()}
                          on_move={on_move.clone()}
                      />
                  }
              })
          }
      </div>
  }
}
