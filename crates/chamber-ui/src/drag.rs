use anyhow::anyhow;
use chamber_core::drag::{
  DragController,
  DragProxy,
  DragStartOutcome,
  DragState,
  DragSurface
};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::DragEvent;
use yew::{
  Callback,
  hook,
  use_mut_ref,
  use_state
};

/// Adapts a browser `DragEvent` to the controller.
pub struct WebDragSurface<'a> {
  event: &'a DragEvent
}

impl<'a> WebDragSurface<'a> {
  pub fn new(event: &'a DragEvent) -> Self {
    Self { event }
  }
}

fn js_error(err: JsValue) -> anyhow::Error {
  anyhow!("{err:?}")
}

impl DragSurface for WebDragSurface<'_> {
  fn cancel(&self) {
    self.event.prevent_default();
  }

  fn set_transfer_data(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    let data_transfer = self
      .event
      .data_transfer()
      .ok_or_else(|| {
        anyhow!(
          "drag event has no data \
           transfer"
        )
      })?;
    data_transfer
      .set_data(key, value)
      .map_err(js_error)
  }

  fn set_effect_allowed(
    &self,
    effect: &str
  ) {
    if let Some(data_transfer) =
      self.event.data_transfer()
    {
      data_transfer
        .set_effect_allowed(effect);
    }
  }

  fn show_drag_proxy(
    &self,
    proxy: &DragProxy
  ) -> anyhow::Result<()> {
    let document = web_sys::window()
      .and_then(|window| {
        window.document()
      })
      .ok_or_else(|| {
        anyhow!("no document")
      })?;
    let body = document
      .body()
      .ok_or_else(|| {
        anyhow!("document has no body")
      })?;

    let element = document
      .create_element("div")
      .map_err(js_error)?;
    element.set_class_name(proxy.class);
    element
      .set_text_content(Some(proxy.label.as_str()));
    body
      .append_child(&element)
      .map_err(js_error)?;

    if let Some(data_transfer) =
      self.event.data_transfer()
    {
      data_transfer.set_drag_image(
        &element,
        proxy.offset_x,
        proxy.offset_y
      );
    }
    element.remove();
    Ok(())
  }
}

#[derive(Clone, PartialEq)]
pub struct KanbanDragHandle {
  pub is_dragging:   bool,
  pub on_drag_start: Callback<DragEvent>,
  pub on_drag_end:   Callback<DragEvent>
}

/// Drag state for one card. The switch to dragging is applied from a
/// zero-delay timeout so it lands after the browser has finished the
/// native drag start.
#[hook]
pub fn use_kanban_drag(
  item_id: String,
  label: String,
  is_submitting: bool
) -> KanbanDragHandle {
  let controller = use_mut_ref(|| {
    DragController::new(
      item_id,
      label.clone()
    )
  });
  let state = use_state(|| DragState::Idle);

  let on_drag_start = {
    let controller = controller.clone();
    let state = state.setter();
    Callback::from(
      move |event: DragEvent| {
        let surface =
          WebDragSurface::new(&event);
        let outcome = {
          let mut drag =
            controller.borrow_mut();
          drag.set_proxy_label(
            label.clone()
          );
          drag.handle_drag_start(
            is_submitting,
            &surface
          )
        };
        if outcome
          == DragStartOutcome::Deferred
        {
          let controller =
            controller.clone();
          let state = state.clone();
          Timeout::new(0, move || {
            let next = controller
              .borrow_mut()
              .commit_deferred();
            state.set(next);
          })
          .forget();
        }
      }
    )
  };

  let on_drag_end = {
    let state = state.setter();
    Callback::from(move |_: DragEvent| {
      let next = controller
        .borrow_mut()
        .handle_drag_end();
      state.set(next);
    })
  };

  KanbanDragHandle {
    is_dragging: state.is_dragging(),
    on_drag_start,
    on_drag_end
  }
}
