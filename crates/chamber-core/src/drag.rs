//! Drag state for a single kanban card.
//!
//! A card is `Idle` until a drag starts and `Dragging` until it ends. The
//! flip to `Dragging` is never applied inside the drag-start handler: the
//! handler returns [`DragStartOutcome::Deferred`] and the caller runs
//! [`DragController::commit_deferred`] on its next scheduling turn, after
//! the native drag-start dispatch (and drag image capture) has finished.

use std::fmt;

/// Transfer-data key under which the dragged card's id is stored.
pub const TASK_ID_TRANSFER_KEY: &str =
  "taskId";
pub const MOVE_EFFECT: &str = "move";
pub const DRAG_PROXY_CLASS: &str =
  "kanban-drag-proxy";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum DragState {
  #[default]
  Idle,
  Dragging
}

impl DragState {
  pub fn is_dragging(self) -> bool {
    self == DragState::Dragging
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum DragStartOutcome {
  /// A submission is in flight; the native drag was cancelled.
  Suppressed,
  /// Transfer data is set; the caller must schedule `commit_deferred`.
  Deferred
}

/// Transient element shown under the pointer while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragProxy {
  pub label:     String,
  pub class:     &'static str,
  pub offset_x:  i32,
  pub offset_y:  i32
}

impl DragProxy {
  pub fn for_label(
    label: impl Into<String>
  ) -> Self {
    Self {
      label:    label.into(),
      class:    DRAG_PROXY_CLASS,
      offset_x: 12,
      offset_y: 12
    }
  }
}

/// The native drag event as seen by the controller.
pub trait DragSurface {
  fn cancel(&self);

  fn set_transfer_data(
    &self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;

  fn set_effect_allowed(
    &self,
    effect: &str
  );

  /// Attaches `proxy` to the document, registers it as the drag image and
  /// removes it again.
  fn show_drag_proxy(
    &self,
    proxy: &DragProxy
  ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragController {
  item_id:       String,
  proxy_label:   String,
  state:         DragState,
  pending_start: bool
}

impl DragController {
  pub fn new(
    item_id: impl fmt::Display,
    proxy_label: impl Into<String>
  ) -> Self {
    Self {
      item_id:       item_id
        .to_string(),
      proxy_label:   proxy_label.into(),
      state:         DragState::Idle,
      pending_start: false
    }
  }

  pub fn item_id(&self) -> &str {
    &self.item_id
  }

  pub fn state(&self) -> DragState {
    self.state
  }

  pub fn is_dragging(&self) -> bool {
    self.state.is_dragging()
  }

  pub fn has_pending_start(
    &self
  ) -> bool {
    self.pending_start
  }

  /// Keeps the proxy text in step with a renamed item.
  pub fn set_proxy_label(
    &mut self,
    label: impl Into<String>
  ) {
    self.proxy_label = label.into();
  }

  #[tracing::instrument(
    level = "debug",
    skip(self, surface),
    fields(item_id = %self.item_id)
  )]
  pub fn handle_drag_start<S>(
    &mut self,
    is_submitting: bool,
    surface: &S
  ) -> DragStartOutcome
  where
    S: DragSurface + ?Sized
  {
    if is_submitting {
      surface.cancel();
      tracing::debug!(
        "drag suppressed while a \
         submission is in progress"
      );
      return DragStartOutcome::Suppressed;
    }

    if let Err(err) = surface
      .set_transfer_data(
        TASK_ID_TRANSFER_KEY,
        &self.item_id
      )
    {
      tracing::warn!(
        error = %err,
        "failed to set drag transfer data"
      );
    }
    surface
      .set_effect_allowed(MOVE_EFFECT);

    if let Err(err) =
      surface.show_drag_proxy(
        &DragProxy::for_label(
          self.proxy_label.clone()
        )
      )
    {
      tracing::warn!(
        error = %err,
        "failed to attach drag proxy"
      );
    }

    self.pending_start = true;
    DragStartOutcome::Deferred
  }

  /// Applies a deferred start. Returns the resulting state; a start that
  /// was ended before this turn ran leaves the card idle.
  pub fn commit_deferred(
    &mut self
  ) -> DragState {
    if self.pending_start {
      self.pending_start = false;
      self.state = DragState::Dragging;
    }
    self.state
  }

  pub fn handle_drag_end(
    &mut self
  ) -> DragState {
    self.pending_start = false;
    self.state = DragState::Idle;
    self.state
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[derive(Default)]
  struct RecordingSurface {
    calls: RefCell<Vec<String>>
  }

  impl DragSurface for RecordingSurface {
    fn cancel(&self) {
      self
        .calls
        .borrow_mut()
        .push("cancel".to_string());
    }

    fn set_transfer_data(
      &self,
      key: &str,
      value: &str
    ) -> anyhow::Result<()> {
      self.calls.borrow_mut().push(
        format!("data:{key}={value}")
      );
      Ok(())
    }

    fn set_effect_allowed(
      &self,
      effect: &str
    ) {
      self
        .calls
        .borrow_mut()
        .push(format!("effect:{effect}"));
    }

    fn show_drag_proxy(
      &self,
      proxy: &DragProxy
    ) -> anyhow::Result<()> {
      self.calls.borrow_mut().push(
        format!("proxy:{}", proxy.label)
      );
      Ok(())
    }
  }

  #[test]
  fn submitting_suppresses_and_cancels() {
    let surface =
      RecordingSurface::default();
    let mut drag =
      DragController::new(7, "Card");

    let outcome = drag
      .handle_drag_start(true, &surface);

    assert_eq!(
      outcome,
      DragStartOutcome::Suppressed
    );
    assert_eq!(
      drag.state(),
      DragState::Idle
    );
    assert!(!drag.has_pending_start());
    assert_eq!(
      *surface.calls.borrow(),
      vec!["cancel".to_string()]
    );
  }

  #[test]
  fn start_is_deferred_until_commit() {
    let surface =
      RecordingSurface::default();
    let mut drag =
      DragController::new(7, "Card");

    let outcome = drag
      .handle_drag_start(false, &surface);

    assert_eq!(
      outcome,
      DragStartOutcome::Deferred
    );
    assert_eq!(
      drag.state(),
      DragState::Idle
    );
    assert_eq!(
      *surface.calls.borrow(),
      vec![
        "data:taskId=7".to_string(),
        "effect:move".to_string(),
        "proxy:Card".to_string(),
      ]
    );

    assert_eq!(
      drag.commit_deferred(),
      DragState::Dragging
    );
    assert_eq!(
      drag.handle_drag_end(),
      DragState::Idle
    );
  }

  #[test]
  fn end_before_commit_stays_idle() {
    let surface =
      RecordingSurface::default();
    let mut drag =
      DragController::new("a", "A");

    drag.handle_drag_start(false, &surface);
    drag.handle_drag_end();

    assert_eq!(
      drag.commit_deferred(),
      DragState::Idle
    );
  }

  #[test]
  fn restart_while_dragging_keeps_dragging()
  {
    let surface =
      RecordingSurface::default();
    let mut drag =
      DragController::new("a", "A");

    drag.handle_drag_start(false, &surface);
    drag.commit_deferred();
    drag.handle_drag_start(false, &surface);
    assert!(drag.is_dragging());
    assert_eq!(
      drag.commit_deferred(),
      DragState::Dragging
    );
  }

  #[test]
  fn renamed_item_shows_current_label() {
    let surface =
      RecordingSurface::default();
    let mut drag =
      DragController::new(3, "Draft");

    drag.set_proxy_label("Final agenda");
    drag.handle_drag_start(false, &surface);

    assert!(
      surface
        .calls
        .borrow()
        .contains(
          &"proxy:Final agenda".to_string()
        )
    );
  }
}
