#![forbid(unsafe_code)]

//! The drag session: single source of truth for an in-progress drag.
//!
//! [`DragSession`] is a two-state machine (Idle, Dragging) with an event
//! feed. All mutation happens synchronously inside the handling of one
//! input event; listeners must not re-enter `start`/`stop`/`cancel`.
//!
//! # Invariants
//!
//! 1. At most one session is active per context. A `start` while Dragging
//!    is rejected (logged, no state change).
//! 2. `position` and `top` are meaningful only while Dragging; they are
//!    cleared on every path back to Idle.
//! 3. `success` is set exactly once per session, at finalization.
//! 4. Every `stop`/`cancel` emits `drag-end`; `drop` (when a top target is
//!    set at `stop`) is emitted before `drag-end`.
//! 5. `update_position`, `set_top`, `stop`, `cancel` are no-ops while Idle.

use std::rc::Rc;

use crate::event::{DragEvent, EventBus, EventKind, HandlerToken, PointerEvent};
use crate::geometry::Point;
use crate::logging::{debug, warn_log};
use crate::target::{DragData, DragSource, DropEffect, DropMode, DropTarget};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Dragging,
}

/// The global-per-context drag state machine.
pub struct DragSession {
    state: State,
    source: Option<Rc<DragSource>>,
    position: Point,
    top: Option<Rc<dyn DropTarget>>,
    success: Option<bool>,
    bus: EventBus,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            source: None,
            position: Point::default(),
            top: None,
            success: None,
            bus: EventBus::new(),
        }
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == State::Dragging
    }

    /// The originating draggable, while active.
    #[must_use]
    pub fn source(&self) -> Option<&Rc<DragSource>> {
        self.source.as_ref()
    }

    /// The payload type tag, while active.
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.type_tag.as_str())
    }

    /// The opaque payload, while active.
    #[must_use]
    pub fn data(&self) -> Option<&DragData> {
        self.source.as_deref().map(|s| &s.data)
    }

    /// Last known pointer position, meaningful only while active.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// The current foremost qualifying drop target.
    #[must_use]
    pub fn top(&self) -> Option<&Rc<dyn DropTarget>> {
        self.top.as_ref()
    }

    /// Tri-state drop outcome, set only at finalization.
    #[must_use]
    pub fn success(&self) -> Option<bool> {
        self.success
    }

    /// Effective transfer semantics of the drag right now, or `None` when
    /// idle or when the current top would reject the drop.
    #[must_use]
    pub fn current_effect(&self) -> Option<DropEffect> {
        if self.state != State::Dragging {
            return None;
        }
        let top = self.top.as_ref()?;
        let source = self.source.as_ref()?;
        if !top.drop_allowed(&source.type_tag, &source.data, source) {
            return None;
        }
        Some(if top.reordering() {
            DropEffect::Reordering
        } else {
            match top.drop_mode() {
                DropMode::Copy => DropEffect::Copy,
                DropMode::Cut => DropEffect::Cut,
            }
        })
    }

    /// Subscribe to a session event.
    pub fn on(&mut self, kind: EventKind, handler: impl Fn(&DragEvent) + 'static) -> HandlerToken {
        self.bus.on(kind, handler)
    }

    /// Remove a subscription.
    pub fn off(&mut self, kind: EventKind, token: HandlerToken) -> bool {
        self.bus.off(kind, token)
    }

    /// Number of live subscriptions (leak checks in tests).
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.bus.handler_count()
    }

    /// Idle → Dragging. Emits `drag-start`, then `top-changed` with a null
    /// previous top.
    pub fn start(&mut self, source: Rc<DragSource>, position: Point, native: Option<PointerEvent>) {
        if self.state == State::Dragging {
            warn_log!("drag start rejected: a session is already active");
            return;
        }
        debug!("drag session start: type={}", source.type_tag);
        self.source = Some(source);
        self.position = position;
        self.top = None;
        self.success = None;
        self.state = State::Dragging;

        self.emit(EventKind::DragStart, None, native);
        self.emit(EventKind::TopChanged, None, native);
    }

    /// Record a pointer move. Emits `position-changed` unconditionally.
    pub fn update_position(&mut self, position: Point, native: Option<PointerEvent>) {
        if self.state != State::Dragging {
            return;
        }
        self.position = position;
        self.emit(EventKind::PositionChanged, None, native);
    }

    /// Install the resolved foremost target. Emits `top-changed` iff the
    /// target differs from the current one.
    pub fn set_top(&mut self, top: Option<Rc<dyn DropTarget>>, native: Option<PointerEvent>) {
        if self.state != State::Dragging {
            return;
        }
        let changed = match (&self.top, &top) {
            (None, None) => false,
            (Some(a), Some(b)) => a.id() != b.id(),
            _ => true,
        };
        if !changed {
            return;
        }
        let previous = std::mem::replace(&mut self.top, top);
        self.emit(EventKind::TopChanged, previous, native);
    }

    /// Finalize the drag over whatever target is on top.
    ///
    /// `success` is true iff a top target is set and its type, payload, and
    /// mode checks all pass. Emits `drop` (when a top target is set) before
    /// `drag-end`, then resets to Idle.
    pub fn stop(&mut self, native: Option<PointerEvent>) {
        if self.state != State::Dragging {
            return;
        }
        let success = match (&self.top, &self.source) {
            (Some(top), Some(source)) => {
                top.mode_compatible(source)
                    && top.drop_allowed(&source.type_tag, &source.data, source)
            }
            _ => false,
        };
        self.success = Some(success);
        debug!("drag session stop: success={success}");

        if self.top.is_some() {
            self.emit(EventKind::Drop, None, native);
        }
        self.emit(EventKind::DragEnd, None, native);
        self.reset();
    }

    /// Abort the drag. `success` is false unconditionally; emits `drag-end`
    /// and resets to Idle.
    pub fn cancel(&mut self, native: Option<PointerEvent>) {
        if self.state != State::Dragging {
            return;
        }
        self.success = Some(false);
        debug!("drag session cancel");
        self.emit(EventKind::DragEnd, None, native);
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.source = None;
        self.position = Point::default();
        self.top = None;
        // `success` intentionally survives until the next start so late
        // observers (the post-up click window) can still read the outcome.
    }

    fn emit(
        &self,
        kind: EventKind,
        previous_top: Option<Rc<dyn DropTarget>>,
        native: Option<PointerEvent>,
    ) {
        let Some(source) = &self.source else { return };
        let event = DragEvent {
            kind,
            type_tag: source.type_tag.clone(),
            data: Rc::clone(&source.data),
            source: Rc::clone(source),
            position: self.position,
            top: self.top.clone(),
            previous_top,
            success: self.success,
            native,
        };
        self.bus.emit(&event);
    }
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("active", &self.is_active())
            .field("top", &self.top.as_ref().map(|t| t.id()))
            .field("success", &self.success)
            .finish()
    }
}
