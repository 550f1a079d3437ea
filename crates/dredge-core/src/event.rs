#![forbid(unsafe_code)]

//! Canonical input events and the session event bus.
//!
//! [`PointerEvent`] is the normalized input the host feeds into a
//! [`crate::tracker::PointerTracker`]: mouse and touch are already collapsed
//! into one pointer stream, and the Escape key arrives as its own variant.
//!
//! [`EventBus`] carries [`DragEvent`] notifications out of the session.
//! Handler lists are insertion-ordered per event kind, dispatch iterates a
//! snapshot taken before the first call, and a handler subscribed after an
//! event fired never sees that past event (no replay).

use std::rc::Rc;

use ahash::AHashMap;
use bitflags::bitflags;

use crate::geometry::Point;
use crate::target::{DragData, DragSource, DropTarget};

// ---------------------------------------------------------------------------
// Input events
// ---------------------------------------------------------------------------

bitflags! {
    /// Pointer buttons held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PointerButtons: u8 {
        const NONE      = 0;
        const PRIMARY   = 1 << 0;
        const SECONDARY = 1 << 1;
        const MIDDLE    = 1 << 2;
    }
}

/// Eligibility facts about the element under a pointer-down, supplied by the
/// host (the core has no DOM to query).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownTarget {
    /// False when the pressed element is marked as not draggable.
    pub draggable: bool,
    /// Whether the pressed element lies inside the source's handle region.
    pub in_handle: bool,
}

impl Default for DownTarget {
    fn default() -> Self {
        Self {
            draggable: true,
            in_handle: true,
        }
    }
}

/// Normalized pointer/keyboard input consumed by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on the draggable source.
    Down {
        pos: Point,
        buttons: PointerButtons,
        target: DownTarget,
    },
    /// Pointer moved.
    Move { pos: Point },
    /// Pointer released.
    Up { pos: Point },
    /// Pointer stream aborted by the host (capture lost, touch cancel).
    Cancel,
    /// Escape pressed while the gesture is live.
    Escape,
}

// ---------------------------------------------------------------------------
// Session events
// ---------------------------------------------------------------------------

/// The session event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A drag session started.
    DragStart,
    /// The foremost drop target changed. `previous_top` is populated.
    TopChanged,
    /// The pointer position changed (every move, unconditionally).
    PositionChanged,
    /// The session finished over a target (emitted before `DragEnd`).
    Drop,
    /// The session ended. `success` is populated.
    DragEnd,
}

/// Full-snapshot payload delivered with every session event.
#[derive(Clone)]
pub struct DragEvent {
    pub kind: EventKind,
    pub type_tag: String,
    pub data: DragData,
    pub source: Rc<DragSource>,
    pub position: Point,
    pub top: Option<Rc<dyn DropTarget>>,
    /// Previous top target; meaningful only for [`EventKind::TopChanged`].
    pub previous_top: Option<Rc<dyn DropTarget>>,
    /// Tri-state drop outcome; set only at finalization.
    pub success: Option<bool>,
    /// The input event that triggered this notification, if any.
    pub native: Option<PointerEvent>,
}

impl std::fmt::Debug for DragEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragEvent")
            .field("kind", &self.kind)
            .field("type_tag", &self.type_tag)
            .field("position", &self.position)
            .field("top", &self.top.as_ref().map(|t| t.id()))
            .field("success", &self.success)
            .finish()
    }
}

/// Opaque subscription token returned by [`EventBus::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerToken(u64);

type Handler = Rc<dyn Fn(&DragEvent)>;

/// Per-event-kind, insertion-ordered handler registry.
#[derive(Default)]
pub struct EventBus {
    handlers: AHashMap<EventKind, Vec<(HandlerToken, Handler)>>,
    next_token: u64,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event kind. Handlers fire in subscription order.
    pub fn on(&mut self, kind: EventKind, handler: impl Fn(&DragEvent) + 'static) -> HandlerToken {
        let token = HandlerToken(self.next_token);
        self.next_token += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((token, Rc::new(handler)));
        token
    }

    /// Remove a subscription. Returns true if it was present.
    pub fn off(&mut self, kind: EventKind, token: HandlerToken) -> bool {
        match self.handlers.get_mut(&kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|(t, _)| *t != token);
                list.len() != before
            }
            None => false,
        }
    }

    /// Dispatch an event to the handlers subscribed to its kind.
    ///
    /// Iterates a snapshot, so handlers may subscribe/unsubscribe during
    /// dispatch without affecting the current round.
    pub fn emit(&self, event: &DragEvent) {
        let snapshot: Vec<Handler> = match self.handlers.get(&event.kind) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return,
        };
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of live subscriptions across all event kinds.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
