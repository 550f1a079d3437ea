#![forbid(unsafe_code)]

//! Engine context: one object wiring the session, the target registry, the
//! auto-scroller, and the ghost controller together.
//!
//! Session events fan out twice: once to user subscriptions on the bus, and
//! once into an internal queue the context drains into the ghost controller
//! (bus handlers are shared closures; the ghost controller needs mutable
//! access to itself and the host). Draining happens at the end of every
//! context operation, so ghosts always reflect the session state the caller
//! observes afterwards.
//!
//! # Invariants
//!
//! 1. Target lifecycle hooks run before the start event (a misconfigured
//!    target aborts the drag with no events emitted) and after the end
//!    events.
//! 2. Ending a session always disarms the auto-scroller.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use crate::autoscroll::{AutoScrollConfig, AutoScroller};
use crate::error::ConfigError;
use crate::event::{DragEvent, EventKind, HandlerToken, PointerEvent};
use crate::geometry::Point;
use crate::ghost::{GhostController, GhostHost};
use crate::hit_test::TargetRegistry;
use crate::scene::Scene;
use crate::session::DragSession;
use crate::target::DragSource;

type EventFeed = Rc<RefCell<VecDeque<DragEvent>>>;

/// Owns and coordinates the drag-and-drop engine pieces.
pub struct DndContext {
    pub session: DragSession,
    pub registry: TargetRegistry,
    pub scroller: AutoScroller,
    pub ghosts: GhostController,
    feed: EventFeed,
}

impl DndContext {
    /// Build a context with the given auto-scroll tuning.
    #[must_use]
    pub fn new(scroll_config: AutoScrollConfig) -> Self {
        let feed: EventFeed = Rc::default();
        let mut session = DragSession::new();
        for kind in [
            EventKind::DragStart,
            EventKind::TopChanged,
            EventKind::PositionChanged,
            EventKind::Drop,
            EventKind::DragEnd,
        ] {
            let feed = Rc::clone(&feed);
            session.on(kind, move |event| {
                feed.borrow_mut().push_back(event.clone());
            });
        }
        Self {
            session,
            registry: TargetRegistry::new(),
            scroller: AutoScroller::new(scroll_config),
            ghosts: GhostController::new(),
            feed,
        }
    }

    /// Subscribe to session events.
    pub fn on(&mut self, kind: EventKind, handler: impl Fn(&DragEvent) + 'static) -> HandlerToken {
        self.session.on(kind, handler)
    }

    /// Remove a session subscription.
    pub fn off(&mut self, kind: EventKind, token: HandlerToken) -> bool {
        self.session.off(kind, token)
    }

    /// Begin a session. Runs every registered target's start hook first; a
    /// hook error aborts with nothing emitted.
    pub fn start_drag(
        &mut self,
        source: Rc<DragSource>,
        position: Point,
        native: Option<PointerEvent>,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
        now: Instant,
    ) -> Result<(), ConfigError> {
        for target in self.registry.targets() {
            target.on_drag_start(&source, scene)?;
        }
        self.session.start(source, position, native);
        self.pump_ghosts(scene, host, now);
        Ok(())
    }

    /// Finalize over the current top target (drop attempt).
    pub fn stop_drag(
        &mut self,
        native: Option<PointerEvent>,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
        now: Instant,
    ) {
        self.session.stop(native);
        self.finish(scene, host, now);
    }

    /// Abandon the session; the outcome is always a failure.
    pub fn cancel_drag(
        &mut self,
        native: Option<PointerEvent>,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
        now: Instant,
    ) {
        self.session.cancel(native);
        self.finish(scene, host, now);
    }

    /// Advance timers: auto-scroll repeats and ghost animation frames.
    pub fn tick(&mut self, scene: &mut dyn Scene, host: &mut dyn GhostHost, now: Instant) {
        self.scroller.tick(scene, now);
        self.ghosts.tick(host, now);
        self.pump_ghosts(scene, host, now);
    }

    /// Drain queued session events into the ghost controller.
    pub fn pump_ghosts(&mut self, scene: &dyn Scene, host: &mut dyn GhostHost, now: Instant) {
        loop {
            let Some(event) = self.feed.borrow_mut().pop_front() else {
                break;
            };
            self.ghosts.handle(&event, scene, host, now);
        }
    }

    fn finish(&mut self, scene: &mut dyn Scene, host: &mut dyn GhostHost, now: Instant) {
        for target in self.registry.targets() {
            target.on_drag_end();
        }
        self.scroller.cancel();
        self.pump_ghosts(scene, host, now);
    }
}

impl Default for DndContext {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

impl std::fmt::Debug for DndContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DndContext")
            .field("active", &self.session.is_active())
            .field("targets", &self.registry.len())
            .finish()
    }
}
