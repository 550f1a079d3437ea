#![forbid(unsafe_code)]

//! Gesture driver: scripted pointer input against a live engine.
//!
//! Time is virtual. `advance` moves the clock and fires due deadlines, so a
//! hold-to-drag or a ghost return glide runs to completion without any real
//! waiting.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use dredge_core::context::DndContext;
use dredge_core::error::ConfigError;
use dredge_core::event::{DownTarget, DragEvent, EventKind, PointerButtons, PointerEvent};
use dredge_core::geometry::Point;
use dredge_core::target::DragSource;
use dredge_core::tracker::{PointerTracker, TrackerConfig};

use crate::ghost::TestGhostHost;
use crate::scene::TestScene;

/// A context, a tracker, a scene, a ghost host, and a virtual clock.
pub struct GestureDriver {
    pub ctx: DndContext,
    pub tracker: PointerTracker,
    pub scene: TestScene,
    pub host: TestGhostHost,
    now: Instant,
}

impl GestureDriver {
    /// Build a driver around a scene and one draggable source.
    #[must_use]
    pub fn new(scene: TestScene, source: Rc<DragSource>, config: TrackerConfig) -> Self {
        Self {
            ctx: DndContext::default(),
            tracker: PointerTracker::new(source, config),
            scene,
            host: TestGhostHost::new(),
            now: Instant::now(),
        }
    }

    /// The current virtual time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Feed one raw pointer event.
    pub fn feed(&mut self, event: PointerEvent) -> Result<(), ConfigError> {
        self.tracker
            .handle(&event, self.now, &mut self.ctx, &mut self.scene, &mut self.host)
    }

    /// Primary-button press with default eligibility.
    pub fn press(&mut self, x: f32, y: f32) -> Result<(), ConfigError> {
        self.feed(PointerEvent::Down {
            pos: Point::new(x, y),
            buttons: PointerButtons::PRIMARY,
            target: DownTarget::default(),
        })
    }

    /// Pointer move.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Result<(), ConfigError> {
        self.feed(PointerEvent::Move {
            pos: Point::new(x, y),
        })
    }

    /// Pointer release.
    pub fn release(&mut self, x: f32, y: f32) -> Result<(), ConfigError> {
        self.feed(PointerEvent::Up {
            pos: Point::new(x, y),
        })
    }

    /// Escape key.
    pub fn escape(&mut self) -> Result<(), ConfigError> {
        self.feed(PointerEvent::Escape)
    }

    /// Advance the virtual clock and fire due deadlines.
    pub fn advance(&mut self, by: Duration) -> Result<(), ConfigError> {
        self.now += by;
        self.tick()
    }

    /// Fire due deadlines at the current time.
    pub fn tick(&mut self) -> Result<(), ConfigError> {
        self.tracker
            .tick(self.now, &mut self.ctx, &mut self.scene, &mut self.host)
    }

    /// Record the kinds of every session event from here on.
    pub fn record_events(&mut self) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::DragStart,
            EventKind::TopChanged,
            EventKind::PositionChanged,
            EventKind::Drop,
            EventKind::DragEnd,
        ] {
            let log = Rc::clone(&log);
            self.ctx
                .on(kind, move |event: &DragEvent| log.borrow_mut().push(event.kind));
        }
        log
    }
}

impl std::fmt::Debug for GestureDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDriver")
            .field("active", &self.ctx.session.is_active())
            .field("clones", &self.host.live_count())
            .finish()
    }
}
