#![forbid(unsafe_code)]

//! Pointer tracking: raw pointer events → drag gesture lifecycle.
//!
//! One [`PointerTracker`] watches one draggable source. A press primes the
//! tracker; the drag starts on the first move past the distance threshold.
//! With a hold delay configured the press must first survive the delay
//! without such travel (early travel is read as scroll intent and abandons
//! the attempt); only then does a threshold move start the drag — the
//! elapsed timer alone never does. While dragging, every move runs the full
//! pipeline: auto-scroll evaluation, hit-test resolution, then session
//! position update.
//!
//! Releases and cancellations do not finalize inline: the tracker parks in
//! a finishing state and the next [`PointerTracker::tick`] performs the
//! stop or cancel. This keeps the session observable as "in progress"
//! through the synthetic click that hosts deliver right after pointer-up;
//! the suppressed click is consumed via
//! [`PointerTracker::consume_ignored_click`].
//!
//! # Invariants
//!
//! 1. A tracker never starts a second session while one is active.
//! 2. Listener-visible state transitions happen only inside `handle` and
//!    `tick`.
//! 3. Abandoning a pending attempt leaves no session, no timers, and no
//!    click suppression behind.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::context::DndContext;
use crate::error::ConfigError;
use crate::event::{PointerButtons, PointerEvent};
use crate::geometry::Point;
use crate::ghost::GhostHost;
use crate::logging::debug;
use crate::scene::{NodeId, Scene};
use crate::target::DragSource;

/// Travel distance that turns a press into a drag (or abandons a delayed
/// attempt), in pixels.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 3.0;

/// Gesture tuning for one draggable source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Hold this long before a threshold move may start the drag. Travel
    /// past the threshold during the hold abandons the attempt (touch
    /// scrolling).
    pub delay: Option<Duration>,
    /// Travel distance separating a click from a drag.
    pub distance_threshold: f32,
    /// Auto-scroll margin width; `None` uses the scroller default. A top
    /// target's own margin still takes precedence.
    pub edge_size: Option<f32>,
    /// Only presses inside the source's handle region arm the tracker.
    pub requires_handle: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            delay: None,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            edge_size: None,
            requires_handle: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    /// Pressed, not yet a drag. `deadline` is set when a hold delay is
    /// configured; threshold travel before it passes abandons the gesture.
    Pending {
        down_pos: Point,
        deadline: Option<Instant>,
    },
    /// Hold delay survived; the next threshold move starts the drag.
    Armed { down_pos: Point },
    Dragging,
    /// Released or aborted; finalization runs on the next tick.
    Finishing { cancel: bool, due: Instant },
}

/// Per-source gesture recognizer driving a [`DndContext`].
pub struct PointerTracker {
    source: Rc<DragSource>,
    config: TrackerConfig,
    state: State,
    scroll_container: Option<NodeId>,
    ignore_next_click: bool,
}

impl PointerTracker {
    /// Create an idle tracker for a source.
    #[must_use]
    pub fn new(source: Rc<DragSource>, config: TrackerConfig) -> Self {
        Self {
            source,
            config,
            state: State::Idle,
            scroll_container: None,
            ignore_next_click: false,
        }
    }

    /// The source this tracker watches.
    #[must_use]
    pub fn source(&self) -> &Rc<DragSource> {
        &self.source
    }

    /// Whether the tracker holds no gesture at all.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Whether a drag session driven by this tracker is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging | State::Finishing { .. })
    }

    /// True once per started drag: the synthetic click following the
    /// release must be swallowed by the host.
    pub fn consume_ignored_click(&mut self) -> bool {
        std::mem::take(&mut self.ignore_next_click)
    }

    /// Feed one pointer event through the tracker.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        ctx: &mut DndContext,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
    ) -> Result<(), ConfigError> {
        match (*event, self.state) {
            (
                PointerEvent::Down {
                    pos,
                    buttons,
                    target,
                },
                State::Idle,
            ) => {
                if ctx.session.is_active()
                    || !buttons.contains(PointerButtons::PRIMARY)
                    || !target.draggable
                    || (self.config.requires_handle && !target.in_handle)
                {
                    return Ok(());
                }
                self.scroll_container = scene.scroll_parent(self.source.node);
                self.state = State::Pending {
                    down_pos: pos,
                    deadline: self.config.delay.map(|d| now + d),
                };
            }
            (PointerEvent::Move { pos }, State::Pending { down_pos, deadline }) => {
                if down_pos.distance(pos) <= self.config.distance_threshold {
                    return Ok(());
                }
                if let Some(deadline) = deadline
                    && now < deadline
                {
                    // Travel during the hold delay: the user is scrolling.
                    debug!("drag attempt abandoned: travel before hold delay");
                    self.state = State::Idle;
                    return Ok(());
                }
                // No delay, or the delay already elapsed without a tick.
                self.begin(down_pos, Some(*event), now, ctx, scene, host)?;
                self.drag_move(pos, Some(*event), now, ctx, scene, host);
            }
            (PointerEvent::Move { pos }, State::Armed { down_pos }) => {
                if down_pos.distance(pos) <= self.config.distance_threshold {
                    return Ok(());
                }
                self.begin(down_pos, Some(*event), now, ctx, scene, host)?;
                self.drag_move(pos, Some(*event), now, ctx, scene, host);
            }
            (PointerEvent::Move { pos }, State::Dragging) => {
                self.drag_move(pos, Some(*event), now, ctx, scene, host);
            }
            (PointerEvent::Up { .. }, State::Pending { .. } | State::Armed { .. }) => {
                // A plain click; let it through.
                self.state = State::Idle;
            }
            (PointerEvent::Up { .. }, State::Dragging) => {
                self.state = State::Finishing {
                    cancel: false,
                    due: now,
                };
            }
            (
                PointerEvent::Escape | PointerEvent::Cancel,
                State::Pending { .. } | State::Armed { .. },
            ) => {
                self.state = State::Idle;
            }
            (PointerEvent::Escape | PointerEvent::Cancel, State::Dragging) => {
                self.state = State::Finishing {
                    cancel: true,
                    due: now,
                };
            }
            _ => {}
        }
        Ok(())
    }

    /// Fire due deadlines: the hold-delay arming and the deferred stop.
    pub fn tick(
        &mut self,
        now: Instant,
        ctx: &mut DndContext,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
    ) -> Result<(), ConfigError> {
        match self.state {
            State::Pending {
                down_pos,
                deadline: Some(deadline),
            } if now >= deadline => {
                // The drag itself still waits for a threshold move.
                debug!("hold delay elapsed; gesture armed");
                self.state = State::Armed { down_pos };
            }
            State::Finishing { cancel, due } if now >= due => {
                if cancel {
                    ctx.cancel_drag(None, scene, host, now);
                } else {
                    ctx.stop_drag(None, scene, host, now);
                }
                self.state = State::Idle;
            }
            _ => {}
        }
        ctx.tick(scene, host, now);
        Ok(())
    }

    fn begin(
        &mut self,
        position: Point,
        native: Option<PointerEvent>,
        now: Instant,
        ctx: &mut DndContext,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
    ) -> Result<(), ConfigError> {
        ctx.start_drag(Rc::clone(&self.source), position, native, scene, host, now)?;
        if ctx.session.is_active() {
            self.state = State::Dragging;
            self.ignore_next_click = true;
        } else {
            self.state = State::Idle;
        }
        Ok(())
    }

    /// The per-move pipeline: auto-scroll, hit test, session update.
    fn drag_move(
        &mut self,
        pos: Point,
        native: Option<PointerEvent>,
        now: Instant,
        ctx: &mut DndContext,
        scene: &mut dyn Scene,
        host: &mut dyn GhostHost,
    ) {
        let (container, edge) = match ctx.session.top() {
            Some(top) => (
                scene.scroll_parent(top.node()).or(self.scroll_container),
                top.edge_size().or(self.config.edge_size),
            ),
            None => (self.scroll_container, self.config.edge_size),
        };
        // No scrollable ancestor anywhere: the document itself scrolls.
        let container = container.unwrap_or_else(|| scene.root());
        ctx.scroller.evaluate(scene, Some(container), pos, edge, now);

        let source = ctx.session.source().cloned();
        let hit = source
            .as_ref()
            .and_then(|s| ctx.registry.resolve(scene, pos, s));
        ctx.session.set_top(hit, native);
        ctx.session.update_position(pos, native);
        ctx.pump_ghosts(scene, host, now);
    }
}

impl std::fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerTracker")
            .field("source", &self.source.id)
            .field("state", &self.state)
            .finish()
    }
}
