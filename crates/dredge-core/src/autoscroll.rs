#![forbid(unsafe_code)]

//! Edge auto-scroll: dragging near a scroll container's margin scrolls it.
//!
//! The scroller holds at most one active scroll at a time. Every evaluation
//! applies one scroll step immediately and arms a repeat deadline; the host
//! drives repeats by calling [`AutoScroller::tick`] from its timer loop, so
//! scrolling continues while the pointer parks inside the margin. Step size
//! scales linearly with how deep the pointer sits in the margin, up to
//! `max_step` per application.
//!
//! # Invariants
//!
//! 1. Scroll offsets stay inside `[0, content_size - viewport]` per axis.
//! 2. Leaving the margin, losing the container, or ending the session
//!    cancels the repeat; no step fires after [`AutoScroller::cancel`].

use std::time::{Duration, Instant};

use crate::geometry::{Point, Vec2};
use crate::logging::debug;
use crate::scene::{NodeId, Scene};

/// Default margin width, in pixels.
pub const DEFAULT_EDGE_SIZE: f32 = 100.0;
/// Largest scroll distance applied per step, in pixels.
pub const DEFAULT_MAX_STEP: f32 = 10.0;
/// Delay between repeated steps while the pointer stays in the margin.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5);

/// Tuning knobs for edge scrolling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollConfig {
    /// Margin width inside the container bounds that triggers scrolling.
    pub edge_size: f32,
    /// Scroll distance per step at full intensity.
    pub max_step: f32,
    /// Repeat cadence while the pointer stays in the margin.
    pub interval: Duration,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            edge_size: DEFAULT_EDGE_SIZE,
            max_step: DEFAULT_MAX_STEP,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveScroll {
    container: NodeId,
    pointer: Point,
    edge: f32,
    deadline: Instant,
}

/// One-at-a-time edge-scroll driver.
#[derive(Debug)]
pub struct AutoScroller {
    config: AutoScrollConfig,
    active: Option<ActiveScroll>,
}

impl AutoScroller {
    /// Create a scroller with the given tuning.
    #[must_use]
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Whether a repeat is currently armed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The next repeat deadline, if a scroll is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.map(|a| a.deadline)
    }

    /// Stop scrolling and disarm the repeat.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("auto-scroll cancelled");
        }
    }

    /// Evaluate the pointer against a container's margins, applying one
    /// scroll step if it sits inside one. Returns whether a step was applied
    /// (and a repeat armed). `edge_override` substitutes the configured
    /// margin width; `None` keeps the default.
    pub fn evaluate(
        &mut self,
        scene: &mut dyn Scene,
        container: Option<NodeId>,
        pointer: Point,
        edge_override: Option<f32>,
        now: Instant,
    ) -> bool {
        let edge = edge_override.unwrap_or(self.config.edge_size);
        let Some(container) = container else {
            self.cancel();
            return false;
        };
        if edge <= 0.0 {
            self.cancel();
            return false;
        }

        let step = self.step_for(scene, container, pointer, edge);
        if step.is_zero() {
            self.cancel();
            return false;
        }

        let applied = self.apply(scene, container, step);
        if applied {
            self.active = Some(ActiveScroll {
                container,
                pointer,
                edge,
                deadline: now + self.config.interval,
            });
        } else {
            // Pointer is in the margin but the container is pinned at its
            // scroll limit; nothing to repeat.
            self.cancel();
        }
        applied
    }

    /// Re-apply the armed scroll if its deadline has passed.
    pub fn tick(&mut self, scene: &mut dyn Scene, now: Instant) {
        let Some(active) = self.active else {
            return;
        };
        if now < active.deadline {
            return;
        }
        self.evaluate(
            scene,
            Some(active.container),
            active.pointer,
            Some(active.edge),
            now,
        );
    }

    /// Signed per-axis step for the pointer's margin penetration, scaled by
    /// intensity (penetration / edge, capped at 1).
    fn step_for(&self, scene: &dyn Scene, container: NodeId, pointer: Point, edge: f32) -> Vec2 {
        let bounds = scene.bounds(container);
        let axis = |near: f32, far: f32, pos: f32| -> f32 {
            if pos < near + edge {
                let intensity = ((near + edge - pos) / edge).min(1.0);
                -self.config.max_step * intensity
            } else if pos > far - edge {
                let intensity = ((pos - (far - edge)) / edge).min(1.0);
                self.config.max_step * intensity
            } else {
                0.0
            }
        };
        Vec2::new(
            axis(bounds.x, bounds.right(), pointer.x),
            axis(bounds.y, bounds.bottom(), pointer.y),
        )
    }

    /// Apply a step, clamped to the scrollable range. Returns whether the
    /// offset actually moved.
    fn apply(&self, scene: &mut dyn Scene, container: NodeId, step: Vec2) -> bool {
        let bounds = scene.bounds(container);
        let content = scene.content_size(container);
        let max = Vec2::new(
            (content.x - bounds.width).max(0.0),
            (content.y - bounds.height).max(0.0),
        );
        let current = scene.scroll(container);
        let next = Vec2::new(
            (current.x + step.x).clamp(0.0, max.x),
            (current.y + step.y).clamp(0.0, max.y),
        );
        if next == current {
            return false;
        }
        scene.set_scroll(container, next);
        true
    }
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}
