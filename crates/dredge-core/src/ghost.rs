#![forbid(unsafe_code)]

//! Ghost image management: the visual that follows the pointer mid-drag.
//!
//! The controller owns a registry of host-side clones, one per visual
//! context (the session default plus one per drop target that asks for its
//! own image). Switching contexts crossfades by opacity instead of
//! destroying clones, so hovering back over a target reuses its ghost.
//! Freshly created clones start invisible and are revealed on the next
//! tick, giving the host one frame to lay them out.
//!
//! # Invariants
//!
//! 1. After a session fully ends (including the return animation), the
//!    controller holds zero clones.
//! 2. Exactly one context is "current"; all other materialized clones sit
//!    at opacity 0.
//! 3. Every materialized clone follows the pointer on position changes.

use std::rc::Rc;
use std::time::{Duration, Instant};

use ahash::AHashMap;

use crate::event::{DragEvent, EventKind};
use crate::geometry::{Point, Vec2};
use crate::logging::debug;
use crate::scene::{NodeId, Scene};
use crate::target::{DragSource, GhostImage, TargetId, TemplateId};

/// How long a rejected ghost glides back to its source.
pub const RETURN_DURATION: Duration = Duration::from_millis(500);

/// Host-side handle to a materialized ghost clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GhostId(pub u64);

/// Rendering operations the controller needs from the host.
///
/// Clones are created hidden-or-visible as instructed and positioned in the
/// same pixel space as [`Scene`] bounds.
pub trait GhostHost {
    /// Materialize a visual copy of the source node. Returns its handle.
    fn clone_source(&mut self, node: NodeId) -> GhostId;
    /// Materialize a registered template. Returns its handle.
    fn clone_template(&mut self, template: TemplateId) -> GhostId;
    /// Set a clone's opacity (0 = fully transparent).
    fn set_opacity(&mut self, ghost: GhostId, opacity: f32);
    /// Show or hide a clone without touching its opacity.
    fn set_visible(&mut self, ghost: GhostId, visible: bool);
    /// Move a clone's top-left corner.
    fn set_position(&mut self, ghost: GhostId, pos: Point);
    /// Destroy a clone.
    fn remove(&mut self, ghost: GhostId);
}

/// Context key: `None` is the session default (no target hovered), `Some`
/// is a drop target supplying its own image.
type ContextKey = Option<TargetId>;

#[derive(Debug, Clone, Copy)]
struct CloneEntry {
    id: GhostId,
    /// Source-derived clones keep the source's original offset from the
    /// pointer; template clones sit at the pointer itself.
    keeps_source_offset: bool,
}

#[derive(Debug, Clone, Copy)]
struct ReturnAnim {
    clone: GhostId,
    from: Point,
    to: Point,
    started: Instant,
}

/// Drives ghost visuals from session events.
#[derive(Default)]
pub struct GhostController {
    /// `Some(entry)` = materialized clone; `None` = context explicitly
    /// renders no ghost.
    clones: AHashMap<ContextKey, Option<CloneEntry>>,
    current: Option<ContextKey>,
    pending_reveal: Vec<GhostId>,
    returning: Option<ReturnAnim>,
    source: Option<Rc<DragSource>>,
    position: Point,
    source_origin: Point,
    source_offset: Vec2,
}

impl GhostController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live host clones (materialized, including mid-return).
    #[must_use]
    pub fn clone_count(&self) -> usize {
        let returning = usize::from(self.returning.is_some());
        self.clones.values().filter(|c| c.is_some()).count() + returning
    }

    /// Whether a return animation is in flight.
    #[must_use]
    pub fn is_returning(&self) -> bool {
        self.returning.is_some()
    }

    /// Feed a session event through the controller.
    pub fn handle(
        &mut self,
        event: &DragEvent,
        scene: &dyn Scene,
        host: &mut dyn GhostHost,
        now: Instant,
    ) {
        match event.kind {
            EventKind::DragStart => self.on_drag_start(event, scene, host),
            EventKind::TopChanged => self.switch_context(event, host),
            EventKind::PositionChanged => self.on_position_changed(event.position, host),
            EventKind::Drop => {}
            EventKind::DragEnd => self.on_drag_end(event, host, now),
        }
    }

    /// Advance deferred work: reveal fresh clones, step the return glide.
    pub fn tick(&mut self, host: &mut dyn GhostHost, now: Instant) {
        for ghost in self.pending_reveal.drain(..) {
            host.set_visible(ghost, true);
        }
        if let Some(anim) = self.returning {
            let t = now.duration_since(anim.started).as_secs_f32() / RETURN_DURATION.as_secs_f32();
            if t >= 1.0 {
                host.remove(anim.clone);
                self.returning = None;
                debug!("ghost return finished");
            } else {
                host.set_position(anim.clone, lerp(anim.from, anim.to, t));
            }
        }
    }

    /// Destroy every clone and reset. Safe to call when already idle.
    pub fn cleanup(&mut self, host: &mut dyn GhostHost) {
        for entry in self.clones.drain().filter_map(|(_, e)| e) {
            host.remove(entry.id);
        }
        if let Some(anim) = self.returning.take() {
            host.remove(anim.clone);
        }
        self.pending_reveal.clear();
        self.current = None;
        self.source = None;
    }

    fn on_drag_start(&mut self, event: &DragEvent, scene: &dyn Scene, host: &mut dyn GhostHost) {
        // A previous session's return glide may still be in flight.
        self.cleanup(host);
        let source = Rc::clone(&event.source);
        self.position = event.position;
        self.source_origin = scene.bounds(source.node).origin();
        self.source_offset = self.source_origin - event.position;
        self.source = Some(source);
        self.switch_context(event, host);
    }

    /// Crossfade to the context the event's `top` selects, materializing its
    /// clone on first visit.
    fn switch_context(&mut self, event: &DragEvent, host: &mut dyn GhostHost) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let (key, image, opacity) = match &event.top {
            Some(top) => (Some(top.id()), top.drag_image(), top.ghost_opacity()),
            None => (None, source.image.clone(), source.ghost_opacity),
        };

        // Fade every materialized clone out; the selected one fades back in.
        for entry in self.clones.values().flatten() {
            host.set_opacity(entry.id, 0.0);
        }

        let entry = self.clones.entry(key).or_insert_with(|| {
            let entry = match image {
                GhostImage::None => None,
                GhostImage::Source => Some(CloneEntry {
                    id: host.clone_source(source.node),
                    keeps_source_offset: true,
                }),
                GhostImage::Template(template) => Some(CloneEntry {
                    id: host.clone_template(template),
                    keeps_source_offset: false,
                }),
            };
            if let Some(entry) = entry {
                // Hidden until the next tick so the host can lay it out.
                host.set_visible(entry.id, false);
                self.pending_reveal.push(entry.id);
            }
            entry
        });

        if let Some(entry) = *entry {
            host.set_opacity(entry.id, opacity);
            let pos = clone_position(self.position, self.source_offset, entry);
            host.set_position(entry.id, pos);
        }
        self.current = Some(key);
    }

    fn on_position_changed(&mut self, position: Point, host: &mut dyn GhostHost) {
        self.position = position;
        for entry in self.clones.values().flatten() {
            host.set_position(entry.id, clone_position(position, self.source_offset, *entry));
        }
    }

    fn on_drag_end(&mut self, event: &DragEvent, host: &mut dyn GhostHost, now: Instant) {
        let go_back = self
            .source
            .as_ref()
            .is_some_and(|s| s.go_back && event.success == Some(false));
        // The glide reuses the current context's clone when it is
        // source-derived; template ghosts and no-ghost contexts skip it.
        let glide = if go_back {
            self.current
                .and_then(|key| self.clones.get(&key).copied().flatten())
                .filter(|entry| entry.keeps_source_offset)
        } else {
            None
        };

        match glide {
            Some(entry) => {
                let from = clone_position(self.position, self.source_offset, entry);
                // Detach the gliding clone before the registry is drained.
                self.clones.insert(self.current.take().unwrap_or(None), None);
                self.cleanup(host);
                host.set_visible(entry.id, true);
                self.returning = Some(ReturnAnim {
                    clone: entry.id,
                    from,
                    to: self.source_origin,
                    started: now,
                });
            }
            None => self.cleanup(host),
        }
    }
}

impl std::fmt::Debug for GhostController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhostController")
            .field("clones", &self.clone_count())
            .field("returning", &self.is_returning())
            .finish()
    }
}

/// Source-derived clones sit where the source sat relative to the pointer;
/// template clones sit at the pointer.
fn clone_position(pointer: Point, source_offset: Vec2, entry: CloneEntry) -> Point {
    if entry.keeps_source_offset {
        pointer + source_offset
    } else {
        pointer
    }
}

fn lerp(from: Point, to: Point, t: f32) -> Point {
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
