#![forbid(unsafe_code)]

//! Recording ghost host: tracks every clone the engine materializes.

use ahash::AHashMap;

use dredge_core::geometry::Point;
use dredge_core::ghost::{GhostHost, GhostId};
use dredge_core::scene::NodeId;
use dredge_core::target::TemplateId;

/// Where a clone's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOrigin {
    Source(NodeId),
    Template(TemplateId),
}

/// Observable state of one live clone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloneState {
    pub origin: CloneOrigin,
    pub opacity: f32,
    pub visible: bool,
    pub pos: Point,
}

/// GhostHost fixture with live-clone accounting and a removal tally.
#[derive(Debug, Default)]
pub struct TestGhostHost {
    next: u64,
    live: AHashMap<GhostId, CloneState>,
    pub removed_total: usize,
}

impl TestGhostHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clones currently alive on the host side.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// State of a live clone.
    #[must_use]
    pub fn state(&self, ghost: GhostId) -> Option<CloneState> {
        self.live.get(&ghost).copied()
    }

    /// All live clones, in unspecified order.
    pub fn live(&self) -> impl Iterator<Item = (GhostId, CloneState)> + '_ {
        self.live.iter().map(|(id, state)| (*id, *state))
    }

    /// The clones currently visible with nonzero opacity.
    #[must_use]
    pub fn shown(&self) -> Vec<(GhostId, CloneState)> {
        self.live()
            .filter(|(_, s)| s.visible && s.opacity > 0.0)
            .collect()
    }

    fn spawn(&mut self, origin: CloneOrigin) -> GhostId {
        let id = GhostId(self.next);
        self.next += 1;
        self.live.insert(
            id,
            CloneState {
                origin,
                opacity: 1.0,
                visible: true,
                pos: Point::new(0.0, 0.0),
            },
        );
        id
    }
}

impl GhostHost for TestGhostHost {
    fn clone_source(&mut self, node: NodeId) -> GhostId {
        self.spawn(CloneOrigin::Source(node))
    }

    fn clone_template(&mut self, template: TemplateId) -> GhostId {
        self.spawn(CloneOrigin::Template(template))
    }

    fn set_opacity(&mut self, ghost: GhostId, opacity: f32) {
        if let Some(state) = self.live.get_mut(&ghost) {
            state.opacity = opacity;
        }
    }

    fn set_visible(&mut self, ghost: GhostId, visible: bool) {
        if let Some(state) = self.live.get_mut(&ghost) {
            state.visible = visible;
        }
    }

    fn set_position(&mut self, ghost: GhostId, pos: Point) {
        if let Some(state) = self.live.get_mut(&ghost) {
            state.pos = pos;
        }
    }

    fn remove(&mut self, ghost: GhostId) {
        if self.live.remove(&ghost).is_some() {
            self.removed_total += 1;
        }
    }
}
