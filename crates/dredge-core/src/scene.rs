#![forbid(unsafe_code)]

//! The rendering collaborator's geometry contract.
//!
//! The core never measures anything itself: bounding rectangles, scroll
//! offsets, and list item geometry all come from the host through [`Scene`].
//! The only mutation the core performs is scrolling (autoscroll).
//!
//! # Measurement protocol
//!
//! Queries assume layout is stable at call time. Hosts that defer layout
//! must commit it before forwarding the input event that triggers a query
//! (two-phase: commit logical state, then measure). In particular,
//! [`Scene::item_geometry`] for an inserting list must already include the
//! feedback placeholder slot.

use crate::geometry::{Rect, Vec2};

/// Identity of a host-side node (element) the core references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Geometry of one list item as laid out right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemGeometry {
    /// Viewport-relative bounding rectangle.
    pub rect: Rect,
    /// Whether the item itself hosts a nested drop zone. Such items use
    /// edge anchors instead of centroids when building a magnet grid.
    pub hosts_drop: bool,
}

/// Read-mostly geometry interface implemented by the rendering collaborator.
pub trait Scene {
    /// Viewport-relative bounding rectangle of a node.
    fn bounds(&self, node: NodeId) -> Rect;

    /// Current scroll offset of a scrollable node.
    fn scroll(&self, node: NodeId) -> Vec2;

    /// Set the scroll offset of a scrollable node. The caller clamps values
    /// to the scrollable range before writing.
    fn set_scroll(&mut self, node: NodeId, offset: Vec2);

    /// Total scrollable content size of a node (>= its bounds size).
    fn content_size(&self, node: NodeId) -> Vec2;

    /// Nearest scrollable ancestor of a node, or `None` when only the
    /// document scrolls. The core never chains beyond this one container.
    fn scroll_parent(&self, node: NodeId) -> Option<NodeId>;

    /// The document/root scroll node.
    fn root(&self) -> NodeId;

    /// Ordered geometry of a list container's children. See the module
    /// docs for the measurement protocol.
    fn item_geometry(&self, list: NodeId) -> Vec<ItemGeometry>;
}
