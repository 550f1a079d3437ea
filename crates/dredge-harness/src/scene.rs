#![forbid(unsafe_code)]

//! In-memory scene: a flat node store with explicit parent-scroller links.

use ahash::AHashMap;

use dredge_core::geometry::{Rect, Vec2};
use dredge_core::scene::{ItemGeometry, NodeId, Scene};

#[derive(Debug, Clone, Default)]
struct NodeState {
    bounds: Rect,
    scroll: Vec2,
    content: Option<Vec2>,
    scroll_parent: Option<NodeId>,
    items: Vec<ItemGeometry>,
}

/// Mutable scene fixture. Unknown nodes report zero-sized bounds.
#[derive(Debug)]
pub struct TestScene {
    nodes: AHashMap<NodeId, NodeState>,
    root: NodeId,
}

impl TestScene {
    /// Create a scene whose root covers `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        let root = NodeId(0);
        let mut nodes = AHashMap::new();
        nodes.insert(
            root,
            NodeState {
                bounds,
                ..NodeState::default()
            },
        );
        Self { nodes, root }
    }

    /// Add or replace a node with fixed bounds.
    pub fn node(&mut self, id: NodeId, bounds: Rect) -> &mut Self {
        self.nodes.entry(id).or_default().bounds = bounds;
        self
    }

    /// Give a node scrollable content larger than its viewport.
    pub fn scrollable(&mut self, id: NodeId, content: Vec2) -> &mut Self {
        self.nodes.entry(id).or_default().content = Some(content);
        self
    }

    /// Link a node to the scroll container it lives in.
    pub fn scrolled_by(&mut self, id: NodeId, container: NodeId) -> &mut Self {
        self.nodes.entry(id).or_default().scroll_parent = Some(container);
        self
    }

    /// Set the ordered item geometry a list node reports.
    pub fn list_items(&mut self, id: NodeId, items: Vec<ItemGeometry>) -> &mut Self {
        self.nodes.entry(id).or_default().items = items;
        self
    }

    /// Move a node (layout change mid-test).
    pub fn move_node(&mut self, id: NodeId, bounds: Rect) {
        self.nodes.entry(id).or_default().bounds = bounds;
    }

    /// Shift a list's items by a delta, as real layout does when the
    /// container scrolls.
    pub fn shift_items(&mut self, id: NodeId, delta: Vec2) {
        if let Some(state) = self.nodes.get_mut(&id) {
            for item in &mut state.items {
                item.rect.x += delta.x;
                item.rect.y += delta.y;
            }
        }
    }
}

impl Scene for TestScene {
    fn bounds(&self, node: NodeId) -> Rect {
        self.nodes.get(&node).map(|n| n.bounds).unwrap_or_default()
    }

    fn scroll(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|n| n.scroll).unwrap_or(Vec2::ZERO)
    }

    fn set_scroll(&mut self, node: NodeId, offset: Vec2) {
        self.nodes.entry(node).or_default().scroll = offset;
    }

    fn content_size(&self, node: NodeId) -> Vec2 {
        self.nodes
            .get(&node)
            .and_then(|n| n.content)
            .unwrap_or_else(|| {
                let b = self.bounds(node);
                Vec2::new(b.width, b.height)
            })
    }

    fn scroll_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.scroll_parent)
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn item_geometry(&self, list: NodeId) -> Vec<ItemGeometry> {
        self.nodes
            .get(&list)
            .map(|n| n.items.clone())
            .unwrap_or_default()
    }
}
