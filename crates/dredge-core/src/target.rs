#![forbid(unsafe_code)]

//! Drop-capable collaborators: the capability contract and its variants.
//!
//! [`DropTarget`] is the capability contract every drop-capable
//! collaborator implements. Three variants ship with the core:
//!
//! - [`DropMask`] blocks hit-testing beneath it and never accepts drops.
//! - [`DropZone`] is a single-slot target.
//! - [`DropList`] is a multi-slot target that owns a [`MagnetGrid`] while a
//!   drag is in progress and resolves drops into reorder/insert operations.
//!
//! Targets are shared as `Rc<dyn DropTarget>`; identity is the [`TargetId`],
//! never pointer equality.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ConfigError;
use crate::geometry::Point;
use crate::magnet::{Direction, MagnetGrid};
use crate::scene::{NodeId, Scene};

/// Opaque drag payload.
pub type DragData = Rc<dyn Any>;

/// Default ghost opacity applied when a target does not override it.
pub const DEFAULT_GHOST_OPACITY: f32 = 0.7;

/// Identity of a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Identity of a drag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Identity of a host-side ghost template (resolved by the [`crate::ghost::GhostHost`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(pub u64);

/// What a target or source offers as its floating drag image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostImage {
    /// Reuse the clone of the drag source element.
    Source,
    /// Show no ghost over this target.
    None,
    /// Clone a host-registered template.
    Template(TemplateId),
}

/// Declared transfer semantics of a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropMode {
    Copy,
    Cut,
}

/// Effective transfer semantics of the drag as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Cut,
    /// The top target is the source's own list.
    Reordering,
}

// ---------------------------------------------------------------------------
// Drag source
// ---------------------------------------------------------------------------

/// The originating draggable identity plus everything the session needs to
/// describe the payload.
pub struct DragSource {
    pub id: SourceId,
    pub node: NodeId,
    pub type_tag: String,
    pub data: DragData,
    /// Animate the ghost back to the origin after a failed drop.
    pub go_back: bool,
    /// List this source currently sits in, when it is a reorderable item.
    pub parent_list: Option<TargetId>,
    /// Index of this source inside `parent_list`.
    pub list_index: Option<usize>,
    pub image: GhostImage,
    pub ghost_opacity: f32,
}

impl DragSource {
    /// Create a source carrying the given payload.
    #[must_use]
    pub fn new(id: SourceId, node: NodeId, type_tag: impl Into<String>, data: DragData) -> Self {
        Self {
            id,
            node,
            type_tag: type_tag.into(),
            data,
            go_back: false,
            parent_list: None,
            list_index: None,
            image: GhostImage::Source,
            ghost_opacity: DEFAULT_GHOST_OPACITY,
        }
    }

    /// Request the failed-drop return animation.
    #[must_use]
    pub fn with_go_back(mut self) -> Self {
        self.go_back = true;
        self
    }

    /// Mark the source as an item of a reorderable list.
    #[must_use]
    pub fn with_reorder_origin(mut self, list: TargetId, index: usize) -> Self {
        self.parent_list = Some(list);
        self.list_index = Some(index);
        self
    }

    /// Override the default drag image.
    #[must_use]
    pub fn with_image(mut self, image: GhostImage) -> Self {
        self.image = image;
        self
    }

    /// Override the default ghost opacity.
    #[must_use]
    pub fn with_ghost_opacity(mut self, opacity: f32) -> Self {
        self.ghost_opacity = opacity;
        self
    }
}

impl std::fmt::Debug for DragSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSource")
            .field("id", &self.id)
            .field("type_tag", &self.type_tag)
            .field("parent_list", &self.parent_list)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Capability contract
// ---------------------------------------------------------------------------

/// Which payload type tags a target accepts.
#[derive(Clone)]
pub enum TypeFilter {
    /// Accept every type.
    Any,
    /// Accept exactly one type tag.
    One(String),
    /// Accept any of a set of type tags.
    Many(Vec<String>),
    /// Arbitrary predicate on the type tag.
    Predicate(Rc<dyn Fn(&str) -> bool>),
}

impl TypeFilter {
    /// Whether the filter accepts a type tag.
    #[must_use]
    pub fn accepts(&self, type_tag: &str) -> bool {
        match self {
            Self::Any => true,
            Self::One(t) => t == type_tag,
            Self::Many(ts) => ts.iter().any(|t| t == type_tag),
            Self::Predicate(f) => f(type_tag),
        }
    }
}

impl std::fmt::Debug for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::One(t) => f.debug_tuple("One").field(t).finish(),
            Self::Many(ts) => f.debug_tuple("Many").field(ts).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

type DataPredicate = Rc<dyn Fn(&DragData, &str) -> bool>;

/// The capability contract the core consumes from every drop-capable
/// collaborator.
pub trait DropTarget {
    fn id(&self) -> TargetId;

    /// Host node the target occupies (hit-test geometry, scroll parent).
    fn node(&self) -> NodeId;

    /// Masks block hit-testing beneath them without accepting drops.
    fn is_mask(&self) -> bool {
        false
    }

    fn accepts_type(&self, type_tag: &str) -> bool;

    fn accepts_data(&self, _data: &DragData, _type_tag: &str) -> bool {
        true
    }

    /// Whether the target participates in the current drag at all. This is
    /// the hit-test qualification; for simple zones it is the type check.
    fn candidate(&self, type_tag: &str, _data: &DragData, _source: &DragSource) -> bool {
        self.accepts_type(type_tag)
    }

    /// Whether releasing the pointer here right now would succeed.
    fn drop_allowed(&self, type_tag: &str, data: &DragData, _source: &DragSource) -> bool {
        self.accepts_type(type_tag) && self.accepts_data(data, type_tag)
    }

    /// Mode compatibility between this target and the source.
    fn mode_compatible(&self, _source: &DragSource) -> bool {
        true
    }

    fn drop_mode(&self) -> DropMode {
        DropMode::Copy
    }

    /// Whether the active drag reorders this target's own items.
    fn reordering(&self) -> bool {
        false
    }

    /// Ghost shown while this target is the top candidate.
    fn drag_image(&self) -> GhostImage {
        GhostImage::Source
    }

    fn ghost_opacity(&self) -> f32 {
        DEFAULT_GHOST_OPACITY
    }

    /// Autoscroll edge margin override while this target is on top.
    fn edge_size(&self) -> Option<f32> {
        None
    }

    /// Called by the context when a session starts. Lists build their grid
    /// here; configuration faults abort the drag start.
    fn on_drag_start(&self, _source: &Rc<DragSource>, _scene: &dyn Scene) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Called by the context after the session ended (drop or cancel).
    fn on_drag_end(&self) {}
}

// ---------------------------------------------------------------------------
// Mask
// ---------------------------------------------------------------------------

/// A region that locally blocks drops without disqualifying the gesture.
#[derive(Debug)]
pub struct DropMask {
    id: TargetId,
    node: NodeId,
}

impl DropMask {
    #[must_use]
    pub fn new(id: TargetId, node: NodeId) -> Self {
        Self { id, node }
    }
}

impl DropTarget for DropMask {
    fn id(&self) -> TargetId {
        self.id
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn is_mask(&self) -> bool {
        true
    }

    fn accepts_type(&self, _type_tag: &str) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Single-slot zone
// ---------------------------------------------------------------------------

/// A single-slot drop target.
pub struct DropZone {
    id: TargetId,
    node: NodeId,
    filter: TypeFilter,
    data_check: Option<DataPredicate>,
    mode: DropMode,
    image: GhostImage,
    ghost_opacity: f32,
    edge_size: Option<f32>,
}

impl DropZone {
    #[must_use]
    pub fn new(id: TargetId, node: NodeId) -> Self {
        Self {
            id,
            node,
            filter: TypeFilter::Any,
            data_check: None,
            mode: DropMode::Copy,
            image: GhostImage::Source,
            ghost_opacity: DEFAULT_GHOST_OPACITY,
            edge_size: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Install a payload predicate evaluated on top of the type filter.
    #[must_use]
    pub fn with_data_check(mut self, check: impl Fn(&DragData, &str) -> bool + 'static) -> Self {
        self.data_check = Some(Rc::new(check));
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DropMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: GhostImage) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn with_ghost_opacity(mut self, opacity: f32) -> Self {
        self.ghost_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_edge_size(mut self, edge_size: f32) -> Self {
        self.edge_size = Some(edge_size);
        self
    }
}

impl DropTarget for DropZone {
    fn id(&self) -> TargetId {
        self.id
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn accepts_type(&self, type_tag: &str) -> bool {
        self.filter.accepts(type_tag)
    }

    fn accepts_data(&self, data: &DragData, type_tag: &str) -> bool {
        match &self.data_check {
            Some(check) => check(data, type_tag),
            None => true,
        }
    }

    fn drop_mode(&self) -> DropMode {
        self.mode
    }

    fn drag_image(&self) -> GhostImage {
        self.image
    }

    fn ghost_opacity(&self) -> f32 {
        self.ghost_opacity
    }

    fn edge_size(&self) -> Option<f32> {
        self.edge_size
    }
}

// ---------------------------------------------------------------------------
// Reorderable / insertable list
// ---------------------------------------------------------------------------

/// Outcome of a drop on a [`DropList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOperation {
    Reorder(ReorderOperation),
    Insert(InsertOperation),
}

/// Move the item at `from` so it ends up at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderOperation {
    pub from: usize,
    pub to: usize,
}

impl ReorderOperation {
    /// Apply the move to an item vector (remove, then insert).
    pub fn apply<T>(&self, items: &mut Vec<T>) {
        let item = items.remove(self.from);
        items.insert(self.to, item);
    }
}

/// Insert an external payload at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOperation {
    pub type_tag: String,
    pub index: usize,
}

#[derive(Debug, Default)]
struct ListState {
    grid: Option<MagnetGrid>,
    from_index: Option<usize>,
    reordering: bool,
}

/// A multi-slot drop target owning a [`MagnetGrid`] during a drag.
pub struct DropList {
    id: TargetId,
    node: NodeId,
    direction: Direction,
    filter: TypeFilter,
    data_check: Option<DataPredicate>,
    mode: DropMode,
    image: GhostImage,
    ghost_opacity: f32,
    edge_size: Option<f32>,
    state: RefCell<ListState>,
}

/// Builder validating the presentation hooks a list cannot work without.
pub struct DropListBuilder {
    id: TargetId,
    node: NodeId,
    direction: Direction,
    filter: TypeFilter,
    data_check: Option<DataPredicate>,
    mode: DropMode,
    image: GhostImage,
    ghost_opacity: f32,
    edge_size: Option<f32>,
    item_slot: bool,
    feedback_slot: bool,
}

impl DropListBuilder {
    /// Declare that the host renders items for this list.
    #[must_use]
    pub fn item_slot(mut self) -> Self {
        self.item_slot = true;
        self
    }

    /// Declare that the host renders the insertion feedback placeholder.
    #[must_use]
    pub fn feedback_slot(mut self) -> Self {
        self.feedback_slot = true;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn data_check(mut self, check: impl Fn(&DragData, &str) -> bool + 'static) -> Self {
        self.data_check = Some(Rc::new(check));
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: DropMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn image(mut self, image: GhostImage) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn ghost_opacity(mut self, opacity: f32) -> Self {
        self.ghost_opacity = opacity;
        self
    }

    #[must_use]
    pub fn edge_size(mut self, edge_size: f32) -> Self {
        self.edge_size = Some(edge_size);
        self
    }

    /// Validate and build. Missing presentation hooks are fatal here, not
    /// deferred to drag time.
    pub fn build(self) -> Result<DropList, ConfigError> {
        if !self.item_slot {
            return Err(ConfigError::MissingItemRenderer);
        }
        if !self.feedback_slot {
            return Err(ConfigError::MissingFeedbackRenderer);
        }
        Ok(DropList {
            id: self.id,
            node: self.node,
            direction: self.direction,
            filter: self.filter,
            data_check: self.data_check,
            mode: self.mode,
            image: self.image,
            ghost_opacity: self.ghost_opacity,
            edge_size: self.edge_size,
            state: RefCell::new(ListState::default()),
        })
    }
}

impl DropList {
    /// Start building a list target.
    #[must_use]
    pub fn builder(id: TargetId, node: NodeId, direction: Direction) -> DropListBuilder {
        DropListBuilder {
            id,
            node,
            direction,
            filter: TypeFilter::Any,
            data_check: None,
            mode: DropMode::Copy,
            image: GhostImage::Source,
            ghost_opacity: DEFAULT_GHOST_OPACITY,
            edge_size: None,
            item_slot: false,
            feedback_slot: false,
        }
    }

    /// Whether the active drag reorders this list's own items.
    #[must_use]
    pub fn is_reordering(&self) -> bool {
        self.state.borrow().reordering
    }

    /// Slot index under the pointer, corrected for mid-drag scrolling.
    #[must_use]
    pub fn closest_index(&self, position: Point, scene: &dyn Scene) -> Option<usize> {
        let state = self.state.borrow();
        let grid = state.grid.as_ref()?;
        let live_origin = MagnetGrid::origin_of(scene.bounds(self.node), scene.scroll(self.node));
        grid.closest_index(position, live_origin)
    }

    /// Resolve a finished drop into a list operation.
    ///
    /// Returns `None` when there is no grid, when the pointer resolves to no
    /// slot, or when a reorder would be a no-op (`from == to`).
    #[must_use]
    pub fn resolve_drop(
        &self,
        type_tag: &str,
        position: Point,
        scene: &dyn Scene,
    ) -> Option<ListOperation> {
        let to = self.closest_index(position, scene)?;
        let state = self.state.borrow();
        if state.reordering {
            let from = state.from_index?;
            if from == to {
                return None;
            }
            Some(ListOperation::Reorder(ReorderOperation { from, to }))
        } else {
            Some(ListOperation::Insert(InsertOperation {
                type_tag: type_tag.to_owned(),
                index: to,
            }))
        }
    }
}

impl std::fmt::Debug for DropList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropList")
            .field("id", &self.id)
            .field("direction", &self.direction)
            .field("filter", &self.filter)
            .field("reordering", &self.state.borrow().reordering)
            .finish()
    }
}

impl DropTarget for DropList {
    fn id(&self) -> TargetId {
        self.id
    }

    fn node(&self) -> NodeId {
        self.node
    }

    fn accepts_type(&self, type_tag: &str) -> bool {
        self.filter.accepts(type_tag)
    }

    fn accepts_data(&self, data: &DragData, type_tag: &str) -> bool {
        match &self.data_check {
            Some(check) => check(data, type_tag),
            None => true,
        }
    }

    /// A list participates when the type matches, or unconditionally when
    /// the drag reorders its own items.
    fn candidate(&self, type_tag: &str, _data: &DragData, source: &DragSource) -> bool {
        self.accepts_type(type_tag) || source.parent_list == Some(self.id)
    }

    fn drop_allowed(&self, type_tag: &str, data: &DragData, _source: &DragSource) -> bool {
        let state = self.state.borrow();
        if state.reordering {
            // Reordering a 0- or 1-item list can never change anything.
            state.grid.as_ref().is_some_and(|g| g.len() > 1)
        } else {
            self.accepts_type(type_tag) && self.accepts_data(data, type_tag)
        }
    }

    fn drop_mode(&self) -> DropMode {
        self.mode
    }

    fn reordering(&self) -> bool {
        self.is_reordering()
    }

    fn drag_image(&self) -> GhostImage {
        self.image
    }

    fn ghost_opacity(&self) -> f32 {
        self.ghost_opacity
    }

    fn edge_size(&self) -> Option<f32> {
        self.edge_size
    }

    fn on_drag_start(&self, source: &Rc<DragSource>, scene: &dyn Scene) -> Result<(), ConfigError> {
        if !self.candidate(&source.type_tag, &source.data, source) {
            return Ok(());
        }
        let reordering = source.parent_list == Some(self.id);
        let items = scene.item_geometry(self.node);
        let origin = MagnetGrid::origin_of(scene.bounds(self.node), scene.scroll(self.node));
        let from_index = if reordering { source.list_index } else { None };
        let grid = MagnetGrid::new(&items, self.direction, from_index, origin)?;

        let mut state = self.state.borrow_mut();
        state.grid = Some(grid);
        state.from_index = from_index;
        state.reordering = reordering;
        Ok(())
    }

    fn on_drag_end(&self) {
        let mut state = self.state.borrow_mut();
        state.grid = None;
        state.from_index = None;
        state.reordering = false;
    }
}
