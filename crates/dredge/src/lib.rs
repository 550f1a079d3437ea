#![forbid(unsafe_code)]

//! Dredge public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the engine types from `dredge-core` and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- Engine re-exports -----------------------------------------------------

pub use dredge_core::autoscroll::{AutoScrollConfig, AutoScroller};
pub use dredge_core::context::DndContext;
pub use dredge_core::event::{
    DownTarget, DragEvent, EventKind, HandlerToken, PointerButtons, PointerEvent,
};
pub use dredge_core::geometry::{Point, Rect, Vec2};
pub use dredge_core::ghost::{GhostController, GhostHost, GhostId};
pub use dredge_core::hit_test::TargetRegistry;
pub use dredge_core::magnet::{Direction, MagnetGrid};
pub use dredge_core::scene::{ItemGeometry, NodeId, Scene};
pub use dredge_core::session::DragSession;
pub use dredge_core::target::{
    DragData, DragSource, DropEffect, DropList, DropListBuilder, DropMask, DropMode, DropTarget,
    DropZone, GhostImage, InsertOperation, ListOperation, ReorderOperation, SourceId, TargetId,
    TemplateId, TypeFilter,
};
pub use dredge_core::tracker::{PointerTracker, TrackerConfig};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for dredge hosts.
#[derive(Debug)]
pub enum Error {
    /// A target or list was configured in a way the engine cannot honor.
    Config(dredge_core::error::ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<dredge_core::error::ConfigError> for Error {
    fn from(err: dredge_core::error::ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for dredge APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

/// Common imports for building a dredge integration.
pub mod prelude {
    pub use crate::{
        DndContext, DragEvent, DragSource, Direction, DropList, DropMask, DropTarget, DropZone,
        EventKind, GhostHost, GhostImage, NodeId, Point, PointerEvent, PointerTracker, Rect, Scene,
        SourceId, TargetId, TrackerConfig, TypeFilter, Vec2,
    };
}
