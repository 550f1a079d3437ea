#![forbid(unsafe_code)]

//! Core: drag sessions, hit testing, magnets, auto-scroll, and ghosts.
//!
//! # Role in Dredge
//! `dredge-core` is the coordination engine. It owns the drag state machine
//! and every policy decision of a drag-and-drop interaction, while staying
//! fully host-agnostic: the embedding UI supplies geometry through the
//! [`scene::Scene`] trait and rendering through the [`ghost::GhostHost`]
//! trait, and feeds normalized [`event::PointerEvent`] input.
//!
//! # Primary responsibilities
//! - **DragSession**: single source of truth for an in-progress drag, with
//!   an ordered event feed.
//! - **PointerTracker**: raw pointer stream → gesture lifecycle (click vs
//!   drag discrimination, hold delays, deferred finalization).
//! - **TargetRegistry**: explicit target tree and innermost-first hit
//!   testing.
//! - **MagnetGrid / DropList**: pointer → insertion/reorder slot mapping
//!   that survives mid-drag scrolling.
//! - **AutoScroller**: edge-margin scrolling with repeat deadlines.
//! - **GhostController**: pointer-following visuals, crossfades, and the
//!   go-back return glide.
//!
//! # How it fits in the system
//! The `dredge` facade re-exports this crate's public surface;
//! `dredge-harness` provides deterministic [`scene::Scene`] and
//! [`ghost::GhostHost`] implementations for tests. Everything here is
//! single-threaded and synchronous: time enters only as explicit `Instant`
//! arguments, so tests never sleep.

pub mod autoscroll;
pub mod context;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ghost;
pub(crate) mod logging;
pub mod magnet;
pub mod scene;
pub mod session;
pub mod target;
pub mod tracker;
