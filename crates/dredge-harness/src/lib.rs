#![forbid(unsafe_code)]

//! Deterministic hosts for exercising the Dredge engine in tests.
//!
//! The engine takes time as explicit `Instant` arguments and geometry
//! through traits, so a full drag interaction can run synchronously inside
//! one test body. This crate supplies the pieces a test needs:
//!
//! - [`scene::TestScene`]: an in-memory node store implementing
//!   `dredge_core::scene::Scene`.
//! - [`ghost::TestGhostHost`]: a recording `GhostHost` with live-clone
//!   accounting.
//! - [`driver::GestureDriver`]: press/move/release helpers that feed a
//!   tracker and advance virtual time.

pub mod driver;
pub mod ghost;
pub mod scene;

pub use driver::GestureDriver;
pub use ghost::TestGhostHost;
pub use scene::TestScene;
