#![forbid(unsafe_code)]

//! Typed configuration errors.
//!
//! Only configuration mistakes are errors. Everything that can happen during
//! a drag (no target under the pointer, type mismatch, mask intercept) is
//! ordinary state and is represented as data, never as an `Err`.

use thiserror::Error;

/// Fatal configuration errors, surfaced at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A list with nested drop zones was built with `Direction::Auto`.
    /// The caller must pick `Row` or `Column` explicitly.
    #[error("drop list direction is ambiguous: specify Row or Column when items host nested drop zones")]
    AmbiguousDirection,

    /// A reorderable/insertable list was declared without a way to render
    /// its items.
    #[error("drop list has no item renderer")]
    MissingItemRenderer,

    /// An insertable list was declared without a feedback slot renderer.
    #[error("drop list has no feedback renderer")]
    MissingFeedbackRenderer,
}
