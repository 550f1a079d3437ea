#![forbid(unsafe_code)]

//! Magnet grid: pointer position → insertion/reorder slot index.
//!
//! A [`MagnetGrid`] snapshots one anchor point ("magnet") per slot of an
//! ordered list at construction time, together with the container's
//! reference origin (bounding-box top-left minus scroll). Queries correct
//! the pointer by the difference between the live origin and the reference
//! origin, so the grid stays valid across mid-drag scrolling without being
//! rebuilt.
//!
//! # Invariants
//!
//! 1. Magnet order matches item order; `closest_index` returns a value in
//!    `0..len`.
//! 2. Equidistant magnets resolve to the lowest index (strict `<` scan).
//! 3. A pure scroll of the container between construction and query does
//!    not change the resolved index for a pointer that follows the content.
//!
//! # Failure Modes
//!
//! - `Direction::Auto` with any nested-drop item is a fatal
//!   [`ConfigError::AmbiguousDirection`] at construction.
//! - An empty grid resolves every query to `None`.

use crate::error::ConfigError;
use crate::geometry::{Point, Rect, Vec2};
use crate::scene::ItemGeometry;

/// Traversal direction of the list the grid indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Items flow horizontally.
    Row,
    /// Items flow vertically.
    Column,
    /// Direction inferred from layout. Not allowed with nested drop zones.
    Auto,
}

/// An ordered sequence of slot anchors plus the container reference origin.
#[derive(Debug, Clone)]
pub struct MagnetGrid {
    magnets: Vec<Point>,
    reference_origin: Point,
}

impl MagnetGrid {
    /// Build a grid from item geometries.
    ///
    /// `from_index` is `Some(k)` when reordering the item currently at `k`,
    /// `None` when inserting an external payload. Items hosting a nested
    /// drop zone anchor at their leading edge when the moving slot lands
    /// before them and at their trailing edge otherwise; plain items anchor
    /// at their centroid.
    ///
    /// `reference_origin` is the container's top-left minus its scroll
    /// offsets, captured now (see [`MagnetGrid::origin_of`]).
    pub fn new(
        items: &[ItemGeometry],
        direction: Direction,
        from_index: Option<usize>,
        reference_origin: Point,
    ) -> Result<Self, ConfigError> {
        let mut magnets = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let anchor = if item.hosts_drop {
                let horizontal = match direction {
                    Direction::Row => true,
                    Direction::Column => false,
                    Direction::Auto => return Err(ConfigError::AmbiguousDirection),
                };
                match from_index {
                    // Inserting: the new slot always lands before the item.
                    None => item.rect.leading_edge(horizontal),
                    Some(from) if from < index => item.rect.trailing_edge(horizontal),
                    Some(_) => item.rect.leading_edge(horizontal),
                }
            } else {
                item.rect.center()
            };
            magnets.push(anchor);
        }
        Ok(Self {
            magnets,
            reference_origin,
        })
    }

    /// Reference origin of a container: bounding-box top-left minus scroll.
    #[must_use]
    pub fn origin_of(bounds: Rect, scroll: Vec2) -> Point {
        bounds.origin() - scroll
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.magnets.len()
    }

    /// Whether the grid has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.magnets.is_empty()
    }

    /// Resolve a pointer position to the nearest slot index.
    ///
    /// `live_origin` is the container's origin computed the same way as at
    /// construction, but from live geometry. The difference between the two
    /// origins is exactly the scrolling that happened since construction and
    /// is subtracted from the pointer before the O(N) nearest scan.
    #[must_use]
    pub fn closest_index(&self, pointer: Point, live_origin: Point) -> Option<usize> {
        let correction = live_origin - self.reference_origin;
        let corrected = pointer - correction;

        let mut best: Option<(usize, f32)> = None;
        for (index, magnet) in self.magnets.iter().enumerate() {
            let dist = magnet.distance(corrected);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((index, dist)),
            }
        }
        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaf(rect: Rect) -> ItemGeometry {
        ItemGeometry {
            rect,
            hosts_drop: false,
        }
    }

    fn nested(rect: Rect) -> ItemGeometry {
        ItemGeometry {
            rect,
            hosts_drop: true,
        }
    }

    /// Three 100x40 rows stacked at x=0.
    fn column_items() -> Vec<ItemGeometry> {
        (0..3)
            .map(|i| leaf(Rect::new(0.0, i as f32 * 40.0, 100.0, 40.0)))
            .collect()
    }

    const ORIGIN: Point = Point::new(0.0, 0.0);

    #[test]
    fn first_and_last_magnet_resolve_to_bounds() {
        let grid = MagnetGrid::new(&column_items(), Direction::Column, None, ORIGIN).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.closest_index(Point::new(50.0, 0.0), ORIGIN), Some(0));
        assert_eq!(grid.closest_index(Point::new(50.0, 119.0), ORIGIN), Some(2));
    }

    #[test]
    fn equidistant_magnets_pick_lowest_index() {
        let grid = MagnetGrid::new(&column_items(), Direction::Column, None, ORIGIN).unwrap();
        // Exactly between magnet 0 (y=20) and magnet 1 (y=60).
        assert_eq!(grid.closest_index(Point::new(50.0, 40.0), ORIGIN), Some(0));
    }

    #[test]
    fn reorder_pointer_near_last_magnet() {
        let grid = MagnetGrid::new(&column_items(), Direction::Column, Some(0), ORIGIN).unwrap();
        assert_eq!(grid.closest_index(Point::new(50.0, 100.0), ORIGIN), Some(2));
    }

    #[test]
    fn nested_drop_uses_edge_anchors() {
        let items = vec![
            nested(Rect::new(0.0, 0.0, 100.0, 40.0)),
            nested(Rect::new(0.0, 40.0, 100.0, 40.0)),
        ];
        // Reordering from index 0: item 1 is after the moving slot, so it
        // anchors at its trailing (bottom) edge; item 0 at its leading (top).
        let grid = MagnetGrid::new(&items, Direction::Column, Some(0), ORIGIN).unwrap();
        assert_eq!(grid.closest_index(Point::new(50.0, 1.0), ORIGIN), Some(0));
        assert_eq!(grid.closest_index(Point::new(50.0, 79.0), ORIGIN), Some(1));

        // Inserting: both anchor at their leading edge.
        let grid = MagnetGrid::new(&items, Direction::Column, None, ORIGIN).unwrap();
        assert_eq!(grid.closest_index(Point::new(50.0, 21.0), ORIGIN), Some(1));
    }

    #[test]
    fn insertion_index_lands_between_items() {
        let items = vec![
            leaf(Rect::new(0.0, 0.0, 100.0, 40.0)),
            leaf(Rect::new(0.0, 40.0, 100.0, 40.0)),
        ];
        let grid = MagnetGrid::new(&items, Direction::Column, None, ORIGIN).unwrap();
        // Pointer nearest the second magnet: the new slot lands at index 1.
        let index = grid.closest_index(Point::new(50.0, 45.0), ORIGIN).unwrap();
        assert_eq!(index, 1);

        let mut list = vec!["A", "B"];
        list.insert(index, "X");
        assert_eq!(list, vec!["A", "X", "B"]);
    }

    #[test]
    fn auto_direction_with_nested_drop_is_fatal() {
        let items = vec![nested(Rect::new(0.0, 0.0, 10.0, 10.0))];
        let err = MagnetGrid::new(&items, Direction::Auto, None, ORIGIN).unwrap_err();
        assert_eq!(err, ConfigError::AmbiguousDirection);
    }

    #[test]
    fn auto_direction_without_nested_drop_is_fine() {
        let grid = MagnetGrid::new(&column_items(), Direction::Auto, None, ORIGIN).unwrap();
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn empty_grid_resolves_none() {
        let grid = MagnetGrid::new(&[], Direction::Column, None, ORIGIN).unwrap();
        assert_eq!(grid.closest_index(Point::new(0.0, 0.0), ORIGIN), None);
    }

    #[test]
    fn scroll_correction_neutralizes_pure_scroll() {
        let grid = MagnetGrid::new(&column_items(), Direction::Column, None, ORIGIN).unwrap();
        let pointer = Point::new(50.0, 100.0);
        let before = grid.closest_index(pointer, ORIGIN);

        // Container scrolled down 35px: content (and a content-following
        // pointer) shift up by 35, and so does the live origin.
        let delta = Vec2::new(0.0, 35.0);
        let after = grid.closest_index(pointer - delta, ORIGIN - delta);
        assert_eq!(before, after);
    }

    proptest! {
        #[test]
        fn closest_index_is_scroll_invariant(
            px in -200.0f32..400.0,
            py in -200.0f32..400.0,
            dx in -150.0f32..150.0,
            dy in -150.0f32..150.0,
        ) {
            let grid =
                MagnetGrid::new(&column_items(), Direction::Column, None, ORIGIN).unwrap();
            let pointer = Point::new(px, py);
            let delta = Vec2::new(dx, dy);
            prop_assert_eq!(
                grid.closest_index(pointer, ORIGIN),
                grid.closest_index(pointer - delta, ORIGIN - delta)
            );
        }
    }
}
