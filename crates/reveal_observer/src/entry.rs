//! Per-target intersection records

use reveal_core::{ElementId, Rect};

/// Intersection state of one target at the time it was evaluated
///
/// All rects are in document space.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    /// Target reached the observer's smallest threshold
    pub is_intersecting: bool,
    /// Visible fraction of the target's area, in `[0, 1]`
    pub intersection_ratio: f32,
    /// Target bounds
    pub bounding_rect: Rect,
    /// Visible part of the target (zero-sized when not intersecting)
    pub intersection_rect: Rect,
    /// Root rect after applying the root margin
    pub root_bounds: Rect,
}

impl IntersectionEntry {
    /// Record for a target that is entirely outside the root
    pub fn outside(target: ElementId, bounding_rect: Rect, root_bounds: Rect) -> Self {
        Self {
            target,
            is_intersecting: false,
            intersection_ratio: 0.0,
            bounding_rect,
            intersection_rect: Rect::ZERO,
            root_bounds,
        }
    }
}
