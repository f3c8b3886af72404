//! Core geometry types
//!
//! All coordinates are device-independent pixels. Element bounds are stored
//! in document space; the viewport is a rect in the same space whose origin
//! is the current scroll offset.

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> f32 {
        self.size.width * self.size.height
    }

    /// Inset each edge independently
    ///
    /// Positive values shrink the rect, negative values grow it. The
    /// resulting size never goes below zero.
    pub fn inset(&self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + left, self.origin.y + top),
            size: Size::new(
                (self.size.width - left - right).max(0.0),
                (self.size.height - top - bottom).max(0.0),
            ),
        }
    }

    /// Intersection of two rects
    ///
    /// Rects that only touch along an edge still intersect, producing a
    /// zero-area rect. Returns `None` only when the rects are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.origin.x.max(other.origin.x);
        let top = self.origin.y.max(other.origin.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Check if this rect intersects with another (edge contact counts)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }
}
