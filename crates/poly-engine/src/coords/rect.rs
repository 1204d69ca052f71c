use super::{Quad, Vec2};

/// Axis-aligned rectangle given by its minimum corner and size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Moves the rectangle by `delta`, keeping its size.
    #[inline]
    pub fn translate(self, delta: Vec2) -> Self {
        Self::from_origin_size(self.origin + delta, self.size)
    }

    /// Grows the size by `delta`, keeping the origin.
    #[inline]
    pub fn expand(self, delta: Vec2) -> Self {
        Self::from_origin_size(self.origin, self.size + delta)
    }

    /// Grows the rectangle by `amount` on every side.
    #[inline]
    pub fn outset(self, amount: f32) -> Self {
        self.translate(Vec2::splat(-amount)).expand(Vec2::splat(2.0 * amount))
    }

    /// Corners in winding order: min, (max.x, min.y), max, (min.x, max.y).
    #[inline]
    pub fn quad(self) -> Quad {
        let min = self.min();
        let max = self.max();
        Quad::new(min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y))
    }
}
