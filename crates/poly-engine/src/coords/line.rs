use super::Vec2;

/// Segment from `a` to `b`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Line {
    pub a: Vec2,
    pub b: Vec2,
}

impl Line {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Unit vector perpendicular to the segment (counter-clockwise of `b - a`).
    ///
    /// Zero for a degenerate segment.
    #[inline]
    pub fn normal(self) -> Vec2 {
        (self.b - self.a).perp().normalize_or_zero()
    }

    /// Returns the two copies of this segment shifted by `+distance` and
    /// `-distance` along [`normal`](Self::normal).
    #[inline]
    pub fn perp_lines(self, distance: f32) -> (Line, Line) {
        let offset = self.normal() * distance;
        (
            Line::new(self.a + offset, self.b + offset),
            Line::new(self.a - offset, self.b - offset),
        )
    }
}
