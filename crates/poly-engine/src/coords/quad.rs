use super::Vec2;

/// Four arbitrary corners `a`, `b`, `c`, `d` in winding order.
///
/// Unlike [`Rect`](super::Rect) a quad need not be axis aligned.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Quad {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
    pub d: Vec2,
}

impl Quad {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        [self.a, self.b, self.c, self.d]
    }
}
