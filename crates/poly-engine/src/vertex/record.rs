use crate::coords::{ColorRgba, Vec2, Vec3};

/// Eight 32-bit blocks of user data carried per vertex.
pub type VertexExtra = [u32; 8];

pub const NO_EXTRA: VertexExtra = [0; 8];

/// Logical vertex record.
///
/// Batches keep only the attributes their [`VertexFlags`](super::VertexFlags)
/// enable: 2D layouts drop `pos.z`/`norm.z`, colors are quantized to the
/// configured format, and only the configured number of extra blocks is kept.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub norm: Vec3,
    pub uv: Vec2,
    pub color: ColorRgba,
    pub extra: VertexExtra,
}

impl Vertex {
    /// Vertex at `pos` (z = 0) with every other attribute zeroed.
    #[inline]
    pub fn at(pos: Vec2) -> Self {
        Self { pos: pos.extend(0.0), ..Self::default() }
    }

    #[inline]
    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = uv;
        self
    }

    #[inline]
    pub fn with_color(mut self, color: ColorRgba) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_extra(mut self, extra: VertexExtra) -> Self {
        self.extra = extra;
        self
    }
}
