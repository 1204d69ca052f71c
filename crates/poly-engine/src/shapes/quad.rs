use crate::coords::{ColorRgba, Quad, Rect, Vec3};
use crate::graphics::{ShapeDims, ShapePrototype};
use crate::vertex::{Vertex, VertexExtra};

use super::{Shape, flat_vertex};

/// Arbitrary quadrilateral with per-corner UVs and a flat color.
///
/// Corners are used in order A, B, C, D and split along A–C.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct QuadShape {
    pub quad: Quad,
    pub color: ColorRgba,
    pub uv_quad: Quad,
    pub extra: VertexExtra,
}

impl Shape for QuadShape {
    const ADD_OP: &'static str = "add_quad";
    const UPDATE_OP: &'static str = "update_quad";

    fn dims(&self) -> ShapeDims {
        ShapeDims::new(4, 6)
    }

    fn prototype(&self) -> ShapePrototype {
        ShapePrototype::new(4, vec![0, 1, 2, 2, 3, 0])
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        self.quad
            .corners()
            .into_iter()
            .zip(self.uv_quad.corners())
            .map(|(pos, uv)| flat_vertex(pos, uv, normal, self.color, self.extra))
            .collect()
    }
}

/// Axis-aligned rectangle, drawn as the quad of its corners.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RectShape {
    pub rect: Rect,
    pub color: ColorRgba,
    pub uv_rect: Rect,
    pub extra: VertexExtra,
}

impl RectShape {
    pub fn to_quad(&self) -> QuadShape {
        QuadShape {
            quad: self.rect.quad(),
            color: self.color,
            uv_quad: self.uv_rect.quad(),
            extra: self.extra,
        }
    }
}

impl Shape for RectShape {
    const ADD_OP: &'static str = "add_rect";
    const UPDATE_OP: &'static str = "update_rect";

    fn dims(&self) -> ShapeDims {
        self.to_quad().dims()
    }

    fn prototype(&self) -> ShapePrototype {
        self.to_quad().prototype()
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        self.to_quad().vertices(normal)
    }
}

/// Band between an inner and an outer quad.
///
/// Inner corners are local vertices 0..4, outer corners 4..8, each at its own
/// corner. Every edge is two triangles; the last edge wraps to the first.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct QuadOutlineShape {
    pub inner: Quad,
    pub outer: Quad,
    pub color: ColorRgba,
    pub uv_inner: Quad,
    pub uv_outer: Quad,
    pub extra: VertexExtra,
}

impl Shape for QuadOutlineShape {
    const ADD_OP: &'static str = "add_quad_outline";
    const UPDATE_OP: &'static str = "update_quad_outline";

    fn dims(&self) -> ShapeDims {
        ShapeDims::new(8, 24)
    }

    fn prototype(&self) -> ShapePrototype {
        let indexes = (0..4)
            .flat_map(|i| {
                let j = (i + 1) % 4;
                [i, 4 + i, j, 4 + i, 4 + j, j]
            })
            .collect();
        ShapePrototype::new(8, indexes)
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        let inner = self.inner.corners().into_iter().zip(self.uv_inner.corners());
        let outer = self.outer.corners().into_iter().zip(self.uv_outer.corners());
        inner
            .chain(outer)
            .map(|(pos, uv)| flat_vertex(pos, uv, normal, self.color, self.extra))
            .collect()
    }
}

/// Border of `thickness` drawn outside `rect`.
///
/// The outer edge is `rect` grown by `thickness` on every side; UVs grow by
/// `uv_thickness` the same way.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RectOutlineShape {
    pub rect: Rect,
    pub thickness: f32,
    pub color: ColorRgba,
    pub uv_rect: Rect,
    pub uv_thickness: f32,
    pub extra: VertexExtra,
}

impl RectOutlineShape {
    pub fn to_quad_outline(&self) -> QuadOutlineShape {
        QuadOutlineShape {
            inner: self.rect.quad(),
            outer: self.rect.outset(self.thickness).quad(),
            color: self.color,
            uv_inner: self.uv_rect.quad(),
            uv_outer: self.uv_rect.outset(self.uv_thickness).quad(),
            extra: self.extra,
        }
    }
}

impl Shape for RectOutlineShape {
    const ADD_OP: &'static str = "add_rect_outline";
    const UPDATE_OP: &'static str = "update_rect_outline";

    fn dims(&self) -> ShapeDims {
        self.to_quad_outline().dims()
    }

    fn prototype(&self) -> ShapePrototype {
        self.to_quad_outline().prototype()
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        self.to_quad_outline().vertices(normal)
    }
}
