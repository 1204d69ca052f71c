//! Shape tessellation.
//!
//! Each shape kind is a plain parameter struct implementing [`Shape`]: it
//! knows its vertex/index counts, its local topology, and how to compute its
//! vertices. [`ShapeBatch`] drives any [`GraphicsBackend`] with those structs:
//!
//! - `add_*` allocates zones for the shape, then writes its vertices
//! - `update_*` rewrites the vertices of an existing shape of the same size
//!
//! Flat shapes (every kind but the pass-through triangle) lie in the z = 0
//! plane and face the viewer: positions drop any z of the input vertices and
//! normals are `(0, 0, -forward_axis().z)`.

mod circle;
mod line;
mod polygon;
mod quad;
mod triangle;

pub use circle::{CircleRingShape, CircleShape};
pub use line::LineShape;
pub use polygon::{PolygonRingShape, PolygonShape};
pub use quad::{QuadOutlineShape, QuadShape, RectOutlineShape, RectShape};
pub use triangle::TriangleShape;

use crate::coords::{ColorRgba, Quad, Rect, Vec2, Vec3};
use crate::graphics::{
    BatchId, ErrorList, GraphicsBackend, GraphicsError, ShapeDims, ShapeHandle, ShapePrototype,
};
use crate::vertex::{Vertex, VertexExtra};

/// A tessellatable primitive.
pub trait Shape {
    /// Operation name reported by errors from `add_*`.
    const ADD_OP: &'static str;
    /// Operation name reported by errors from `update_*`.
    const UPDATE_OP: &'static str;

    /// Rejects parameters that cannot produce valid topology.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn dims(&self) -> ShapeDims;

    /// Local topology submitted at allocation.
    fn prototype(&self) -> ShapePrototype;

    /// Vertex values in local index order. `normal` is the facing normal for
    /// flat shapes.
    fn vertices(&self, normal: Vec3) -> Vec<Vertex>;
}

/// Shape helpers available on every [`GraphicsBackend`], including
/// `dyn GraphicsBackend`.
pub trait ShapeBatch: GraphicsBackend {
    /// Allocates `shape` in `batch` and writes its vertices.
    ///
    /// If writing fails the new shape is deleted before the error is returned.
    fn add_shape<S: Shape>(&mut self, batch: BatchId, shape: &S) -> Result<ShapeHandle, GraphicsError> {
        shape.validate().map_err(|reason| GraphicsError::invalid_shape(S::ADD_OP, reason))?;

        let handle = self.allocate_shape(batch, &shape.prototype())?;
        if let Err(e) = self.update_shape(&handle, shape) {
            if let Err(cleanup) = self.delete_shape(&handle) {
                log::warn!("{}: could not release shape after failed write: {cleanup}", S::ADD_OP);
            }
            return Err(e);
        }
        Ok(handle)
    }

    /// Rewrites the vertices of `handle` from `shape`.
    ///
    /// Fails without writing anything when the handle's counts differ from
    /// the shape's. Otherwise every vertex is attempted and all failures are
    /// returned together.
    fn update_shape<S: Shape>(&mut self, handle: &ShapeHandle, shape: &S) -> Result<(), GraphicsError> {
        shape.validate().map_err(|reason| GraphicsError::invalid_shape(S::UPDATE_OP, reason))?;

        let expected = shape.dims();
        let actual = handle.dims();
        if expected != actual {
            return Err(GraphicsError::DimensionMismatch { op: S::UPDATE_OP, expected, actual });
        }

        let normal = Vec3::new(0.0, 0.0, -self.forward_axis().z);
        let mut errors = ErrorList::new(S::UPDATE_OP);
        for (local, vertex) in shape.vertices(normal).iter().enumerate() {
            errors.push(self.update_vertex(handle, local as u32, vertex));
        }
        errors.finish()
    }

    // ── lines ─────────────────────────────────────────────────────────────

    fn add_line(
        &mut self,
        batch: BatchId,
        a: Vertex,
        b: Vertex,
        thickness: f32,
        uv_thickness: f32,
    ) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, &LineShape { a, b, thickness, uv_thickness })
    }

    fn update_line(
        &mut self,
        handle: &ShapeHandle,
        a: Vertex,
        b: Vertex,
        thickness: f32,
        uv_thickness: f32,
    ) -> Result<(), GraphicsError> {
        self.update_shape(handle, &LineShape { a, b, thickness, uv_thickness })
    }

    // ── triangles ─────────────────────────────────────────────────────────

    fn add_triangle(&mut self, batch: BatchId, vertices: [Vertex; 3]) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, &TriangleShape { vertices })
    }

    fn update_triangle(&mut self, handle: &ShapeHandle, vertices: [Vertex; 3]) -> Result<(), GraphicsError> {
        self.update_shape(handle, &TriangleShape { vertices })
    }

    // ── polygons ──────────────────────────────────────────────────────────

    fn add_regular_polygon(&mut self, batch: BatchId, polygon: &PolygonShape) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, polygon)
    }

    fn update_regular_polygon(&mut self, handle: &ShapeHandle, polygon: &PolygonShape) -> Result<(), GraphicsError> {
        self.update_shape(handle, polygon)
    }

    fn add_regular_polygon_ring(
        &mut self,
        batch: BatchId,
        ring: &PolygonRingShape,
    ) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, ring)
    }

    fn update_regular_polygon_ring(
        &mut self,
        handle: &ShapeHandle,
        ring: &PolygonRingShape,
    ) -> Result<(), GraphicsError> {
        self.update_shape(handle, ring)
    }

    // ── circles ───────────────────────────────────────────────────────────

    fn add_circle(&mut self, batch: BatchId, circle: &CircleShape) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, circle)
    }

    fn update_circle(&mut self, handle: &ShapeHandle, circle: &CircleShape) -> Result<(), GraphicsError> {
        self.update_shape(handle, circle)
    }

    fn add_circle_ring(&mut self, batch: BatchId, ring: &CircleRingShape) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, ring)
    }

    fn update_circle_ring(&mut self, handle: &ShapeHandle, ring: &CircleRingShape) -> Result<(), GraphicsError> {
        self.update_shape(handle, ring)
    }

    // ── quads ─────────────────────────────────────────────────────────────

    fn add_quad(
        &mut self,
        batch: BatchId,
        quad: Quad,
        color: ColorRgba,
        uv_quad: Quad,
        extra: VertexExtra,
    ) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, &QuadShape { quad, color, uv_quad, extra })
    }

    fn update_quad(
        &mut self,
        handle: &ShapeHandle,
        quad: Quad,
        color: ColorRgba,
        uv_quad: Quad,
        extra: VertexExtra,
    ) -> Result<(), GraphicsError> {
        self.update_shape(handle, &QuadShape { quad, color, uv_quad, extra })
    }

    fn add_rect(
        &mut self,
        batch: BatchId,
        rect: Rect,
        color: ColorRgba,
        uv_rect: Rect,
        extra: VertexExtra,
    ) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, &RectShape { rect, color, uv_rect, extra })
    }

    fn update_rect(
        &mut self,
        handle: &ShapeHandle,
        rect: Rect,
        color: ColorRgba,
        uv_rect: Rect,
        extra: VertexExtra,
    ) -> Result<(), GraphicsError> {
        self.update_shape(handle, &RectShape { rect, color, uv_rect, extra })
    }

    fn add_quad_outline(&mut self, batch: BatchId, outline: &QuadOutlineShape) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, outline)
    }

    fn update_quad_outline(&mut self, handle: &ShapeHandle, outline: &QuadOutlineShape) -> Result<(), GraphicsError> {
        self.update_shape(handle, outline)
    }

    fn add_rect_outline(&mut self, batch: BatchId, outline: &RectOutlineShape) -> Result<ShapeHandle, GraphicsError> {
        self.add_shape(batch, outline)
    }

    fn update_rect_outline(&mut self, handle: &ShapeHandle, outline: &RectOutlineShape) -> Result<(), GraphicsError> {
        self.update_shape(handle, outline)
    }
}

impl<B: GraphicsBackend + ?Sized> ShapeBatch for B {}

/// Shared vertex builder for flat shapes: position, uv, normal, color, extra.
#[inline]
fn flat_vertex(
    pos: Vec2,
    uv: Vec2,
    normal: Vec3,
    color: ColorRgba,
    extra: VertexExtra,
) -> Vertex {
    Vertex { pos: pos.extend(0.0), norm: normal, uv, color, extra }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::batch::MemoryBackend;
    use crate::graphics::{BatchId, GraphicsBackend, ShapeHandle};
    use crate::vertex::VertexFlags;

    /// Layout wide enough to read back every attribute the tessellator writes.
    pub const READBACK: VertexFlags = VertexFlags(
        VertexFlags::POS_3D.0
            | VertexFlags::IDX_32.0
            | VertexFlags::HAS_TEX.0
            | VertexFlags::COL_FA.0
            | VertexFlags::NORMS.0,
    );

    pub fn backend() -> (MemoryBackend, BatchId) {
        let mut backend = MemoryBackend::default();
        let batch = backend.add_draw_batch(READBACK, 64).unwrap();
        (backend, batch)
    }

    fn f32s(bytes: &[u8]) -> Vec<f32> {
        bytes.chunks_exact(4).map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]])).collect()
    }

    /// Position `[x, y, z]` of local vertex `local`.
    pub fn pos(backend: &MemoryBackend, shape: &ShapeHandle, local: u32) -> [f32; 3] {
        let slot = backend.batch(shape.batch).unwrap().vertex_slot(shape, local).unwrap();
        let v = f32s(&slot[..12]);
        [v[0], v[1], v[2]]
    }

    /// Normal `[x, y, z]` of local vertex `local`.
    pub fn normal(backend: &MemoryBackend, shape: &ShapeHandle, local: u32) -> [f32; 3] {
        let slot = backend.batch(shape.batch).unwrap().vertex_slot(shape, local).unwrap();
        let o = READBACK.normal_offset() as usize;
        let v = f32s(&slot[o..o + 12]);
        [v[0], v[1], v[2]]
    }

    /// UV `[u, v]` of local vertex `local`.
    pub fn uv(backend: &MemoryBackend, shape: &ShapeHandle, local: u32) -> [f32; 2] {
        let slot = backend.batch(shape.batch).unwrap().vertex_slot(shape, local).unwrap();
        let o = READBACK.uv_offset() as usize;
        let v = f32s(&slot[o..o + 8]);
        [v[0], v[1]]
    }

    /// Shape-local indices read back from the batch.
    pub fn local_indices(backend: &MemoryBackend, shape: &ShapeHandle) -> Vec<u32> {
        let batch = backend.batch(shape.batch).unwrap();
        batch.indices()[shape.index_zone.range()]
            .iter()
            .map(|i| i - shape.vertex_zone.start)
            .collect()
    }

    pub fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }
}
