use crate::coords::{ColorRgba, Rect, Vec3};
use crate::vertex::{Vertex, VertexFlags};

use super::{BatchId, GraphicsError, RendererId, ShapeHandle, ShapePrototype, SurfaceId};

/// Shader program text handed to [`GraphicsBackend::add_renderer`].
///
/// WGSL with `vs_main` and `fs_main` entry points. Vertex inputs use
/// locations 0 (position), 1 (normal), 2 (uv), 3 (color), 4 and 5 (extra),
/// present only when the renderer's flags enable them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: String,
}

impl ShaderSource {
    pub fn wgsl(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self { label: label.into(), wgsl: code.into() }
    }
}

/// Capabilities a graphics backend provides to the tessellator and to
/// applications.
///
/// The trait is object safe; applications hold `&mut dyn GraphicsBackend` and
/// the shape helpers in [`crate::shapes`] work through it.
pub trait GraphicsBackend {
    /// Unit vector pointing away from the viewer in this backend's convention.
    ///
    /// Flat shapes use `-forward_axis().z` as their normal so they face the
    /// camera.
    fn forward_axis(&self) -> Vec3;

    /// Creates an empty batch whose vertices use `flags`, with room for
    /// `initial_size` vertices before the first growth.
    fn add_draw_batch(&mut self, flags: VertexFlags, initial_size: u32) -> Result<BatchId, GraphicsError>;

    /// Registers a shader program for drawing batches laid out per `flags`.
    fn add_renderer(&mut self, flags: VertexFlags, shader: &ShaderSource) -> Result<RendererId, GraphicsError>;

    /// Reserves vertex and index zones for `prototype` and writes its topology.
    fn allocate_shape(&mut self, batch: BatchId, prototype: &ShapePrototype) -> Result<ShapeHandle, GraphicsError>;

    /// Writes the vertex at `local_index` within `shape`.
    fn update_vertex(&mut self, shape: &ShapeHandle, local_index: u32, vertex: &Vertex) -> Result<(), GraphicsError>;

    /// Stops drawing `shape` without releasing its zones.
    fn hide_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError>;

    /// Resumes drawing a hidden shape.
    fn show_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError>;

    /// Releases the shape's zones. The handle is invalid afterwards.
    fn delete_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError>;

    /// Deletes every shape in `batch`, keeping its capacity.
    fn clear_batch(&mut self, batch: BatchId) -> Result<(), GraphicsError>;

    /// Fills all of `surface` with `color`.
    ///
    /// Clears and draws reach the surface in the order they were issued.
    fn clear_surface(&mut self, surface: SurfaceId, color: ColorRgba) -> Result<(), GraphicsError>;

    /// Fills `area` of `surface` with `color`, replacing what is there
    /// (no blending). `area` is in shape space: logical pixels, origin at the
    /// bottom-left corner.
    fn clear_surface_area(&mut self, surface: SurfaceId, color: ColorRgba, area: Rect) -> Result<(), GraphicsError>;

    /// Draws `batch` onto `surface` with `renderer`.
    ///
    /// `force_redraw` re-uploads the batch even when it has not changed.
    fn draw_batch(
        &mut self,
        batch: BatchId,
        surface: SurfaceId,
        renderer: RendererId,
        force_redraw: bool,
    ) -> Result<(), GraphicsError>;
}
