use std::collections::HashMap;

use crate::coords::{ColorRgba, Rect, Vec3};
use crate::graphics::{
    BatchId, GraphicsBackend, GraphicsError, RendererId, ShaderSource, ShapeHandle,
    ShapePrototype, SurfaceId,
};
use crate::vertex::{Vertex, VertexFlags};

use super::{Batch, BatchConfig, BatchStore, check_surface};

/// One accepted `draw_batch` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub batch: BatchId,
    pub surface: SurfaceId,
    pub renderer: RendererId,
    /// Batch revision at the time of the draw.
    pub revision: u64,
    /// Indices covered by the draw.
    pub index_count: u32,
    /// Whether the batch data would have been re-uploaded.
    pub uploaded: bool,
}

/// One accepted surface operation, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    /// `clear_surface` when `area` is `None`, `clear_surface_area` otherwise.
    Clear { surface: SurfaceId, color: ColorRgba, area: Option<Rect> },
    Draw(DrawRecord),
}

#[derive(Debug, Clone)]
struct RendererRecord {
    flags: VertexFlags,
    shader: ShaderSource,
}

/// Backend that keeps everything in host memory and records draws.
///
/// Used by headless tools and tests. Storage behaves exactly like the GPU
/// backend's staging copy.
#[derive(Debug)]
pub struct MemoryBackend {
    store: BatchStore,
    renderers: Vec<RendererRecord>,
    commands: Vec<SurfaceCommand>,
    uploaded: HashMap<BatchId, u64>,
    forward: Vec3,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl MemoryBackend {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            store: BatchStore::new(config),
            renderers: Vec::new(),
            commands: Vec::new(),
            uploaded: HashMap::new(),
            forward: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Overrides the reported forward axis (default `+z`).
    pub fn with_forward_axis(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.store.get(id)
    }

    pub fn shader(&self, id: RendererId) -> Option<&ShaderSource> {
        self.renderers.get(id.0 as usize).map(|r| &r.shader)
    }

    /// Every clear and draw accepted so far, oldest first.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// The draws among [`commands`](Self::commands).
    pub fn draws(&self) -> Vec<&DrawRecord> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Draw(d) => Some(d),
                SurfaceCommand::Clear { .. } => None,
            })
            .collect()
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    fn clear(&mut self, op: &'static str, surface: SurfaceId, color: ColorRgba, area: Option<Rect>) -> Result<(), GraphicsError> {
        check_surface(op, surface)?;
        self.commands.push(SurfaceCommand::Clear { surface, color, area });
        Ok(())
    }
}

impl GraphicsBackend for MemoryBackend {
    fn forward_axis(&self) -> Vec3 {
        self.forward
    }

    fn add_draw_batch(&mut self, flags: VertexFlags, initial_size: u32) -> Result<BatchId, GraphicsError> {
        Ok(self.store.add(flags, initial_size))
    }

    fn add_renderer(&mut self, flags: VertexFlags, shader: &ShaderSource) -> Result<RendererId, GraphicsError> {
        let id = RendererId(self.renderers.len() as u32);
        self.renderers.push(RendererRecord { flags, shader: shader.clone() });
        Ok(id)
    }

    fn allocate_shape(&mut self, batch: BatchId, prototype: &ShapePrototype) -> Result<ShapeHandle, GraphicsError> {
        self.store.allocate_shape(batch, prototype)
    }

    fn update_vertex(&mut self, shape: &ShapeHandle, local_index: u32, vertex: &Vertex) -> Result<(), GraphicsError> {
        self.store.update_vertex(shape, local_index, vertex)
    }

    fn hide_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.store.hide_shape(shape)
    }

    fn show_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.store.show_shape(shape)
    }

    fn delete_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.store.delete_shape(shape)
    }

    fn clear_batch(&mut self, batch: BatchId) -> Result<(), GraphicsError> {
        self.store.clear_batch(batch)
    }

    fn clear_surface(&mut self, surface: SurfaceId, color: ColorRgba) -> Result<(), GraphicsError> {
        self.clear("clear_surface", surface, color, None)
    }

    fn clear_surface_area(&mut self, surface: SurfaceId, color: ColorRgba, area: Rect) -> Result<(), GraphicsError> {
        self.clear("clear_surface_area", surface, color, Some(area))
    }

    fn draw_batch(
        &mut self,
        batch: BatchId,
        surface: SurfaceId,
        renderer: RendererId,
        force_redraw: bool,
    ) -> Result<(), GraphicsError> {
        let renderer_flags = self.renderers.get(renderer.0 as usize).map(|r| r.flags);
        let b = self.store.check_draw(batch, surface, renderer, renderer_flags)?;

        let revision = b.revision();
        let index_count = b.index_extent();
        let uploaded = force_redraw || self.uploaded.get(&batch) != Some(&revision);
        if uploaded {
            self.uploaded.insert(batch, revision);
        }

        self.commands.push(SurfaceCommand::Draw(DrawRecord { batch, surface, renderer, revision, index_count, uploaded }));
        Ok(())
    }
}
