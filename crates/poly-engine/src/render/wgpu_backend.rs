use bytemuck::{Pod, Zeroable};

use crate::batch::{Batch, BatchConfig, BatchStore, check_surface};
use crate::coords::{ColorRgba, Rect, Vec3};
use crate::graphics::{
    BackendError, BatchId, GraphicsBackend, GraphicsError, RendererId, ShaderSource, ShapeHandle,
    ShapePrototype, SurfaceId,
};
use crate::vertex::{Vertex, VertexFlags, pack_vertex};

use super::layout::{index_format, topology, vertex_attributes};
use super::{RenderCtx, RenderTarget};

/// Layout drawn by [`default_shader`]: 2D positions and float RGBA color.
pub const DEFAULT_LAYOUT: VertexFlags = VertexFlags(VertexFlags::POS_2D.0 | VertexFlags::COL_FA.0);

/// Flat-color shader for [`DEFAULT_LAYOUT`] batches.
///
/// Positions are logical pixels with the origin at the bottom-left corner.
pub fn default_shader() -> ShaderSource {
    ShaderSource::wgsl("poly batch", include_str!("shaders/batch.wgsl"))
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

fn viewport_ubo_size() -> wgpu::BufferSize {
    // Non-zero by construction.
    wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64).unwrap_or(wgpu::BufferSize::MIN)
}

/// Grows `slot` to hold at least `len` bytes. Contents are not preserved.
fn ensure_buffer(
    ctx: &RenderCtx<'_>,
    slot: &mut Option<wgpu::Buffer>,
    label: &'static str,
    usage: wgpu::BufferUsages,
    len: usize,
) {
    let required = (len as u64).max(wgpu::COPY_BUFFER_ALIGNMENT);
    if slot.as_ref().is_some_and(|b| b.size() >= required) {
        return;
    }
    let size = required.next_power_of_two().max(256);
    log::debug!("{label}: allocating {size} bytes");
    *slot = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
}

pub(crate) fn wgpu_color(c: ColorRgba) -> wgpu::Color {
    wgpu::Color { r: c.r as f64, g: c.g as f64, b: c.b as f64, a: c.a as f64 }
}

/// Starts a pass over the frame's color view.
fn begin_pass<'e>(
    target: &'e mut RenderTarget<'_>,
    label: &'static str,
    load: wgpu::LoadOp<wgpu::Color>,
) -> wgpu::RenderPass<'e> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Two triangles covering `area`, packed as [`DEFAULT_LAYOUT`] vertices.
fn area_vertices(color: ColorRgba, area: Rect) -> Vec<u8> {
    let [a, b, c, d] = area.quad().corners();
    let stride = DEFAULT_LAYOUT.stride() as usize;
    let mut out = vec![0; AREA_VERTICES as usize * stride];
    for (slot, pos) in out.chunks_exact_mut(stride).zip([a, b, c, c, d, a]) {
        pack_vertex(DEFAULT_LAYOUT, &Vertex::at(pos).with_color(color), slot);
    }
    out
}

const AREA_VERTICES: u32 = 6;

struct Renderer {
    flags: VertexFlags,
    shader: ShaderSource,
    attributes: Vec<wgpu::VertexAttribute>,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
}

impl Renderer {
    fn new(flags: VertexFlags, shader: ShaderSource, blend: Option<wgpu::BlendState>) -> Result<Self, BackendError> {
        Ok(Self {
            flags,
            attributes: vertex_attributes(flags)?,
            topology: topology(flags)?,
            shader,
            blend,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
        })
    }

    /// Builds what a draw needs and returns the pipeline and bind group.
    fn prepare(&mut self, ctx: &RenderCtx<'_>) -> Option<(&wgpu::RenderPipeline, &wgpu::BindGroup)> {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_viewport_uniform(ctx);
        Some((self.pipeline.as_ref()?, self.bind_group.as_ref()?))
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("'{}': building pipeline for {:?}", self.shader.label, ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.shader.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(self.shader.wgsl.as_str().into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("poly viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(viewport_ubo_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("poly batch pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.shader.label.as_str()),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: self.flags.stride() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &self.attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: self.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("poly viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("poly viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.x.max(1.0), ctx.viewport.y.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

/// GPU copy of one batch.
#[derive(Default)]
struct GpuBatch {
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    uploaded_revision: Option<u64>,
    index_count: u32,
}

impl GpuBatch {
    fn upload(&mut self, ctx: &RenderCtx<'_>, batch: &Batch, force: bool) {
        if !force && self.uploaded_revision == Some(batch.revision()) {
            return;
        }

        let vertices = batch.vertex_bytes();
        let mut indices = batch.index_bytes();
        // Queue writes must be 4-byte multiples; an odd u16 count gets one zero pad.
        indices.resize(indices.len().next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize), 0);

        ensure_buffer(ctx, &mut self.vertex_buffer, "poly batch vertices", wgpu::BufferUsages::VERTEX, vertices.len());
        ensure_buffer(ctx, &mut self.index_buffer, "poly batch indices", wgpu::BufferUsages::INDEX, indices.len());

        if let Some(buf) = self.vertex_buffer.as_ref().filter(|_| !vertices.is_empty()) {
            ctx.queue.write_buffer(buf, 0, vertices);
        }
        if let Some(buf) = self.index_buffer.as_ref().filter(|_| !indices.is_empty()) {
            ctx.queue.write_buffer(buf, 0, &indices);
        }

        self.index_count = batch.index_extent();
        self.uploaded_revision = Some(batch.revision());
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Queued {
    Clear(ColorRgba),
    ClearArea(ColorRgba, Rect),
    Draw { batch: BatchId, renderer: RendererId, force_redraw: bool },
}

/// Replacing fill for `clear_surface_area`, drawn with the default shader.
#[derive(Default)]
struct AreaFill {
    renderer: Option<Renderer>,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl AreaFill {
    /// Uploads one quad per queued area clear, in queue order.
    fn upload(&mut self, ctx: &RenderCtx<'_>, queued: &[Queued]) -> bool {
        let vertices: Vec<u8> = queued
            .iter()
            .filter_map(|q| match *q {
                Queued::ClearArea(color, area) => Some(area_vertices(color, area)),
                _ => None,
            })
            .flatten()
            .collect();
        if vertices.is_empty() {
            return false;
        }

        if self.renderer.is_none() {
            match Renderer::new(DEFAULT_LAYOUT, default_shader(), None) {
                Ok(r) => self.renderer = Some(r),
                Err(e) => {
                    log::warn!("area clears unavailable: {e}");
                    return false;
                }
            }
        }

        ensure_buffer(ctx, &mut self.vertex_buffer, "poly area fill vertices", wgpu::BufferUsages::VERTEX, vertices.len());
        if let Some(buf) = self.vertex_buffer.as_ref() {
            ctx.queue.write_buffer(buf, 0, &vertices);
        }
        true
    }
}

/// [`GraphicsBackend`] drawing to the window through wgpu.
///
/// Batches live in host memory until [`flush`](Self::flush), which uploads
/// every batch changed since its last upload and records one render pass per
/// queued clear or draw, in issue order. No GPU object exists before the
/// first flush, so batches and renderers can be created before the window is.
pub struct WgpuBackend {
    store: BatchStore,
    gpu_batches: Vec<GpuBatch>,
    renderers: Vec<Renderer>,
    area_fill: AreaFill,
    queued: Vec<Queued>,
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl WgpuBackend {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            store: BatchStore::new(config),
            gpu_batches: Vec::new(),
            renderers: Vec::new(),
            area_fill: AreaFill::default(),
            queued: Vec::new(),
        }
    }

    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.store.get(id)
    }

    /// Draws waiting for the next [`flush`](Self::flush).
    pub fn queued_draws(&self) -> usize {
        self.queued.iter().filter(|q| matches!(q, Queued::Draw { .. })).count()
    }

    /// Drops queued clears and draws without recording them, e.g. when a
    /// frame is skipped.
    pub fn discard_queued(&mut self) {
        if !self.queued.is_empty() {
            log::debug!("discarding {} queued commands", self.queued.len());
            self.queued.clear();
        }
    }

    /// Uploads changed batches and records every queued clear and draw into
    /// `target`.
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let queued = std::mem::take(&mut self.queued);
        let fills_ready = self.area_fill.upload(ctx, &queued);
        let mut next_fill = 0;

        for command in queued {
            match command {
                Queued::Clear(color) => {
                    begin_pass(target, "poly surface clear", wgpu::LoadOp::Clear(wgpu_color(color)));
                }
                Queued::ClearArea(..) => {
                    let first = next_fill;
                    next_fill += AREA_VERTICES;
                    if !fills_ready {
                        continue;
                    }
                    let AreaFill { renderer: Some(renderer), vertex_buffer: Some(vertex_buffer) } = &mut self.area_fill
                    else {
                        continue;
                    };
                    let Some((pipeline, bind_group)) = renderer.prepare(ctx) else { continue };

                    let mut rpass = begin_pass(target, "poly area clear", wgpu::LoadOp::Load);
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, bind_group, &[]);
                    rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
                    rpass.draw(first..first + AREA_VERTICES, 0..1);
                }
                Queued::Draw { batch, renderer, force_redraw } => {
                    let (Some(b), Some(gpu), Some(renderer)) = (
                        self.store.get(batch),
                        self.gpu_batches.get_mut(batch.0 as usize),
                        self.renderers.get_mut(renderer.0 as usize),
                    ) else {
                        log::warn!("dropping queued draw of {batch} with {renderer}");
                        continue;
                    };

                    gpu.upload(ctx, b, force_redraw);
                    if gpu.index_count == 0 {
                        continue;
                    }

                    let Some((pipeline, bind_group)) = renderer.prepare(ctx) else { continue };
                    let Some(vertex_buffer) = gpu.vertex_buffer.as_ref() else { continue };
                    let Some(index_buffer) = gpu.index_buffer.as_ref() else { continue };

                    let mut rpass = begin_pass(target, "poly batch pass", wgpu::LoadOp::Load);
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, bind_group, &[]);
                    rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
                    rpass.set_index_buffer(index_buffer.slice(..), index_format(b.flags()));
                    rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
                }
            }
        }
    }

    fn queue_clear(&mut self, op: &'static str, surface: SurfaceId, command: Queued) -> Result<(), GraphicsError> {
        check_surface(op, surface)?;
        self.queued.push(command);
        Ok(())
    }
}

impl GraphicsBackend for WgpuBackend {
    fn forward_axis(&self) -> Vec3 {
        // wgpu clip space depth grows away from the viewer.
        Vec3::new(0.0, 0.0, 1.0)
    }

    fn add_draw_batch(&mut self, flags: VertexFlags, initial_size: u32) -> Result<BatchId, GraphicsError> {
        let id = self.store.add(flags, initial_size);
        self.gpu_batches.push(GpuBatch::default());
        Ok(id)
    }

    fn add_renderer(&mut self, flags: VertexFlags, shader: &ShaderSource) -> Result<RendererId, GraphicsError> {
        const OP: &str = "add_renderer";
        let renderer = Renderer::new(flags, shader.clone(), Some(wgpu::BlendState::ALPHA_BLENDING))
            .map_err(|e| GraphicsError::backend(OP, e))?;

        let id = RendererId(self.renderers.len() as u32);
        self.renderers.push(renderer);
        log::debug!("{id}: registered shader '{}'", shader.label);
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
        self.queue_clear("clear_surface", surface, Queued::Clear(color))
    }

    fn clear_surface_area(&mut self, surface: SurfaceId, color: ColorRgba, area: Rect) -> Result<(), GraphicsError> {
        self.queue_clear("clear_surface_area", surface, Queued::ClearArea(color, area))
    }

    fn draw_batch(
        &mut self,
        batch: BatchId,
        surface: SurfaceId,
        renderer: RendererId,
        force_redraw: bool,
    ) -> Result<(), GraphicsError> {
        let renderer_flags = self.renderers.get(renderer.0 as usize).map(|r| r.flags);
        self.store.check_draw(batch, surface, renderer, renderer_flags)?;

        self.queued.push(Queued::Draw { batch, renderer, force_redraw });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeBatch;

    #[test]
    fn default_shader_declares_entry_points() {
        let shader = default_shader();
        assert!(shader.wgsl.contains("fn vs_main"));
        assert!(shader.wgsl.contains("fn fs_main"));
        assert!(shader.wgsl.contains("@location(3) color"));
    }

    #[test]
    fn unsupported_renderer_layout_is_rejected() {
        let mut backend = WgpuBackend::default();
        let err = backend.add_renderer(VertexFlags::COL_8, &default_shader()).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::Backend { op: "add_renderer", source: BackendError::UnsupportedLayout { .. } }
        ));
    }

    #[test]
    fn draws_queue_until_flush() {
        let mut backend = WgpuBackend::default();
        let batch = backend.add_draw_batch(DEFAULT_LAYOUT, 16).unwrap();
        let renderer = backend.add_renderer(DEFAULT_LAYOUT, &default_shader()).unwrap();
        backend.add_triangle(batch, [Vertex::default(); 3]).unwrap();

        backend.draw_batch(batch, SurfaceId::WINDOW, renderer, false).unwrap();
        backend.draw_batch(batch, SurfaceId::WINDOW, renderer, true).unwrap();
        assert_eq!(backend.queued_draws(), 2);
    }

    #[test]
    fn incompatible_draw_is_not_queued() {
        let mut backend = WgpuBackend::default();
        let batch = backend.add_draw_batch(DEFAULT_LAYOUT | VertexFlags::LINES, 16).unwrap();
        let renderer = backend.add_renderer(DEFAULT_LAYOUT, &default_shader()).unwrap();
        assert!(backend.draw_batch(batch, SurfaceId::WINDOW, renderer, false).is_err());
        assert!(backend.draw_batch(batch, SurfaceId(1), renderer, false).is_err());
        assert_eq!(backend.queued_draws(), 0);
    }

    // ── clears ────────────────────────────────────────────────────────────

    #[test]
    fn clears_queue_in_issue_order() {
        let mut backend = WgpuBackend::default();
        let batch = backend.add_draw_batch(DEFAULT_LAYOUT, 16).unwrap();
        let renderer = backend.add_renderer(DEFAULT_LAYOUT, &default_shader()).unwrap();
        let area = Rect::new(1.0, 2.0, 3.0, 4.0);

        backend.clear_surface(SurfaceId::WINDOW, ColorRgba::black()).unwrap();
        backend.draw_batch(batch, SurfaceId::WINDOW, renderer, false).unwrap();
        backend.clear_surface_area(SurfaceId::WINDOW, ColorRgba::white(), area).unwrap();

        assert_eq!(
            backend.queued,
            vec![
                Queued::Clear(ColorRgba::black()),
                Queued::Draw { batch, renderer, force_redraw: false },
                Queued::ClearArea(ColorRgba::white(), area),
            ]
        );
        assert_eq!(backend.queued_draws(), 1);

        backend.discard_queued();
        assert!(backend.queued.is_empty());
    }

    #[test]
    fn clear_of_unknown_surface_is_not_queued() {
        let mut backend = WgpuBackend::default();
        let err = backend.clear_surface_area(SurfaceId(3), ColorRgba::white(), Rect::default()).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::Backend { op: "clear_surface_area", source: BackendError::UnknownSurface(SurfaceId(3)) }
        ));
        assert!(backend.clear_surface(SurfaceId(3), ColorRgba::white()).is_err());
        assert!(backend.queued.is_empty());
    }

    #[test]
    fn area_fill_covers_the_rect() {
        let color = ColorRgba::new(0.25, 0.5, 0.75, 1.0);
        let bytes = area_vertices(color, Rect::new(2.0, 3.0, 4.0, 5.0));
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        // (x, y, r, g, b, a) per vertex.
        assert_eq!(floats.len(), 6 * 6);
        let positions: Vec<[f32; 2]> = floats.chunks_exact(6).map(|v| [v[0], v[1]]).collect();
        assert_eq!(
            positions,
            vec![[2.0, 3.0], [6.0, 3.0], [6.0, 8.0], [6.0, 8.0], [2.0, 8.0], [2.0, 3.0]]
        );
        assert!(floats.chunks_exact(6).all(|v| v[2..] == [0.25, 0.5, 0.75, 1.0]));
    }
}
