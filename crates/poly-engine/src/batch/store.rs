use std::collections::BTreeMap;

use crate::buffer::{FreeList, Zone};
use crate::graphics::{
    BackendError, BatchId, GraphicsError, RendererId, ShapeHandle, ShapePrototype, SurfaceId,
};
use crate::vertex::{IndexWidth, Vertex, VertexFlags, pack_vertex};

/// Sizing policy for new batches.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Index slots reserved per vertex slot when a batch is created.
    pub indices_per_vertex: u32,

    /// Hard ceiling on vertex capacity. 16-bit batches are further capped at 65 536.
    pub max_vertices: u32,

    /// Hard ceiling on index capacity.
    pub max_indices: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            indices_per_vertex: 3,
            max_vertices: 1 << 22,
            max_indices: 1 << 24,
        }
    }
}

/// One growable linear buffer and its free space.
#[derive(Debug, Clone)]
struct Region {
    capacity: u32,
    limit: u32,
    free: FreeList,
}

impl Region {
    fn new(capacity: u32, limit: u32) -> Self {
        let capacity = capacity.min(limit);
        Self { capacity, limit, free: FreeList::with_capacity(capacity) }
    }

    /// First-fit acquire; on exhaustion grows once and retries.
    fn acquire(&mut self, size: u32) -> Zone {
        let zone = self.free.acquire(size);
        if !zone.is_empty() || !self.grow(size) {
            return zone;
        }
        self.free.acquire(size)
    }

    fn grow(&mut self, request: u32) -> bool {
        let target = self
            .capacity
            .saturating_mul(2)
            .max(self.capacity.saturating_add(request))
            .min(self.limit);
        if target <= self.capacity {
            return false;
        }
        self.free.release(Zone::new(self.capacity, target));
        self.capacity = target;
        true
    }

    fn reset(&mut self) {
        self.free = FreeList::with_capacity(self.capacity);
    }

    /// End of the last element in use; trailing free space is excluded.
    fn extent(&self) -> u32 {
        match self.free.last() {
            Some(z) if z.end == self.capacity => z.start,
            _ => self.capacity,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LiveShape {
    vertex_zone: Zone,
    index_zone: Zone,
    hidden: bool,
}

/// CPU-side vertex and index storage for one batch.
///
/// Vertices are stored packed per the batch's [`VertexFlags`]; indices are
/// stored as absolute `u32` vertex positions and narrowed on export.
/// Every mutation bumps [`revision`](Self::revision) so uploaders can skip
/// unchanged batches.
#[derive(Debug, Clone)]
pub struct Batch {
    id: BatchId,
    flags: VertexFlags,
    stride: usize,

    vertices: Vec<u8>,
    indices: Vec<u32>,
    vertex_region: Region,
    index_region: Region,

    /// Live shapes keyed by index zone start.
    shapes: BTreeMap<u32, LiveShape>,
    revision: u64,
}

impl Batch {
    fn new(id: BatchId, flags: VertexFlags, initial_size: u32, config: &BatchConfig) -> Self {
        let vertex_limit = config.max_vertices.min(flags.index_width().max_vertices());
        let vertex_region = Region::new(initial_size, vertex_limit);
        let index_region = Region::new(
            vertex_region.capacity.saturating_mul(config.indices_per_vertex),
            config.max_indices,
        );
        let stride = flags.stride() as usize;

        Self {
            id,
            flags,
            stride,
            vertices: vec![0; vertex_region.capacity as usize * stride],
            indices: vec![0; index_region.capacity as usize],
            vertex_region,
            index_region,
            shapes: BTreeMap::new(),
            revision: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> BatchId {
        self.id
    }

    #[inline]
    pub fn flags(&self) -> VertexFlags {
        self.flags
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn vertex_capacity(&self) -> u32 {
        self.vertex_region.capacity
    }

    #[inline]
    pub fn index_capacity(&self) -> u32 {
        self.index_region.capacity
    }

    #[inline]
    pub fn free_vertices(&self) -> &FreeList {
        &self.vertex_region.free
    }

    #[inline]
    pub fn free_indices(&self) -> &FreeList {
        &self.index_region.free
    }

    #[inline]
    pub fn live_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Packed vertex data for the whole capacity.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    /// Absolute vertex indices for the whole capacity (zero where unused).
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Packed bytes of one vertex of `shape`.
    pub fn vertex_slot(&self, shape: &ShapeHandle, local: u32) -> Option<&[u8]> {
        if local >= shape.vertex_count() {
            return None;
        }
        let at = (shape.vertex_zone.start + local) as usize * self.stride;
        self.vertices.get(at..at + self.stride)
    }

    /// Number of indices a draw must cover; trailing free space is skipped.
    #[inline]
    pub fn index_extent(&self) -> u32 {
        self.index_region.extent()
    }

    pub fn is_hidden(&self, shape: &ShapeHandle) -> Option<bool> {
        self.live(shape).ok().map(|s| s.hidden)
    }

    /// Index data in the batch's index width, up to [`index_extent`](Self::index_extent).
    ///
    /// Hidden shapes export as zeros, which collapse into degenerate primitives.
    pub fn index_bytes(&self) -> Vec<u8> {
        let extent = self.index_extent() as usize;
        let mut out: Vec<u32> = self.indices[..extent].to_vec();
        for s in self.shapes.values().filter(|s| s.hidden) {
            out[s.index_zone.range()].fill(0);
        }

        match self.flags.index_width() {
            IndexWidth::U32 => bytemuck::cast_slice(&out).to_vec(),
            IndexWidth::U16 => {
                let narrow: Vec<u16> = out.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
        }
    }

    fn stale(&self, shape: &ShapeHandle) -> BackendError {
        BackendError::StaleShape { batch: self.id, index_zone: shape.index_zone }
    }

    fn live(&self, shape: &ShapeHandle) -> Result<&LiveShape, BackendError> {
        match self.shapes.get(&shape.index_zone.start) {
            Some(s) if s.vertex_zone == shape.vertex_zone && s.index_zone == shape.index_zone => Ok(s),
            _ => Err(self.stale(shape)),
        }
    }

    fn live_mut(&mut self, shape: &ShapeHandle) -> Result<&mut LiveShape, BackendError> {
        let stale = self.stale(shape);
        match self.shapes.get_mut(&shape.index_zone.start) {
            Some(s) if s.vertex_zone == shape.vertex_zone && s.index_zone == shape.index_zone => Ok(s),
            _ => Err(stale),
        }
    }

    fn sync_storage(&mut self) {
        let vertex_bytes = self.vertex_region.capacity as usize * self.stride;
        if self.vertices.len() != vertex_bytes {
            log::debug!("{}: vertex capacity grown to {}", self.id, self.vertex_region.capacity);
            self.vertices.resize(vertex_bytes, 0);
        }
        let index_len = self.index_region.capacity as usize;
        if self.indices.len() != index_len {
            log::debug!("{}: index capacity grown to {}", self.id, self.index_region.capacity);
            self.indices.resize(index_len, 0);
        }
    }

    pub(crate) fn allocate(&mut self, prototype: &ShapePrototype) -> Result<ShapeHandle, GraphicsError> {
        const OP: &str = "allocate_shape";

        let dims = prototype.dims();
        if dims.vertices == 0 || dims.indices == 0 {
            return Err(GraphicsError::invalid_shape(OP, format!("shape needs vertices and indices, got {dims}")));
        }
        if let Some(&index) = prototype.indexes.iter().find(|&&i| i >= dims.vertices) {
            return Err(GraphicsError::backend(
                OP,
                BackendError::IndexOutOfRange { index, vertex_count: dims.vertices },
            ));
        }

        let exhausted = GraphicsError::AllocationExhausted { op: OP, batch: self.id, requested: dims };

        let vertex_zone = self.vertex_region.acquire(dims.vertices);
        if vertex_zone.is_empty() {
            return Err(exhausted);
        }
        let index_zone = self.index_region.acquire(dims.indices);
        if index_zone.is_empty() {
            self.vertex_region.free.release(vertex_zone);
            self.sync_storage();
            return Err(exhausted);
        }
        self.sync_storage();

        for (slot, &local) in self.indices[index_zone.range()].iter_mut().zip(&prototype.indexes) {
            *slot = vertex_zone.start + local;
        }

        self.shapes.insert(index_zone.start, LiveShape { vertex_zone, index_zone, hidden: false });
        self.revision += 1;

        Ok(ShapeHandle { batch: self.id, vertex_zone, index_zone })
    }

    pub(crate) fn write_vertex(&mut self, shape: &ShapeHandle, local: u32, vertex: &Vertex) -> Result<(), GraphicsError> {
        const OP: &str = "update_vertex";

        self.live(shape).map_err(|e| GraphicsError::backend(OP, e))?;
        let count = shape.vertex_count();
        if local >= count {
            return Err(GraphicsError::backend(OP, BackendError::VertexOutOfRange { local, count }));
        }

        let at = (shape.vertex_zone.start + local) as usize * self.stride;
        pack_vertex(self.flags, vertex, &mut self.vertices[at..at + self.stride]);
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn set_hidden(&mut self, shape: &ShapeHandle, hidden: bool) -> Result<(), GraphicsError> {
        let op = if hidden { "hide_shape" } else { "show_shape" };
        let live = self.live_mut(shape).map_err(|e| GraphicsError::backend(op, e))?;
        if live.hidden != hidden {
            live.hidden = hidden;
            self.revision += 1;
        }
        Ok(())
    }

    pub(crate) fn delete(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.live(shape).map_err(|e| GraphicsError::backend("delete_shape", e))?;
        self.shapes.remove(&shape.index_zone.start);

        self.indices[shape.index_zone.range()].fill(0);
        self.vertex_region.free.release(shape.vertex_zone);
        self.index_region.free.release(shape.index_zone);
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.shapes.clear();
        self.indices.fill(0);
        self.vertex_region.reset();
        self.index_region.reset();
        self.revision += 1;
    }

    /// Checks that `renderer_flags` can draw this batch.
    pub(crate) fn check_renderer(
        &self,
        renderer: RendererId,
        renderer_flags: VertexFlags,
    ) -> Result<(), GraphicsError> {
        if self.flags.same_attributes(renderer_flags) && self.flags.same_uniforms(renderer_flags) {
            Ok(())
        } else {
            Err(GraphicsError::backend(
                "draw_batch",
                BackendError::IncompatibleRenderer { batch: self.id, renderer },
            ))
        }
    }
}

/// Every batch owned by a backend, indexed by [`BatchId`].
#[derive(Debug, Default)]
pub struct BatchStore {
    config: BatchConfig,
    batches: Vec<Batch>,
}

impl BatchStore {
    pub fn new(config: BatchConfig) -> Self {
        Self { config, batches: Vec::new() }
    }

    pub fn add(&mut self, flags: VertexFlags, initial_size: u32) -> BatchId {
        let id = BatchId(self.batches.len() as u32);
        let batch = Batch::new(id, flags, initial_size, &self.config);
        log::debug!(
            "{id}: created (stride {} bytes, {} vertices, {} indices)",
            flags.stride(),
            batch.vertex_capacity(),
            batch.index_capacity()
        );
        self.batches.push(batch);
        id
    }

    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter()
    }

    pub(crate) fn batch(&self, id: BatchId, op: &'static str) -> Result<&Batch, GraphicsError> {
        self.get(id)
            .ok_or_else(|| GraphicsError::backend(op, BackendError::UnknownBatch(id)))
    }

    pub(crate) fn batch_mut(&mut self, id: BatchId, op: &'static str) -> Result<&mut Batch, GraphicsError> {
        self.batches
            .get_mut(id.0 as usize)
            .ok_or_else(|| GraphicsError::backend(op, BackendError::UnknownBatch(id)))
    }

    // ── backend operations ────────────────────────────────────────────────

    pub(crate) fn allocate_shape(&mut self, batch: BatchId, prototype: &ShapePrototype) -> Result<ShapeHandle, GraphicsError> {
        self.batch_mut(batch, "allocate_shape")?.allocate(prototype)
    }

    pub(crate) fn update_vertex(&mut self, shape: &ShapeHandle, local: u32, vertex: &Vertex) -> Result<(), GraphicsError> {
        self.batch_mut(shape.batch, "update_vertex")?.write_vertex(shape, local, vertex)
    }

    pub(crate) fn hide_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.batch_mut(shape.batch, "hide_shape")?.set_hidden(shape, true)
    }

    pub(crate) fn show_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.batch_mut(shape.batch, "show_shape")?.set_hidden(shape, false)
    }

    pub(crate) fn delete_shape(&mut self, shape: &ShapeHandle) -> Result<(), GraphicsError> {
        self.batch_mut(shape.batch, "delete_shape")?.delete(shape)
    }

    pub(crate) fn clear_batch(&mut self, batch: BatchId) -> Result<(), GraphicsError> {
        self.batch_mut(batch, "clear_batch")?.clear();
        Ok(())
    }

    /// Validates a `draw_batch` call. `renderer_flags` is `None` when the
    /// backend does not know `renderer`.
    pub(crate) fn check_draw(
        &self,
        batch: BatchId,
        surface: SurfaceId,
        renderer: RendererId,
        renderer_flags: Option<VertexFlags>,
    ) -> Result<&Batch, GraphicsError> {
        const OP: &str = "draw_batch";
        let renderer_flags =
            renderer_flags.ok_or_else(|| GraphicsError::backend(OP, BackendError::UnknownRenderer(renderer)))?;
        let b = self.batch(batch, OP)?;
        check_surface(OP, surface)?;
        b.check_renderer(renderer, renderer_flags)?;
        Ok(b)
    }
}

/// Only the window surface exists.
pub(crate) fn check_surface(op: &'static str, surface: SurfaceId) -> Result<(), GraphicsError> {
    if surface == SurfaceId::WINDOW {
        Ok(())
    } else {
        Err(GraphicsError::backend(op, BackendError::UnknownSurface(surface)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BatchStore {
        BatchStore::new(BatchConfig::default())
    }

    fn words(bytes: &[u8]) -> Vec<u32> {
        bytes.chunks_exact(4).map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]])).collect()
    }

    fn tri() -> ShapePrototype {
        ShapePrototype::new(3, vec![0, 1, 2])
    }

    // ── allocate ──────────────────────────────────────────────────────────

    #[test]
    fn allocate_writes_absolute_indices() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 16);
        let b = s.batch_mut(id, "test").unwrap();

        let first = b.allocate(&tri()).unwrap();
        let second = b.allocate(&tri()).unwrap();

        assert_eq!(first.vertex_zone, Zone::new(0, 3));
        assert_eq!(second.vertex_zone, Zone::new(3, 6));
        assert_eq!(&b.indices()[second.index_zone.range()], &[3, 4, 5]);
        assert_eq!(b.live_shapes(), 2);
    }

    #[test]
    fn allocate_grows_when_exhausted() {
        let mut s = store();
        let id = s.add(VertexFlags::COL_32, 4);
        let b = s.batch_mut(id, "test").unwrap();

        b.allocate(&tri()).unwrap();
        let grown = b.allocate(&tri()).unwrap();

        assert_eq!(grown.vertex_zone, Zone::new(3, 6));
        assert_eq!(b.vertex_capacity(), 8);
        assert_eq!(b.vertex_bytes().len(), 8 * VertexFlags::COL_32.stride() as usize);
    }

    #[test]
    fn allocate_past_hard_limit_is_exhausted() {
        let config = BatchConfig { max_vertices: 4, ..BatchConfig::default() };
        let mut s = BatchStore::new(config);
        let id = s.add(VertexFlags::default(), 4);
        let b = s.batch_mut(id, "test").unwrap();

        b.allocate(&tri()).unwrap();
        let err = b.allocate(&tri()).unwrap_err();
        assert!(matches!(err, GraphicsError::AllocationExhausted { op: "allocate_shape", .. }));
        // The failed request leaves the free list untouched.
        assert_eq!(b.free_vertices().zones(), &[Zone::new(3, 4)]);
    }

    #[test]
    fn sixteen_bit_batches_cap_vertex_capacity() {
        let mut s = store();
        let id = s.add(VertexFlags::IDX_16, 100_000);
        assert_eq!(s.get(id).unwrap().vertex_capacity(), 65_536);
    }

    #[test]
    fn allocate_rejects_out_of_range_topology() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 8);
        let b = s.batch_mut(id, "test").unwrap();
        let err = b.allocate(&ShapePrototype::new(3, vec![0, 1, 3])).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::Backend { source: BackendError::IndexOutOfRange { index: 3, .. }, .. }
        ));
        assert_eq!(b.revision(), 0);
    }

    #[test]
    fn allocate_rejects_empty_shape() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 8);
        let b = s.batch_mut(id, "test").unwrap();
        assert!(matches!(
            b.allocate(&ShapePrototype::new(0, vec![])),
            Err(GraphicsError::InvalidShape { .. })
        ));
    }

    // ── delete / hide / clear ─────────────────────────────────────────────

    #[test]
    fn delete_releases_and_zeroes() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 16);
        let b = s.batch_mut(id, "test").unwrap();

        let a = b.allocate(&tri()).unwrap();
        let c = b.allocate(&tri()).unwrap();
        b.delete(&a).unwrap();

        assert_eq!(&b.indices()[a.index_zone.range()], &[0, 0, 0]);
        assert_eq!(b.free_vertices().zones(), &[Zone::new(0, 3), Zone::new(6, 16)]);

        // A deleted handle is stale.
        assert!(b.delete(&a).is_err());
        assert!(b.write_vertex(&a, 0, &Vertex::default()).is_err());

        // Freed space is reused first-fit.
        let d = b.allocate(&tri()).unwrap();
        assert_eq!(d.vertex_zone, a.vertex_zone);
        assert_ne!(d.vertex_zone, c.vertex_zone);
    }

    #[test]
    fn hidden_shapes_export_degenerate_indices() {
        let mut s = store();
        let id = s.add(VertexFlags::IDX_32, 16);
        let b = s.batch_mut(id, "test").unwrap();

        b.allocate(&tri()).unwrap();
        let second = b.allocate(&tri()).unwrap();
        b.set_hidden(&second, true).unwrap();

        assert_eq!(words(&b.index_bytes()), vec![0, 1, 2, 0, 0, 0]);

        b.set_hidden(&second, false).unwrap();
        assert_eq!(words(&b.index_bytes()), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn sixteen_bit_export_narrows() {
        let mut s = store();
        let id = s.add(VertexFlags::IDX_16, 16);
        let b = s.batch_mut(id, "test").unwrap();
        b.allocate(&tri()).unwrap();
        assert_eq!(b.index_bytes().len(), 6);
    }

    #[test]
    fn clear_resets_free_space() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 8);
        let b = s.batch_mut(id, "test").unwrap();
        let a = b.allocate(&tri()).unwrap();
        b.clear();

        assert_eq!(b.live_shapes(), 0);
        assert_eq!(b.free_vertices().zones(), &[Zone::new(0, 8)]);
        assert_eq!(b.index_extent(), 0);
        assert!(b.write_vertex(&a, 0, &Vertex::default()).is_err());
    }

    #[test]
    fn write_vertex_checks_local_range() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 8);
        let b = s.batch_mut(id, "test").unwrap();
        let a = b.allocate(&tri()).unwrap();
        let err = b.write_vertex(&a, 3, &Vertex::default()).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::Backend { source: BackendError::VertexOutOfRange { local: 3, count: 3 }, .. }
        ));
    }

    #[test]
    fn unknown_batch_is_reported() {
        let mut s = store();
        assert!(matches!(
            s.batch_mut(BatchId(7), "clear_batch"),
            Err(GraphicsError::Backend { op: "clear_batch", source: BackendError::UnknownBatch(BatchId(7)) })
        ));
    }

    // ── store operations ──────────────────────────────────────────────────

    #[test]
    fn store_operations_name_the_failing_operation() {
        let mut s = store();
        let id = s.add(VertexFlags::default(), 8);
        let shape = s.allocate_shape(id, &tri()).unwrap();
        s.hide_shape(&shape).unwrap();
        assert_eq!(s.get(id).unwrap().is_hidden(&shape), Some(true));
        s.show_shape(&shape).unwrap();
        s.update_vertex(&shape, 2, &Vertex::default()).unwrap();
        s.delete_shape(&shape).unwrap();

        let ops: Vec<&str> = [
            s.update_vertex(&shape, 0, &Vertex::default()),
            s.hide_shape(&shape),
            s.show_shape(&shape),
            s.delete_shape(&shape),
            s.clear_batch(BatchId(3)),
        ]
        .into_iter()
        .map(|r| match r {
            Err(GraphicsError::Backend { op, .. }) => op,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
        assert_eq!(ops, vec!["update_vertex", "hide_shape", "show_shape", "delete_shape", "clear_batch"]);
        assert!(matches!(
            s.allocate_shape(BatchId(3), &tri()),
            Err(GraphicsError::Backend { op: "allocate_shape", .. })
        ));
    }

    #[test]
    fn check_draw_validates_renderer_batch_and_surface() {
        let mut s = store();
        let id = s.add(VertexFlags::COL_FA, 8);
        let flags = Some(VertexFlags::COL_FA);

        assert!(s.check_draw(id, SurfaceId::WINDOW, RendererId(0), flags).is_ok());
        assert!(matches!(
            s.check_draw(id, SurfaceId::WINDOW, RendererId(2), None),
            Err(GraphicsError::Backend { source: BackendError::UnknownRenderer(RendererId(2)), .. })
        ));
        assert!(matches!(
            s.check_draw(id, SurfaceId(1), RendererId(0), flags),
            Err(GraphicsError::Backend { source: BackendError::UnknownSurface(SurfaceId(1)), .. })
        ));
        assert!(matches!(
            s.check_draw(id, SurfaceId::WINDOW, RendererId(0), Some(VertexFlags::COL_32)),
            Err(GraphicsError::Backend { source: BackendError::IncompatibleRenderer { .. }, .. })
        ));
    }
}
