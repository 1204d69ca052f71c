use std::fmt;

use crate::buffer::Zone;

use super::BatchId;

/// Vertex and index counts of a shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShapeDims {
    pub vertices: u32,
    pub indices: u32,
}

impl ShapeDims {
    #[inline]
    pub const fn new(vertices: u32, indices: u32) -> Self {
        Self { vertices, indices }
    }
}

impl fmt::Display for ShapeDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vertices / {} indices", self.vertices, self.indices)
    }
}

/// Topology submitted when allocating a shape.
///
/// `indexes` are local: `0` is the shape's first vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapePrototype {
    pub vertex_count: u32,
    pub indexes: Vec<u32>,
}

impl ShapePrototype {
    #[inline]
    pub fn new(vertex_count: u32, indexes: Vec<u32>) -> Self {
        Self { vertex_count, indexes }
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indexes.len() as u32
    }

    #[inline]
    pub fn dims(&self) -> ShapeDims {
        ShapeDims::new(self.vertex_count, self.index_count())
    }
}

/// Non-owning reference to a shape's zones inside a batch.
///
/// Returned by allocation and required by every later update, hide, show or
/// delete. The counts are the zone lengths and never change while the handle
/// is live.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShapeHandle {
    pub batch: BatchId,
    pub vertex_zone: Zone,
    pub index_zone: Zone,
}

impl ShapeHandle {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_zone.len()
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_zone.len()
    }

    #[inline]
    pub fn dims(&self) -> ShapeDims {
        ShapeDims::new(self.vertex_count(), self.index_count())
    }
}
