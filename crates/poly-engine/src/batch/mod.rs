//! Batch storage.
//!
//! A batch is one vertex buffer and one index buffer sharing a layout. Shapes
//! occupy zones of both buffers; the free space of each buffer is tracked by a
//! [`FreeList`](crate::buffer::FreeList). Both backends share this storage:
//! [`MemoryBackend`] keeps it in host memory only, the GPU backend uploads it.

mod memory;
mod store;

pub use memory::{DrawRecord, MemoryBackend, SurfaceCommand};
pub use store::{Batch, BatchConfig, BatchStore};
pub(crate) use store::check_surface;
