//! Vertex records and the bit-flag layout codec.
//!
//! [`Vertex`] is the logical, full-precision record the tessellator produces.
//! [`VertexFlags`] describes how a batch stores it; [`pack_vertex`] performs
//! the truncation/quantization into the batch's byte layout.

mod flags;
mod pack;
mod record;

pub use flags::{CameraMode, ColorFormat, DrawMode, IndexWidth, VertexFlags};
pub use pack::pack_vertex;
pub use record::{Vertex, VertexExtra, NO_EXTRA};
