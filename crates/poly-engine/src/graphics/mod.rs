//! Backend boundary.
//!
//! Everything above this module (the tessellator, applications) talks to a
//! [`GraphicsBackend`] trait object; everything below (batch storage, GPU
//! upload) implements it.

mod backend;
mod error;
mod ids;
mod shape;

pub use backend::{GraphicsBackend, ShaderSource};
pub use error::{BackendError, ErrorList, GraphicsError};
pub use ids::{BatchId, RendererId, SurfaceId};
pub use shape::{ShapeDims, ShapeHandle, ShapePrototype};
