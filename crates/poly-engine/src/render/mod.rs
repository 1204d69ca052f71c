//! GPU rendering of batches.
//!
//! [`WgpuBackend`] implements the backend boundary over wgpu. Batch storage is
//! shared with the headless backend; this module adds the GPU side:
//! - vertex layouts mapped to wgpu vertex attributes (see [`vertex_attributes`])
//! - one pipeline per renderer, built lazily for the surface format
//! - uploads of changed batches and one indexed draw per queued `draw_batch`
//! - surface clears, whole or by area, recorded in issue order with the draws
//!
//! Pipelines bind a viewport uniform (`vec2<f32>` logical size + padding) at
//! group 0, binding 0.

mod ctx;
mod layout;
mod wgpu_backend;

pub use ctx::{RenderCtx, RenderTarget};
pub use layout::{
    COLOR_LOCATION, EXTRA_LOCATION, NORMAL_LOCATION, POSITION_LOCATION, UV_LOCATION, index_format,
    topology, vertex_attributes,
};
pub use wgpu_backend::{DEFAULT_LAYOUT, WgpuBackend, default_shader};
pub(crate) use wgpu_backend::wgpu_color;
