//! Batched 2D shape graphics.
//!
//! Shapes are tessellated into a fixed topology, allocated into zones of a
//! batch's vertex and index buffers, and written one vertex at a time through
//! a [`GraphicsBackend`](graphics::GraphicsBackend). Allocation, layout
//! encoding and tessellation are pure; backends own the buffers.
//!
//! - [`buffer`] zone allocator
//! - [`vertex`] vertex layout flags and packing
//! - [`shapes`] tessellator, available on every backend via [`shapes::ShapeBatch`]
//! - [`batch`] shared batch storage and the headless [`batch::MemoryBackend`]
//! - [`render`] the wgpu backend; [`window`] and [`core`] drive it from a winit window

pub mod batch;
pub mod buffer;
pub mod coords;
pub mod graphics;
pub mod shapes;
pub mod vertex;

pub mod core;
pub mod device;
pub mod input;
pub mod platform;
pub mod render;
pub mod time;
pub mod window;

pub mod logging;
