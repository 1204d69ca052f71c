//! Single-window winit runtime.
//!
//! Owns the window, its GPU surface, the [`WgpuBackend`](crate::render::WgpuBackend)
//! and input state, and drives a [`core::App`](crate::core::App) once per redraw.

mod runtime;
mod translate;

pub use runtime::{Runtime, RuntimeConfig};
