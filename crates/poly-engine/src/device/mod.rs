//! GPU device and window surface.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - configures the window Surface and keeps it sized
//! - hands out one frame (surface view + encoder) at a time

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
