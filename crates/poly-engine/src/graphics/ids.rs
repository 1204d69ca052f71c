use std::fmt;

/// Batch handle issued by [`GraphicsBackend::add_draw_batch`](super::GraphicsBackend::add_draw_batch).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BatchId(pub u32);

/// Renderer handle issued by [`GraphicsBackend::add_renderer`](super::GraphicsBackend::add_renderer).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RendererId(pub u32);

/// Render target handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// The window framebuffer.
    pub const WINDOW: SurfaceId = SurfaceId(0);
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "renderer#{}", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}
