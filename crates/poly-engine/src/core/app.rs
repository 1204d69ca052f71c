use winit::event::WindowEvent;

use crate::input::InputEvent;
use crate::render::WgpuBackend;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract.
pub trait App {
    /// Called once the window and GPU exist, before the first frame.
    /// Create batches and renderers here.
    fn on_start(&mut self, graphics: &mut WgpuBackend) -> anyhow::Result<()> {
        let _ = graphics;
        Ok(())
    }

    /// Raw window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Translated input events, after input state was updated.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
