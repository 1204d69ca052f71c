use winit::window::Window;

use crate::coords::{ColorRgba, Vec2};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::platform::Platform;
use crate::render::{RenderCtx, RenderTarget, WgpuBackend, wgpu_color};
use crate::time::FrameTime;

use super::app::AppControl;

/// The window being drawn.
pub struct WindowCtx<'a> {
    pub(crate) window: &'a Window,
    pub(crate) close_requested: bool,
}

impl<'a> WindowCtx<'a> {
    pub(crate) fn new(window: &'a Window) -> Self {
        Self { window, close_requested: false }
    }

    /// Drawable size in logical pixels.
    pub fn logical_size(&self) -> Vec2 {
        let logical = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        Vec2::new(logical.width as f32, logical.height as f32)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    pub fn title(&self) -> String {
        self.window.title()
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Closes the window after this frame, which ends the runtime.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub graphics: &'a mut WgpuBackend,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub platform: Platform<'a>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface, records every draw queued with `draw_batch` and
    /// presents the frame.
    ///
    /// Skipped frames (minimized window, lost surface) discard queued draws.
    pub fn present(&mut self, clear: ColorRgba) -> AppControl {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            self.graphics.discard_queued();
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface error: {err}");
                self.graphics.discard_queued();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("unrecoverable surface error");
                        AppControl::Exit
                    }
                    _ => AppControl::Continue,
                };
            }
        };

        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("poly clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu_color(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.logical_size(),
        );

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.graphics.flush(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
