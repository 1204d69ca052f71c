use std::path::PathBuf;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::batch::BatchConfig;
use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{InputFrame, InputState};
use crate::platform::{Platform, Providers};
use crate::render::WgpuBackend;
use crate::time::FrameClock;

use super::translate::translate_window_event;

/// Window and backend configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub batch: BatchConfig,
    /// Root of the application's [`FileStore`](crate::platform::FileStore).
    pub file_root: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "poly".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
            batch: BatchConfig::default(),
            file_root: PathBuf::from("."),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` with the system clipboard and files under `config.file_root`.
    pub fn run<A: App + 'static>(config: RuntimeConfig, app: A) -> Result<()> {
        let providers = Providers::system(config.file_root.clone());
        Self::run_with(config, providers, app)
    }

    /// Runs `app` until its window closes or it returns [`AppControl::Exit`].
    pub fn run_with<A: App + 'static>(config: RuntimeConfig, providers: Providers, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, providers, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A: App + 'static> {
    config: RuntimeConfig,
    app: A,
    graphics: WgpuBackend,
    providers: Providers,

    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    entry: Option<WindowEntry>,
    started: bool,
    exit_requested: bool,
    /// First fatal error, returned from [`Runtime::run_with`].
    error: Option<anyhow::Error>,
}

impl<A: App + 'static> RuntimeState<A> {
    fn new(config: RuntimeConfig, providers: Providers, app: A) -> Self {
        Self {
            graphics: WgpuBackend::new(config.batch.clone()),
            config,
            app,
            providers,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            entry: None,
            started: false,
            exit_requested: false,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.request_exit(event_loop);
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        // Drop the surface before the window goes away.
        self.entry = None;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = self.config.gpu.clone();

        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let time = self.clock.tick();

        let Self { app, graphics, providers, input_state, input_frame, entry, .. } = self;
        let Some(entry) = entry.as_mut() else { return };
        let input: &InputState = input_state;

        let (control, close) = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx::new(fields.window),
                gpu: fields.gpu,
                graphics,
                input,
                input_frame: &*input_frame,
                platform: Platform {
                    keyboard: input,
                    mouse: input,
                    clipboard: providers.clipboard.as_mut(),
                    files: providers.files.as_ref(),
                },
                time,
            };
            let control = app.on_frame(&mut ctx);
            (control, ctx.window.close_requested())
        });

        input_frame.clear();

        if control == AppControl::Exit || close {
            log::debug!("application requested exit at frame {}", time.frame_index);
            self.request_exit(event_loop);
        }
    }
}

impl<A: App + 'static> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        let entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(err) => return self.fail(event_loop, err),
        };

        if !self.started {
            self.started = true;
            if let Err(err) = self.app.on_start(&mut self.graphics) {
                return self.fail(event_loop, err.context("application start failed"));
            }
        }

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.clock.reset();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Surfaces are invalid while suspended; batches stay in host memory.
        self.entry = None;
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(entry) = &self.entry else { return };
        let translated = entry.with_window(|w| translate_window_event(w, &self.input_state, &event));

        if self.app.on_window_event(&event) == AppControl::Exit {
            return self.request_exit(event_loop);
        }

        if let Some(ev) = translated {
            self.input_state.apply_event(&mut self.input_frame, ev.clone());
            if self.app.on_input(&ev) == AppControl::Exit {
                return self.request_exit(event_loop);
            }
        }

        match event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
