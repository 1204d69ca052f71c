//! Draws every shape kind through the wgpu backend and animates them.
//!
//! Keys: Space hides/shows the still shapes, Ctrl+C copies the batch stats,
//! F2 saves them to `poly-demo-stats.txt`, Escape quits.

use std::f32::consts::TAU;
use std::path::Path;

use anyhow::{Context, Result};
use poly_engine::coords::{ColorRgba, Quad, Rect, Vec2};
use poly_engine::core::{App, AppControl, FrameCtx};
use poly_engine::graphics::{BatchId, GraphicsBackend, RendererId, ShapeHandle, SurfaceId};
use poly_engine::input::{ButtonState, InputEvent, Key};
use poly_engine::logging::{LoggingConfig, init_logging};
use poly_engine::render::{DEFAULT_LAYOUT, WgpuBackend, default_shader};
use poly_engine::shapes::{
    CircleRingShape, CircleShape, PolygonRingShape, PolygonShape, QuadOutlineShape, RectOutlineShape, ShapeBatch,
};
use poly_engine::vertex::{NO_EXTRA, Vertex};
use poly_engine::window::{Runtime, RuntimeConfig};

const BACKGROUND: ColorRgba = ColorRgba::new(0.08, 0.09, 0.11, 1.0);
const ACCENT: ColorRgba = ColorRgba::new(0.95, 0.55, 0.2, 1.0);
const TEAL: ColorRgba = ColorRgba::new(0.2, 0.75, 0.7, 1.0);
const STRIP: ColorRgba = ColorRgba::new(0.14, 0.15, 0.18, 1.0);

/// Shapes rewritten every frame.
struct Animated {
    line: ShapeHandle,
    hexagon: ShapeHandle,
    ring: ShapeHandle,
    circle: ShapeHandle,
    rect: ShapeHandle,
    quad_outline: ShapeHandle,
}

struct Scene {
    batch: BatchId,
    renderer: RendererId,
    animated: Animated,
    /// Written once, toggled with Space.
    still: Vec<ShapeHandle>,
}

#[derive(Default)]
struct Demo {
    scene: Option<Scene>,
    still_hidden: bool,
}

fn colored(pos: Vec2, color: ColorRgba) -> Vertex {
    Vertex::at(pos).with_color(color)
}

fn hexagon(t: f32) -> PolygonShape {
    PolygonShape {
        center: colored(Vec2::new(200.0, 500.0), ACCENT),
        sides: 6,
        radius: 70.0,
        rotation: t,
        ..Default::default()
    }
}

fn ring(t: f32) -> PolygonRingShape {
    PolygonRingShape {
        center: colored(Vec2::new(420.0, 500.0), TEAL),
        sides: 5,
        inner_radius: 40.0 + 10.0 * t.sin(),
        outer_radius: 70.0,
        rotation: -t,
        ..Default::default()
    }
}

fn circle(t: f32) -> CircleShape {
    CircleShape {
        center: colored(Vec2::new(640.0 + 40.0 * t.cos(), 500.0), ColorRgba::white()),
        resolution: 6.0,
        radius: 50.0,
        ..Default::default()
    }
}

fn circle_ring() -> CircleRingShape {
    CircleRingShape {
        center: colored(Vec2::new(880.0, 500.0), ACCENT),
        resolution: 6.0,
        inner_radius: 55.0,
        outer_radius: 70.0,
        ..Default::default()
    }
}

fn line(t: f32) -> (Vertex, Vertex) {
    let a = Vec2::new(160.0, 260.0);
    let b = a + Vec2::from_angle(t, 120.0);
    (colored(a, ColorRgba::white()), colored(b, TEAL))
}

fn quad_outline(t: f32) -> QuadOutlineShape {
    let lift = 20.0 * t.sin();
    QuadOutlineShape {
        inner: Quad::new(
            Vec2::new(840.0, 220.0),
            Vec2::new(940.0, 220.0 + lift),
            Vec2::new(940.0, 320.0),
            Vec2::new(840.0, 320.0 - lift),
        ),
        outer: Quad::new(
            Vec2::new(820.0, 200.0),
            Vec2::new(960.0, 200.0 + lift),
            Vec2::new(960.0, 340.0),
            Vec2::new(820.0, 340.0 - lift),
        ),
        color: TEAL,
        ..Default::default()
    }
}

impl Scene {
    fn build(graphics: &mut dyn GraphicsBackend) -> Result<Self> {
        let batch = graphics.add_draw_batch(DEFAULT_LAYOUT, 256)?;
        let renderer = graphics.add_renderer(DEFAULT_LAYOUT, &default_shader())?;
        let unit = Rect::new(0.0, 0.0, 1.0, 1.0);

        let (a, b) = line(0.0);
        let animated = Animated {
            line: graphics.add_line(batch, a, b, 6.0, 0.0)?,
            hexagon: graphics.add_regular_polygon(batch, &hexagon(0.0))?,
            ring: graphics.add_regular_polygon_ring(batch, &ring(0.0))?,
            circle: graphics.add_circle(batch, &circle(0.0))?,
            rect: graphics.add_rect(batch, Rect::new(80.0, 60.0, 200.0, 60.0), TEAL, unit, NO_EXTRA)?,
            quad_outline: graphics.add_quad_outline(batch, &quad_outline(0.0))?,
        };

        let still = vec![
            graphics.add_triangle(
                batch,
                [
                    colored(Vec2::new(360.0, 200.0), ColorRgba::new(1.0, 0.2, 0.2, 1.0)),
                    colored(Vec2::new(480.0, 200.0), ColorRgba::new(0.2, 1.0, 0.2, 1.0)),
                    colored(Vec2::new(420.0, 320.0), ColorRgba::new(0.2, 0.2, 1.0, 1.0)),
                ],
            )?,
            graphics.add_circle_ring(batch, &circle_ring())?,
            graphics.add_quad(
                batch,
                Quad::new(
                    Vec2::new(560.0, 200.0),
                    Vec2::new(700.0, 220.0),
                    Vec2::new(680.0, 320.0),
                    Vec2::new(580.0, 300.0),
                ),
                ACCENT,
                unit.quad(),
                NO_EXTRA,
            )?,
            graphics.add_rect_outline(
                batch,
                &RectOutlineShape {
                    rect: Rect::new(80.0, 60.0, 200.0, 60.0),
                    thickness: 4.0,
                    color: ColorRgba::white(),
                    ..Default::default()
                },
            )?,
        ];

        log::info!("scene built in {batch} with {renderer}");
        Ok(Self { batch, renderer, animated, still })
    }

    fn animate(&self, graphics: &mut dyn GraphicsBackend, t: f32) -> Result<()> {
        let (a, b) = line(t);
        graphics.update_line(&self.animated.line, a, b, 6.0, 0.0)?;
        graphics.update_regular_polygon(&self.animated.hexagon, &hexagon(t))?;
        graphics.update_regular_polygon_ring(&self.animated.ring, &ring(t))?;
        graphics.update_circle(&self.animated.circle, &circle(t))?;
        graphics.update_quad_outline(&self.animated.quad_outline, &quad_outline(t))?;

        let pulse = 0.5 + 0.5 * (t * 2.0).sin();
        let color = ColorRgba::new(pulse, 0.4, 1.0 - pulse, 1.0);
        let unit = Rect::new(0.0, 0.0, 1.0, 1.0);
        graphics.update_rect(&self.animated.rect, Rect::new(80.0, 60.0, 200.0, 60.0), color, unit, NO_EXTRA)?;
        Ok(())
    }

    fn set_still_hidden(&self, graphics: &mut dyn GraphicsBackend, hidden: bool) -> Result<()> {
        for shape in &self.still {
            if hidden {
                graphics.hide_shape(shape)?;
            } else {
                graphics.show_shape(shape)?;
            }
        }
        Ok(())
    }

    fn stats(&self, graphics: &WgpuBackend) -> String {
        let Some(batch) = graphics.batch(self.batch) else {
            return format!("{} is gone", self.batch);
        };
        format!(
            "{}: {} shapes, {}/{} vertices free, {}/{} indices free, revision {}",
            self.batch,
            batch.live_shapes(),
            batch.free_vertices().free_len(),
            batch.vertex_capacity(),
            batch.free_indices().free_len(),
            batch.index_capacity(),
            batch.revision(),
        )
    }
}

impl App for Demo {
    fn on_start(&mut self, graphics: &mut WgpuBackend) -> Result<()> {
        self.scene = Some(Scene::build(&mut *graphics).context("failed to build demo scene")?);
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        match event {
            InputEvent::Key { key: Key::Escape, state: ButtonState::Down, .. } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = &self.scene else { return AppControl::Exit };
        let t = (ctx.time.elapsed * 0.8) % TAU;

        if let Err(e) = scene.animate(&mut *ctx.graphics, t) {
            log::error!("animation failed: {e:#}");
            return AppControl::Exit;
        }

        if ctx.input_frame.key_pressed(Key::Space) {
            self.still_hidden = !self.still_hidden;
            if let Err(e) = scene.set_still_hidden(&mut *ctx.graphics, self.still_hidden) {
                log::warn!("{e:#}");
            }
        }

        let ctrl = ctx.platform.keyboard.modifiers().ctrl;
        if ctrl && ctx.input_frame.key_pressed(Key::C) {
            let stats = scene.stats(ctx.graphics);
            if let Err(e) = ctx.platform.clipboard.set_text(&stats) {
                log::warn!("{e:#}");
            }
        }
        if ctx.input_frame.key_pressed(Key::F2) {
            let stats = scene.stats(ctx.graphics);
            match ctx.platform.files.save_string(Path::new("poly-demo-stats.txt"), &stats) {
                Ok(()) => log::info!("saved stats"),
                Err(e) => log::warn!("failed to save stats: {e}"),
            }
        }

        // Status strip along the bottom edge, behind the shapes.
        let strip = Rect::new(0.0, 0.0, ctx.window.logical_size().x, 24.0);
        if let Err(e) = ctx.graphics.clear_surface_area(SurfaceId::WINDOW, STRIP, strip) {
            log::warn!("{e}");
        }
        if let Err(e) = ctx.graphics.draw_batch(scene.batch, SurfaceId::WINDOW, scene.renderer, false) {
            log::error!("{e}");
            return AppControl::Exit;
        }

        ctx.present(BACKGROUND)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "poly shapes".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, Demo::default())
}
