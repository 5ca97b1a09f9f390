//! Pivot Runtime
//!
//! Window, event loop and the per-frame sequence: apply panel toggles,
//! derive joint positions, integrate unless paused, draw trail/arms/disks,
//! then the settings overlay.

mod settings;

use anyhow::Result;
use pivot_core::glam::Vec2;
use pivot_core::rng::DeterministicRng;
use pivot_core::state::PendulumState;
use pivot_core::{integrator, time::FrameTimer};
use pivot_render::camera::{Camera, CameraUniform};
use pivot_render::context::RenderContext;
use pivot_render::scene::SceneRenderer;
use pivot_render::RenderError;
use pivot_ui::panel::{self, PanelReadout, PanelResponse, PanelState};
use pivot_ui::UiLayer;
use settings::Settings;

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::Key,
    window::{Window, WindowId},
};

const COLOR_FG: [f32; 3] = [0.78, 0.82, 1.0];
const COLOR_TRAIL: [f32; 3] = [0.3, 0.3, 0.3];
const COLOR_BG: wgpu::Color = wgpu::Color {
    r: 0.12,
    g: 0.11,
    b: 0.18,
    a: 1.0,
};

const DISK_SIDES: u32 = 32;
const FRAME_TIMER_WINDOW: usize = 60;

struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    ctx: Option<RenderContext>,
    scene: Option<SceneRenderer>,
    ui: Option<UiLayer>,
    sim: PendulumState,
    panel: PanelState,
    rng: DeterministicRng,
    frame_timer: FrameTimer,
    run_timer: Instant,
}

impl App {
    fn new(settings: Settings) -> Self {
        let sim = settings.initial_state();
        let panel = PanelState::new(
            settings.pendulum.gravity,
            settings.camera.fov_deg,
            settings.camera.distance,
        );
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);

        Self {
            settings,
            window: None,
            ctx: None,
            scene: None,
            ui: None,
            sim,
            panel,
            rng: DeterministicRng::new(seed),
            frame_timer: FrameTimer::new(FRAME_TIMER_WINDOW),
            run_timer: Instant::now(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let (Some(ctx), Some(scene), Some(ui)) =
            (self.ctx.as_mut(), self.scene.as_mut(), self.ui.as_mut())
        else {
            return;
        };

        self.frame_timer.begin();

        // Toggles first, then the positional derivation, which runs even
        // while paused so parameter edits show immediately.
        self.sim.g = if self.panel.gravity_on {
            self.panel.gravity_setting
        } else {
            0.0
        };
        let (j1, j2) = self.sim.joint_positions();
        if !self.panel.paused {
            integrator::step(&mut self.sim);
        }

        let output = match ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                ctx.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(err) => {
                tracing::warn!("frame skipped: {err}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Live-editable FOV/distance: recomposed every frame, no caching.
        let camera = Camera {
            fov_deg: self.panel.fov_deg,
            distance: self.panel.distance,
        };
        if let Err(err) = scene.upload_camera(&ctx.queue, CameraUniform::from_camera(&camera, ctx.aspect()))
        {
            tracing::error!("camera upload failed: {err}");
        }

        {
            let mut pass = scene.begin_pass(&mut encoder, &view, COLOR_BG);
            let trail_on = self.panel.trail_on;
            let (r1, r2) = (
                (self.sim.m1 * 0.1).clamp(0.1, 2.0),
                (self.sim.m2 * 0.1).clamp(0.1, 2.0),
            );
            let mut draw = || -> Result<(), RenderError> {
                if trail_on {
                    scene.draw_trail(&ctx.queue, &mut pass, j2, COLOR_TRAIL)?;
                }
                scene.draw_line_segment(&ctx.queue, &mut pass, Vec2::ZERO, j1, COLOR_FG)?;
                scene.draw_line_segment(&ctx.queue, &mut pass, j1, j2, COLOR_FG)?;
                scene.draw_polygon(&ctx.queue, &mut pass, j1, COLOR_FG, r1, DISK_SIDES)?;
                scene.draw_polygon(&ctx.queue, &mut pass, j2, COLOR_FG, r2, DISK_SIDES)?;
                Ok(())
            };
            if let Err(err) = draw() {
                tracing::error!("scene draw aborted: {err}");
            }
        }

        let readout = PanelReadout {
            elapsed_secs: self.run_timer.elapsed().as_secs_f64(),
            fps: self.frame_timer.fps(),
            joint1: j1,
            joint2: j2,
        };
        let mut response = PanelResponse::default();
        let ui_cmds = ui.render(
            &ctx.device,
            &ctx.queue,
            &mut encoder,
            &window,
            &view,
            [ctx.config.width, ctx.config.height],
            |egui_ctx| {
                response = panel::settings_window(
                    egui_ctx,
                    &mut self.sim,
                    &mut self.panel,
                    &readout,
                    &mut self.rng,
                );
            },
        );

        if response.clear_trail {
            scene.trail_mut().clear();
        }
        if response.reset_run_timer {
            self.run_timer = Instant::now();
        }

        let mut cmd_bufs = ui_cmds;
        cmd_bufs.push(encoder.finish());
        ctx.queue.submit(cmd_bufs);
        output.present();

        self.frame_timer.end();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("double pendulum")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.graphics.resolution_width,
                self.settings.graphics.resolution_height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                tracing::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let ctx = match pollster::block_on(RenderContext::new(window.clone())) {
            Ok(ctx) => ctx,
            Err(err) => {
                tracing::error!("failed to initialize GPU context: {err}");
                event_loop.exit();
                return;
            }
        };
        let scene = match SceneRenderer::new(&ctx.device, ctx.format()) {
            Ok(scene) => scene,
            Err(err) => {
                tracing::error!("failed to create scene resources: {err}");
                event_loop.exit();
                return;
            }
        };
        let ui = UiLayer::new(&window, &ctx.device, ctx.format());

        tracing::info!("render context ready");
        tracing::info!("press 'c' to open the settings panel");

        self.window = Some(window);
        self.ctx = Some(ctx);
        self.scene = Some(scene);
        self.ui = Some(ui);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let consumed = match self.ui.as_mut() {
            Some(ui) => ui.on_window_event(&window, &event),
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                // Edge-triggered panel toggle; auto-repeat must not flip it
                // back and forth.
                if !consumed
                    && key_event.state == ElementState::Pressed
                    && !key_event.repeat
                    && key_event.logical_key == Key::Character("c".into())
                {
                    self.panel.open = !self.panel.open;
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("pivot v{}", pivot_core::VERSION);
    let settings = Settings::load_or_default();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;
    Ok(())
}
