//! Pivot UI
//!
//! egui overlay plumbing plus the settings window. The overlay renders
//! into the frame after the scene pass, loading (not clearing) the color
//! attachment.

pub mod panel;

use winit::event::WindowEvent;
use winit::window::Window;

/// Owns the egui context, the winit input bridge, and the wgpu painter.
pub struct UiLayer {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl UiLayer {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let viewport_id = ctx.viewport_id();
        let state = egui_winit::State::new(ctx.clone(), viewport_id, window, None, None, None);
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1, false);
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Forward a window event to egui. Returns true when egui consumed it
    /// (e.g. typing into a drag field), in which case the app should not
    /// also act on it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI closure and encode the overlay pass. Returns the painter
    /// command buffers, which must be submitted before the frame encoder.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        run_ui: impl FnOnce(&egui::Context),
    ) -> Vec<wgpu::CommandBuffer> {
        let input = self.state.take_egui_input(window);
        self.ctx.begin_pass(input);
        run_ui(&self.ctx);
        let output = self.ctx.end_pass();

        let prims = self
            .ctx
            .tessellate(output.shapes, output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        };

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let cmd_bufs = self
            .renderer
            .update_buffers(device, queue, encoder, &prims, &screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("UI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut pass = pass.forget_lifetime();
            self.renderer.render(&mut pass, &prims, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        self.state
            .handle_platform_output(window, output.platform_output);

        cmd_bufs
    }
}
