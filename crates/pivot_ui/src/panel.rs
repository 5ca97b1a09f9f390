//! Settings window
//!
//! Reads and writes the pendulum state directly; widget bounds are the
//! only validation, matching the live-edit model. Actions on state owned
//! by the orchestrator (trail, run timer) come back in [`PanelResponse`].

use pivot_core::glam::Vec2;
use pivot_core::rng::DeterministicRng;
use pivot_core::state::PendulumState;
use std::f32::consts::TAU;

/// Toggles and camera parameters owned by the panel.
pub struct PanelState {
    pub open: bool,
    pub paused: bool,
    pub gravity_on: bool,
    pub trail_on: bool,
    /// Configured gravity; applied to the state each frame unless the
    /// gravity toggle forces zero.
    pub gravity_setting: f32,
    pub fov_deg: f32,
    pub distance: f32,
}

impl PanelState {
    pub fn new(gravity_setting: f32, fov_deg: f32, distance: f32) -> Self {
        Self {
            open: false,
            paused: false,
            gravity_on: true,
            trail_on: false,
            gravity_setting,
            fov_deg,
            distance,
        }
    }
}

/// Actions the orchestrator must carry out after the panel ran.
#[derive(Default)]
pub struct PanelResponse {
    pub clear_trail: bool,
    pub reset_run_timer: bool,
}

/// Display-only values the orchestrator derives per frame.
pub struct PanelReadout {
    pub elapsed_secs: f64,
    pub fps: f64,
    pub joint1: Vec2,
    pub joint2: Vec2,
}

pub fn settings_window(
    ctx: &egui::Context,
    sim: &mut PendulumState,
    panel: &mut PanelState,
    readout: &PanelReadout,
    rng: &mut DeterministicRng,
) -> PanelResponse {
    let mut response = PanelResponse::default();
    if !panel.open {
        return response;
    }

    let mut open = panel.open;
    egui::Window::new("Settings").open(&mut open).show(ctx, |ui| {
        ui.label(format!("Time elapsed: {:.3} s", readout.elapsed_secs));
        ui.label(format!("Frame rate: {:.1} fps", readout.fps));
        ui.add_space(6.0);

        ui.label("Pendulum 1:");
        ui.label(format!(
            "  - x1: {:.4}, y1: {:.4}",
            readout.joint1.x, readout.joint1.y
        ));
        ui.label(format!(
            "  - angle: {:.4} deg ({:.4} rad)",
            sim.a1.to_degrees(),
            sim.a1
        ));
        ui.label(format!("  - angular velocity: {:.4}", sim.av1));
        ui.label(format!("  - angular acceleration: {:.4}", sim.aa1));
        ui.label("Pendulum 2:");
        ui.label(format!(
            "  - x2: {:.4}, y2: {:.4}",
            readout.joint2.x, readout.joint2.y
        ));
        ui.label(format!(
            "  - angle: {:.4} deg ({:.4} rad)",
            sim.a2.to_degrees(),
            sim.a2
        ));
        ui.label(format!("  - angular velocity: {:.4}", sim.av2));
        ui.label(format!("  - angular acceleration: {:.4}", sim.aa2));
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut sim.m1).speed(0.1).range(0.1..=4096.0));
            ui.add(egui::DragValue::new(&mut sim.m2).speed(0.1).range(0.1..=4096.0));
            ui.label("Pendulum mass");
        });
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut sim.l1).speed(0.1).range(0.1..=4096.0));
            ui.add(egui::DragValue::new(&mut sim.l2).speed(0.1).range(0.1..=4096.0));
            ui.label("Pendulum length");
        });
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut sim.a1).speed(0.01).range(0.0..=TAU));
            ui.add(egui::DragValue::new(&mut sim.a2).speed(0.01).range(0.0..=TAU));
            ui.label("Pendulum angle");
        });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut panel.gravity_setting).speed(0.1));
            ui.label("gravity constant");
        });
        ui.horizontal(|ui| {
            ui.checkbox(&mut panel.gravity_on, "gravity");
            ui.checkbox(&mut panel.trail_on, "trails");
        });

        let playpause = if panel.paused { "play" } else { "pause" };
        if ui.button(playpause).clicked() {
            panel.paused = !panel.paused;
        }

        ui.horizontal(|ui| {
            if ui.button("randomize length").clicked() {
                sim.l1 = rng.length();
                sim.l2 = rng.length();
            }
            if ui.button("randomize mass").clicked() {
                sim.m1 = rng.mass();
                sim.m2 = rng.mass();
            }
            if ui.button("randomize angles").clicked() {
                sim.a1 = rng.angle();
                sim.a2 = rng.angle();
            }
        });
        if ui.button("randomize").clicked() {
            sim.m1 = rng.mass();
            sim.m2 = rng.mass();
            sim.l1 = rng.length();
            sim.l2 = rng.length();
            sim.a1 = rng.angle();
            sim.a2 = rng.angle();
        }

        ui.horizontal(|ui| {
            if ui.button("reset angular velocity").clicked() {
                sim.av1 = 0.0;
                sim.av2 = 0.0;
            }
            if ui.button("reset angular acceleration").clicked() {
                sim.aa1 = 0.0;
                sim.aa2 = 0.0;
            }
        });
        if ui.button("reset trail path").clicked() {
            response.clear_trail = true;
        }
        if ui.button("reset").clicked() {
            sim.reset();
            response.reset_run_timer = true;
        }
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.add(
                egui::DragValue::new(&mut sim.dt)
                    .speed(0.001)
                    .range(0.0001..=1.0)
                    .fixed_decimals(4),
            );
            ui.label("time step");
        });
        ui.add_space(6.0);

        ui.label("Camera:");
        ui.add(egui::Slider::new(&mut panel.fov_deg, 10.0..=90.0).text("FOV"));
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut panel.distance).speed(1.0).range(1.0..=4096.0));
            ui.label("scale");
        });
        ui.add_space(6.0);

        ui.label("Info:");
        ui.label("Double pendulum rendered with wgpu");
        ui.label("  - Simulates the motion of a double pendulum");
        ui.label("  - Note: angles start from 0 at the bottom and increase counter-clockwise");
    });
    panel.open = open;

    response
}
