//! Camera composition
//!
//! Perspective looking down +Z at the pendulum plane. FOV and distance are
//! live-editable, so the matrix is recomposed from scratch every frame.

use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEG: f32 = 60.0;
pub const DEFAULT_DISTANCE: f32 = 50.0;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_deg: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            fov_deg: DEFAULT_FOV_DEG,
            distance: DEFAULT_DISTANCE,
        }
    }

    /// `projection × view × identity`; the far plane tracks the camera
    /// distance so the pendulum plane stays inside the frustum.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.fov_deg.to_radians(),
            aspect,
            0.1,
            self.distance + 10.0,
        );
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, self.distance),
            Vec3::ZERO,
            Vec3::Y,
        );
        proj * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Column-major camera matrix as uploaded to the `u_camera` uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            view_proj: camera.view_projection(aspect).to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn origin_projects_to_screen_center_at_camera_distance() {
        let camera = Camera::new();
        let m = camera.view_projection(800.0 / 600.0);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        // The pendulum anchor sits on the view axis, one camera distance away.
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!((clip.w - camera.distance).abs() < 1e-3);
    }

    #[test]
    fn narrower_fov_magnifies() {
        let mut camera = Camera::new();
        let p = Vec4::new(5.0, 0.0, 0.0, 1.0);
        let wide = (camera.view_projection(1.0) * p).x;
        camera.fov_deg = 20.0;
        let narrow = (camera.view_projection(1.0) * p).x;
        assert!(narrow > wide);
    }

    #[test]
    fn uniform_layout_is_column_major() {
        let camera = Camera::new();
        let aspect = 1.5;
        let m = camera.view_projection(aspect);
        let uniform = CameraUniform::from_camera(&camera, aspect);
        for col in 0..4 {
            assert_eq!(uniform.view_proj[col], m.col(col).to_array());
        }
    }
}
