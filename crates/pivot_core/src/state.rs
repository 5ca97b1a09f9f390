//! Double-pendulum state
//!
//! One mutable record holds everything the integrator and the panel touch.
//! The panel edits fields directly between frames; consumption is strictly
//! sequential on one thread, so no synchronization is involved.

use glam::Vec2;
use std::f32::consts::TAU;

pub const DEFAULT_MASS_1: f32 = 10.0;
pub const DEFAULT_MASS_2: f32 = 10.0;
pub const DEFAULT_LENGTH_1: f32 = 10.0;
pub const DEFAULT_LENGTH_2: f32 = 10.0;
pub const DEFAULT_ANGLE_DEG_1: f32 = 90.0;
pub const DEFAULT_ANGLE_DEG_2: f32 = 90.0;
pub const DEFAULT_GRAVITY: f32 = 9.81;
pub const DEFAULT_TIME_STEP: f32 = 0.0166;

/// Angular state of both arms plus the physical constants.
///
/// Angles are measured from straight down, increasing counter-clockwise,
/// and are kept in `[0, 2π)` after every integration step. Masses and
/// lengths must stay positive for the update formulas to be well-defined;
/// a zero value divides by zero and the resulting NaN/Inf propagates
/// silently into the geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumState {
    pub a1: f32,
    pub a2: f32,
    pub av1: f32,
    pub av2: f32,
    pub aa1: f32,
    pub aa2: f32,
    pub m1: f32,
    pub m2: f32,
    pub l1: f32,
    pub l2: f32,
    pub g: f32,
    pub dt: f32,
}

impl PendulumState {
    pub fn new() -> Self {
        Self {
            a1: DEFAULT_ANGLE_DEG_1.to_radians(),
            a2: DEFAULT_ANGLE_DEG_2.to_radians(),
            av1: 0.0,
            av2: 0.0,
            aa1: 0.0,
            aa2: 0.0,
            m1: DEFAULT_MASS_1,
            m2: DEFAULT_MASS_2,
            l1: DEFAULT_LENGTH_1,
            l2: DEFAULT_LENGTH_2,
            g: DEFAULT_GRAVITY,
            dt: DEFAULT_TIME_STEP,
        }
    }

    /// Restore the default masses, lengths and angles and zero all motion.
    /// The gravity constant and time step are left as edited.
    pub fn reset(&mut self) {
        self.a1 = DEFAULT_ANGLE_DEG_1.to_radians();
        self.a2 = DEFAULT_ANGLE_DEG_2.to_radians();
        self.av1 = 0.0;
        self.av2 = 0.0;
        self.aa1 = 0.0;
        self.aa2 = 0.0;
        self.m1 = DEFAULT_MASS_1;
        self.m2 = DEFAULT_MASS_2;
        self.l1 = DEFAULT_LENGTH_1;
        self.l2 = DEFAULT_LENGTH_2;
    }

    /// Cartesian joint positions, derived fresh from the current angles and
    /// lengths. The first joint hangs from the origin; the second hangs
    /// from the first.
    pub fn joint_positions(&self) -> (Vec2, Vec2) {
        let x1 = self.l1 * self.a1.sin();
        let y1 = -self.l1 * self.a1.cos();
        let x2 = x1 + self.l2 * self.a2.sin();
        let y2 = y1 - self.l2 * self.a2.cos();
        (Vec2::new(x1, y1), Vec2::new(x2, y2))
    }
}

impl Default for PendulumState {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(x: f32) -> f32 {
    let a = x % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn wrap_angle_stays_in_range() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(123.456) >= 0.0);
        assert!(wrap_angle(123.456) < TAU);
    }

    #[test]
    fn joint_positions_at_right_angles() {
        let state = PendulumState::new();
        let (p1, p2) = state.joint_positions();
        // Both arms horizontal: first joint at (l1, 0), second at (l1 + l2, 0).
        assert!((p1.x - 10.0).abs() < 1e-4);
        assert!(p1.y.abs() < 1e-4);
        assert!((p2.x - 20.0).abs() < 1e-4);
        assert!(p2.y.abs() < 1e-4);
    }

    #[test]
    fn joint_positions_hang_straight_down() {
        let mut state = PendulumState::new();
        state.a1 = 0.0;
        state.a2 = 0.0;
        let (p1, p2) = state.joint_positions();
        assert!(p1.x.abs() < 1e-6);
        assert!((p1.y + 10.0).abs() < 1e-4);
        assert!(p2.x.abs() < 1e-6);
        assert!((p2.y + 20.0).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_g_and_dt() {
        let mut state = PendulumState::new();
        state.a1 = PI;
        state.av1 = 3.0;
        state.m2 = 99.0;
        state.g = 1.62;
        state.dt = 0.5;
        state.reset();
        assert!((state.a1 - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(state.av1, 0.0);
        assert_eq!(state.m2, DEFAULT_MASS_2);
        assert_eq!(state.g, 1.62);
        assert_eq!(state.dt, 0.5);
    }
}
