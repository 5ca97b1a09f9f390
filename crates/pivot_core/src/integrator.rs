//! Fixed-step double-pendulum integrator
//!
//! Non-standard semi-implicit Euler: the raw angular accelerations are
//! pre-scaled by `dt` before the velocity update, so the velocity carries a
//! `dt²`-scaled acceleration contribution per step. Deliberate; changing
//! the scaling changes every trajectory.

use crate::state::{wrap_angle, PendulumState};

/// Raw angular accelerations from the coupled Lagrangian equations of
/// motion, evaluated at the current angles and velocities.
///
/// Zero masses or lengths make the shared denominator vanish; the NaN/Inf
/// result is returned as-is.
pub fn angular_accelerations(s: &PendulumState) -> (f32, f32) {
    let den = 2.0 * s.m1 + s.m2 - s.m2 * (2.0 * s.a1 - 2.0 * s.a2).cos();

    let daa1 = (-s.g * (2.0 * s.m1 + s.m2) * s.a1.sin()
        - s.m2 * s.g * (s.a1 - 2.0 * s.a2).sin()
        - 2.0
            * (s.a1 - s.a2).sin()
            * s.m2
            * (s.av2 * s.av2 * s.l2 + s.av1 * s.av1 * s.l1 * (s.a1 - s.a2).cos()))
        / (s.l1 * den);

    let daa2 = (2.0
        * (s.a1 - s.a2).sin()
        * (s.av1 * s.av1 * s.l1 * (s.m1 + s.m2)
            + s.g * (s.m1 + s.m2) * s.a1.cos()
            + s.av2 * s.av2 * s.l2 * s.m2 * (s.a1 - s.a2).cos()))
        / (s.l2 * den);

    (daa1, daa2)
}

/// Advance the state by one `dt` increment.
///
/// Update order: accelerations (pre-scaled by `dt`), then velocities, then
/// angles, then wrap both angles into `[0, 2π)`. Nothing else is touched.
pub fn step(s: &mut PendulumState) {
    let (daa1, daa2) = angular_accelerations(s);

    s.aa1 = daa1 * s.dt;
    s.aa2 = daa2 * s.dt;
    s.av1 += s.aa1;
    s.av2 += s.aa2;
    s.a1 = wrap_angle(s.a1 + s.av1 * s.dt);
    s.a2 = wrap_angle(s.a2 + s.av2 * s.dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    fn base_state() -> PendulumState {
        PendulumState {
            a1: FRAC_PI_2,
            a2: FRAC_PI_2,
            av1: 0.0,
            av2: 0.0,
            aa1: 0.0,
            aa2: 0.0,
            m1: 10.0,
            m2: 10.0,
            l1: 10.0,
            l2: 10.0,
            g: 9.81,
            dt: 0.0166,
        }
    }

    #[test]
    fn step_matches_closed_form_at_right_angles() {
        // With both arms horizontal and at rest the coupled equations
        // reduce to daa1 = (-g(2m1+m2) + m2 g) / (l1 (2m1 + m2 - m2))
        // = -196.2 / 200 = -0.981 and daa2 = 0.
        let mut s = base_state();
        step(&mut s);

        let daa1 = -0.981_f32;
        assert!((s.aa1 - daa1 * 0.0166).abs() < 1e-5);
        assert!(s.aa2.abs() < 1e-5);
        assert!((s.av1 - daa1 * 0.0166).abs() < 1e-5);
        assert!(s.av2.abs() < 1e-5);
        assert!((s.a1 - (FRAC_PI_2 + s.av1 * 0.0166)).abs() < 1e-6);
        assert!((s.a2 - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn step_with_zero_dt_is_identity() {
        let mut s = base_state();
        s.av1 = 1.5;
        s.av2 = -0.25;
        s.dt = 0.0;
        let before = s;
        step(&mut s);
        assert_eq!(s.a1, before.a1);
        assert_eq!(s.a2, before.a2);
        assert_eq!(s.av1, before.av1);
        assert_eq!(s.av2, before.av2);
        assert_eq!(s.aa1, 0.0);
        assert_eq!(s.aa2, 0.0);
    }

    #[test]
    fn angles_stay_wrapped_over_many_steps() {
        let mut s = base_state();
        s.av1 = 40.0;
        s.av2 = -40.0;
        for _ in 0..1000 {
            step(&mut s);
            assert!(s.a1 >= 0.0 && s.a1 < TAU, "a1 out of range: {}", s.a1);
            assert!(s.a2 >= 0.0 && s.a2 < TAU, "a2 out of range: {}", s.a2);
        }
    }

    #[test]
    fn zero_mass_propagates_nan_without_panicking() {
        // Accepted garbage-in/garbage-out: degenerate inputs are the
        // caller's responsibility and must not crash the step.
        let mut s = base_state();
        s.m1 = 0.0;
        step(&mut s);
        assert!(s.aa1.is_nan());
        assert!(s.aa2.is_nan());
    }
}
