//! Pivot Core
//!
//! Contains the simulation side of the visualizer:
//! - Double-pendulum state and fixed-step integrator
//! - Deterministic RNG for the panel's randomize actions
//! - Frame timing utilities

pub mod integrator;
pub mod rng;
pub mod state;
pub mod time;

pub use glam;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
