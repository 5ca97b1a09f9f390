//! Startup settings
//!
//! An optional `pivot.json` in the working directory configures the
//! window and the initial simulation constants. This never persists live
//! simulation state; it only seeds startup.

use pivot_core::state::{
    PendulumState, DEFAULT_ANGLE_DEG_1, DEFAULT_ANGLE_DEG_2, DEFAULT_GRAVITY, DEFAULT_LENGTH_1,
    DEFAULT_LENGTH_2, DEFAULT_MASS_1, DEFAULT_MASS_2, DEFAULT_TIME_STEP,
};
use pivot_render::camera::{DEFAULT_DISTANCE, DEFAULT_FOV_DEG};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "pivot.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graphics: GraphicsSettings,
    pub pendulum: PendulumSettings,
    pub camera: CameraSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub resolution_width: u32,
    pub resolution_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumSettings {
    pub mass_1: f32,
    pub mass_2: f32,
    pub length_1: f32,
    pub length_2: f32,
    pub angle_deg_1: f32,
    pub angle_deg_2: f32,
    pub gravity: f32,
    pub time_step: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_deg: f32,
    pub distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphics: GraphicsSettings::default(),
            pendulum: PendulumSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            resolution_width: 800,
            resolution_height: 600,
        }
    }
}

impl Default for PendulumSettings {
    fn default() -> Self {
        Self {
            mass_1: DEFAULT_MASS_1,
            mass_2: DEFAULT_MASS_2,
            length_1: DEFAULT_LENGTH_1,
            length_2: DEFAULT_LENGTH_2,
            angle_deg_1: DEFAULT_ANGLE_DEG_1,
            angle_deg_2: DEFAULT_ANGLE_DEG_2,
            gravity: DEFAULT_GRAVITY,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_deg: DEFAULT_FOV_DEG,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl Settings {
    /// Read `pivot.json` if present; a malformed file logs a warning and
    /// falls back to defaults rather than aborting startup.
    pub fn load_or_default() -> Self {
        match std::fs::read_to_string(SETTINGS_FILE) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::warn!("ignoring invalid {SETTINGS_FILE}: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Initial simulation state from the configured constants.
    pub fn initial_state(&self) -> PendulumState {
        PendulumState {
            a1: self.pendulum.angle_deg_1.to_radians(),
            a2: self.pendulum.angle_deg_2.to_radians(),
            av1: 0.0,
            av2: 0.0,
            aa1: 0.0,
            aa2: 0.0,
            m1: self.pendulum.mass_1,
            m2: self.pendulum.mass_2,
            l1: self.pendulum.length_1,
            l2: self.pendulum.length_2,
            g: self.pendulum.gravity,
            dt: self.pendulum.time_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let settings = Settings::default();
        assert_eq!(settings.graphics.resolution_width, 800);
        assert_eq!(settings.graphics.resolution_height, 600);
        assert_eq!(settings.pendulum.gravity, 9.81);
        assert_eq!(settings.pendulum.time_step, 0.0166);
        assert_eq!(settings.camera.fov_deg, 60.0);
        assert_eq!(settings.camera.distance, 50.0);
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"pendulum": {"mass_1": 25.0}}"#).unwrap();
        assert_eq!(settings.pendulum.mass_1, 25.0);
        assert_eq!(settings.pendulum.mass_2, DEFAULT_MASS_2);
        assert_eq!(settings.graphics.resolution_height, 600);
    }

    #[test]
    fn initial_state_converts_angles_to_radians() {
        let settings = Settings::default();
        let state = settings.initial_state();
        assert!((state.a1 - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(state.av1, 0.0);
        assert_eq!(state.g, 9.81);
    }
}
