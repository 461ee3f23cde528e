//! Mixpour - an interactive cocktail shake-and-pour simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shaker state machine, glass geometry,
//!   pour stream synthesis, droplet effects)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: User preferences and quality presets

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate all decay/oscillation
    /// constants are calibrated against)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Per-tick exponential decay of accumulated shake energy
    pub const SHAKE_DECAY: f32 = 0.90;
    /// Shake energy below this snaps to zero
    pub const SHAKE_EPSILON: f32 = 0.01;

    /// Droplet gravity (pixels/s², screen y-down)
    pub const DROPLET_GRAVITY: f32 = 288.0;
    /// Droplets this far below the glass bottom are discarded
    pub const DROPLET_CUTOFF: f32 = 200.0;

    /// Shaker body sprite size (pixels)
    pub const SHAKER_BODY_SIZE: (f32, f32) = (90.0, 160.0);
    /// Shaker cap sprite size (pixels)
    pub const SHAKER_CAP_SIZE: (f32, f32) = (70.0, 44.0);
    /// Glass sprite size (pixels)
    pub const GLASS_SIZE: (f32, f32) = (150.0, 190.0);
}

/// Rotate a vector by an angle in degrees, using the same convention as
/// the shaker's sprite tilt
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_deg_quarter_turn() {
        let v = rotate_deg(Vec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_deg_zero_is_identity() {
        let v = rotate_deg(Vec2::new(3.0, -4.0), 0.0);
        assert!((v.x - 3.0).abs() < 1e-6);
        assert!((v.y + 4.0).abs() < 1e-6);
    }
}
