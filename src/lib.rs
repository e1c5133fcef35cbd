//! Chroma Lab - color mixing puzzle core
//!
//! Core modules:
//! - `color`: Subtractive mixing, HSV relationships, similarity scoring
//! - `sim`: Deterministic simulation (bodies, collisions, wavefronts, tick)
//! - `config`: Per-game tuning with JSON loading
//! - `error`: Error types for the fallible edges (config loading)

pub mod color;
pub mod config;
pub mod error;
pub mod sim;

pub use color::{Color, MixSample, Scorer, mix_subtractive, mix_weighted, similarity};
pub use config::{GameMode, SimConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Conventional tick rate (display refresh)
    pub const TICK_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Perceptual channel weights (standard luminance weighting)
    pub const LUMA_R: f32 = 0.3;
    pub const LUMA_G: f32 = 0.59;
    pub const LUMA_B: f32 = 0.11;

    /// Overlap ratio below which two colliding bodies merge
    pub const MERGE_OVERLAP_RATIO: f32 = 0.7;
    /// Velocity kept after bouncing off a canvas edge
    pub const BOUNDARY_RESTITUTION: f32 = 0.8;
    /// Per-tick velocity damping
    pub const DAMPING: f32 = 0.98;
    /// Normalized lifetime lost per tick
    pub const LIFETIME_DECAY: f32 = 0.02;

    /// Bodies must be larger than this to split
    pub const MIN_SPLIT_RADIUS: f32 = 30.0;
    /// Max repeats a single color gets in a duplication-weighted mix
    pub const MAX_MIX_REPEATS: u32 = 20;

    /// Wave interaction factors
    pub const REFLECT_FACTOR: f32 = 0.9;
    pub const ABSORB_FACTOR: f32 = 0.7;

    /// Capacity of the per-wavefront collided ring
    pub const COLLIDED_RING_CAPACITY: usize = 32;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamp a point so a circle of `radius` stays inside [0, w] x [0, h]
///
/// A circle wider than the canvas is centered on that axis. A non-finite
/// radius is treated as a point.
#[inline]
pub fn clamp_to_canvas(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        clamp_axis(pos.x, radius, width),
        clamp_axis(pos.y, radius, height),
    )
}

#[inline]
fn clamp_axis(v: f32, radius: f32, extent: f32) -> f32 {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    if radius * 2.0 >= extent {
        extent / 2.0
    } else {
        v.clamp(radius, extent - radius)
    }
}
