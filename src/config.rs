//! Simulation configuration and per-game presets
//!
//! All tunables are plain scalars. Values coming from outside go through
//! [`SimConfig::sanitized`] so the simulation never sees a negative radius,
//! a zero cap or a NaN.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::SimilarityWeights;
use crate::consts::*;
use crate::error::ConfigError;

/// Which mini-game a configuration is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Slider balance: proportions only, no moving bodies
    Slider,
    #[default]
    Bubbles,
    Waves,
    Racing,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Slider => "Slider",
            GameMode::Bubbles => "Bubbles",
            GameMode::Waves => "Waves",
            GameMode::Racing => "Racing",
        }
    }

    /// Where the aggregate color shown to the player comes from
    pub fn mix_source(&self) -> MixSource {
        match self {
            GameMode::Waves => MixSource::Waves,
            _ => MixSource::Bodies,
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slider" => Ok(GameMode::Slider),
            "bubbles" | "bubble" => Ok(GameMode::Bubbles),
            "waves" | "wave" => Ok(GameMode::Waves),
            "racing" | "race" => Ok(GameMode::Racing),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Source of the "current mixed color"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MixSource {
    /// Area-weighted subtractive mix of live bodies
    #[default]
    Bodies,
    /// Opacity/size-weighted average of live wavefronts
    Waves,
}

/// Playfield extent; bodies bounce inside [0, width] x [0, height]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

/// Body integration and collision tuning (per-tick units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added to velocity each tick
    pub gravity_y: f32,
    /// Velocity multiplier each tick
    pub damping_factor: f32,
    pub max_bodies: usize,
    pub max_particles: usize,
    /// Centers closer than this fraction of the radius sum merge
    pub merge_overlap_ratio: f32,
    pub merge_enabled: bool,
    /// Velocity kept (and inverted) on a canvas bounce
    pub boundary_restitution: f32,
    /// Normalized lifetime lost per tick
    pub lifetime_decay: f32,
    /// Radius gained per tick by growing bodies
    pub growth_rate: f32,
    pub min_split_radius: f32,
    /// Velocity added along the split axis to each child
    pub split_kick: f32,
    /// Particles spawned by a merge or split
    pub burst_particles: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: 0.0,
            damping_factor: DAMPING,
            max_bodies: 30,
            max_particles: 256,
            merge_overlap_ratio: MERGE_OVERLAP_RATIO,
            merge_enabled: true,
            boundary_restitution: BOUNDARY_RESTITUTION,
            lifetime_decay: LIFETIME_DECAY,
            growth_rate: 0.5,
            min_split_radius: MIN_SPLIT_RADIUS,
            split_kick: 2.0,
            burst_particles: 8,
        }
    }
}

/// Wavefront emission, decay and interaction tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub max_waves: usize,
    /// Radius of a freshly emitted front
    pub base_radius: f32,
    pub base_opacity: f32,
    /// Opacity lost per tick
    pub opacity_decay: f32,
    /// Global multiplier on every front's growth (power-ups, slow-mo)
    pub speed_modifier: f32,
    pub reflect_factor: f32,
    pub absorb_factor: f32,
    pub interference_enabled: bool,
    /// Max gap between two fronts that still counts as touching
    pub touch_tolerance: f32,
    /// Emissions this close to a recent front are dropped
    pub dedup_distance: f32,
    /// How recent (seconds) a front must be to suppress an emission
    pub dedup_window: f32,
    /// Population fraction above which admissions are throttled
    pub throttle_ratio: f32,
    /// Near capacity, only every Nth admission attempt succeeds
    pub throttle_every: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            max_waves: 60,
            base_radius: 5.0,
            base_opacity: 1.0,
            opacity_decay: 0.005,
            speed_modifier: 1.0,
            reflect_factor: REFLECT_FACTOR,
            absorb_factor: ABSORB_FACTOR,
            interference_enabled: true,
            touch_tolerance: 2.0,
            dedup_distance: 4.0,
            dedup_window: 0.05,
            throttle_ratio: 0.8,
            throttle_every: 3,
        }
    }
}

/// Complete configuration for one game session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: GameMode,
    pub canvas: Canvas,
    pub physics: PhysicsConfig,
    pub waves: WaveConfig,
    pub similarity: SimilarityWeights,
    pub mix_source: MixSource,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::for_mode(GameMode::default())
    }
}

impl SimConfig {
    /// Preset tuning for a game mode
    pub fn for_mode(mode: GameMode) -> Self {
        let mut physics = PhysicsConfig::default();
        let mut waves = WaveConfig::default();

        match mode {
            GameMode::Slider => {
                physics.max_bodies = 8;
                physics.merge_enabled = false;
            }
            GameMode::Bubbles => {
                physics.gravity_y = 0.05;
            }
            GameMode::Waves => {
                physics.max_bodies = 0;
                waves.max_waves = 80;
            }
            GameMode::Racing => {
                physics.damping_factor = 0.95;
                physics.boundary_restitution = 0.5;
                physics.merge_enabled = false;
                physics.max_bodies = 6;
            }
        }

        Self {
            mode,
            canvas: Canvas::default(),
            physics,
            waves,
            similarity: SimilarityWeights::default(),
            mix_source: mode.mix_source(),
        }
    }

    /// Parse from JSON; missing fields take defaults. Result is sanitized.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded {} config from {}", config.mode.as_str(), path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp every value into its valid range
    pub fn sanitized(mut self) -> Self {
        let c = &mut self.canvas;
        c.width = finite_or(c.width, CANVAS_WIDTH).max(1.0);
        c.height = finite_or(c.height, CANVAS_HEIGHT).max(1.0);

        let p = &mut self.physics;
        p.gravity_y = finite_or(p.gravity_y, 0.0);
        p.damping_factor = finite_or(p.damping_factor, DAMPING).clamp(0.0, 1.0);
        p.merge_overlap_ratio =
            finite_or(p.merge_overlap_ratio, MERGE_OVERLAP_RATIO).clamp(0.0, 1.0);
        p.boundary_restitution =
            finite_or(p.boundary_restitution, BOUNDARY_RESTITUTION).clamp(0.0, 1.0);
        p.lifetime_decay = finite_or(p.lifetime_decay, LIFETIME_DECAY).clamp(0.0, 1.0);
        p.growth_rate = finite_or(p.growth_rate, 0.0).max(0.0);
        p.min_split_radius = finite_or(p.min_split_radius, MIN_SPLIT_RADIUS).max(0.0);
        p.split_kick = finite_or(p.split_kick, 0.0).max(0.0);

        let w = &mut self.waves;
        w.base_radius = finite_or(w.base_radius, 0.0).max(0.0);
        w.base_opacity = finite_or(w.base_opacity, 1.0).clamp(0.0, 1.0);
        w.opacity_decay = finite_or(w.opacity_decay, 0.0).max(0.0);
        w.speed_modifier = finite_or(w.speed_modifier, 1.0).max(0.0);
        w.reflect_factor = finite_or(w.reflect_factor, REFLECT_FACTOR).clamp(0.0, 1.0);
        w.absorb_factor = finite_or(w.absorb_factor, ABSORB_FACTOR).clamp(0.0, 1.0);
        w.touch_tolerance = finite_or(w.touch_tolerance, 0.0).max(0.0);
        w.dedup_distance = finite_or(w.dedup_distance, 0.0).max(0.0);
        w.dedup_window = finite_or(w.dedup_window, 0.0).max(0.0);
        w.throttle_ratio = finite_or(w.throttle_ratio, 1.0).clamp(0.0, 1.0);
        w.throttle_every = w.throttle_every.max(1);

        self.similarity = self.similarity.sanitized();
        self
    }
}

#[inline]
fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("waves".parse::<GameMode>().unwrap(), GameMode::Waves);
        assert_eq!("Bubble".parse::<GameMode>().unwrap(), GameMode::Bubbles);
        assert!(matches!(
            "tetris".parse::<GameMode>(),
            Err(ConfigError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_defaults_preserve_tuning_constants() {
        let config = SimConfig::default();
        assert_eq!(config.physics.merge_overlap_ratio, 0.7);
        assert_eq!(config.physics.boundary_restitution, 0.8);
        assert_eq!(config.similarity.g, 0.59);
    }

    #[test]
    fn test_preset_mix_source() {
        assert_eq!(SimConfig::for_mode(GameMode::Waves).mix_source, MixSource::Waves);
        assert_eq!(SimConfig::for_mode(GameMode::Bubbles).mix_source, MixSource::Bodies);
        assert!(!SimConfig::for_mode(GameMode::Racing).physics.merge_enabled);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{"physics": {"gravity_y": 0.3}}"#).unwrap();
        assert_eq!(config.physics.gravity_y, 0.3);
        assert_eq!(config.physics.damping_factor, DAMPING);
        assert_eq!(config.waves.max_waves, WaveConfig::default().max_waves);
    }

    #[test]
    fn test_sanitize_clamps() {
        let mut config = SimConfig::default();
        config.physics.damping_factor = 3.0;
        config.physics.min_split_radius = -5.0;
        config.waves.throttle_every = 0;
        config.waves.base_opacity = f32::NAN;
        config.canvas.width = -100.0;

        let config = config.sanitized();
        assert_eq!(config.physics.damping_factor, 1.0);
        assert_eq!(config.physics.min_split_radius, 0.0);
        assert_eq!(config.waves.throttle_every, 1);
        assert_eq!(config.waves.base_opacity, 1.0);
        assert_eq!(config.canvas.width, 1.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            SimConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SimConfig::for_mode(GameMode::Racing);
        let json = config.to_json().unwrap();
        let back = SimConfig::from_json(&json).unwrap();
        assert_eq!(back.mode, GameMode::Racing);
        assert_eq!(back.physics.damping_factor, 0.95);
    }
}
