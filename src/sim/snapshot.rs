//! Read-only per-tick output for renderers and UI

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Renderable view of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Remaining lifetime for particles, wave opacity, 1.0 otherwise
    pub opacity: f32,
}

/// Everything a UI needs after a tick completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub mixed_color: Color,
    pub body_mix: Color,
    pub wave_mix: Color,
    pub similarity: Option<f32>,
    pub solved: Option<bool>,
    pub bodies: Vec<EntityView>,
    pub particles: Vec<EntityView>,
    pub waves: Vec<EntityView>,
    pub obstacles: Vec<EntityView>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
