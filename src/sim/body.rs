//! Circular physics bodies (bubbles, cars, burst particles)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::population::Aged;
use crate::color::Color;

/// Lifecycle phase derived from a body's flags and lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPhase {
    /// Position is written by input; excluded from integration
    Dragged,
    /// Integrated normally
    Free,
    /// Lifetime counting down, still integrated
    Expiring,
    /// Lifetime hit zero; removed at end of tick
    Expired,
}

/// A moving circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Normalized remaining life in [0, 1]; `None` lives forever
    pub lifetime: Option<f32>,
    /// Held by the player; position set externally
    pub dragging: bool,
    /// Visual-only particle: no collisions, merges or splits
    pub particle: bool,
    /// Radius ramps toward `target_radius`
    pub growing: bool,
    pub target_radius: f32,
    /// Never evicted by the population cap
    pub pinned: bool,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, radius: f32, color: Color) -> Self {
        let radius = sane_radius(radius);
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
            lifetime: None,
            dragging: false,
            particle: false,
            growing: false,
            target_radius: radius,
            pinned: false,
        }
    }

    /// Short-lived particle flying out at `vel`
    pub fn particle(id: u32, pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            vel,
            lifetime: Some(1.0),
            particle: true,
            ..Self::new(id, pos, radius, color)
        }
    }

    /// Start small and grow to `target_radius`
    pub fn growing(mut self, start_radius: f32, target_radius: f32) -> Self {
        self.radius = sane_radius(start_radius);
        self.target_radius = sane_radius(target_radius).max(self.radius);
        self.growing = self.radius < self.target_radius;
        self
    }

    pub fn phase(&self) -> BodyPhase {
        if self.dragging {
            BodyPhase::Dragged
        } else {
            match self.lifetime {
                Some(l) if l <= 0.0 => BodyPhase::Expired,
                Some(_) => BodyPhase::Expiring,
                None => BodyPhase::Free,
            }
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self.lifetime, Some(l) if l <= 0.0)
    }

    /// Whether this body takes part in collision, merge and split
    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.particle && !self.is_expired()
    }

    /// Mass proxy: proportional to area
    #[inline]
    pub fn area(&self) -> f32 {
        self.radius * self.radius
    }
}

impl Aged for Body {
    fn id(&self) -> u32 {
        self.id
    }

    fn is_pinned(&self) -> bool {
        self.pinned
    }
}

#[inline]
pub(crate) fn sane_radius(radius: f32) -> f32 {
    if radius.is_finite() { radius.max(0.0) } else { 0.0 }
}

/// Radial burst of particles for merge/split feedback
///
/// `next_id` allocates ids so bursts share the caller's id space.
pub fn spawn_burst<R: Rng>(
    rng: &mut R,
    pos: Vec2,
    color: Color,
    count: usize,
    mut next_id: impl FnMut() -> u32,
) -> Vec<Body> {
    (0..count)
        .map(|i| {
            // Even spread plus a little jitter
            let base = std::f32::consts::TAU * (i as f32 / count.max(1) as f32);
            let angle = base + rng.random_range(-0.3..0.3);
            let speed = rng.random_range(1.0..4.0);
            let radius = rng.random_range(2.0..5.0);
            Body::particle(next_id(), pos, Vec2::from_angle(angle) * speed, radius, color)
        })
        .collect()
}
