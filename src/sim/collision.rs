//! Circle-circle collision detection and response
//!
//! Deep overlaps merge (area conserving, colors mixed by area); shallow ones
//! separate with an elastic impulse. Splitting is the inverse of a merge.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use crate::color::{Color, MixSample, mix_weighted};
use crate::config::PhysicsConfig;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Contact point on the first circle's surface
    pub point: Vec2,
    /// Unit normal from the first center toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
    /// Center-to-center distance
    pub distance: f32,
}

impl CollisionResult {
    pub fn miss(distance: f32) -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
            distance,
        }
    }
}

/// Check overlap between two circles (`distance < r_a + r_b`)
pub fn circle_collision(pos_a: Vec2, r_a: f32, pos_b: Vec2, r_b: f32) -> CollisionResult {
    let delta = pos_b - pos_a;
    let distance = delta.length();
    let reach = r_a + r_b;

    if distance >= reach {
        return CollisionResult::miss(distance);
    }

    // Coincident centers: pick a fixed axis so separation still works
    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec2::X
    };

    CollisionResult {
        hit: true,
        point: pos_a + normal * r_a,
        normal,
        penetration: reach - distance,
        distance,
    }
}

/// Whether an overlap is deep enough to merge
#[inline]
pub fn should_merge(contact: &CollisionResult, r_a: f32, r_b: f32, overlap_ratio: f32) -> bool {
    contact.hit && contact.distance < overlap_ratio * (r_a + r_b)
}

/// Radius of the body formed by merging circles of radius `r_a` and `r_b`
#[inline]
pub fn merged_radius(r_a: f32, r_b: f32) -> f32 {
    (r_a * r_a + r_b * r_b).sqrt()
}

/// Radius of each half when a body of radius `r` splits in two
#[inline]
pub fn split_radius(r: f32) -> f32 {
    r * std::f32::consts::FRAC_1_SQRT_2
}

/// Combine two bodies into one with conserved area
///
/// Color is the area-weighted subtractive mix; position and velocity are
/// area-weighted averages.
pub fn merge_bodies(a: &Body, b: &Body, id: u32) -> Body {
    let (area_a, area_b) = (a.area(), b.area());
    let total = area_a + area_b;

    let (pos, vel) = if total > 0.0 {
        (
            (a.pos * area_a + b.pos * area_b) / total,
            (a.vel * area_a + b.vel * area_b) / total,
        )
    } else {
        ((a.pos + b.pos) * 0.5, (a.vel + b.vel) * 0.5)
    };

    let color = mix_weighted(&[
        MixSample::new(a.color, area_a),
        MixSample::new(b.color, area_b),
    ]);

    let mut merged = Body::new(id, pos, merged_radius(a.radius, b.radius), color);
    merged.vel = vel;
    merged.pinned = a.pinned || b.pinned;
    merged
}

/// Push overlapping bodies apart and exchange an elastic impulse
///
/// A dragged body is immovable: the other takes the whole push and none of
/// the impulse is applied to the dragged one.
pub fn separate(a: &mut Body, b: &mut Body, contact: &CollisionResult) {
    let (share_a, share_b) = match (a.dragging, b.dragging) {
        (true, true) => return,
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (false, false) => (0.5, 0.5),
    };

    let n = contact.normal;
    a.pos -= n * contact.penetration * share_a;
    b.pos += n * contact.penetration * share_b;

    // Closing speed along the normal; negative means already separating
    let closing = (a.vel - b.vel).dot(n);
    if closing <= 0.0 {
        return;
    }

    let inv_a = if a.dragging { 0.0 } else { inverse_mass(a) };
    let inv_b = if b.dragging { 0.0 } else { inverse_mass(b) };
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let impulse = 2.0 * closing / inv_sum;
    a.vel -= n * impulse * inv_a;
    b.vel += n * impulse * inv_b;
}

#[inline]
fn inverse_mass(body: &Body) -> f32 {
    1.0 / body.area().max(1e-4)
}

/// A merge produced during a collision pass
#[derive(Debug, Clone)]
pub struct MergeRecord {
    pub consumed: (u32, u32),
    pub merged: Body,
}

/// Resolve every unordered pair of solid bodies once
///
/// Merges are returned rather than applied: consumed bodies are flagged via
/// the returned records and the caller removes/inserts after the pass.
/// A body consumed earlier in the pass is not considered again.
pub fn resolve_collisions(
    bodies: &mut [Body],
    config: &PhysicsConfig,
    mut next_id: impl FnMut() -> u32,
) -> Vec<MergeRecord> {
    let mut merges = Vec::new();
    let mut consumed = vec![false; bodies.len()];

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if consumed[i] {
                break;
            }
            if consumed[j] || !bodies[i].is_solid() || !bodies[j].is_solid() {
                continue;
            }

            let (left, right) = bodies.split_at_mut(j);
            let (a, b) = (&mut left[i], &mut right[0]);

            let contact = circle_collision(a.pos, a.radius, b.pos, b.radius);
            if !contact.hit {
                continue;
            }

            if config.merge_enabled
                && should_merge(&contact, a.radius, b.radius, config.merge_overlap_ratio)
            {
                let merged = merge_bodies(a, b, next_id());
                log::trace!(
                    "Merged #{} + #{} -> #{} (r={:.1})",
                    a.id,
                    b.id,
                    merged.id,
                    merged.radius
                );
                consumed[i] = true;
                consumed[j] = true;
                merges.push(MergeRecord {
                    consumed: (a.id, b.id),
                    merged,
                });
            } else {
                separate(a, b, &contact);
            }
        }
    }

    merges
}

/// Split a body into two equal-area halves along a random axis
///
/// Returns `None` (request ignored) for particles and bodies not larger than
/// `min_split_radius`.
pub fn split_body<R: Rng>(
    body: &Body,
    config: &PhysicsConfig,
    rng: &mut R,
    ids: (u32, u32),
) -> Option<[Body; 2]> {
    if body.particle || body.radius <= config.min_split_radius {
        return None;
    }

    let child_r = split_radius(body.radius);
    let axis = Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU));
    let offset = axis * child_r;

    let make = |id: u32, sign: f32| {
        let mut child = Body::new(id, body.pos + offset * sign, child_r, body.color);
        child.vel = body.vel + axis * config.split_kick * sign;
        child
    };

    Some([make(ids.0, 1.0), make(ids.1, -1.0)])
}

/// Area-weighted subtractive mix of solid bodies
pub fn bodies_mix(bodies: &[Body]) -> Color {
    let samples: Vec<MixSample> = bodies
        .iter()
        .filter(|b| b.is_solid())
        .map(|b| MixSample::new(b.color, b.area()))
        .collect();
    mix_weighted(&samples)
}
