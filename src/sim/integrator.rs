//! Per-tick body integration
//!
//! Lifetime decay, growth, gravity, damping, position update and canvas
//! bounce. Units are per tick.

use glam::Vec2;

use super::body::Body;
use crate::clamp_to_canvas;
use crate::config::{Canvas, PhysicsConfig};

/// Result of stepping one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Dragged bodies are left alone
    Skipped,
    Moved,
    /// Lifetime reached zero this tick
    Expired,
}

/// Advance a single body by one tick
pub fn step_body(body: &mut Body, config: &PhysicsConfig, canvas: &Canvas) -> StepOutcome {
    if body.dragging {
        return StepOutcome::Skipped;
    }

    if let Some(life) = body.lifetime.as_mut() {
        *life = (*life - config.lifetime_decay).clamp(0.0, 1.0);
        if *life <= 0.0 {
            return StepOutcome::Expired;
        }
    }

    if body.growing {
        body.radius = (body.radius + config.growth_rate).min(body.target_radius);
        if body.radius >= body.target_radius {
            body.growing = false;
        }
    }

    body.vel.y += config.gravity_y;
    body.vel *= config.damping_factor;
    body.pos += body.vel;

    bounce_off_canvas(body, config.boundary_restitution, canvas);
    sanitize(body, canvas);

    StepOutcome::Moved
}

/// Inelastic bounce off the four canvas edges
pub fn bounce_off_canvas(body: &mut Body, restitution: f32, canvas: &Canvas) {
    let r = body.radius;
    let clamped = clamp_to_canvas(body.pos, r, canvas.width, canvas.height);

    if clamped.x != body.pos.x {
        // Only flip if still heading out through that edge
        let outward = if body.pos.x < clamped.x { -1.0 } else { 1.0 };
        if body.vel.x * outward > 0.0 {
            body.vel.x = -body.vel.x * restitution;
        }
        body.pos.x = clamped.x;
    }
    if clamped.y != body.pos.y {
        let outward = if body.pos.y < clamped.y { -1.0 } else { 1.0 };
        if body.vel.y * outward > 0.0 {
            body.vel.y = -body.vel.y * restitution;
        }
        body.pos.y = clamped.y;
    }
}

/// Programmer errors (NaN state) fail fast in debug and clamp in release
fn sanitize(body: &mut Body, canvas: &Canvas) {
    debug_assert!(body.pos.is_finite(), "body #{} position is not finite", body.id);
    debug_assert!(body.vel.is_finite(), "body #{} velocity is not finite", body.id);
    if !body.pos.is_finite() || !body.vel.is_finite() {
        log::warn!("Body #{} had non-finite state, resetting", body.id);
        body.pos = Vec2::new(canvas.width / 2.0, canvas.height / 2.0);
        body.vel = Vec2::ZERO;
    }
}

/// Step every body; returns ids that expired this tick
///
/// Expired bodies stay in the collection (flagged by lifetime 0) until the
/// end-of-tick cleanup so nothing is removed mid-iteration.
pub fn integrate(bodies: &mut [Body], config: &PhysicsConfig, canvas: &Canvas) -> Vec<u32> {
    bodies
        .iter_mut()
        .filter(|b| !b.is_expired())
        .filter_map(|body| match step_body(body, config, canvas) {
            StepOutcome::Expired => Some(body.id),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn canvas() -> Canvas {
        Canvas {
            width: 100.0,
            height: 100.0,
        }
    }

    fn no_forces() -> PhysicsConfig {
        PhysicsConfig {
            gravity_y: 0.0,
            damping_factor: 1.0,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn test_gravity_then_damping_then_move() {
        let config = PhysicsConfig {
            gravity_y: 1.0,
            damping_factor: 0.5,
            ..PhysicsConfig::default()
        };
        let mut body = Body::new(1, Vec2::new(50.0, 50.0), 5.0, Color::RED);
        body.vel = Vec2::new(2.0, 0.0);

        assert_eq!(step_body(&mut body, &config, &canvas()), StepOutcome::Moved);
        // vel = (2, 0 + 1) * 0.5
        assert_eq!(body.vel, Vec2::new(1.0, 0.5));
        assert_eq!(body.pos, Vec2::new(51.0, 50.5));
    }

    #[test]
    fn test_dragged_body_untouched() {
        let config = PhysicsConfig {
            gravity_y: 1.0,
            ..PhysicsConfig::default()
        };
        let mut body = Body::new(1, Vec2::new(50.0, 50.0), 5.0, Color::RED);
        body.dragging = true;
        assert_eq!(step_body(&mut body, &config, &canvas()), StepOutcome::Skipped);
        assert_eq!(body.pos, Vec2::new(50.0, 50.0));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_lifetime_expiry() {
        let config = PhysicsConfig {
            lifetime_decay: 0.25,
            ..no_forces()
        };
        let mut body = Body::particle(1, Vec2::new(50.0, 50.0), Vec2::X, 2.0, Color::RED);
        for _ in 0..3 {
            assert_eq!(step_body(&mut body, &config, &canvas()), StepOutcome::Moved);
        }
        let pos_before = body.pos;
        assert_eq!(step_body(&mut body, &config, &canvas()), StepOutcome::Expired);
        assert_eq!(body.lifetime, Some(0.0));
        // No physics on the expiring tick
        assert_eq!(body.pos, pos_before);
    }

    #[test]
    fn test_growth_stops_at_target() {
        let config = PhysicsConfig {
            growth_rate: 4.0,
            ..no_forces()
        };
        let mut body = Body::new(1, Vec2::new(50.0, 50.0), 10.0, Color::RED).growing(1.0, 10.0);
        step_body(&mut body, &config, &canvas());
        assert_eq!(body.radius, 5.0);
        assert!(body.growing);
        step_body(&mut body, &config, &canvas());
        step_body(&mut body, &config, &canvas());
        assert_eq!(body.radius, 10.0);
        assert!(!body.growing);
    }

    #[test]
    fn test_bounce_right_edge() {
        let config = no_forces();
        let mut body = Body::new(1, Vec2::new(90.0, 50.0), 5.0, Color::RED);
        body.vel = Vec2::new(10.0, 0.0);
        step_body(&mut body, &config, &canvas());
        assert_eq!(body.pos.x, 95.0);
        assert!((body.vel.x - -8.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_floor_with_gravity() {
        let config = PhysicsConfig {
            gravity_y: 2.0,
            damping_factor: 1.0,
            ..PhysicsConfig::default()
        };
        let mut body = Body::new(1, Vec2::new(50.0, 94.0), 5.0, Color::RED);
        body.vel = Vec2::new(0.0, 3.0);
        step_body(&mut body, &config, &canvas());
        assert_eq!(body.pos.y, 95.0);
        assert!(body.vel.y < 0.0);
    }

    #[test]
    fn test_integrate_reports_expired() {
        let config = PhysicsConfig {
            lifetime_decay: 1.0,
            ..no_forces()
        };
        let mut bodies = vec![
            Body::new(1, Vec2::new(20.0, 20.0), 5.0, Color::RED),
            Body::particle(2, Vec2::new(20.0, 20.0), Vec2::Y, 2.0, Color::RED),
        ];
        let expired = integrate(&mut bodies, &config, &canvas());
        assert_eq!(expired, vec![2]);
        assert_eq!(bodies.len(), 2);
    }
}
