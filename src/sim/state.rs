//! Simulation state and entity management
//!
//! Everything one game session mutates lives here. Bodies and particles share
//! one id space; wave entities use the wave field's own ids.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, sane_radius, spawn_burst};
use super::collision::{bodies_mix, resolve_collisions, split_body};
use super::population::{Admission, insert_capped};
use super::snapshot::{EntityView, Snapshot};
use super::wave::{WaveEvent, WaveField};
use crate::clamp_to_canvas;
use crate::color::{Color, Scorer};
use crate::config::{MixSource, SimConfig};

/// Notable things that happened during a tick, for UI feedback hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Two bodies merged at `pos` into body `merged`
    Merged {
        consumed: (u32, u32),
        merged: u32,
        pos: Vec2,
        color: Color,
        radius: f32,
    },
    Split {
        parent: u32,
        children: (u32, u32),
        pos: Vec2,
        color: Color,
    },
    /// A body's lifetime ran out
    Expired { id: u32 },
    /// A body was evicted by the population cap
    Evicted { id: u32 },
    Wave(WaveEvent),
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected randomness (split axes, burst spray)
    pub rng: Pcg32,
    pub config: SimConfig,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Solid bodies (sorted by id for determinism)
    pub bodies: Vec<Body>,
    /// Visual-only burst particles
    pub particles: Vec<Body>,
    pub field: WaveField,
    /// Target color and accuracy threshold of the current puzzle
    pub scorer: Option<Scorer>,
    /// Color shown to the player (from bodies or waves per config)
    pub mixed_color: Color,
    pub body_mix: Color,
    pub wave_mix: Color,
    /// Score of `mixed_color` against the target
    pub similarity: Option<f32>,
    events: Vec<SimEvent>,
    /// Next body id
    next_id: u32,
}

impl SimState {
    /// Create an empty session with the given seed
    pub fn new(seed: u64, config: SimConfig) -> Self {
        let config = config.sanitized();
        log::info!(
            "New {} session (seed {}, {}x{})",
            config.mode.as_str(),
            seed,
            config.canvas.width,
            config.canvas.height
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            time_ticks: 0,
            bodies: Vec::new(),
            particles: Vec::new(),
            field: WaveField::new(),
            scorer: None,
            mixed_color: Color::WHITE,
            body_mix: Color::WHITE,
            wave_mix: Color::WHITE,
            similarity: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new body id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Restart the level: drop every entity, keep config and target
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.particles.clear();
        self.field.clear();
        self.events.clear();
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.recompute_colors();
    }

    pub fn set_target(&mut self, target: Color, threshold: f32) {
        self.scorer = Some(Scorer::with_weights(
            target,
            threshold,
            self.config.similarity,
        ));
        self.recompute_colors();
    }

    pub fn clear_target(&mut self) {
        self.scorer = None;
        self.similarity = None;
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Spawn a body at `pos` (clamped inside the canvas)
    ///
    /// Returns `None` for a non-finite position or if the population cap
    /// rejected it.
    pub fn spawn_body(&mut self, pos: Vec2, radius: f32, color: Color) -> Option<u32> {
        if !pos.is_finite() {
            log::debug!("Ignoring body spawn at non-finite {:?}", pos);
            return None;
        }
        let id = self.next_entity_id();
        let canvas = self.config.canvas;
        let mut body = Body::new(id, pos, radius, color);
        body.pos = clamp_to_canvas(body.pos, body.radius, canvas.width, canvas.height);
        self.insert_body(body).accepted().then_some(id)
    }

    /// Spawn a body that starts small and grows to `radius`
    pub fn spawn_growing(&mut self, pos: Vec2, radius: f32, color: Color) -> Option<u32> {
        if !pos.is_finite() {
            log::debug!("Ignoring body spawn at non-finite {:?}", pos);
            return None;
        }
        let id = self.next_entity_id();
        let radius = sane_radius(radius);
        let start = (radius * 0.1).max(1.0).min(radius);
        let canvas = self.config.canvas;
        let mut body = Body::new(id, pos, radius, color).growing(start, radius);
        // Clamp for the final size so growth never pushes it off the canvas
        body.pos = clamp_to_canvas(body.pos, body.target_radius, canvas.width, canvas.height);
        self.insert_body(body).accepted().then_some(id)
    }

    /// Insert a body through the population cap
    pub fn insert_body(&mut self, body: Body) -> Admission {
        let id = body.id;
        let admission = insert_capped(&mut self.bodies, body, self.config.physics.max_bodies);
        match admission {
            Admission::Evicted(old) => self.events.push(SimEvent::Evicted { id: old }),
            Admission::Rejected => log::debug!("Body #{} rejected: population full", id),
            Admission::Inserted => {}
        }
        admission
    }

    /// Remove a body by id; the aggregate color is recomputed
    pub fn remove_body(&mut self, id: u32) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        let removed = self.bodies.len() != before;
        if removed {
            self.recompute_colors();
        }
        removed
    }

    /// Spray a burst of particles (merge/split feedback)
    pub fn burst(&mut self, pos: Vec2, color: Color) {
        let count = self.config.physics.burst_particles;
        let cap = self.config.physics.max_particles;
        let next_id = &mut self.next_id;
        let spray = spawn_burst(&mut self.rng, pos, color, count, || {
            let id = *next_id;
            *next_id += 1;
            id
        });
        for particle in spray {
            insert_capped(&mut self.particles, particle, cap);
        }
    }

    pub fn begin_drag(&mut self, id: u32) -> bool {
        match self.body_mut(id) {
            Some(body) if body.is_solid() => {
                body.dragging = true;
                body.vel = Vec2::ZERO;
                true
            }
            _ => {
                log::debug!("Ignoring drag of unknown body #{}", id);
                false
            }
        }
    }

    /// Move a dragged body (out-of-band position write from input)
    pub fn drag_to(&mut self, id: u32, pos: Vec2) -> bool {
        let canvas = self.config.canvas;
        match self.body_mut(id) {
            Some(body) if body.dragging && pos.is_finite() => {
                body.pos = clamp_to_canvas(pos, body.radius, canvas.width, canvas.height);
                true
            }
            _ => false,
        }
    }

    /// Release a dragged body with a fling velocity
    pub fn end_drag(&mut self, id: u32, release_vel: Vec2) -> bool {
        match self.body_mut(id) {
            Some(body) if body.dragging => {
                body.dragging = false;
                body.vel = if release_vel.is_finite() {
                    release_vel
                } else {
                    Vec2::ZERO
                };
                true
            }
            _ => false,
        }
    }

    /// Split a body in two; ignored below the minimum radius
    pub fn split(&mut self, id: u32) -> Option<(u32, u32)> {
        let parent = self.body(id)?.clone();
        let ids = (self.next_id, self.next_id + 1);
        let Some(children) = split_body(&parent, &self.config.physics, &mut self.rng, ids) else {
            log::debug!(
                "Ignoring split of #{} (r={:.1} <= {:.1})",
                id,
                parent.radius,
                self.config.physics.min_split_radius
            );
            return None;
        };
        self.next_id += 2;

        self.bodies.retain(|b| b.id != id);
        for child in children {
            self.insert_body(child);
        }
        self.events.push(SimEvent::Split {
            parent: id,
            children: ids,
            pos: parent.pos,
            color: parent.color,
        });
        self.burst(parent.pos, parent.color);
        log::trace!("Split #{} -> #{} + #{}", id, ids.0, ids.1);
        Some(ids)
    }

    /// Collision pass: separate shallow overlaps, merge deep ones
    ///
    /// Consumed bodies are removed after the pass; merged bodies go through
    /// the population cap and trigger a `Merged` event plus a burst. Every
    /// body ends the pass inside the canvas.
    pub fn collide_bodies(&mut self) {
        let next_id = &mut self.next_id;
        let merges = resolve_collisions(&mut self.bodies, &self.config.physics, || {
            let id = *next_id;
            *next_id += 1;
            id
        });

        for record in merges {
            let (a, b) = record.consumed;
            self.bodies.retain(|body| body.id != a && body.id != b);

            let merged = record.merged;
            let (id, pos, color, radius) = (merged.id, merged.pos, merged.color, merged.radius);
            self.insert_body(merged);
            self.events.push(SimEvent::Merged {
                consumed: (a, b),
                merged: id,
                pos,
                color,
                radius,
            });
            self.burst(pos, color);
        }

        // Separation pushes happen after the canvas bounce
        let canvas = self.config.canvas;
        for body in &mut self.bodies {
            body.pos = clamp_to_canvas(body.pos, body.radius, canvas.width, canvas.height);
        }
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Events since the last drain (merge/split hooks, evictions, waves)
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Refresh aggregate colors and the similarity score
    pub fn recompute_colors(&mut self) {
        self.body_mix = bodies_mix(&self.bodies);
        self.wave_mix = self.field.mix();
        self.mixed_color = match self.config.mix_source {
            MixSource::Bodies => self.body_mix,
            MixSource::Waves => self.wave_mix,
        };
        self.similarity = self.scorer.map(|s| s.score(self.mixed_color));
    }

    /// Whether the current mix meets the puzzle threshold
    pub fn is_solved(&self) -> Option<bool> {
        self.scorer.map(|s| s.is_match(self.mixed_color))
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
        self.particles.sort_by_key(|p| p.id);
        self.field.waves.sort_by_key(|w| w.id);
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        let body_view = |b: &Body| EntityView {
            id: b.id,
            pos: b.pos,
            radius: b.radius,
            color: b.color,
            opacity: b.lifetime.unwrap_or(1.0),
        };
        Snapshot {
            tick: self.time_ticks,
            mixed_color: self.mixed_color,
            body_mix: self.body_mix,
            wave_mix: self.wave_mix,
            similarity: self.similarity,
            solved: self.is_solved(),
            bodies: self.bodies.iter().map(body_view).collect(),
            particles: self.particles.iter().map(body_view).collect(),
            waves: self
                .field
                .waves
                .iter()
                .map(|w| EntityView {
                    id: w.id,
                    pos: w.pos,
                    radius: w.radius,
                    color: w.color,
                    opacity: w.opacity,
                })
                .collect(),
            obstacles: self
                .field
                .obstacles
                .iter()
                .map(|o| EntityView {
                    id: o.id,
                    pos: o.pos,
                    radius: o.radius,
                    color: o.color,
                    opacity: 1.0,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameMode;

    fn state() -> SimState {
        SimState::new(12345, SimConfig::for_mode(GameMode::Bubbles))
    }

    #[test]
    fn test_spawn_clamps_inside_canvas() {
        let mut state = state();
        let id = state.spawn_body(Vec2::new(-50.0, 5000.0), 10.0, Color::RED).unwrap();
        let body = state.body(id).unwrap();
        assert_eq!(body.pos.x, 10.0);
        assert_eq!(body.pos.y, state.config.canvas.height - 10.0);
    }

    #[test]
    fn test_population_cap_evicts_oldest_unpinned() {
        let mut config = SimConfig::for_mode(GameMode::Bubbles);
        config.physics.max_bodies = 3;
        let mut state = SimState::new(1, config);

        let first = state.spawn_body(Vec2::new(50.0, 50.0), 5.0, Color::RED).unwrap();
        state.bodies[0].pinned = true;
        let second = state.spawn_body(Vec2::new(100.0, 50.0), 5.0, Color::RED).unwrap();
        state.spawn_body(Vec2::new(150.0, 50.0), 5.0, Color::RED).unwrap();
        state.spawn_body(Vec2::new(200.0, 50.0), 5.0, Color::RED).unwrap();

        assert_eq!(state.bodies.len(), 3);
        assert!(state.body(first).is_some());
        assert!(state.body(second).is_none());
        assert_eq!(state.drain_events(), vec![SimEvent::Evicted { id: second }]);
    }

    #[test]
    fn test_spawn_rejects_non_finite_position() {
        let mut state = state();
        assert_eq!(state.spawn_body(Vec2::new(f32::NAN, 100.0), 10.0, Color::RED), None);
        assert_eq!(state.spawn_growing(Vec2::new(5.0, f32::INFINITY), 10.0, Color::RED), None);
        assert!(state.bodies.is_empty());
    }

    #[test]
    fn test_spawn_sanitizes_bad_radius() {
        let mut state = state();
        let grown = state.spawn_growing(Vec2::new(100.0, 100.0), f32::NAN, Color::RED).unwrap();
        let body = state.body(grown).unwrap();
        assert!(body.radius.is_finite() && body.target_radius.is_finite());
        assert!(body.pos.is_finite());

        let flat = state.spawn_body(Vec2::new(100.0, 300.0), f32::INFINITY, Color::BLUE).unwrap();
        assert_eq!(state.body(flat).unwrap().radius, 0.0);
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut state = state();
        let id = state.spawn_body(Vec2::new(100.0, 100.0), 10.0, Color::RED).unwrap();

        assert!(!state.drag_to(id, Vec2::new(10.0, 10.0)));
        assert!(state.begin_drag(id));
        assert!(state.drag_to(id, Vec2::new(-100.0, 120.0)));
        assert_eq!(state.body(id).unwrap().pos, Vec2::new(10.0, 120.0));
        assert!(state.end_drag(id, Vec2::new(3.0, 0.0)));
        let body = state.body(id).unwrap();
        assert!(!body.dragging);
        assert_eq!(body.vel, Vec2::new(3.0, 0.0));

        assert!(!state.begin_drag(999));
    }

    #[test]
    fn test_split_replaces_parent_and_emits() {
        let mut state = state();
        let id = state.spawn_body(Vec2::new(200.0, 200.0), 40.0, Color::BLUE).unwrap();
        let (a, b) = state.split(id).unwrap();

        assert!(state.body(id).is_none());
        assert!(state.body(a).is_some() && state.body(b).is_some());
        assert_eq!(state.particles.len(), state.config.physics.burst_particles);
        assert!(matches!(
            state.drain_events().as_slice(),
            [SimEvent::Split { parent, .. }] if *parent == id
        ));
    }

    #[test]
    fn test_split_small_body_ignored() {
        let mut state = state();
        let id = state.spawn_body(Vec2::new(200.0, 200.0), 20.0, Color::BLUE).unwrap();
        assert!(state.split(id).is_none());
        assert!(state.body(id).is_some());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_remove_recomputes_mix() {
        let mut state = state();
        let red = state.spawn_body(Vec2::new(50.0, 50.0), 10.0, Color::RED).unwrap();
        state.spawn_body(Vec2::new(200.0, 50.0), 10.0, Color::YELLOW).unwrap();
        state.recompute_colors();
        assert_eq!(state.mixed_color, Color::rgb(255, 128, 0));

        assert!(state.remove_body(red));
        assert_eq!(state.mixed_color, Color::YELLOW);
        assert!(!state.remove_body(red));
    }

    #[test]
    fn test_target_similarity() {
        let mut state = state();
        state.spawn_body(Vec2::new(50.0, 50.0), 10.0, Color::RED).unwrap();
        state.set_target(Color::RED, 0.9);
        assert_eq!(state.similarity, Some(1.0));
        assert_eq!(state.is_solved(), Some(true));

        state.clear_target();
        assert_eq!(state.similarity, None);
        assert_eq!(state.is_solved(), None);
    }

    #[test]
    fn test_reset_clears_entities() {
        let mut state = state();
        state.spawn_body(Vec2::new(50.0, 50.0), 10.0, Color::RED);
        state.field.add_source(Vec2::ZERO, Color::RED, 1.0, 1.0);
        state.reset();
        assert!(state.bodies.is_empty());
        assert!(state.field.sources.is_empty());
        assert_eq!(state.mixed_color, Color::WHITE);
    }
}
