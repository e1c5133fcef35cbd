//! Expanding color wavefronts
//!
//! Sources emit circular fronts on a timer. Fronts grow, fade, bounce off
//! or get dampened by obstacles, and interfere where two fronts touch. The
//! aggregate color is an opacity/size weighted average of live fronts, which
//! approximates overlapping translucent rings rather than mixed pigment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::population::{Admission, Aged, insert_capped};
use super::ring::RecentRing;
use crate::color::{Color, mix_subtractive};
use crate::config::{Canvas, WaveConfig};

/// A circular front expanding from a point
#[derive(Debug, Clone)]
pub struct Wavefront {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Radius gained per tick (before the global speed modifier)
    pub speed: f32,
    pub opacity: f32,
    pub color: Color,
    /// Obstacles and fronts this front already interacted with
    pub collided: RecentRing,
    /// Field clock (seconds) at creation
    pub born_at: f32,
    /// Source whose position this front follows
    pub carried_by: Option<u32>,
}

impl Aged for Wavefront {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Wavefront {
    /// Weight in the aggregate color: opaque, large fronts dominate
    #[inline]
    pub fn mix_weight(&self) -> f32 {
        self.opacity.max(0.0) * (self.radius / 100.0).clamp(0.1, 2.0)
    }

    #[inline]
    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// Periodic emitter of wavefronts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSource {
    pub id: u32,
    pub pos: Vec2,
    /// Units per second; moving sources bounce inside the canvas
    pub vel: Vec2,
    pub color: Color,
    /// Emissions per second; <= 0 never emits
    pub frequency: f32,
    /// Initial speed of emitted fronts
    pub speed: f32,
    /// Emitted fronts move with the source
    pub carries_fronts: bool,
    #[serde(skip)]
    accumulator: f32,
}

impl WaveSource {
    pub fn new(id: u32, pos: Vec2, color: Color, frequency: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            color,
            frequency: if frequency.is_finite() { frequency } else { 0.0 },
            speed: if speed.is_finite() { speed.max(0.0) } else { 0.0 },
            carries_fronts: false,
            accumulator: 0.0,
        }
    }

    /// Accumulate `dt`; true when an emission is due (accumulator resets)
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.frequency <= 0.0 {
            return false;
        }
        self.accumulator += dt;
        if self.accumulator >= 1.0 / self.frequency {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    fn drift(&mut self, dt: f32, canvas: &Canvas) {
        if self.vel == Vec2::ZERO {
            return;
        }
        self.pos += self.vel * dt;
        if self.pos.x < 0.0 || self.pos.x > canvas.width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(0.0, canvas.width);
        }
        if self.pos.y < 0.0 || self.pos.y > canvas.height {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(0.0, canvas.height);
        }
    }
}

/// Static circle that reflects and/or absorbs fronts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Spawns a color-mixed child front on hit
    pub reflective: bool,
    /// Slows and fades the hitting front
    pub absorptive: bool,
}

/// Something that happened during a wave step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaveEvent {
    Emitted { source: u32, wave: u32 },
    Reflected { obstacle: u32, parent: u32, child: u32 },
    Absorbed { obstacle: u32, wave: u32 },
    Interfered { a: u32, b: u32, child: u32, at: Vec2 },
    Evicted { wave: u32 },
    /// A new front was dropped (throttle or dedup)
    Dropped { wave: u32 },
}

/// All sources, obstacles and live fronts of one game
#[derive(Debug, Clone, Default)]
pub struct WaveField {
    pub sources: Vec<WaveSource>,
    pub obstacles: Vec<Obstacle>,
    pub waves: Vec<Wavefront>,
    /// Seconds since the field started
    pub clock: f32,
    next_id: u32,
    /// Admission attempts while near capacity
    throttle_attempts: u32,
}

impl WaveField {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Add an emitter; a non-finite position is ignored
    pub fn add_source(
        &mut self,
        pos: Vec2,
        color: Color,
        frequency: f32,
        speed: f32,
    ) -> Option<u32> {
        if !pos.is_finite() {
            log::debug!("Ignoring wave source at non-finite {:?}", pos);
            return None;
        }
        let id = self.alloc_id();
        self.sources
            .push(WaveSource::new(id, pos, color, frequency, speed));
        Some(id)
    }

    pub fn add_obstacle(
        &mut self,
        pos: Vec2,
        radius: f32,
        color: Color,
        reflective: bool,
        absorptive: bool,
    ) -> Option<u32> {
        if !pos.is_finite() {
            log::debug!("Ignoring obstacle at non-finite {:?}", pos);
            return None;
        }
        let id = self.alloc_id();
        self.obstacles.push(Obstacle {
            id,
            pos,
            radius: super::body::sane_radius(radius),
            color,
            reflective,
            absorptive,
        });
        Some(id)
    }

    pub fn source_mut(&mut self, id: u32) -> Option<&mut WaveSource> {
        self.sources.iter_mut().find(|s| s.id == id)
    }

    /// Build a front owned by this field (not yet admitted)
    pub fn make_front(
        &mut self,
        pos: Vec2,
        color: Color,
        speed: f32,
        opacity: f32,
        radius: f32,
    ) -> Wavefront {
        Wavefront {
            id: self.alloc_id(),
            pos,
            radius: super::body::sane_radius(radius),
            speed: if speed.is_finite() { speed.max(0.0) } else { 0.0 },
            opacity: if opacity.is_finite() {
                opacity.clamp(0.0, 1.0)
            } else {
                0.0
            },
            color,
            collided: RecentRing::new(),
            born_at: self.clock,
            carried_by: None,
        }
    }

    /// Offer a front to the population: throttle near capacity, evict oldest
    pub fn admit(&mut self, wave: Wavefront, config: &WaveConfig) -> Admission {
        let cap = config.max_waves;
        let near_capacity = self.waves.len() as f32 >= config.throttle_ratio * cap as f32;

        if near_capacity {
            self.throttle_attempts += 1;
            if self.throttle_attempts % config.throttle_every.max(1) != 0 {
                log::trace!("Throttled front #{} ({} live)", wave.id, self.waves.len());
                return Admission::Rejected;
            }
        } else {
            self.throttle_attempts = 0;
        }

        insert_capped(&mut self.waves, wave, cap)
    }

    /// Spawn a front directly (player tap, scripted burst)
    ///
    /// Returns `None` for a non-finite position or when admission fails.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        color: Color,
        speed: f32,
        config: &WaveConfig,
    ) -> Option<u32> {
        if !pos.is_finite() {
            log::debug!("Ignoring wave spawn at non-finite {:?}", pos);
            return None;
        }
        let wave = self.make_front(
            pos,
            color,
            speed,
            config.base_opacity,
            config.base_radius,
        );
        let id = wave.id;
        self.admit(wave, config).accepted().then_some(id)
    }

    /// A recent front already sits near `pos`
    fn recently_emitted_near(&self, pos: Vec2, config: &WaveConfig) -> bool {
        self.waves.iter().any(|w| {
            self.clock - w.born_at < config.dedup_window
                && w.pos.distance(pos) < config.dedup_distance
        })
    }

    /// Advance source timers and emit due fronts
    pub fn emit(&mut self, dt: f32, config: &WaveConfig, canvas: &Canvas) -> Vec<WaveEvent> {
        let mut due = Vec::new();
        for source in &mut self.sources {
            source.drift(dt, canvas);
            if source.advance(dt) {
                due.push((
                    source.id,
                    source.pos,
                    source.color,
                    source.speed,
                    source.carries_fronts,
                ));
            }
        }

        let mut events = Vec::new();
        for (source_id, pos, color, speed, carried) in due {
            if self.recently_emitted_near(pos, config) {
                log::trace!("Source #{} emission deduplicated", source_id);
                continue;
            }
            let mut wave = self.make_front(
                pos,
                color,
                speed,
                config.base_opacity,
                config.base_radius,
            );
            if carried {
                wave.carried_by = Some(source_id);
            }
            let wave_id = wave.id;
            let admission = self.admit(wave, config);
            if admission.accepted() {
                events.push(WaveEvent::Emitted {
                    source: source_id,
                    wave: wave_id,
                });
            }
            push_admission(&mut events, wave_id, admission);
        }
        events
    }

    /// Grow and fade every front; carried fronts follow their source
    pub fn grow(&mut self, config: &WaveConfig) {
        for wave in &mut self.waves {
            wave.radius += wave.speed * config.speed_modifier;
            wave.opacity = (wave.opacity - config.opacity_decay).max(0.0);
            if let Some(source) = wave
                .carried_by
                .and_then(|id| self.sources.iter().find(|s| s.id == id))
            {
                wave.pos = source.pos;
            }
        }
    }

    /// Resolve front vs obstacle hits, at most once per pair
    ///
    /// Returns reflected children (not yet admitted) and events.
    pub fn collide_obstacles(&mut self, config: &WaveConfig) -> (Vec<Wavefront>, Vec<WaveEvent>) {
        let mut children = Vec::new();
        let mut events = Vec::new();

        for wi in 0..self.waves.len() {
            for oi in 0..self.obstacles.len() {
                let obstacle = &self.obstacles[oi];
                let wave = &self.waves[wi];
                if wave.collided.contains(obstacle.id)
                    || wave.pos.distance(obstacle.pos) > obstacle.radius + wave.radius
                {
                    continue;
                }

                let (ob_id, ob_pos, ob_color) = (obstacle.id, obstacle.pos, obstacle.color);
                let (reflective, absorptive) = (obstacle.reflective, obstacle.absorptive);
                let (parent_id, parent_color) = (wave.id, wave.color);
                let (speed, opacity) = (wave.speed, wave.opacity);

                self.waves[wi].collided.insert(ob_id);
                let inherited = self.waves[wi].collided;

                if reflective {
                    let mut child = self.make_front(
                        ob_pos,
                        mix_subtractive(&[parent_color, ob_color]),
                        speed * config.reflect_factor,
                        opacity * config.reflect_factor,
                        config.base_radius,
                    );
                    child.collided = inherited;
                    // Parent and child never interfere with each other
                    child.collided.insert(parent_id);
                    self.waves[wi].collided.insert(child.id);
                    events.push(WaveEvent::Reflected {
                        obstacle: ob_id,
                        parent: parent_id,
                        child: child.id,
                    });
                    children.push(child);
                }

                if absorptive {
                    let wave = &mut self.waves[wi];
                    wave.speed *= config.absorb_factor;
                    wave.opacity *= config.absorb_factor;
                    events.push(WaveEvent::Absorbed {
                        obstacle: ob_id,
                        wave: parent_id,
                    });
                }
            }
        }

        (children, events)
    }

    /// Resolve front vs front touches, at most once per pair
    pub fn interfere(&mut self, config: &WaveConfig) -> (Vec<Wavefront>, Vec<WaveEvent>) {
        let mut touching = Vec::new();
        for i in 0..self.waves.len() {
            for j in (i + 1)..self.waves.len() {
                let (a, b) = (&self.waves[i], &self.waves[j]);
                if a.collided.contains(b.id) || b.collided.contains(a.id) {
                    continue;
                }
                let gap = a.pos.distance(b.pos) - (a.radius + b.radius);
                if gap.abs() < config.touch_tolerance {
                    touching.push((i, j));
                }
            }
        }

        let mut children = Vec::new();
        let mut events = Vec::new();
        for (i, j) in touching {
            let (a_id, b_id) = (self.waves[i].id, self.waves[j].id);
            self.waves[i].collided.insert(b_id);
            self.waves[j].collided.insert(a_id);

            let (a, b) = (&self.waves[i], &self.waves[j]);
            let at = a.pos + (b.pos - a.pos).normalize_or_zero() * a.radius;
            let color = mix_subtractive(&[a.color, b.color]);
            let speed = (a.speed + b.speed) * 0.5;
            let opacity = (a.opacity + b.opacity) * 0.5;

            let mut child = self.make_front(at, color, speed, opacity, config.base_radius);
            child.collided.insert(a_id);
            child.collided.insert(b_id);
            events.push(WaveEvent::Interfered {
                a: a_id,
                b: b_id,
                child: child.id,
                at,
            });
            children.push(child);
        }

        (children, events)
    }

    /// Drop faded fronts
    pub fn cleanup(&mut self) -> usize {
        let before = self.waves.len();
        self.waves.retain(|w| !w.is_faded());
        before - self.waves.len()
    }

    /// One full tick: emission, growth, obstacle hits, interference, cleanup
    pub fn step(&mut self, dt: f32, config: &WaveConfig, canvas: &Canvas) -> Vec<WaveEvent> {
        self.clock += dt;

        let mut events = self.emit(dt, config, canvas);
        self.grow(config);

        let (mut children, hit_events) = self.collide_obstacles(config);
        events.extend(hit_events);

        if config.interference_enabled {
            let (more, interfere_events) = self.interfere(config);
            children.extend(more);
            events.extend(interfere_events);
        }

        for child in children {
            let id = child.id;
            let admission = self.admit(child, config);
            push_admission(&mut events, id, admission);
        }

        self.cleanup();
        events
    }

    /// Weighted average color of live fronts (white when none are visible)
    pub fn mix(&self) -> Color {
        let mut total = 0.0;
        let mut acc = [0.0f32; 3];
        for wave in &self.waves {
            let w = wave.mix_weight();
            if w <= 0.0 {
                continue;
            }
            for (sum, ch) in acc.iter_mut().zip(wave.color.channels()) {
                *sum += ch as f32 * w;
            }
            total += w;
        }
        if total <= 0.0 {
            return Color::WHITE;
        }
        Color::from_f32_channels(acc[0] / total, acc[1] / total, acc[2] / total)
    }

    /// Remove every entity (level restart)
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

fn push_admission(events: &mut Vec<WaveEvent>, wave: u32, admission: Admission) {
    match admission {
        Admission::Inserted => {}
        Admission::Evicted(old) => events.push(WaveEvent::Evicted { wave: old }),
        Admission::Rejected => events.push(WaveEvent::Dropped { wave }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas {
            width: 500.0,
            height: 500.0,
        }
    }

    fn config() -> WaveConfig {
        WaveConfig {
            opacity_decay: 0.0,
            ..WaveConfig::default()
        }
    }

    fn place(field: &mut WaveField, pos: Vec2, radius: f32, opacity: f32, color: Color) -> u32 {
        let wave = field.make_front(pos, color, 2.0, opacity, radius);
        let id = wave.id;
        field.waves.push(wave);
        id
    }

    #[test]
    fn test_reflective_hit_spawns_one_child() {
        let mut field = WaveField::new();
        let cfg = config();
        let ob = field
            .add_obstacle(Vec2::new(100.0, 0.0), 10.0, Color::YELLOW, true, false)
            .unwrap();
        let parent = place(&mut field, Vec2::ZERO, 95.0, 0.7, Color::RED);

        let (children, events) = field.collide_obstacles(&cfg);
        assert_eq!(children.len(), 1);
        let child = &children[0];
        assert!((child.opacity - 0.63).abs() < 1e-5);
        assert!((child.speed - 1.8).abs() < 1e-5);
        assert_eq!(child.pos, Vec2::new(100.0, 0.0));
        assert_eq!(child.color, Color::rgb(255, 128, 0));
        assert!(child.collided.contains(ob));
        assert!(child.collided.contains(parent));
        assert!(field.waves[0].collided.contains(child.id));
        assert_eq!(
            events,
            vec![WaveEvent::Reflected {
                obstacle: ob,
                parent,
                child: child.id
            }]
        );

        // Parent untouched and never re-collides with the same obstacle
        assert_eq!(field.waves.len(), 1);
        assert!((field.waves[0].opacity - 0.7).abs() < 1e-6);
        let (again, _) = field.collide_obstacles(&cfg);
        assert!(again.is_empty());
    }

    #[test]
    fn test_single_reflection_over_many_ticks() {
        let mut field = WaveField::new();
        let cfg = config();
        field
            .add_obstacle(Vec2::new(200.0, 100.0), 30.0, Color::YELLOW, true, false)
            .unwrap();
        field.spawn(Vec2::new(100.0, 100.0), Color::RED, 1.2, &cfg).unwrap();

        let mut reflected = 0;
        let mut interfered = 0;
        for _ in 0..600 {
            for event in field.step(1.0 / 60.0, &cfg, &canvas()) {
                match event {
                    WaveEvent::Reflected { .. } => reflected += 1,
                    WaveEvent::Interfered { .. } => interfered += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(reflected, 1);
        assert_eq!(interfered, 0);
        assert_eq!(field.waves.len(), 2);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let mut field = WaveField::new();
        let cfg = config();
        let nan = Vec2::new(f32::NAN, 10.0);
        assert_eq!(field.spawn(nan, Color::RED, 1.0, &cfg), None);
        assert_eq!(field.add_source(nan, Color::RED, 1.0, 1.0), None);
        assert_eq!(
            field.add_obstacle(Vec2::INFINITY, 10.0, Color::RED, true, true),
            None
        );
        assert!(field.waves.is_empty() && field.sources.is_empty());
        assert!(field.obstacles.is_empty());

        let id = field.spawn(Vec2::ZERO, Color::RED, f32::NAN, &cfg).unwrap();
        assert_eq!(field.waves[0].id, id);
        assert_eq!(field.waves[0].speed, 0.0);
        let front = field.make_front(Vec2::ZERO, Color::RED, f32::INFINITY, f32::NAN, 5.0);
        assert_eq!((front.speed, front.opacity), (0.0, 0.0));
    }

    #[test]
    fn test_absorptive_hit_attenuates_in_place() {
        let mut field = WaveField::new();
        let cfg = config();
        field.add_obstacle(Vec2::new(50.0, 0.0), 10.0, Color::BLUE, false, true);
        place(&mut field, Vec2::ZERO, 45.0, 1.0, Color::RED);

        let (children, events) = field.collide_obstacles(&cfg);
        assert!(children.is_empty());
        assert_eq!(events.len(), 1);
        let wave = &field.waves[0];
        assert!((wave.opacity - 0.7).abs() < 1e-6);
        assert!((wave.speed - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_reflective_and_absorptive_both_fire() {
        let mut field = WaveField::new();
        let cfg = config();
        field.add_obstacle(Vec2::new(50.0, 0.0), 10.0, Color::BLUE, true, true);
        place(&mut field, Vec2::ZERO, 45.0, 1.0, Color::RED);

        let (children, events) = field.collide_obstacles(&cfg);
        assert_eq!(children.len(), 1);
        assert_eq!(events.len(), 2);
        // Child inherits from pre-absorption values
        assert!((children[0].opacity - 0.9).abs() < 1e-6);
        assert!((field.waves[0].opacity - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_inert_obstacle_only_marks() {
        let mut field = WaveField::new();
        let cfg = config();
        let ob = field
            .add_obstacle(Vec2::new(50.0, 0.0), 10.0, Color::BLUE, false, false)
            .unwrap();
        place(&mut field, Vec2::ZERO, 45.0, 1.0, Color::RED);
        let (children, events) = field.collide_obstacles(&cfg);
        assert!(children.is_empty() && events.is_empty());
        assert!(field.waves[0].collided.contains(ob));
    }

    #[test]
    fn test_touching_fronts_interfere_once() {
        let mut field = WaveField::new();
        let cfg = config();
        let a = place(&mut field, Vec2::ZERO, 50.0, 0.8, Color::RED);
        let b = place(&mut field, Vec2::new(100.5, 0.0), 50.0, 0.4, Color::YELLOW);

        let (children, events) = field.interfere(&cfg);
        assert_eq!(children.len(), 1);
        let child = &children[0];
        assert_eq!(child.pos, Vec2::new(50.0, 0.0));
        assert_eq!(child.color, Color::rgb(255, 128, 0));
        assert!((child.opacity - 0.6).abs() < 1e-6);
        assert!((child.speed - 2.0).abs() < 1e-6);
        assert!(matches!(
            events[0],
            WaveEvent::Interfered { a: ea, b: eb, .. } if ea == a && eb == b
        ));

        let (again, _) = field.interfere(&cfg);
        assert!(again.is_empty());
    }

    #[test]
    fn test_overlapping_fronts_do_not_interfere() {
        let mut field = WaveField::new();
        let cfg = config();
        place(&mut field, Vec2::ZERO, 50.0, 1.0, Color::RED);
        place(&mut field, Vec2::new(60.0, 0.0), 50.0, 1.0, Color::BLUE);
        let (children, _) = field.interfere(&cfg);
        assert!(children.is_empty());
    }

    #[test]
    fn test_source_emits_on_interval() {
        let mut field = WaveField::new();
        let cfg = config();
        field.add_source(Vec2::new(100.0, 100.0), Color::RED, 2.0, 1.0);

        let mut emitted = 0;
        for _ in 0..10 {
            let events = field.emit(0.1, &cfg, &canvas());
            emitted += events
                .iter()
                .filter(|e| matches!(e, WaveEvent::Emitted { .. }))
                .count();
            field.clock += 0.1;
        }
        // Every 0.5 s over 1 s
        assert_eq!(emitted, 2);
        assert_eq!(field.waves.len(), 2);
    }

    #[test]
    fn test_zero_frequency_never_emits() {
        let mut field = WaveField::new();
        let cfg = config();
        field.add_source(Vec2::ZERO, Color::RED, 0.0, 1.0);
        field.add_source(Vec2::ONE, Color::RED, -3.0, 1.0);
        for _ in 0..100 {
            field.step(1.0, &cfg, &canvas());
        }
        assert!(field.waves.is_empty());
    }

    #[test]
    fn test_dedup_suppresses_coincident_emission() {
        let mut field = WaveField::new();
        let cfg = config();
        // Two sources at the same point firing together
        field.add_source(Vec2::new(10.0, 10.0), Color::RED, 10.0, 1.0);
        field.add_source(Vec2::new(11.0, 10.0), Color::BLUE, 10.0, 1.0);
        field.emit(0.1, &cfg, &canvas());
        assert_eq!(field.waves.len(), 1);
    }

    #[test]
    fn test_throttle_accepts_every_third_near_capacity() {
        let mut field = WaveField::new();
        let cfg = WaveConfig {
            max_waves: 10,
            throttle_ratio: 0.5,
            throttle_every: 3,
            ..config()
        };
        for i in 0..5 {
            assert!(field.spawn(Vec2::new(i as f32 * 50.0, 0.0), Color::RED, 1.0, &cfg).is_some());
        }
        // At 5/10 every admission is throttled except the third
        let results: Vec<bool> = (0..3)
            .map(|_| field.spawn(Vec2::ZERO, Color::RED, 1.0, &cfg).is_some())
            .collect();
        assert_eq!(results, vec![false, false, true]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut field = WaveField::new();
        let cfg = WaveConfig {
            max_waves: 3,
            throttle_ratio: 1.0,
            throttle_every: 1,
            ..config()
        };
        let first = field.spawn(Vec2::ZERO, Color::RED, 1.0, &cfg).unwrap();
        for _ in 0..5 {
            field.spawn(Vec2::ZERO, Color::RED, 1.0, &cfg);
            assert!(field.waves.len() <= 3);
        }
        assert!(field.waves.iter().all(|w| w.id != first));
    }

    #[test]
    fn test_fronts_grow_fade_and_die() {
        let mut field = WaveField::new();
        let cfg = WaveConfig {
            opacity_decay: 0.25,
            speed_modifier: 2.0,
            ..WaveConfig::default()
        };
        place(&mut field, Vec2::ZERO, 10.0, 1.0, Color::RED);
        field.step(0.016, &cfg, &canvas());
        assert_eq!(field.waves[0].radius, 14.0);
        assert!((field.waves[0].opacity - 0.75).abs() < 1e-6);
        for _ in 0..3 {
            field.step(0.016, &cfg, &canvas());
        }
        assert!(field.waves.is_empty());
    }

    #[test]
    fn test_carried_fronts_follow_source() {
        let mut field = WaveField::new();
        let cfg = config();
        let src = field
            .add_source(Vec2::new(100.0, 100.0), Color::RED, 100.0, 1.0)
            .unwrap();
        {
            let source = field.source_mut(src).unwrap();
            source.carries_fronts = true;
            source.vel = Vec2::new(60.0, 0.0);
        }
        field.step(0.05, &cfg, &canvas());
        assert_eq!(field.waves.len(), 1);
        field.step(0.005, &cfg, &canvas());
        let source_pos = field.sources[0].pos;
        assert!((field.waves[0].pos - source_pos).length() < 1e-4);
    }

    #[test]
    fn test_mix_weights_by_opacity_and_size() {
        let mut field = WaveField::new();
        assert_eq!(field.mix(), Color::WHITE);

        place(&mut field, Vec2::ZERO, 200.0, 1.0, Color::RED);
        place(&mut field, Vec2::ZERO, 10.0, 1.0, Color::BLUE);
        let mixed = field.mix();
        // weights 2.0 vs 0.1
        assert!(mixed.r > 230 && mixed.b < 20);
    }

    #[test]
    fn test_mix_is_average_not_subtractive() {
        let mut field = WaveField::new();
        place(&mut field, Vec2::ZERO, 100.0, 1.0, Color::RED);
        place(&mut field, Vec2::new(300.0, 0.0), 100.0, 1.0, Color::BLUE);
        assert_eq!(field.mix(), Color::rgb(128, 0, 128));
    }
}
