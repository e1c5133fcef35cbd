//! Fixed timestep simulation tick
//!
//! One tick runs, in order: input commands, body integration, collision
//! pass, wave step, aggregate color recompute, expired-entity cleanup.

use glam::Vec2;

use super::integrator::integrate;
use super::state::{SimEvent, SimState};
use crate::color::Color;

/// A single request from the input/UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SpawnBody {
        pos: Vec2,
        radius: f32,
        color: Color,
        /// Ramp the radius up from small instead of popping in
        grow: bool,
    },
    BeginDrag { id: u32 },
    DragTo { id: u32, pos: Vec2 },
    EndDrag { id: u32, release_vel: Vec2 },
    Split { id: u32 },
    Remove { id: u32 },
    SpawnWave {
        pos: Vec2,
        color: Color,
        speed: f32,
    },
    SpawnSource {
        pos: Vec2,
        color: Color,
        frequency: f32,
        speed: f32,
    },
    SpawnObstacle {
        pos: Vec2,
        radius: f32,
        color: Color,
        reflective: bool,
        absorptive: bool,
    },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn with(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }
}

/// Advance the simulation by one fixed timestep (`dt` seconds)
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.time_ticks += 1;

    for command in &input.commands {
        apply_command(state, command);
    }

    // --- INTEGRATION ---
    let canvas = state.config.canvas;
    let expired = integrate(&mut state.bodies, &state.config.physics, &canvas);
    integrate(&mut state.particles, &state.config.physics, &canvas);
    for id in expired {
        state.push_event(SimEvent::Expired { id });
    }

    // --- COLLISIONS ---
    state.collide_bodies();

    // --- WAVES ---
    let wave_events = state.field.step(dt, &state.config.waves, &canvas);
    for event in wave_events {
        state.push_event(SimEvent::Wave(event));
    }

    // --- AGGREGATE ---
    state.recompute_colors();

    // --- CLEANUP ---
    state.bodies.retain(|b| !b.is_expired());
    state.particles.retain(|p| !p.is_expired());

    // Ensure deterministic ordering
    state.normalize_order();
}

fn apply_command(state: &mut SimState, command: &Command) {
    match *command {
        Command::SpawnBody {
            pos,
            radius,
            color,
            grow,
        } => {
            if grow {
                state.spawn_growing(pos, radius, color);
            } else {
                state.spawn_body(pos, radius, color);
            }
        }
        Command::BeginDrag { id } => {
            state.begin_drag(id);
        }
        Command::DragTo { id, pos } => {
            state.drag_to(id, pos);
        }
        Command::EndDrag { id, release_vel } => {
            state.end_drag(id, release_vel);
        }
        Command::Split { id } => {
            state.split(id);
        }
        Command::Remove { id } => {
            state.remove_body(id);
        }
        Command::SpawnWave { pos, color, speed } => {
            state.field.spawn(pos, color, speed, &state.config.waves);
        }
        Command::SpawnSource {
            pos,
            color,
            frequency,
            speed,
        } => {
            state.field.add_source(pos, color, frequency, speed);
        }
        Command::SpawnObstacle {
            pos,
            radius,
            color,
            reflective,
            absorptive,
        } => {
            state
                .field
                .add_obstacle(pos, radius, color, reflective, absorptive);
        }
    }
}
