//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod integrator;
pub mod population;
pub mod ring;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use body::{Body, BodyPhase, spawn_burst};
pub use collision::{
    CollisionResult, circle_collision, merge_bodies, merged_radius, resolve_collisions,
    split_body, split_radius,
};
pub use integrator::{StepOutcome, integrate, step_body};
pub use population::{Admission, Aged, insert_capped};
pub use ring::RecentRing;
pub use snapshot::{EntityView, Snapshot};
pub use state::{SimEvent, SimState};
pub use tick::{Command, TickInput, tick};
pub use wave::{Obstacle, WaveEvent, WaveField, WaveSource, Wavefront};
