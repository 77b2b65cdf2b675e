//! # Fireworks - firework particle simulation core
//!
//! A capacity-bounded pool of firework particles that a renderer can step and
//! read once per frame. Rockets climb, burst into sparks or rings, and some
//! sparks burst again, all under gravity, drag, and a drifting wind.
//!
//! The crate knows nothing about windows or graphics APIs. A host calls
//! [`FireworkSystem::simulate_to`] with the current time, then
//! [`FireworkSystem::fill_buffer`] to get a flat `f32` vertex array to upload.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fireworks::prelude::*;
//!
//! let clock = FrameClock::new();
//! let mut system = FireworkSystem::new(clock.now(), 1.0, 10_000, 10);
//! let mut buffer = vec![0.0f32; system.max_particles() * FLOATS_PER_PARTICLE];
//!
//! loop {
//!     system.simulate_to(clock.now());
//!     let count = system.fill_buffer(&mut buffer);
//!     // upload buffer[..count * FLOATS_PER_PARTICLE] and draw `count` points
//! }
//! ```
//!
//! ## Particle Kinds
//!
//! | Kind | Lifetime | Explodes into |
//! |------|----------|---------------|
//! | [`ParticleKind::Rocket`] | 4 s | 100 primary sparks, or a ring of 32 |
//! | [`ParticleKind::PrimarySpark`] | 15 s | 40 secondary sparks, once, when slow |
//! | [`ParticleKind::SecondarySpark`] | 8 s | - |
//! | [`ParticleKind::RingSpark`] | 8 s | - |
//!
//! Counts and trigger thresholds live in [`ExplosionPolicy`]; launch cadence
//! and capacity live in [`SimulationConfig`].
//!
//! ## Capacity
//!
//! The pool never holds more than `max_particles`. Children and rockets that
//! do not fit are dropped silently; nothing is queued or evicted.

pub mod config;
pub mod error;
pub mod explosion;
pub mod particle;
pub mod random;
pub mod shared;
pub mod system;
pub mod time;
pub mod vertex;

pub use config::{LauncherConfig, SimulationConfig, MAX_PARTICLE_CAPACITY};
pub use error::ConfigError;
pub use explosion::{Explosion, ExplosionPolicy, ExplosionShape, Trigger};
pub use glam::Vec3;
pub use particle::{Particle, ParticleKind};
pub use shared::SharedFireworks;
pub use system::{wind_at, FireworkSystem, StepReport};
pub use time::FrameClock;
pub use vertex::{
    fill_buffer, ParticleVertex, VertexAttribute, FLOATS_PER_PARTICLE, VERTEX_ATTRIBUTES,
};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use fireworks::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{LauncherConfig, SimulationConfig};
    pub use crate::explosion::ExplosionPolicy;
    pub use crate::particle::{Particle, ParticleKind};
    pub use crate::shared::SharedFireworks;
    pub use crate::system::{FireworkSystem, StepReport};
    pub use crate::time::FrameClock;
    pub use crate::vertex::{ParticleVertex, FLOATS_PER_PARTICLE};
    pub use crate::Vec3;
}
