//! Simulation configuration.
//!
//! [`SimulationConfig`] collects every tunable of a firework show: pool
//! capacity, how many rockets are pre-seeded, the launch cadence, and the
//! [`ExplosionPolicy`]. It is serde-backed so a host can keep presets on disk.
//!
//! ```ignore
//! let config = SimulationConfig::new()
//!     .max_particles(20_000)
//!     .particle_rate(2.0)
//!     .launcher(LauncherConfig::new().rockets_per_burst(3))
//!     .explosion(ExplosionPolicy::new().ring_probability(0.3));
//!
//! config.save("show.json")?;
//! let same = SimulationConfig::load("show.json")?;
//! ```

use crate::error::ConfigError;
use crate::explosion::ExplosionPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest accepted `max_particles`.
///
/// [`SharedFireworks`](crate::SharedFireworks) allocates a vertex arena for the
/// full capacity up front; at this cap the arena is 192 MiB.
pub const MAX_PARTICLE_CAPACITY: usize = 1 << 22;

/// Rocket launcher cadence.
///
/// Rockets go up in bursts: `rockets_per_burst` launches spaced
/// `burst_interval` apart, then a pause of `burst_gap`. Both intervals are
/// divided by the system's particle rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Rockets launched per burst.
    pub rockets_per_burst: u32,
    /// Seconds between launches inside a burst.
    pub burst_interval: f64,
    /// Seconds between the last launch of a burst and the next burst.
    pub burst_gap: f64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LauncherConfig {
    pub fn new() -> Self {
        Self {
            rockets_per_burst: 6,
            burst_interval: 0.3,
            burst_gap: 2.0,
        }
    }

    pub fn rockets_per_burst(mut self, n: u32) -> Self {
        self.rockets_per_burst = n;
        self
    }

    pub fn burst_interval(mut self, seconds: f64) -> Self {
        self.burst_interval = seconds;
        self
    }

    pub fn burst_gap(mut self, seconds: f64) -> Self {
        self.burst_gap = seconds;
        self
    }
}

/// Full configuration for a [`FireworkSystem`](crate::FireworkSystem).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hard cap on live particles.
    pub max_particles: usize,
    /// Rockets seeded at construction time.
    pub initial_rockets: usize,
    /// Launch cadence multiplier; `<= 0` pauses automatic launches.
    pub particle_rate: f64,
    pub launcher: LauncherConfig,
    pub explosion: ExplosionPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationConfig {
    /// Stock configuration: 10 000 particles, rate 1, no seeded rockets.
    pub fn new() -> Self {
        Self {
            max_particles: 10_000,
            initial_rockets: 0,
            particle_rate: 1.0,
            launcher: LauncherConfig::new(),
            explosion: ExplosionPolicy::new(),
        }
    }

    pub fn max_particles(mut self, n: usize) -> Self {
        self.max_particles = n;
        self
    }

    pub fn initial_rockets(mut self, n: usize) -> Self {
        self.initial_rockets = n;
        self
    }

    pub fn particle_rate(mut self, rate: f64) -> Self {
        self.particle_rate = rate;
        self
    }

    pub fn launcher(mut self, launcher: LauncherConfig) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn explosion(mut self, explosion: ExplosionPolicy) -> Self {
        self.explosion = explosion;
        self
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_particles > MAX_PARTICLE_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                requested: self.max_particles,
                limit: MAX_PARTICLE_CAPACITY,
            });
        }
        if !self.particle_rate.is_finite() {
            return Err(ConfigError::InvalidRate(self.particle_rate));
        }
        if self.launcher.rockets_per_burst == 0 {
            return Err(ConfigError::EmptyBurst);
        }
        positive("burst_interval", self.launcher.burst_interval)?;
        positive("burst_gap", self.launcher.burst_gap)?;

        let policy = &self.explosion;
        if !(0.0..=1.0).contains(&policy.ring_probability) {
            return Err(ConfigError::InvalidProbability {
                name: "ring_probability",
                value: policy.ring_probability,
            });
        }
        positive("ceiling", policy.ceiling as f64)?;
        positive(
            "secondary_trigger_speed",
            policy.secondary_trigger_speed as f64,
        )?;

        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
