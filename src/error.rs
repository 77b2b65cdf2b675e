//! Error types for firework configuration.
//!
//! The simulation step itself never fails; its guards are silent no-ops.
//! Only building, validating, loading, and saving a configuration can go wrong.

use thiserror::Error;

/// Errors from validating, loading, or saving a [`SimulationConfig`](crate::SimulationConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The particle pool must hold at least one particle.
    #[error("max_particles must be at least 1")]
    ZeroCapacity,
    /// The particle pool is larger than the crate will allocate.
    #[error("max_particles must be at most {limit}, got {requested}")]
    CapacityTooLarge { requested: usize, limit: usize },
    /// A burst must contain at least one rocket.
    #[error("rockets_per_burst must be at least 1")]
    EmptyBurst,
    /// The launch rate must be a finite number.
    #[error("particle rate must be finite, got {0}")]
    InvalidRate(f64),
    /// A probability outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },
    /// A duration, height, or speed that must be strictly positive.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// Failed to parse or serialize configuration JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read or write a configuration file.
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),
}
