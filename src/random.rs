//! Random draws used when creating particles.
//!
//! Every helper is a free function over the caller's RNG, so the simulation
//! keeps exactly one random source and tests can swap it for a seeded or
//! mocked one.
//!
//! ```ignore
//! use rand::{rngs::SmallRng, SeedableRng};
//! use fireworks::random;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let dir = random::cone_direction(&mut rng, 20f32.to_radians());
//! let color = random::base_color(&mut rng);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Random f32 in `[0, 1)`.
#[inline]
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>()
}

/// Random f32 in `[min, max)`.
///
/// Unlike `gen_range` this accepts an empty range and returns `min`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + unit(rng) * (max - min)
}

/// Random direction inside a cone around +Y.
///
/// The deviation from vertical is uniform in `[-max_deviation, max_deviation)`
/// and the azimuth is uniform around the axis.
pub fn cone_direction<R: Rng + ?Sized>(rng: &mut R, max_deviation: f32) -> Vec3 {
    let deviation = uniform(rng, -max_deviation, max_deviation);
    let azimuth = uniform(rng, 0.0, TAU);

    Vec3::new(
        deviation.sin() * azimuth.cos(),
        deviation.cos(),
        deviation.sin() * azimuth.sin(),
    )
}

/// Random unit direction on the sphere with its polar angle pulled toward `target_polar`.
///
/// The polar angle is measured from +Y. `weight` of 0 gives the uniform sphere,
/// 1 collapses every sample onto the cone at `target_polar`.
pub fn biased_sphere_direction<R: Rng + ?Sized>(
    rng: &mut R,
    target_polar: f32,
    weight: f32,
) -> Vec3 {
    let theta = uniform(rng, 0.0, TAU);
    // acos(2u - 1) is uniform over the sphere's surface
    let phi = (2.0 * unit(rng) - 1.0).clamp(-1.0, 1.0).acos();
    let phi = phi * (1.0 - weight) + target_polar * weight;

    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Evenly spaced direction on a horizontal ring, lifted slightly upward.
///
/// Index `i` of `count` sits at azimuth `TAU * i / count`. The result is normalized.
pub fn ring_direction(index: usize, count: usize, lift: f32) -> Vec3 {
    let angle = TAU * index as f32 / count.max(1) as f32;
    Vec3::new(angle.cos(), lift, angle.sin()).normalize()
}

/// Random explosion base color with each channel in `[0.5, 1.0)`.
pub fn base_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        uniform(rng, 0.5, 1.0),
        uniform(rng, 0.5, 1.0),
        uniform(rng, 0.5, 1.0),
    )
}

/// Per-particle brightness jitter in `[0.9, 1.1)`.
#[inline]
pub fn brightness<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    uniform(rng, 0.9, 1.1)
}
