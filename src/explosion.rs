//! Explosion policy: when particles burst and what they burst into.
//!
//! Rockets and primary sparks are *parents*. When a parent hits its trigger
//! condition it is removed and replaced by a batch of children:
//!
//! | Parent | Trigger | Children |
//! |--------|---------|----------|
//! | Rocket | `velocity.y <= 0` or `position.y >= ceiling` | ring burst **or** standard burst |
//! | PrimarySpark | speed below threshold, not yet triggered | secondary sparks |
//! | SecondarySpark, RingSpark | never | - |
//!
//! The policy is pure configuration plus decision logic; the
//! [`FireworkSystem`](crate::FireworkSystem) owns the particles and enforces
//! capacity while inserting the children.
//!
//! # Example
//!
//! ```ignore
//! let policy = ExplosionPolicy::new()
//!     .burst_count(150)            // 150 primary sparks per standard burst
//!     .ring_count(24)              // 24 sparks per ring
//!     .ring_probability(0.25)      // one rocket in four makes a ring
//!     .ceiling(60.0);              // rockets never climb past y = 60
//! ```

use crate::particle::{Particle, ParticleKind};
use crate::random;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A parent particle that fired this frame, captured before removal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// A rocket reached its apex or the ceiling.
    Rocket { position: Vec3 },
    /// A primary spark slowed below the cascade threshold.
    Secondary { position: Vec3 },
}

impl Trigger {
    /// Where the explosion happens.
    pub fn position(&self) -> Vec3 {
        match *self {
            Trigger::Rocket { position } | Trigger::Secondary { position } => position,
        }
    }
}

/// Shape of a resolved explosion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExplosionShape {
    /// Standard rocket burst of primary sparks.
    Burst,
    /// Rocket burst of ring sparks spaced evenly in azimuth.
    Ring,
    /// Cascade of secondary sparks from a primary spark.
    Secondary,
}

/// A resolved explosion event: shape, origin, and the shared base color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub shape: ExplosionShape,
    pub origin: Vec3,
    pub base_color: Vec3,
    /// Number of children this explosion asks for.
    pub count: usize,
}

impl Explosion {
    /// Kind of every child this explosion produces.
    pub fn child_kind(&self) -> ParticleKind {
        match self.shape {
            ExplosionShape::Burst => ParticleKind::PrimarySpark,
            ExplosionShape::Ring => ParticleKind::RingSpark,
            ExplosionShape::Secondary => ParticleKind::SecondarySpark,
        }
    }

    /// Build child number `index` (of [`count`](Self::count)).
    pub fn spawn_child<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Particle {
        match self.shape {
            ExplosionShape::Burst => Particle::spark(self.origin, self.base_color, rng),
            ExplosionShape::Ring => {
                Particle::ring_spark(self.origin, self.base_color, index, self.count, rng)
            }
            ExplosionShape::Secondary => {
                Particle::secondary_spark(self.origin, self.base_color, rng)
            }
        }
    }
}

/// Trigger rules and child counts for firework explosions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionPolicy {
    /// Primary sparks per standard rocket burst.
    pub burst_count: usize,
    /// Ring sparks per ring burst.
    pub ring_count: usize,
    /// Secondary sparks per primary-spark cascade.
    pub secondary_count: usize,
    /// Chance that a rocket explodes as a ring instead of a standard burst.
    pub ring_probability: f32,
    /// Rockets explode once they reach this height.
    pub ceiling: f32,
    /// Primary sparks cascade once their speed drops below this.
    pub secondary_trigger_speed: f32,
}

impl Default for ExplosionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplosionPolicy {
    /// Policy with the stock firework show parameters.
    pub fn new() -> Self {
        Self {
            burst_count: 100,
            ring_count: 32,
            secondary_count: 40,
            ring_probability: 0.5,
            ceiling: 40.0,
            secondary_trigger_speed: 2.0,
        }
    }

    /// Set the number of primary sparks per standard burst.
    pub fn burst_count(mut self, n: usize) -> Self {
        self.burst_count = n;
        self
    }

    /// Set the number of sparks per ring burst.
    pub fn ring_count(mut self, n: usize) -> Self {
        self.ring_count = n;
        self
    }

    /// Set the number of secondary sparks per cascade.
    pub fn secondary_count(mut self, n: usize) -> Self {
        self.secondary_count = n;
        self
    }

    /// Set the ring probability, clamped to `[0, 1]`.
    pub fn ring_probability(mut self, p: f32) -> Self {
        self.ring_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Set the rocket ceiling height.
    pub fn ceiling(mut self, height: f32) -> Self {
        self.ceiling = height;
        self
    }

    /// Set the speed below which primary sparks cascade.
    pub fn secondary_trigger_speed(mut self, speed: f32) -> Self {
        self.secondary_trigger_speed = speed;
        self
    }

    /// Decide whether `particle` fires this frame.
    ///
    /// Must be called on the particle's post-integration state, before it
    /// is removed from the live set.
    pub fn evaluate(&self, particle: &Particle) -> Option<Trigger> {
        let position = particle.position();
        match particle.kind() {
            ParticleKind::Rocket => {
                (particle.velocity().y <= 0.0 || position.y >= self.ceiling)
                    .then_some(Trigger::Rocket { position })
            }
            ParticleKind::PrimarySpark => (!particle.is_triggered()
                && particle.velocity().length() < self.secondary_trigger_speed)
                .then_some(Trigger::Secondary { position }),
            ParticleKind::SecondarySpark | ParticleKind::RingSpark => None,
        }
    }

    /// Turn a trigger into a concrete explosion with a fresh base color.
    ///
    /// Rocket triggers pick ring or standard burst here, never both.
    pub fn resolve<R: Rng + ?Sized>(&self, trigger: Trigger, rng: &mut R) -> Explosion {
        let base_color = random::base_color(rng);
        let (shape, count) = match trigger {
            Trigger::Rocket { .. } => {
                if random::unit(rng) < self.ring_probability {
                    (ExplosionShape::Ring, self.ring_count)
                } else {
                    (ExplosionShape::Burst, self.burst_count)
                }
            }
            Trigger::Secondary { .. } => (ExplosionShape::Secondary, self.secondary_count),
        };

        Explosion {
            shape,
            origin: trigger.position(),
            base_color,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_policy_builder() {
        let policy = ExplosionPolicy::new()
            .burst_count(50)
            .ring_count(12)
            .secondary_count(5)
            .ring_probability(2.0)
            .ceiling(25.0)
            .secondary_trigger_speed(1.0);

        assert_eq!(policy.burst_count, 50);
        assert_eq!(policy.ring_count, 12);
        assert_eq!(policy.secondary_count, 5);
        assert_eq!(policy.ring_probability, 1.0);
        assert_eq!(policy.ceiling, 25.0);
        assert_eq!(policy.secondary_trigger_speed, 1.0);
    }

    #[test]
    fn test_rocket_triggers_at_apex_or_ceiling() {
        let policy = ExplosionPolicy::new();
        let mut rocket = Particle::new(
            ParticleKind::Rocket,
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::ONE,
        );
        assert_eq!(policy.evaluate(&rocket), None);

        rocket.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            policy.evaluate(&rocket),
            Some(Trigger::Rocket { .. })
        ));

        rocket.set_velocity(Vec3::new(0.0, 5.0, 0.0));
        rocket.set_position(Vec3::new(0.0, 40.0, 0.0));
        assert_eq!(
            policy.evaluate(&rocket),
            Some(Trigger::Rocket {
                position: Vec3::new(0.0, 40.0, 0.0)
            })
        );
    }

    #[test]
    fn test_primary_spark_triggers_once() {
        let policy = ExplosionPolicy::new();
        let mut spark = Particle::new(
            ParticleKind::PrimarySpark,
            Vec3::ZERO,
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::ONE,
        );
        assert!(matches!(
            policy.evaluate(&spark),
            Some(Trigger::Secondary { .. })
        ));

        spark.mark_triggered();
        assert_eq!(policy.evaluate(&spark), None);

        let fast = Particle::new(
            ParticleKind::PrimarySpark,
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::ONE,
        );
        assert_eq!(policy.evaluate(&fast), None);
    }

    #[test]
    fn test_terminal_sparks_never_trigger() {
        let policy = ExplosionPolicy::new();
        for kind in [ParticleKind::SecondarySpark, ParticleKind::RingSpark] {
            let p = Particle::new(kind, Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO, Vec3::ONE);
            assert_eq!(policy.evaluate(&p), None);
        }
    }

    #[test]
    fn test_resolve_ring_or_burst() {
        let trigger = Trigger::Rocket { position: Vec3::Y };

        // StepRng(0, 0) draws 0.0 for every float: always below the probability
        let ring = ExplosionPolicy::new().resolve(trigger, &mut StepRng::new(0, 0));
        assert_eq!(ring.shape, ExplosionShape::Ring);
        assert_eq!(ring.count, 32);
        assert_eq!(ring.child_kind(), ParticleKind::RingSpark);

        let burst = ExplosionPolicy::new()
            .ring_probability(0.0)
            .resolve(trigger, &mut StepRng::new(0, 0));
        assert_eq!(burst.shape, ExplosionShape::Burst);
        assert_eq!(burst.count, 100);
        assert_eq!(burst.origin, Vec3::Y);
    }

    #[test]
    fn test_secondary_children() {
        let mut rng = SmallRng::seed_from_u64(9);
        let policy = ExplosionPolicy::new();
        let explosion = policy.resolve(Trigger::Secondary { position: Vec3::X }, &mut rng);

        assert_eq!(explosion.shape, ExplosionShape::Secondary);
        assert_eq!(explosion.count, 40);
        for i in 0..explosion.count {
            let child = explosion.spawn_child(i, &mut rng);
            assert_eq!(child.kind(), ParticleKind::SecondarySpark);
            assert_eq!(child.position(), Vec3::X);
        }
    }
}
