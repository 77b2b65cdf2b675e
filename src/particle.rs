//! Firework particles and their per-frame physics.
//!
//! A [`Particle`] is one simulated point: a rocket on its way up, or one of
//! the sparks produced when something explodes. Behavior that differs between
//! kinds (lifetime, starting size, launch speed, whether color fades) is read
//! from a constant table indexed by [`ParticleKind`].
//!
//! # Lifetime
//!
//! `age` counts *down*. It starts at the kind's lifetime constant and the
//! particle is removed once it reaches zero. The ratio `age / lifetime` is the
//! life factor that shrinks the particle (and dims sparks) every step.

use crate::random;
use glam::Vec3;
use rand::Rng;

/// Downward gravitational acceleration in world units per second squared.
pub const GRAVITY: f32 = 9.81;

/// Linear drag coefficient applied against velocity.
pub const DRAG_COEFFICIENT: f32 = 0.2;

/// Height rockets are launched from.
pub const LAUNCH_HEIGHT: f32 = 10.0;

/// Horizontal launch field for rockets (x and z are drawn from this range).
pub const LAUNCH_FIELD: (f32, f32) = (-10.0, 40.0);

/// Maximum deviation of a rocket's launch direction from vertical, in radians.
pub const LAUNCH_DEVIATION: f32 = 20.0 * std::f32::consts::PI / 180.0;

/// Polar angle sparks are biased toward, in radians from +Y.
pub const SPARK_CONE: f32 = 0.349_066;

/// How strongly spark directions are pulled onto [`SPARK_CONE`].
pub const SPARK_CONE_WEIGHT: f32 = 0.3;

/// Upward component added to ring spark directions before normalizing.
pub const RING_LIFT: f32 = 0.15;

/// The four kinds of firework particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Ascending shell; explodes at its apex or at the ceiling.
    Rocket,
    /// Spark from a rocket's standard burst; may explode once more.
    PrimarySpark,
    /// Spark from a primary spark's cascade; simply expires.
    SecondarySpark,
    /// Spark from a rocket's ring burst; simply expires.
    RingSpark,
}

/// Fixed per-kind parameters.
#[derive(Clone, Copy, Debug)]
struct KindParams {
    lifetime: f32,
    size: f32,
    speed: (f32, f32),
    fades: bool,
}

#[rustfmt::skip]
static KIND_PARAMS: [KindParams; 4] = [
    // Rocket
    KindParams { lifetime: 4.0, size: 7.0, speed: (25.0, 35.0), fades: false },
    // PrimarySpark
    KindParams { lifetime: 15.0, size: 2.0, speed: (4.0, 8.0), fades: true },
    // SecondarySpark
    KindParams { lifetime: 8.0, size: 2.0, speed: (9.0, 18.0), fades: true },
    // RingSpark
    KindParams { lifetime: 8.0, size: 2.0, speed: (10.0, 12.0), fades: true },
];

impl ParticleKind {
    /// All kinds, in table order.
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Rocket,
        ParticleKind::PrimarySpark,
        ParticleKind::SecondarySpark,
        ParticleKind::RingSpark,
    ];

    #[inline]
    fn params(self) -> &'static KindParams {
        &KIND_PARAMS[self as usize]
    }

    /// Countdown start and decay denominator, in seconds.
    #[inline]
    pub fn lifetime(self) -> f32 {
        self.params().lifetime
    }

    /// Point size in pixels at creation.
    #[inline]
    pub fn initial_size(self) -> f32 {
        self.params().size
    }

    /// Launch speed range `(min, max)` for new particles of this kind.
    #[inline]
    pub fn speed_range(self) -> (f32, f32) {
        self.params().speed
    }

    /// Whether color is scaled down with the life factor.
    #[inline]
    pub fn fades(self) -> bool {
        self.params().fades
    }
}

/// A single simulated firework particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    kind: ParticleKind,
    position: Vec3,
    velocity: Vec3,
    color: Vec3,
    size: f32,
    age: f32,
    triggered: bool,
}

impl Particle {
    /// Create a particle of `kind` with full lifetime and the kind's starting size.
    pub fn new(kind: ParticleKind, position: Vec3, velocity: Vec3, color: Vec3) -> Self {
        Self {
            kind,
            position,
            velocity,
            color,
            size: kind.initial_size(),
            age: kind.lifetime(),
            triggered: false,
        }
    }

    /// A white rocket launched from a random point of the launch field.
    ///
    /// Its direction deviates from vertical by up to 20 degrees.
    pub fn rocket<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = ParticleKind::Rocket;
        let (min, max) = LAUNCH_FIELD;
        let position = Vec3::new(
            random::uniform(rng, min, max),
            LAUNCH_HEIGHT,
            random::uniform(rng, min, max),
        );
        let direction = random::cone_direction(rng, LAUNCH_DEVIATION);
        let velocity = direction * launch_speed(kind, rng);

        Self::new(kind, position, velocity, Vec3::ONE)
    }

    /// A primary spark from a standard burst at `origin`.
    pub fn spark<R: Rng + ?Sized>(origin: Vec3, base_color: Vec3, rng: &mut R) -> Self {
        Self::biased_spark(ParticleKind::PrimarySpark, origin, base_color, rng)
    }

    /// A secondary spark from a primary spark's cascade at `origin`.
    pub fn secondary_spark<R: Rng + ?Sized>(origin: Vec3, base_color: Vec3, rng: &mut R) -> Self {
        Self::biased_spark(ParticleKind::SecondarySpark, origin, base_color, rng)
    }

    /// Ring spark `index` of `count`, spaced evenly in azimuth around `origin`.
    pub fn ring_spark<R: Rng + ?Sized>(
        origin: Vec3,
        base_color: Vec3,
        index: usize,
        count: usize,
        rng: &mut R,
    ) -> Self {
        let kind = ParticleKind::RingSpark;
        let velocity = random::ring_direction(index, count, RING_LIFT) * launch_speed(kind, rng);
        let color = base_color * random::brightness(rng);

        Self::new(kind, origin, velocity, color)
    }

    fn biased_spark<R: Rng + ?Sized>(
        kind: ParticleKind,
        origin: Vec3,
        base_color: Vec3,
        rng: &mut R,
    ) -> Self {
        let direction = random::biased_sphere_direction(rng, SPARK_CONE, SPARK_CONE_WEIGHT);
        let velocity = direction * launch_speed(kind, rng);
        let color = base_color * random::brightness(rng);

        Self::new(kind, origin, velocity, color)
    }

    /// Advance this particle by `dt` seconds under gravity, drag and `wind`.
    ///
    /// Returns `false` once the particle has used up its lifetime; the caller
    /// removes it. A non-positive `dt` is ignored and returns `true`.
    pub fn integrate(&mut self, dt: f32, wind: Vec3) -> bool {
        if !(dt > 0.0) {
            return true;
        }

        self.age -= dt;
        if self.age <= 0.0 {
            return false;
        }

        let acceleration = Vec3::new(0.0, -GRAVITY, 0.0) - self.velocity * DRAG_COEFFICIENT + wind;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        let life = self.life_factor();
        self.size *= life;
        if self.kind.fades() {
            self.color *= life;
        }

        true
    }

    /// Remaining fraction of lifetime, in `(0, 1]` while alive.
    #[inline]
    pub fn life_factor(&self) -> f32 {
        self.age / self.kind.lifetime()
    }

    /// What this particle is, which fixes its lifetime and explosion behavior.
    #[inline]
    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// World position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity in world units per second.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Linear RGB color, already scaled by fading.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Point size in pixels.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Remaining time to death, in seconds.
    #[inline]
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Whether this particle has already produced its cascade.
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Move the particle without touching its velocity.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Replace the velocity, e.g. to force a rocket past its apex.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub(crate) fn mark_triggered(&mut self) {
        self.triggered = true;
    }
}

#[inline]
fn launch_speed<R: Rng + ?Sized>(kind: ParticleKind, rng: &mut R) -> f32 {
    let (min, max) = kind.speed_range();
    random::uniform(rng, min, max)
}
