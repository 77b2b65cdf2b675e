//! The firework system: particle pool, wind, and rocket launcher.
//!
//! [`FireworkSystem`] owns every live particle and advances them together.
//! A host drives it with two calls per frame:
//!
//! ```ignore
//! let mut system = FireworkSystem::new(clock.now(), 1.0, 10_000, 0);
//! let mut buffer = vec![0.0f32; system.max_particles() * FLOATS_PER_PARTICLE];
//!
//! loop {
//!     system.simulate_to(clock.now());
//!     let count = system.fill_buffer(&mut buffer);
//!     upload_and_draw(&buffer[..count * FLOATS_PER_PARTICLE]);
//! }
//! ```
//!
//! # Frame update
//!
//! 1. Ignore calls that do not move time forward.
//! 2. Recompute the wind from the new time.
//! 3. Integrate every particle in one compaction pass, dropping expired
//!    particles and recording (then dropping) those that explode.
//! 4. Insert the children of every recorded explosion while capacity remains.
//! 5. Admit the next scheduled rocket if it is due and capacity remains.
//!
//! Removal decisions are all made in step 3 before anything is inserted, so
//! children spawned this frame are only simulated from the next frame on.

use crate::config::{SimulationConfig, MAX_PARTICLE_CAPACITY};
use crate::error::ConfigError;
use crate::explosion::Trigger;
use crate::particle::{Particle, ParticleKind};
use crate::vertex;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Pool slots reserved up front; larger pools grow on demand.
const PREALLOCATED_PARTICLES: usize = 1 << 16;

/// Wind at simulated time `time`: a slow oscillation in x and z.
pub fn wind_at(time: f64) -> Vec3 {
    let x = 1.0 + 0.5 * (0.5 * time).sin();
    let z = 0.5 + 0.2 * (0.3 * time).cos();
    Vec3::new(x as f32, 0.0, z as f32)
}

/// What happened during one [`FireworkSystem::simulate_to`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Particles removed because their lifetime ran out.
    pub expired: usize,
    /// Particles removed because they exploded.
    pub triggered: usize,
    /// Children inserted.
    pub spawned: usize,
    /// Children dropped because the pool was full.
    pub dropped: usize,
    /// Whether the scheduler admitted a rocket.
    pub launched: bool,
}

/// Capacity-bounded firework particle simulation.
///
/// Generic over its random source so tests can inject a seeded or mocked RNG;
/// the default is an entropy-seeded [`SmallRng`].
pub struct FireworkSystem<R: Rng = SmallRng> {
    particles: Vec<Particle>,
    config: SimulationConfig,
    wind: Vec3,
    simulated_time: f64,
    particle_rate: f64,
    next_rocket_launch: f64,
    /// Rate the pending wait until `next_rocket_launch` was scaled by.
    schedule_rate: f64,
    rockets_in_burst: u32,
    rng: R,
}

impl FireworkSystem<SmallRng> {
    /// Create a system at time `now` with stock launcher and explosion settings.
    ///
    /// `initial_count` rockets (capped at `max_particles`) are seeded
    /// immediately. `max_particles` is clamped to
    /// `1..=`[`MAX_PARTICLE_CAPACITY`].
    pub fn new(
        now: f64,
        particle_rate: f64,
        max_particles: usize,
        initial_count: usize,
    ) -> Self {
        let config = SimulationConfig::new()
            .max_particles(max_particles)
            .particle_rate(particle_rate)
            .initial_rockets(initial_count);
        Self::with_rng(config, now, SmallRng::from_entropy())
    }

    /// Create a system from a validated configuration.
    pub fn from_config(config: SimulationConfig, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_rng(config, now, SmallRng::from_entropy()))
    }
}

impl<R: Rng> FireworkSystem<R> {
    /// Create a system that draws all randomness from `rng`.
    ///
    /// The configuration is otherwise taken as given; call
    /// [`SimulationConfig::validate`] first if it comes from outside.
    /// `max_particles` is clamped to `1..=`[`MAX_PARTICLE_CAPACITY`].
    pub fn with_rng(mut config: SimulationConfig, now: f64, rng: R) -> Self {
        config.max_particles = config.max_particles.clamp(1, MAX_PARTICLE_CAPACITY);

        let mut system = Self {
            particles: Vec::with_capacity(config.max_particles.min(PREALLOCATED_PARTICLES)),
            particle_rate: config.particle_rate,
            schedule_rate: config.particle_rate,
            config,
            wind: wind_at(now),
            simulated_time: now,
            next_rocket_launch: now,
            rockets_in_burst: 0,
            rng,
        };

        let seeded = (0..system.config.initial_rockets)
            .take_while(|_| system.admit_rocket(now))
            .count();

        debug!(
            now,
            seeded,
            max_particles = system.config.max_particles,
            rate = system.particle_rate,
            "firework system created"
        );

        system
    }

    /// Advance the simulation to `time` (seconds).
    ///
    /// Calls with `time <= simulated_time` (or NaN) change nothing.
    pub fn simulate_to(&mut self, time: f64) -> StepReport {
        let mut report = StepReport::default();
        if !(time > self.simulated_time) {
            return report;
        }

        let dt = (time - self.simulated_time) as f32;
        self.simulated_time = time;
        self.wind = wind_at(time);

        let wind = self.wind;
        let policy = &self.config.explosion;
        let mut triggers: Vec<Trigger> = Vec::new();

        self.particles.retain_mut(|p| {
            if !p.integrate(dt, wind) {
                report.expired += 1;
                return false;
            }
            match policy.evaluate(p) {
                Some(trigger) => {
                    p.mark_triggered();
                    triggers.push(trigger);
                    false
                }
                None => true,
            }
        });
        report.triggered = triggers.len();

        for trigger in triggers {
            let explosion = self.config.explosion.resolve(trigger, &mut self.rng);
            trace!(
                shape = ?explosion.shape,
                origin = ?explosion.origin,
                children = explosion.count,
                "explosion"
            );

            for index in 0..explosion.count {
                if self.particles.len() >= self.config.max_particles {
                    report.dropped += explosion.count - index;
                    break;
                }
                let child = explosion.spawn_child(index, &mut self.rng);
                self.particles.push(child);
                report.spawned += 1;
            }
        }

        if report.dropped > 0 {
            debug!(
                dropped = report.dropped,
                max_particles = self.config.max_particles,
                "pool full, spawn requests dropped"
            );
        }

        if self.launcher_running() && self.next_rocket_launch <= time {
            report.launched = self.admit_rocket(time);
        }

        report
    }

    /// Write all live particles into `buffer`; returns the number written.
    ///
    /// See [`vertex::fill_buffer`] for the layout.
    pub fn fill_buffer(&self, buffer: &mut [f32]) -> usize {
        vertex::fill_buffer(&self.particles, buffer)
    }

    /// Remove every particle and restart the launcher at the current time.
    ///
    /// Rate and configuration are kept.
    pub fn reset(&mut self) {
        let cleared = self.particles.len();
        self.particles.clear();
        self.next_rocket_launch = self.simulated_time;
        self.rockets_in_burst = 0;
        debug!(cleared, time = self.simulated_time, "firework system reset");
    }

    /// Launch one rocket right now, if the pool has room.
    ///
    /// Counts toward the current burst like a scheduled launch.
    pub fn launch_rocket(&mut self) -> bool {
        let launched = self.admit_rocket(self.simulated_time);
        debug!(launched, time = self.simulated_time, "manual rocket launch");
        launched
    }

    /// Insert `particle` if the pool has room.
    pub fn insert(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.config.max_particles {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Admit a rocket at `time` and advance the burst schedule.
    fn admit_rocket(&mut self, time: f64) -> bool {
        if self.particles.len() >= self.config.max_particles {
            return false;
        }
        let rocket = Particle::rocket(&mut self.rng);
        self.particles.push(rocket);

        self.rockets_in_burst += 1;
        let launcher = &self.config.launcher;
        let gap = if self.rockets_in_burst < launcher.rockets_per_burst {
            launcher.burst_interval
        } else {
            self.rockets_in_burst = 0;
            launcher.burst_gap
        };
        self.next_rocket_launch = if self.launcher_running() {
            time + gap / self.particle_rate
        } else {
            time
        };
        self.schedule_rate = self.particle_rate;

        trace!(time, next = self.next_rocket_launch, "rocket admitted");
        true
    }

    #[inline]
    fn launcher_running(&self) -> bool {
        self.particle_rate > 0.0 && self.particle_rate.is_finite()
    }

    /// Launch cadence multiplier.
    #[inline]
    pub fn particle_rate(&self) -> f64 {
        self.particle_rate
    }

    /// Change the launch cadence multiplier.
    ///
    /// The wait until the pending launch is rescaled to the new rate. A rate
    /// `<= 0` pauses automatic launches; manual launches still work. Resuming
    /// rescales the wait that was pending when the launcher was last running.
    pub fn set_particle_rate(&mut self, rate: f64) {
        self.particle_rate = rate;
        if !self.launcher_running() {
            return;
        }

        let scheduled = self.schedule_rate;
        if scheduled > 0.0 && scheduled.is_finite() {
            let pending = (self.next_rocket_launch - self.simulated_time).max(0.0);
            self.next_rocket_launch = self.simulated_time + pending * scheduled / rate;
        }
        self.schedule_rate = rate;
        trace!(rate, next = self.next_rocket_launch, "launch rate changed");
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn max_particles(&self) -> usize {
        self.config.max_particles
    }

    /// Live particles, in buffer order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to live particle state.
    ///
    /// The slice cannot grow or shrink, so capacity is unaffected.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of live particles of `kind`.
    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind() == kind).count()
    }

    /// Wind applied during the most recent step.
    #[inline]
    pub fn wind(&self) -> Vec3 {
        self.wind
    }

    #[inline]
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    #[inline]
    pub fn next_rocket_launch(&self) -> f64 {
        self.next_rocket_launch
    }

    /// Rockets launched so far in the current burst.
    #[inline]
    pub fn rockets_in_burst(&self) -> u32 {
        self.rockets_in_burst
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explosion::ExplosionPolicy;

    fn seeded(config: SimulationConfig) -> FireworkSystem {
        FireworkSystem::with_rng(config, 0.0, SmallRng::seed_from_u64(42))
    }

    /// Rockets vanish at their apex without spawning anything.
    fn silent() -> SimulationConfig {
        let policy = ExplosionPolicy::new()
            .burst_count(0)
            .ring_count(0)
            .secondary_count(0);
        SimulationConfig::new().max_particles(1000).explosion(policy)
    }

    #[test]
    fn test_wind_is_deterministic() {
        assert_eq!(wind_at(12.5), wind_at(12.5));
        let w = wind_at(0.0);
        assert!((w.x - 1.0).abs() < 1e-6);
        assert_eq!(w.y, 0.0);
        assert!((w.z - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_seeding_advances_schedule() {
        let system = seeded(SimulationConfig::new().initial_rockets(1));
        assert_eq!(system.len(), 1);
        assert_eq!(system.rockets_in_burst(), 1);
        assert!((system.next_rocket_launch() - 0.3).abs() < 1e-9);

        let full_burst = seeded(SimulationConfig::new().initial_rockets(6));
        assert_eq!(full_burst.rockets_in_burst(), 0);
        assert!((full_burst.next_rocket_launch() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_seeding_is_capped() {
        let config = SimulationConfig::new().max_particles(3).initial_rockets(10);
        let system = seeded(config);
        assert_eq!(system.len(), 3);
    }

    #[test]
    fn test_time_guard() {
        let mut system = seeded(SimulationConfig::new().initial_rockets(2));
        system.simulate_to(0.5);
        let particles = system.particles().to_vec();
        let next = system.next_rocket_launch();

        assert_eq!(system.simulate_to(0.5), StepReport::default());
        assert_eq!(system.simulate_to(0.2), StepReport::default());
        assert_eq!(system.simulate_to(f64::NAN), StepReport::default());

        assert_eq!(system.particles(), &particles[..]);
        assert_eq!(system.next_rocket_launch(), next);
        assert_eq!(system.simulated_time(), 0.5);
    }

    #[test]
    fn test_burst_cadence() {
        let mut system = seeded(silent());
        let mut launches = Vec::new();

        for frame in 1..=500 {
            let t = frame as f64 * 0.01;
            if system.simulate_to(t).launched {
                launches.push(t);
            }
        }

        // Six launches ~0.3s apart, then a 2s gap
        assert!(launches.len() >= 7);
        assert!((launches[1] - launches[0] - 0.3).abs() < 0.02);
        assert!((launches[6] - launches[5] - 2.0).abs() < 0.02);
    }

    #[test]
    fn test_rate_scales_cadence() {
        let config = SimulationConfig::new()
            .particle_rate(2.0)
            .initial_rockets(1);
        let mut system = seeded(config);
        assert!((system.next_rocket_launch() - 0.15).abs() < 1e-9);

        system.set_particle_rate(0.0);
        let report = system.simulate_to(1.0);
        assert!(!report.launched);
        assert_eq!(system.count_of(ParticleKind::Rocket), 1);

        assert!(system.launch_rocket());
        assert_eq!(system.count_of(ParticleKind::Rocket), 2);
    }

    #[test]
    fn test_rate_change_rescales_pending_launch() {
        let mut system = seeded(silent());

        system.set_particle_rate(0.01);
        assert!(system.simulate_to(0.01).launched);
        assert!((system.next_rocket_launch() - 30.01).abs() < 1e-6);

        system.set_particle_rate(1.0);
        assert!((system.next_rocket_launch() - 0.31).abs() < 1e-6);

        let mut launches = 0;
        for frame in 2..=20 * 60 {
            if system.simulate_to(0.01 + frame as f64 / 60.0).launched {
                launches += 1;
            }
        }
        assert!(launches > 6, "only {launches} launches after raising the rate");
    }

    #[test]
    fn test_resume_rescales_wait_from_before_pause() {
        let config = SimulationConfig::new()
            .particle_rate(0.1)
            .initial_rockets(1);
        let mut system = seeded(config);
        assert!((system.next_rocket_launch() - 3.0).abs() < 1e-9);

        system.set_particle_rate(0.0);
        assert!((system.next_rocket_launch() - 3.0).abs() < 1e-9);

        system.set_particle_rate(1.0);
        assert!((system.next_rocket_launch() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_is_clamped() {
        let huge = SimulationConfig::new().max_particles(usize::MAX);
        let system = seeded(huge);
        assert_eq!(system.max_particles(), MAX_PARTICLE_CAPACITY);

        let system = FireworkSystem::new(0.0, 1.0, 0, 1);
        assert_eq!(system.max_particles(), 1);
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_reset_clears_and_rewinds() {
        let mut system = seeded(SimulationConfig::new().initial_rockets(4));
        system.simulate_to(1.0);
        system.reset();

        assert!(system.is_empty());
        assert_eq!(system.next_rocket_launch(), 1.0);
        assert_eq!(system.rockets_in_burst(), 0);
        assert_eq!(system.particle_rate(), 1.0);

        let mut buffer = vec![0.0; 12];
        assert_eq!(system.fill_buffer(&mut buffer), 0);
    }

    #[test]
    fn test_insert_and_launch_respect_capacity() {
        let mut system = seeded(SimulationConfig::new().max_particles(2));
        assert!(system.launch_rocket());
        assert!(system.launch_rocket());
        assert!(!system.launch_rocket());
        let rocket = Particle::rocket(&mut SmallRng::seed_from_u64(1));
        assert!(!system.insert(rocket));
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn test_cascade_counts_and_drops() {
        let config = SimulationConfig::new()
            .max_particles(30)
            .particle_rate(0.0)
            .explosion(
                ExplosionPolicy::new()
                    .ring_probability(0.0)
                    .burst_count(50),
            );
        let mut system = seeded(config);
        system.insert(Particle::new(
            ParticleKind::Rocket,
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::ONE,
        ));

        let report = system.simulate_to(0.01);

        assert_eq!(report.triggered, 1);
        assert_eq!(report.spawned, 30);
        assert_eq!(report.dropped, 20);
        assert!(!report.launched);
        assert_eq!(system.len(), 30);
        assert_eq!(system.count_of(ParticleKind::PrimarySpark), 30);
    }

    #[test]
    fn test_slow_primary_spark_cascades() {
        let config = SimulationConfig::new().particle_rate(0.0);
        let mut system = seeded(config);
        let origin = Vec3::new(5.0, 30.0, 5.0);
        let spark = Particle::new(ParticleKind::PrimarySpark, origin, Vec3::ZERO, Vec3::ONE);
        system.insert(spark);

        let report = system.simulate_to(0.01);

        assert_eq!(report.triggered, 1);
        assert_eq!(system.count_of(ParticleKind::PrimarySpark), 0);
        assert_eq!(system.count_of(ParticleKind::SecondarySpark), 40);
        for p in system.particles() {
            assert!((p.position() - origin).length() < 0.01);
        }
    }
}
