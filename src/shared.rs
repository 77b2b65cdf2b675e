//! Lock-guarded system plus vertex arena for threaded hosts.
//!
//! The vertex buffer is filled in place and read right after for upload, so
//! stepping, filling, and reading all happen under one lock. Clones share
//! the same system.
//!
//! ```ignore
//! let shared = SharedFireworks::new(FireworkSystem::new(now, 1.0, 10_000, 0));
//!
//! // Render thread, once per frame
//! shared.advance(clock.now());
//! shared.with_vertices(|floats, count| upload(floats, count));
//!
//! // Input thread
//! shared.launch_rocket();
//! ```

use crate::system::{FireworkSystem, StepReport};
use crate::vertex::FLOATS_PER_PARTICLE;
use rand::rngs::SmallRng;
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Frame<R: Rng> {
    system: FireworkSystem<R>,
    vertices: Vec<f32>,
    count: usize,
}

/// A [`FireworkSystem`] and its reusable vertex buffer behind one mutex.
pub struct SharedFireworks<R: Rng = SmallRng> {
    inner: Arc<Mutex<Frame<R>>>,
}

impl<R: Rng> Clone for SharedFireworks<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedFireworks<R> {
    /// Wrap `system`, allocating a buffer for its full capacity.
    ///
    /// Capacity never exceeds [`MAX_PARTICLE_CAPACITY`](crate::config::MAX_PARTICLE_CAPACITY).
    pub fn new(system: FireworkSystem<R>) -> Self {
        let mut vertices = vec![0.0; system.max_particles() * FLOATS_PER_PARTICLE];
        let count = system.fill_buffer(&mut vertices);
        let frame = Frame {
            system,
            vertices,
            count,
        };

        Self {
            inner: Arc::new(Mutex::new(frame)),
        }
    }

    // Poisoning is ignored; the pool only ever changes by whole particles.
    fn lock(&self) -> MutexGuard<'_, Frame<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Step to `now` and refill the vertex buffer; returns the step report.
    pub fn advance(&self, now: f64) -> StepReport {
        let mut frame = self.lock();
        let frame = &mut *frame;
        let report = frame.system.simulate_to(now);
        frame.count = frame.system.fill_buffer(&mut frame.vertices);
        report
    }

    /// Read the vertex buffer as of the last fill.
    ///
    /// `f` receives exactly `count * FLOATS_PER_PARTICLE` floats and `count`.
    pub fn with_vertices<T>(&self, f: impl FnOnce(&[f32], usize) -> T) -> T {
        let frame = self.lock();
        let used = frame.count * FLOATS_PER_PARTICLE;
        f(&frame.vertices[..used], frame.count)
    }

    /// Run `f` with exclusive access to the system.
    ///
    /// The vertex buffer is refilled afterwards so readers never see stale
    /// particles.
    pub fn with_system<T>(&self, f: impl FnOnce(&mut FireworkSystem<R>) -> T) -> T {
        let mut frame = self.lock();
        let frame = &mut *frame;
        let result = f(&mut frame.system);
        frame.count = frame.system.fill_buffer(&mut frame.vertices);
        result
    }

    pub fn reset(&self) {
        self.with_system(|system| system.reset());
    }

    pub fn launch_rocket(&self) -> bool {
        self.with_system(|system| system.launch_rocket())
    }

    pub fn set_particle_rate(&self, rate: f64) {
        self.with_system(|system| system.set_particle_rate(rate));
    }

    pub fn particle_rate(&self) -> f64 {
        self.lock().system.particle_rate()
    }

    /// Particle count as of the last fill.
    pub fn count(&self) -> usize {
        self.lock().count
    }
}
