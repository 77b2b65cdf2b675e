//! Frame clock for hosts driving a firework system.
//!
//! [`FrameClock`] turns wall time into the monotonic seconds value that
//! [`FireworkSystem::simulate_to`](crate::FireworkSystem::simulate_to) expects,
//! and keeps running frame and primitive rates for status display.
//!
//! # Example
//!
//! ```ignore
//! use fireworks::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your render loop:
//! system.simulate_to(clock.now());
//! let count = system.fill_buffer(&mut buffer);
//! if clock.tick(count) {
//!     println!("fps={:.1} pps={:.1}k", clock.fps(), clock.primitives_per_second() * 1e-3);
//! }
//! ```

use std::time::{Duration, Instant};

/// Monotonic simulation clock with FPS and primitives-per-second counters.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created or last reset.
    start: Instant,
    /// Total time spent paused.
    paused_total: Duration,
    /// When the current pause began, if paused.
    paused_at: Option<Instant>,
    /// Time scale multiplier (1.0 = real time).
    time_scale: f64,
    /// Frames since start.
    frame_count: u64,
    /// Frames and primitives since the last rate update.
    window_frames: u64,
    window_primitives: u64,
    window_start: Instant,
    /// How often rates are recomputed.
    update_interval: Duration,
    fps: f64,
    pps: f64,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            time_scale: 1.0,
            frame_count: 0,
            window_frames: 0,
            window_primitives: 0,
            window_start: now,
            update_interval: Duration::from_millis(500),
            fps: 0.0,
            pps: 0.0,
        }
    }

    /// Simulated seconds since start, excluding pauses, times the time scale.
    pub fn now(&self) -> f64 {
        let end = self.paused_at.unwrap_or_else(Instant::now);
        let running = end.duration_since(self.start).saturating_sub(self.paused_total);
        running.as_secs_f64() * self.time_scale
    }

    /// Record one rendered frame that drew `primitives` points.
    ///
    /// Returns `true` when the FPS and PPS figures were just refreshed.
    pub fn tick(&mut self, primitives: usize) -> bool {
        self.frame_count += 1;
        self.window_frames += 1;
        self.window_primitives += primitives as u64;

        let now = Instant::now();
        let window = now.duration_since(self.window_start);
        if window < self.update_interval {
            return false;
        }

        let secs = window.as_secs_f64();
        self.fps = self.window_frames as f64 / secs;
        self.pps = self.window_primitives as f64 / secs;
        self.window_frames = 0;
        self.window_primitives = 0;
        self.window_start = now;
        true
    }

    /// Frames per second over the last update window.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Primitives drawn per second over the last update window.
    #[inline]
    pub fn primitives_per_second(&self) -> f64 {
        self.pps
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Stop the clock. `now()` holds its value until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += at.elapsed();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Set the time scale multiplier. Negative values clamp to 0.
    ///
    /// Lowering the scale moves `now()` backwards; the simulation ignores
    /// those calls until time catches up again.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    /// Clear rates and restart from zero.
    pub fn reset(&mut self) {
        *self = Self {
            time_scale: self.time_scale,
            update_interval: self.update_interval,
            ..Self::new()
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_now_advances() {
        let clock = FrameClock::new();
        let before = clock.now();
        thread::sleep(Duration::from_millis(10));
        assert!(clock.now() > before);
    }

    #[test]
    fn test_pause_freezes_now() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        clock.pause();
        let frozen = clock.now();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(clock.now(), frozen);

        clock.resume();
        assert!(clock.now() >= frozen);
        assert!(clock.now() < frozen + 0.04);
    }

    #[test]
    fn test_time_scale_clamps() {
        let mut clock = FrameClock::new();
        clock.set_time_scale(2.0);
        assert_eq!(clock.time_scale(), 2.0);
        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_tick_updates_rates() {
        let mut clock = FrameClock::new();
        clock.update_interval = Duration::from_millis(10);

        assert!(!clock.tick(100));
        thread::sleep(Duration::from_millis(15));
        assert!(clock.tick(100));

        assert_eq!(clock.frame(), 2);
        assert!(clock.fps() > 0.0);
        let per_frame = clock.primitives_per_second() / clock.fps();
        assert!((per_frame - 100.0).abs() < 1e-6);
    }
}
