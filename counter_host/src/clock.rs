//! # Frame Clocks
//!
//! Time sources that feed a counter host.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! A clock only reports cumulative milliseconds. It does NOT:
//! - Provide wall-clock dates or timezones
//! - Block or sleep (polling only)
//! - Decide when ticks are delivered (that's for the host)
//!
//! The host turns successive readings into the deltas a counter consumes.

use std::time::Instant;

/// Monotonic source of elapsed milliseconds
///
/// # Implementation Notes
///
/// - Must be monotonic (never return a smaller value)
/// - Must not block
/// - Readings are cumulative since the clock was created
pub trait FrameClock {
    /// Returns the cumulative elapsed milliseconds
    fn poll_millis(&mut self) -> f64;
}

/// Simulated clock with controllable time progression
///
/// Only advances when told to, which makes scripted runs and tests
/// reproducible.
///
/// # Examples
///
/// ```
/// use counter_host::clock::{FrameClock, SimFrameClock};
///
/// let mut clock = SimFrameClock::new();
/// assert_eq!(clock.poll_millis(), 0.0);
///
/// clock.advance_millis(16.0);
/// clock.advance_millis(17.0);
/// assert_eq!(clock.poll_millis(), 33.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimFrameClock {
    millis: f64,
}

impl SimFrameClock {
    /// Creates a clock starting at 0 ms
    pub fn new() -> Self {
        Self { millis: 0.0 }
    }

    /// Creates a clock starting at a specific reading
    pub fn with_initial_millis(millis: f64) -> Self {
        Self { millis }
    }

    /// Moves the clock forward
    ///
    /// # Panics
    ///
    /// Panics if `delta` is negative, since that would break monotonicity.
    pub fn advance_millis(&mut self, delta: f64) {
        assert!(delta >= 0.0, "Cannot advance clock backwards: {}", delta);
        self.millis += delta;
    }

    /// Returns the current reading without requiring mutable access
    pub fn current_millis(&self) -> f64 {
        self.millis
    }
}

impl FrameClock for SimFrameClock {
    fn poll_millis(&mut self) -> f64 {
        self.millis
    }
}

/// Clock backed by the process's monotonic `Instant`
#[derive(Debug, Clone)]
pub struct SystemFrameClock {
    origin: Instant,
}

impl SystemFrameClock {
    /// Creates a clock reading 0 ms now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemFrameClock {
    fn poll_millis(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
