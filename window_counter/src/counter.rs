//! Event window counter state machine.
//!
//! The counter keeps one expiry deadline per live event. Deadlines are
//! measured on the counter's own "passed" timeline, which only moves while the
//! counter is moving, so pausing freezes every pending expiry.
//!
//! Every transition takes `&self` and returns a new counter. The deadline
//! queue is persistent, so the previous value stays valid and cloning is cheap.

use crate::config::CounterConfig;
use crate::queue::{Iter, Queue};
use crate::snapshot::CounterSnapshot;

/// Counts events within a trailing time window
///
/// # Examples
///
/// ```
/// use window_counter::EventWindowCounter;
///
/// let paused = EventWindowCounter::new(1000.0, false).increment();
/// let still_paused = paused.advance(100_000.0);
/// assert_eq!(still_paused, paused);
///
/// let running = paused.start().advance(1001.0);
/// assert_eq!(running.count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventWindowCounter {
    /// Expiry deadline of each live event, oldest first
    expiries: Queue<f64>,
    /// Window length in milliseconds
    duration_ms: f64,
    /// Whether time is accumulating
    moving: bool,
    /// Milliseconds elapsed while moving
    passed_ms: f64,
}

impl EventWindowCounter {
    /// Creates an empty counter
    ///
    /// The duration is trusted as given. Use [`CounterConfig::validate`] at
    /// the edge of the application when the value comes from outside.
    pub fn new(duration_ms: f64, moving: bool) -> Self {
        Self {
            expiries: Queue::new(),
            duration_ms,
            moving,
            passed_ms: 0.0,
        }
    }

    /// Creates an empty counter from a configuration
    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.duration_ms, config.moving)
    }

    /// Records one event
    ///
    /// The event expires once `duration` milliseconds of moving time have
    /// passed. Recording works while paused; the deadline is still relative
    /// to the current passed time.
    pub fn increment(&self) -> Self {
        Self {
            expiries: self.expiries.enqueue(self.passed_ms + self.duration_ms),
            ..self.clone()
        }
    }

    /// Advances time by `delta_ms`
    ///
    /// A paused counter is returned unchanged. A moving counter accumulates
    /// the delta and drops the oldest event if its deadline is now strictly
    /// behind the passed time.
    ///
    /// At most one event expires per call. When several deadlines fall inside
    /// one delta, later calls drop them one at a time.
    ///
    /// `delta_ms` is expected to be non-negative; negative values move the
    /// passed time backwards.
    pub fn advance(&self, delta_ms: f64) -> Self {
        if !self.moving {
            return self.clone();
        }

        let passed_ms = self.passed_ms + delta_ms;
        let expiries = match self.expiries.peek() {
            Some(&deadline) if passed_ms > deadline => self.expiries.tail(),
            _ => self.expiries.clone(),
        };

        Self {
            expiries,
            passed_ms,
            ..self.clone()
        }
    }

    /// Lets time accumulate
    pub fn start(&self) -> Self {
        self.with_moving(true)
    }

    /// Freezes time
    pub fn stop(&self) -> Self {
        self.with_moving(false)
    }

    /// Flips between moving and paused
    pub fn toggle(&self) -> Self {
        self.with_moving(!self.moving)
    }

    /// Discards every live event and starts moving
    ///
    /// The passed time is kept.
    pub fn reset_counter(&self) -> Self {
        Self {
            expiries: Queue::new(),
            duration_ms: self.duration_ms,
            moving: true,
            passed_ms: self.passed_ms,
        }
    }

    /// Discards every live event and the passed time, and starts moving
    ///
    /// Equivalent to a fresh moving counter with the same duration.
    pub fn reset_whole(&self) -> Self {
        Self::new(self.duration_ms, true)
    }

    /// Returns the number of live events
    pub fn count(&self) -> usize {
        self.expiries.len()
    }

    /// Returns true if time is accumulating
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Returns the milliseconds elapsed while moving
    pub fn passed_millis(&self) -> f64 {
        self.passed_ms
    }

    /// Returns the window length in milliseconds
    pub fn duration_millis(&self) -> f64 {
        self.duration_ms
    }

    /// Iterates over live event deadlines, oldest first
    pub fn expiries(&self) -> Iter<'_, f64> {
        self.expiries.iter()
    }

    /// Returns the deadline of the oldest live event
    pub fn next_expiry(&self) -> Option<f64> {
        self.expiries.peek().copied()
    }

    /// Returns true if the oldest live event is already past its deadline
    ///
    /// This happens when one advance covered more than one deadline.
    pub fn has_overdue(&self) -> bool {
        self.expiries
            .peek()
            .is_some_and(|&deadline| self.passed_ms > deadline)
    }

    /// Captures the current state for observation
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            duration_ms: self.duration_ms,
            moving: self.moving,
            passed_ms: self.passed_ms,
            count: self.count(),
            expiries: self.expiries.to_vec(),
        }
    }

    fn with_moving(&self, moving: bool) -> Self {
        Self {
            moving,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counter_is_empty() {
        let counter = EventWindowCounter::new(250.0, true);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.passed_millis(), 0.0);
        assert_eq!(counter.duration_millis(), 250.0);
        assert!(counter.is_moving());
        assert_eq!(counter.next_expiry(), None);
    }

    #[test]
    fn test_from_config() {
        let config = CounterConfig {
            duration_ms: 30_000.0,
            moving: false,
        };
        let counter = EventWindowCounter::from_config(&config);
        assert_eq!(counter.duration_millis(), 30_000.0);
        assert!(!counter.is_moving());
    }

    #[test]
    fn test_increment_schedules_deadline_from_passed_time() {
        let counter = EventWindowCounter::new(100.0, true)
            .advance(40.0)
            .increment();

        assert_eq!(counter.count(), 1);
        assert_eq!(counter.next_expiry(), Some(140.0));
    }

    #[test]
    fn test_increment_while_paused() {
        let counter = EventWindowCounter::new(100.0, false).increment();
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.next_expiry(), Some(100.0));
    }

    #[test]
    fn test_advance_on_empty_queue_only_moves_time() {
        let counter = EventWindowCounter::new(100.0, true).advance(75.5);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.passed_millis(), 75.5);
    }

    #[test]
    fn test_deadline_is_exclusive() {
        let counter = EventWindowCounter::new(100.0, true).increment();

        let at_deadline = counter.advance(100.0);
        assert_eq!(at_deadline.count(), 1);

        let past_deadline = at_deadline.advance(0.001);
        assert_eq!(past_deadline.count(), 0);
    }

    #[test]
    fn test_paused_time_does_not_count_toward_expiry() {
        let counter = EventWindowCounter::new(100.0, true)
            .increment()
            .advance(60.0)
            .stop()
            .advance(1_000.0)
            .start()
            .advance(30.0);

        assert_eq!(counter.count(), 1);
        assert_eq!(counter.passed_millis(), 90.0);

        assert_eq!(counter.advance(20.0).count(), 0);
    }

    #[test]
    fn test_transitions_do_not_touch_original() {
        let original = EventWindowCounter::new(10.0, true).increment();
        let _ = original.increment().advance(50.0).reset_whole();

        assert_eq!(original.count(), 1);
        assert_eq!(original.passed_millis(), 0.0);
        assert_eq!(original.next_expiry(), Some(10.0));
    }

    #[test]
    fn test_start_stop_toggle() {
        let counter = EventWindowCounter::new(10.0, false);
        assert!(counter.start().is_moving());
        assert!(!counter.start().stop().is_moving());
        assert!(counter.toggle().is_moving());
        assert!(!counter.toggle().toggle().is_moving());
    }

    #[test]
    fn test_reset_counter_keeps_passed_and_duration() {
        let counter = EventWindowCounter::new(500.0, true)
            .increment()
            .advance(200.0)
            .increment()
            .stop()
            .reset_counter();

        assert_eq!(counter.count(), 0);
        assert_eq!(counter.passed_millis(), 200.0);
        assert_eq!(counter.duration_millis(), 500.0);
        assert!(counter.is_moving());
    }

    #[test]
    fn test_reset_whole_matches_fresh_counter() {
        let counter = EventWindowCounter::new(500.0, false)
            .increment()
            .start()
            .advance(200.0)
            .stop()
            .reset_whole();

        assert_eq!(counter, EventWindowCounter::new(500.0, true));
    }

    #[test]
    fn test_has_overdue_after_large_delta() {
        let counter = EventWindowCounter::new(10.0, true)
            .increment()
            .increment()
            .advance(50.0);

        assert_eq!(counter.count(), 1);
        assert!(counter.has_overdue());

        let caught_up = counter.advance(0.0);
        assert_eq!(caught_up.count(), 0);
        assert!(!caught_up.has_overdue());
    }

    #[test]
    fn test_expiries_oldest_first() {
        let counter = EventWindowCounter::new(100.0, true)
            .increment()
            .advance(10.0)
            .increment()
            .advance(15.0)
            .increment();

        let deadlines: Vec<f64> = counter.expiries().copied().collect();
        assert_eq!(deadlines, vec![100.0, 110.0, 125.0]);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let counter = EventWindowCounter::new(100.0, true)
            .increment()
            .advance(5.0)
            .stop();
        let snapshot = counter.snapshot();

        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.expiries, vec![100.0]);
        assert_eq!(snapshot.passed_ms, 5.0);
        assert!(!snapshot.moving);
        assert_eq!(snapshot.duration_ms, 100.0);
    }
}
