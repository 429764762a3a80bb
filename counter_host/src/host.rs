//! # Counter Host
//!
//! Embeds an `EventWindowCounter` in a running application.
//!
//! The host owns the current counter value, polls a [`FrameClock`] to turn
//! readings into deltas, applies actions, and records every transition in a
//! [`TransitionLog`]. The counter stays a pure value; everything stateful
//! about time lives here.

use crate::clock::{FrameClock, SimFrameClock};
use crate::script::{CounterScript, Expectation, ScriptCommand, ScriptError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use transition_log::{CounterId, LogEntry, LogLevel, TransitionLog, MAX_LOG_HISTORY};
use window_counter::{ConfigError, CounterConfig, CounterSnapshot, EventWindowCounter};

/// Tolerance when comparing passed time in script expectations
const PASSED_EPSILON_MS: f64 = 1e-9;

/// Host error types
#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Expectation failed at line {line}: expected {expected}, got {actual}")]
    ExpectationFailed {
        line: usize,
        expected: String,
        actual: String,
    },

    #[error("I/O error: {0}")]
    Io(String),
}

/// Host configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Options for the hosted counter
    pub counter: CounterConfig,
    /// Number of log entries kept
    pub log_capacity: usize,
    /// Whether ticks are delivered while the counter is paused
    ///
    /// Delivering is harmless; skipping saves the no-op transition and its
    /// log entry.
    pub advance_while_paused: bool,
}

impl HostConfig {
    /// Creates a host config around a counter config
    pub fn new(counter: CounterConfig) -> Self {
        Self {
            counter,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON host config
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.counter.validate()?;
        Ok(config)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            counter: CounterConfig::default(),
            log_capacity: MAX_LOG_HISTORY,
            advance_while_paused: true,
        }
    }
}

/// An operation the host can apply to its counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterAction {
    /// Record one event
    Increment,
    /// Deliver a time delta in milliseconds
    Advance(f64),
    /// Let time accumulate
    Start,
    /// Freeze time
    Stop,
    /// Flip motion
    Toggle,
    /// Drop live events, keep passed time
    ResetCounter,
    /// Drop live events and passed time
    ResetWhole,
}

impl CounterAction {
    /// Returns the counter that results from this action
    pub fn apply(self, counter: &EventWindowCounter) -> EventWindowCounter {
        match self {
            CounterAction::Increment => counter.increment(),
            CounterAction::Advance(delta_ms) => counter.advance(delta_ms),
            CounterAction::Start => counter.start(),
            CounterAction::Stop => counter.stop(),
            CounterAction::Toggle => counter.toggle(),
            CounterAction::ResetCounter => counter.reset_counter(),
            CounterAction::ResetWhole => counter.reset_whole(),
        }
    }

    /// Short name used in log entries
    pub fn name(&self) -> &'static str {
        match self {
            CounterAction::Increment => "increment",
            CounterAction::Advance(_) => "advance",
            CounterAction::Start => "start",
            CounterAction::Stop => "stop",
            CounterAction::Toggle => "toggle",
            CounterAction::ResetCounter => "reset_counter",
            CounterAction::ResetWhole => "reset_whole",
        }
    }
}

/// Runtime that owns a counter and drives it from a clock
#[derive(Debug)]
pub struct CounterHost<C: FrameClock> {
    id: CounterId,
    counter: EventWindowCounter,
    clock: C,
    last_poll_ms: f64,
    advance_while_paused: bool,
    log: TransitionLog,
}

impl<C: FrameClock> CounterHost<C> {
    /// Creates a host with a fresh counter
    pub fn new(config: HostConfig, mut clock: C) -> Result<Self, HostError> {
        config.counter.validate()?;

        let id = CounterId::new();
        let mut log = TransitionLog::with_capacity(config.log_capacity);
        log.record(
            LogEntry::new(LogLevel::Info, "counter created")
                .with_source(id)
                .with_field("duration_ms", config.counter.duration_ms)
                .with_field("moving", config.counter.moving),
        );

        Ok(Self {
            id,
            counter: EventWindowCounter::from_config(&config.counter),
            last_poll_ms: clock.poll_millis(),
            clock,
            advance_while_paused: config.advance_while_paused,
            log,
        })
    }

    /// Polls the clock and delivers the elapsed time to the counter
    ///
    /// Returns the delta observed since the previous poll.
    pub fn tick(&mut self) -> f64 {
        let now = self.clock.poll_millis();
        let delta_ms = (now - self.last_poll_ms).max(0.0);
        self.last_poll_ms = now;

        if self.counter.is_moving() || self.advance_while_paused {
            self.deliver(delta_ms);
        }
        delta_ms
    }

    /// Applies an action to the counter
    pub fn apply(&mut self, action: CounterAction) {
        match action {
            CounterAction::Advance(delta_ms) => self.deliver(delta_ms),
            _ => {
                self.counter = action.apply(&self.counter);
                let entry = self.describe(action).with_field("action", action.name());
                self.record(entry);
            }
        }
    }

    /// Checks the counter against an expectation
    ///
    /// Failures are logged at error level and returned.
    pub fn check(&mut self, line: usize, expectation: Expectation) -> Result<(), HostError> {
        let (expected, actual) = match expectation {
            Expectation::Count(count) if count != self.counter.count() => (
                format!("count {}", count),
                format!("count {}", self.counter.count()),
            ),
            Expectation::Moving(moving) if moving != self.counter.is_moving() => (
                format!("moving {}", moving),
                format!("moving {}", self.counter.is_moving()),
            ),
            Expectation::Passed(passed_ms)
                if (passed_ms - self.counter.passed_millis()).abs() > PASSED_EPSILON_MS =>
            {
                (
                    format!("passed {}ms", passed_ms),
                    format!("passed {}ms", self.counter.passed_millis()),
                )
            }
            _ => return Ok(()),
        };

        self.record(
            LogEntry::new(LogLevel::Error, "expectation failed")
                .with_field("line", line)
                .with_field("expected", &expected)
                .with_field("actual", &actual),
        );
        Err(HostError::ExpectationFailed {
            line,
            expected,
            actual,
        })
    }

    /// Returns the current counter value
    pub fn counter(&self) -> &EventWindowCounter {
        &self.counter
    }

    /// Consumes the host, returning the counter value
    pub fn into_counter(self) -> EventWindowCounter {
        self.counter
    }

    /// Captures the current counter state
    pub fn snapshot(&self) -> CounterSnapshot {
        self.counter.snapshot()
    }

    /// Returns the host's counter ID
    pub fn id(&self) -> CounterId {
        self.id
    }

    /// Returns the transition log
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// Returns the transition log mutably (e.g. to drain it)
    pub fn log_mut(&mut self) -> &mut TransitionLog {
        &mut self.log
    }

    /// Returns the clock
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn describe(&self, action: CounterAction) -> LogEntry {
        match action {
            CounterAction::Increment => LogEntry::new(LogLevel::Info, "event recorded")
                .with_field("count", self.counter.count())
                .with_field("passed_ms", self.counter.passed_millis()),
            CounterAction::Advance(delta_ms) => LogEntry::new(LogLevel::Debug, "time advanced")
                .with_field("delta_ms", delta_ms)
                .with_field("passed_ms", self.counter.passed_millis())
                .with_field("moving", self.counter.is_moving()),
            CounterAction::Start | CounterAction::Stop | CounterAction::Toggle => {
                LogEntry::new(LogLevel::Info, "motion changed")
                    .with_field("moving", self.counter.is_moving())
            }
            CounterAction::ResetCounter => LogEntry::new(LogLevel::Info, "count reset")
                .with_field("passed_ms", self.counter.passed_millis()),
            CounterAction::ResetWhole => LogEntry::new(LogLevel::Info, "counter reset"),
        }
    }

    fn deliver(&mut self, delta_ms: f64) {
        let before = self.counter.count();
        self.counter = self.counter.advance(delta_ms);

        let entry = if self.counter.count() < before {
            LogEntry::new(LogLevel::Info, "event expired")
                .with_field("count", self.counter.count())
                .with_field("passed_ms", self.counter.passed_millis())
        } else {
            self.describe(CounterAction::Advance(delta_ms))
        };
        self.record(entry);

        if self.counter.has_overdue() {
            let mut entry = LogEntry::new(LogLevel::Warn, "overdue events pending")
                .with_field("count", self.counter.count());
            if let Some(deadline) = self.counter.next_expiry() {
                entry = entry.with_field("next_expiry_ms", deadline);
            }
            self.record(entry);
        }
    }

    fn record(&mut self, entry: LogEntry) {
        self.log.record(entry.with_source(self.id));
    }
}

impl CounterHost<SimFrameClock> {
    /// Creates a host driven by a simulated clock starting at 0 ms
    pub fn simulated(config: HostConfig) -> Result<Self, HostError> {
        Self::new(config, SimFrameClock::new())
    }

    /// Runs every remaining step of a script
    ///
    /// Stops at the first failed expectation. Returns the number of steps
    /// executed.
    pub fn run_script(&mut self, script: &mut CounterScript) -> Result<usize, HostError> {
        let mut executed = 0;

        while let Some(step) = script.next_step() {
            match step.command {
                ScriptCommand::Action(action) => self.apply(action),
                ScriptCommand::Wait(delta_ms) => {
                    self.clock.advance_millis(delta_ms);
                    self.tick();
                }
                ScriptCommand::Tick => {
                    self.tick();
                }
                ScriptCommand::Expect(expectation) => self.check(step.line, expectation)?,
            }
            executed += 1;
        }

        Ok(executed)
    }
}
