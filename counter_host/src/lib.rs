//! # Counter Host
//!
//! Host-side integration for event window counters.
//!
//! ## Philosophy
//!
//! - **The counter stays pure**: clocks, logging, and scripting live here
//! - **Deterministic by default**: simulated clocks only move when told to
//! - **Explicit delivery**: the host decides when time reaches the counter
//!
//! ## Design
//!
//! The crate provides:
//! - `FrameClock`: monotonic millisecond source (simulated or system)
//! - `CounterScript`: line-based scripted driver
//! - `CounterHost`: owns a counter, polls a clock, logs transitions
//!
//! ## Example
//!
//! ```
//! use counter_host::{CounterAction, CounterHost, HostConfig};
//! use window_counter::CounterConfig;
//!
//! let mut host = CounterHost::simulated(HostConfig::new(CounterConfig::new(1000.0))).unwrap();
//! host.apply(CounterAction::Increment);
//!
//! host.clock_mut().advance_millis(1001.0);
//! host.tick();
//! assert_eq!(host.counter().count(), 0);
//! ```

pub mod clock;
pub mod host;
pub mod script;

pub use clock::{FrameClock, SimFrameClock, SystemFrameClock};
pub use host::{CounterAction, CounterHost, HostConfig, HostError};
pub use script::{CounterScript, Expectation, ScriptCommand, ScriptError, ScriptStep};
