//! # Window Counter
//!
//! Counts how many events happened within a trailing time window.
//!
//! ## Philosophy
//!
//! - **Pure transitions**: Every operation maps `(state, input) -> state`
//! - **Host-driven time**: The counter never reads a clock; hosts deliver deltas
//! - **Persistent values**: Old states stay valid after a transition
//! - **Total**: No operation can fail
//!
//! ## Design
//!
//! The crate provides:
//! - `EventWindowCounter`: the counter state machine
//! - `Queue`: persistent FIFO of expiry deadlines
//! - `CounterConfig`: construction options with boundary validation
//! - `CounterSnapshot`: serializable view of a counter state
//!
//! ## Example
//!
//! ```
//! use window_counter::EventWindowCounter;
//!
//! let counter = EventWindowCounter::new(1000.0, true).increment();
//! assert_eq!(counter.count(), 1);
//!
//! let counter = counter.advance(500.0).advance(600.0);
//! assert_eq!(counter.count(), 0);
//! assert_eq!(counter.passed_millis(), 1100.0);
//! ```

pub mod config;
pub mod counter;
pub mod queue;
pub mod snapshot;

pub use config::{ConfigError, CounterConfig};
pub use counter::EventWindowCounter;
pub use queue::Queue;
pub use snapshot::CounterSnapshot;
