//! Serializable view of a counter state.
//!
//! Snapshots are for observation: rendering, logging, and comparing runs.
//! They are not a persistence format and cannot be turned back into a counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time view of an `EventWindowCounter`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Window length in milliseconds
    pub duration_ms: f64,
    /// Whether time was accumulating
    pub moving: bool,
    /// Milliseconds elapsed while moving
    pub passed_ms: f64,
    /// Number of live events
    pub count: usize,
    /// Live event deadlines, oldest first
    pub expiries: Vec<f64>,
}

impl CounterSnapshot {
    /// Serializes the snapshot as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} moving={} passed={}ms window={}ms",
            self.count, self.moving, self.passed_ms, self.duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventWindowCounter;

    #[test]
    fn test_display() {
        let snapshot = EventWindowCounter::new(1000.0, true)
            .increment()
            .advance(12.5)
            .snapshot();
        assert_eq!(
            snapshot.to_string(),
            "count=1 moving=true passed=12.5ms window=1000ms"
        );
    }

    #[test]
    fn test_json_fields() {
        let snapshot = EventWindowCounter::new(40.0, false).increment().snapshot();
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["moving"], false);
        assert_eq!(value["duration_ms"], 40.0);
        assert_eq!(value["passed_ms"], 0.0);
        assert_eq!(value["expiries"][0], 40.0);
    }
}
