//! Counter construction options.
//!
//! The counter itself trusts whatever duration it is given. Configuration
//! read from outside the program goes through [`CounterConfig::validate`]
//! first, so nonsensical windows are rejected at the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default window length (one second)
pub const DEFAULT_DURATION_MS: f64 = 1000.0;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Window duration must be positive, got {0} ms")]
    NonPositiveDuration(f64),

    #[error("Window duration must be finite, got {0}")]
    NonFiniteDuration(f64),

    #[error("Failed to parse counter config: {0}")]
    Parse(String),
}

/// Options accepted when creating a counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Window length in milliseconds
    pub duration_ms: f64,
    /// Whether the counter starts moving
    #[serde(default = "default_moving")]
    pub moving: bool,
}

fn default_moving() -> bool {
    true
}

impl CounterConfig {
    /// Creates a config for a moving counter with the given window
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            moving: true,
        }
    }

    /// Sets the initial motion state
    pub fn with_moving(mut self, moving: bool) -> Self {
        self.moving = moving;
        self
    }

    /// Parses and validates a JSON config
    ///
    /// ```
    /// use window_counter::CounterConfig;
    ///
    /// let config = CounterConfig::from_json(r#"{ "duration_ms": 30000 }"#).unwrap();
    /// assert_eq!(config.duration_ms, 30000.0);
    /// assert!(config.moving);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks that the window is a positive, finite length
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_ms.is_finite() {
            return Err(ConfigError::NonFiniteDuration(self.duration_ms));
        }
        if self.duration_ms <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(self.duration_ms));
        }
        Ok(())
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}
