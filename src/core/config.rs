//! Session configuration.
//!
//! The baseline client polls `getMove` once per second, forever, with no
//! backoff. Everything here defaults to that behavior; backoff, jitter and
//! an attempt cap are opt-in.
//!
//! ```
//! use trilink::core::SessionConfig;
//!
//! let config = SessionConfig::from_json(r#"{"poll": {"interval_ms": 250}}"#).unwrap();
//! assert_eq!(config.poll.interval_ms, 250);
//! assert_eq!(config.poll.max_attempts, None);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How often to poll for the remote move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Delay before the first poll and between polls (default: 1000 ms).
    pub interval_ms: u64,

    /// Multiplier applied after each empty poll (1.0 = fixed interval).
    pub backoff_factor: f64,

    /// Upper bound on the delay between polls.
    pub max_interval_ms: u64,

    /// Give up after this many empty polls (`None` = poll until a move
    /// arrives or the transport fails).
    pub max_attempts: Option<u32>,

    /// Random spread applied to each delay, as a fraction in `[0, 1)`.
    pub jitter: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            backoff_factor: 1.0,
            max_interval_ms: 30_000,
            max_attempts: None,
            jitter: 0.0,
        }
    }
}

impl PollPolicy {
    /// Base poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Upper bound on the poll delay.
    #[must_use]
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// Set the base poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    /// Enable exponential backoff up to `max_interval`.
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval_ms = max_interval.as_millis() as u64;
        self
    }

    /// Give up after `attempts` empty polls.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set the random spread applied to each delay.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Check ranges and ordering of the poll settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Validation("poll interval must be > 0".into()));
        }
        if !(self.backoff_factor >= 1.0 && self.backoff_factor.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "backoff factor must be >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        if self.max_interval_ms < self.interval_ms {
            return Err(ConfigError::Validation(
                "max poll interval must be >= poll interval".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(ConfigError::Validation(format!(
                "jitter must be in [0, 1), got {}",
                self.jitter
            )));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::Validation("max poll attempts must be > 0".into()));
        }
        Ok(())
    }
}

/// Per-session settings for the turn coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub poll: PollPolicy,

    /// Seed for poll jitter.
    pub seed: u64,

    /// Wait one interval before the first `getMove` of each remote turn.
    pub wait_before_first_poll: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            seed: 42,
            wait_before_first_poll: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the poll policy.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Set the jitter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether to wait one interval before the first poll.
    pub fn with_wait_before_first_poll(mut self, wait: bool) -> Self {
        self.wait_before_first_poll = wait;
        self
    }

    /// Validate all settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.poll.validate()
    }
}
