//! Poll scheduling for the remote move.
//!
//! A `PollSchedule` turns a `PollPolicy` into concrete delays. It counts
//! empty polls within one remote turn and is reset once a move arrives.

use std::time::Duration;

use crate::core::{PollPolicy, SessionRng};

/// Delay generator for one session.
#[derive(Clone, Debug)]
pub struct PollSchedule {
    policy: PollPolicy,
    rng: SessionRng,
    /// Empty polls since the last reset.
    misses: u32,
}

impl PollSchedule {
    /// Schedule for `policy`, jittered from `rng`.
    #[must_use]
    pub fn new(policy: PollPolicy, rng: SessionRng) -> Self {
        Self {
            policy,
            rng,
            misses: 0,
        }
    }

    /// Delay before the first poll of a remote turn.
    pub fn first_delay(&mut self) -> Duration {
        self.jittered(self.policy.interval())
    }

    /// Record an empty poll.
    ///
    /// Returns the delay before the next poll, or `None` once the attempt
    /// cap is reached.
    pub fn record_miss(&mut self) -> Option<Duration> {
        self.misses = self.misses.saturating_add(1);
        if let Some(cap) = self.policy.max_attempts {
            if self.misses >= cap {
                return None;
            }
        }

        let exponent = (self.misses - 1).min(i32::MAX as u32) as i32;
        let base_ms = self.policy.interval_ms as f64 * self.policy.backoff_factor.powi(exponent);
        let capped_ms = base_ms.min(self.policy.max_interval_ms as f64);
        Some(self.jittered(Duration::from_millis(capped_ms.round() as u64)))
    }

    /// Start a new remote turn.
    pub fn reset(&mut self) {
        self.misses = 0;
    }

    /// Empty polls since the last reset.
    #[must_use]
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Policy in use.
    #[must_use]
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Spread `delay` by the jitter fraction, never past `max_interval`.
    fn jittered(&mut self, delay: Duration) -> Duration {
        if self.policy.jitter == 0.0 {
            return delay;
        }
        let scale = 1.0 + self.policy.jitter * self.rng.gen_signed_unit();
        delay.mul_f64(scale).min(self.policy.max_interval())
    }
}
