//! Conservative entropy estimation for input events.
//!
//! Every incoming event is scored in bits before mixing. Estimates are
//! deliberately pessimistic: overestimation is the classic CSPRNG
//! security bug, so both credit channels are capped and default low.
//! The estimator is deterministic given the same event sequence; the
//! events themselves are the non-determinism source.

mod keyspace;
mod timing;

pub use keyspace::{KeyCredit, KEYSPACE_BITS_MAX};
pub use timing::JitterTracker;

use crate::event::Event;
use serde::{Deserialize, Serialize};

/// Configuration for entropy estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Fixed credit per fresh keystroke, in bits (clamped to
    /// [`KEYSPACE_BITS_MAX`]).
    pub key_credit_bits: u32,
    /// Upper bound on the timing-jitter credit per event, in bits.
    pub jitter_cap_bits: u32,
    /// Number of inter-arrival intervals in the jitter window.
    pub jitter_window: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            key_credit_bits: 2,
            jitter_cap_bits: 2,
            jitter_window: 8,
        }
    }
}

/// Scores events by combining content and timing credit.
#[derive(Debug)]
pub struct EntropyEstimator {
    config: EstimatorConfig,
    keys: KeyCredit,
    timing: JitterTracker,
}

impl EntropyEstimator {
    /// Creates an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        let timing = JitterTracker::new(config.jitter_window);
        Self {
            config,
            keys: KeyCredit::new(),
            timing,
        }
    }

    /// Returns a conservative entropy estimate for `event` in bits.
    ///
    /// Timing is always observed, even for events that credit nothing,
    /// so the interval window stays aligned with reality. Empty events
    /// score zero outright.
    pub fn estimate(&mut self, event: &Event) -> u32 {
        self.timing.observe(event.arrival_micros());

        if event.is_empty() {
            return 0;
        }

        let key_bits = self.keys.credit(event, self.config.key_credit_bits);
        let jitter_bits = self.timing.credit(self.config.jitter_cap_bits);

        tracing::trace!(
            sequence = event.sequence(),
            key_bits,
            jitter_bits,
            "Estimated event entropy"
        );

        key_bits + jitter_bits
    }

    /// Clears all estimation history.
    pub fn reset(&mut self) {
        self.keys.reset();
        self.timing.reset();
    }

    /// Returns the estimator configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl Default for EntropyEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}
