//! Threshold-gated CSPRNG facade.
//!
//! Composes the estimator, mixing pool and extractor into the public
//! contract: accept events, report the entropy level, and release
//! output only once the minimum-entropy gate has been crossed.
//!
//! # State Machine
//!
//! An instance starts `Accumulating` and becomes `Ready` the moment
//! the credited entropy crosses the threshold. It never falls back to
//! `Accumulating` on its own - the counter is a ratchet - only an
//! explicit [`Csprng::reset`] returns it there.

use crate::config::{ConfigError, CsprngConfig};
use crate::estimator::EntropyEstimator;
use crate::event::Event;
use crate::extract::Extractor;
use crate::pool::MixingPool;
use thiserror::Error;

/// Accumulator lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Below the minimum-entropy threshold; extraction is refused.
    Accumulating,
    /// At or above the threshold; extraction is permitted.
    Ready,
}

/// Errors surfaced by the CSPRNG facade.
#[derive(Debug, Error)]
pub enum CsprngError {
    /// The event is malformed (oversized payload). Recoverable: the
    /// caller may retry with a different event.
    #[error("invalid event: payload of {len} bytes exceeds limit of {limit}")]
    InvalidEvent { len: usize, limit: usize },

    /// Extraction was attempted below the threshold. Recoverable: mix
    /// in more events and retry.
    #[error("insufficient entropy: have {have} bits, need {need} bits")]
    InsufficientEntropy { have: u32, need: u32 },

    /// The one-way derivation failed. Fatal: the instance refuses all
    /// further operations rather than degrade to weaker output.
    #[error("internal mixing failure: {0}")]
    InternalMixingFailure(String),
}

/// Entropy-accumulating CSPRNG with a minimum-entropy gate.
///
/// The pool is owned exclusively by the instance and is never exposed
/// raw; output leaves only through the extractor's one-way derivation.
/// For use across threads, wrap in [`SharedCsprng`](super::SharedCsprng).
pub struct Csprng {
    estimator: EntropyEstimator,
    pool: MixingPool,
    extractor: Extractor,
    min_entropy_bits: u32,
    max_event_bytes: usize,
    state: State,
    poisoned: bool,
}

impl Csprng {
    /// Creates an instance with default configuration (512-byte pool,
    /// 128-bit threshold).
    pub fn new() -> Self {
        Self::with_config(CsprngConfig::default()).expect("default config is valid")
    }

    /// Creates an instance from a validated configuration.
    pub fn with_config(config: CsprngConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            estimator: EntropyEstimator::new(config.estimator),
            pool: MixingPool::new(config.pool_bytes),
            extractor: Extractor::new(config.algorithm),
            min_entropy_bits: config.min_entropy_bits,
            max_event_bytes: config.max_event_bytes,
            state: State::Accumulating,
            poisoned: false,
        })
    }

    /// Mixes an input event into the pool.
    ///
    /// Valid in any state. The estimator scores the event, the pool
    /// absorbs it, and the threshold crossing is checked. Zero-length
    /// events are tolerated (they credit ≈0 bits); only an oversized
    /// payload is rejected, with the pool untouched.
    pub fn mix_pool_bytes(&mut self, event: &Event) -> Result<(), CsprngError> {
        self.check_usable()?;

        if event.len() > self.max_event_bytes {
            return Err(CsprngError::InvalidEvent {
                len: event.len(),
                limit: self.max_event_bytes,
            });
        }

        let bits = self.estimator.estimate(event);
        self.pool.absorb(event.bytes(), bits);

        if self.state == State::Accumulating && self.pool.entropy_count() >= self.min_entropy_bits
        {
            self.state = State::Ready;
            tracing::info!(
                entropy_bits = self.pool.entropy_count(),
                threshold = self.min_entropy_bits,
                "Entropy threshold reached; extraction enabled"
            );
        }

        Ok(())
    }

    /// Returns the accumulated entropy estimate in bits.
    #[inline]
    pub fn entropy_count(&self) -> u32 {
        self.pool.entropy_count()
    }

    /// Returns the minimum entropy required before extraction, in bits.
    #[inline]
    pub fn min_entropy(&self) -> u32 {
        self.min_entropy_bits
    }

    /// Returns the current lifecycle state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns true if extraction is currently permitted.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready && !self.poisoned
    }

    /// Produces `n` random bytes.
    ///
    /// Fails fast with [`CsprngError::InsufficientEntropy`] while
    /// accumulating; never blocks. On success the pool has already
    /// been reseeded, so released output is unlinkable from the state
    /// that produced it. A request for zero bytes returns an empty
    /// buffer without touching the pool.
    pub fn get_random_bytes(&mut self, n: usize) -> Result<Vec<u8>, CsprngError> {
        self.check_usable()?;

        if self.state == State::Accumulating {
            return Err(CsprngError::InsufficientEntropy {
                have: self.pool.entropy_count(),
                need: self.min_entropy_bits,
            });
        }

        if n == 0 {
            return Ok(Vec::new());
        }

        match self.extractor.extract(&mut self.pool, n) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                // A broken derivation invalidates every guarantee this
                // instance has made; refuse all further use.
                self.poisoned = true;
                tracing::error!(error = %e, "Extraction failed; instance poisoned");
                Err(CsprngError::InternalMixingFailure(e.to_string()))
            }
        }
    }

    /// Explicitly resets the instance to `Accumulating`.
    ///
    /// The entropy estimate returns to zero and estimation history is
    /// cleared; residual pool mixing is retained.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.estimator.reset();
        self.state = State::Accumulating;
        tracing::info!("CSPRNG reset to accumulating state");
    }

    fn check_usable(&self) -> Result<(), CsprngError> {
        if self.poisoned {
            return Err(CsprngError::InternalMixingFailure(
                "instance poisoned by earlier derivation failure".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Csprng {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Csprng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Csprng")
            .field("state", &self.state)
            .field("entropy_bits", &self.pool.entropy_count())
            .field("min_entropy_bits", &self.min_entropy_bits)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CsprngConfig;
    use crate::estimator::EstimatorConfig;
    use crate::extract::ExtractAlgorithm;
    use proptest::prelude::*;

    /// Threshold 128, exactly 4 bits credited per distinct event.
    fn scenario_config() -> CsprngConfig {
        CsprngConfig {
            min_entropy_bits: 128,
            estimator: EstimatorConfig {
                key_credit_bits: 4,
                jitter_cap_bits: 0,
                jitter_window: 8,
            },
            ..Default::default()
        }
    }

    fn distinct_event(i: u64) -> Event {
        Event::with_arrival(vec![(i % 251) as u8, (i / 251) as u8], i * 10_000, i + 1)
    }

    fn feed_until_ready(rng: &mut Csprng) {
        let mut i = 0;
        while !rng.is_ready() {
            rng.mix_pool_bytes(&distinct_event(i)).unwrap();
            i += 1;
        }
    }

    #[test]
    fn test_starts_accumulating() {
        let rng = Csprng::new();
        assert_eq!(rng.state(), State::Accumulating);
        assert_eq!(rng.entropy_count(), 0);
        assert_eq!(rng.min_entropy(), 128);
    }

    #[test]
    fn test_extraction_refused_while_accumulating() {
        let mut rng = Csprng::new();

        let result = rng.get_random_bytes(32);
        assert!(matches!(
            result,
            Err(CsprngError::InsufficientEntropy { have: 0, need: 128 })
        ));
    }

    #[test]
    fn test_threshold_scenario_32_events() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();

        // 31 events at 4 bits each: 124 bits, still gated.
        for i in 0..31 {
            rng.mix_pool_bytes(&distinct_event(i)).unwrap();
        }
        assert_eq!(rng.entropy_count(), 124);
        assert!(matches!(
            rng.get_random_bytes(32),
            Err(CsprngError::InsufficientEntropy { have: 124, need: 128 })
        ));

        // The 32nd event crosses the threshold.
        rng.mix_pool_bytes(&distinct_event(31)).unwrap();
        assert!(rng.entropy_count() >= 128);
        assert_eq!(rng.state(), State::Ready);

        let out = rng.get_random_bytes(32).unwrap();
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_ready_stays_ready_across_extractions() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();
        feed_until_ready(&mut rng);

        let count_before = rng.entropy_count();
        for _ in 0..5 {
            rng.get_random_bytes(64).unwrap();
        }

        // Ratchet: extraction neither demotes the state nor spends the
        // counter.
        assert_eq!(rng.state(), State::Ready);
        assert_eq!(rng.entropy_count(), count_before);
    }

    #[test]
    fn test_consecutive_outputs_differ() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();
        feed_until_ready(&mut rng);

        let first = rng.get_random_bytes(32).unwrap();
        let second = rng.get_random_bytes(32).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_disjoint_seeds_disjoint_output() {
        let mut rng1 = Csprng::with_config(scenario_config()).unwrap();
        let mut rng2 = Csprng::with_config(scenario_config()).unwrap();

        for i in 0..40 {
            rng1.mix_pool_bytes(&distinct_event(i)).unwrap();
            rng2.mix_pool_bytes(&distinct_event(i + 1000)).unwrap();
        }

        let out1 = rng1.get_random_bytes(32).unwrap();
        let out2 = rng2.get_random_bytes(32).unwrap();
        assert_ne!(out1, out2);
    }

    #[test]
    fn test_empty_event_tolerated() {
        let mut rng = Csprng::new();
        let empty = Event::with_arrival(Vec::new(), 500, 1);

        rng.mix_pool_bytes(&empty).unwrap();
        assert_eq!(rng.entropy_count(), 0);
    }

    #[test]
    fn test_oversized_event_rejected_without_corruption() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();

        let oversized = Event::with_arrival(vec![0u8; 1 << 20], 100, 1);
        assert!(matches!(
            rng.mix_pool_bytes(&oversized),
            Err(CsprngError::InvalidEvent { .. })
        ));

        // Rejection is recoverable; the instance keeps working.
        assert_eq!(rng.entropy_count(), 0);
        rng.mix_pool_bytes(&distinct_event(0)).unwrap();
        assert_eq!(rng.entropy_count(), 4);
    }

    #[test]
    fn test_zero_byte_request() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();
        feed_until_ready(&mut rng);

        let out = rng.get_random_bytes(0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_derivation_failure_poisons_instance() {
        let config = CsprngConfig {
            algorithm: ExtractAlgorithm::HkdfSha256,
            ..scenario_config()
        };
        let mut rng = Csprng::with_config(config).unwrap();
        feed_until_ready(&mut rng);

        // Beyond the HKDF expand limit: fatal.
        assert!(matches!(
            rng.get_random_bytes(100_000),
            Err(CsprngError::InternalMixingFailure(_))
        ));

        // The instance must not be reused after an internal failure.
        assert!(!rng.is_ready());
        assert!(matches!(
            rng.get_random_bytes(16),
            Err(CsprngError::InternalMixingFailure(_))
        ));
        assert!(matches!(
            rng.mix_pool_bytes(&distinct_event(0)),
            Err(CsprngError::InternalMixingFailure(_))
        ));
    }

    #[test]
    fn test_reset_returns_to_accumulating() {
        let mut rng = Csprng::with_config(scenario_config()).unwrap();
        feed_until_ready(&mut rng);

        rng.reset();

        assert_eq!(rng.state(), State::Accumulating);
        assert_eq!(rng.entropy_count(), 0);
        assert!(matches!(
            rng.get_random_bytes(16),
            Err(CsprngError::InsufficientEntropy { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_entropy_count_monotonic(
            payloads in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..16),
                1..64,
            )
        ) {
            let mut rng = Csprng::new();
            let mut previous = 0;

            for (i, payload) in payloads.into_iter().enumerate() {
                let event = Event::with_arrival(payload, i as u64 * 7_919, i as u64 + 1);
                rng.mix_pool_bytes(&event).unwrap();

                prop_assert!(rng.entropy_count() >= previous);
                prop_assert!(rng.entropy_count() <= 512 * 8);
                previous = rng.entropy_count();
            }
        }

        #[test]
        fn prop_gate_enforced_exactly(events_before_check in 1u64..60) {
            let mut rng = Csprng::with_config(scenario_config()).unwrap();

            for i in 0..events_before_check {
                rng.mix_pool_bytes(&distinct_event(i)).unwrap();
            }

            let result = rng.get_random_bytes(16);
            if rng.entropy_count() < rng.min_entropy() {
                prop_assert!(
                    matches!(result, Err(CsprngError::InsufficientEntropy { .. })),
                    "expected InsufficientEntropy error"
                );
            } else {
                prop_assert_eq!(result.unwrap().len(), 16);
            }
        }
    }
}
