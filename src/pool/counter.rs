//! Entropy accounting for the mixing pool.

/// Bits-of-entropy counter, bounded by pool capacity.
///
/// The counter is a ratchet: it grows as events are credited,
/// saturates at the pool's raw capacity in bits, and only returns to
/// zero on an explicit reset. Extraction does not decrement it.
#[derive(Debug, Clone)]
pub struct EntropyCounter {
    bits: u32,
    capacity_bits: u32,
}

impl EntropyCounter {
    /// Creates a counter for a pool of `capacity_bits` raw bits.
    pub fn new(capacity_bits: u32) -> Self {
        Self {
            bits: 0,
            capacity_bits,
        }
    }

    /// Credits `bits` of entropy, saturating at capacity.
    pub fn add(&mut self, bits: u32) {
        self.bits = self.bits.saturating_add(bits).min(self.capacity_bits);
    }

    /// Returns the current estimate in bits.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the pool capacity in bits.
    #[inline]
    pub fn capacity_bits(&self) -> u32 {
        self.capacity_bits
    }

    /// Returns true if the counter has saturated.
    pub fn is_saturated(&self) -> bool {
        self.bits == self.capacity_bits
    }

    /// Resets the estimate to zero.
    pub fn reset(&mut self) {
        self.bits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_at_zero() {
        let counter = EntropyCounter::new(4096);
        assert_eq!(counter.bits(), 0);
        assert!(!counter.is_saturated());
    }

    #[test]
    fn test_saturates_at_capacity() {
        let mut counter = EntropyCounter::new(100);

        counter.add(60);
        counter.add(60);

        assert_eq!(counter.bits(), 100);
        assert!(counter.is_saturated());

        counter.add(u32::MAX);
        assert_eq!(counter.bits(), 100);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut counter = EntropyCounter::new(100);
        counter.add(42);
        counter.reset();
        assert_eq!(counter.bits(), 0);
    }

    proptest! {
        #[test]
        fn prop_monotonic_and_bounded(credits in proptest::collection::vec(0u32..512, 0..64)) {
            let mut counter = EntropyCounter::new(4096);
            let mut previous = 0;

            for credit in credits {
                counter.add(credit);
                prop_assert!(counter.bits() >= previous);
                prop_assert!(counter.bits() <= counter.capacity_bits());
                previous = counter.bits();
            }
        }
    }
}
