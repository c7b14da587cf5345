//! Per-keystroke content credit.
//!
//! Credits a small fixed number of bits for the unpredictability of
//! *which* key was pressed. The credit is bounded by the log2 of a
//! practical keyboard alphabet, and immediate verbatim repeats (e.g.
//! a held-down key autorepeating) earn nothing.

use crate::event::Event;

/// Upper bound on the per-key credit: log2 of a practical keyboard
/// alphabet (~64 reachable characters).
pub const KEYSPACE_BITS_MAX: u32 = 6;

/// Assigns content credit per event.
#[derive(Debug, Default)]
pub struct KeyCredit {
    /// Fingerprint of the previous payload, for repeat detection.
    /// The payload itself is never retained.
    last_fingerprint: Option<u64>,
}

impl KeyCredit {
    /// Creates a fresh credit tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content credit for `event` in bits.
    ///
    /// Empty payloads and payloads identical to the immediately
    /// preceding event credit zero.
    pub fn credit(&mut self, event: &Event, key_bits: u32) -> u32 {
        if event.is_empty() {
            return 0;
        }

        let fingerprint = Self::fingerprint(event.bytes());
        let repeated = self.last_fingerprint == Some(fingerprint);
        self.last_fingerprint = Some(fingerprint);

        if repeated {
            0
        } else {
            key_bits.min(KEYSPACE_BITS_MAX)
        }
    }

    /// Clears repeat-detection history.
    pub fn reset(&mut self) {
        self.last_fingerprint = None;
    }

    fn fingerprint(bytes: &[u8]) -> u64 {
        let digest = blake3::hash(bytes);
        u64::from_le_bytes(digest.as_bytes()[..8].try_into().expect("digest is 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_key_earns_credit() {
        let mut keys = KeyCredit::new();
        let event = Event::with_arrival(*b"a", 0, 1);

        assert_eq!(keys.credit(&event, 4), 4);
    }

    #[test]
    fn test_credit_clamped_to_keyspace() {
        let mut keys = KeyCredit::new();
        let event = Event::with_arrival(*b"a", 0, 1);

        assert_eq!(keys.credit(&event, 30), KEYSPACE_BITS_MAX);
    }

    #[test]
    fn test_empty_payload_earns_nothing() {
        let mut keys = KeyCredit::new();
        let event = Event::with_arrival(Vec::new(), 0, 1);

        assert_eq!(keys.credit(&event, 4), 0);
    }

    #[test]
    fn test_immediate_repeat_earns_nothing() {
        let mut keys = KeyCredit::new();

        let first = Event::with_arrival(*b"a", 0, 1);
        let repeat = Event::with_arrival(*b"a", 100, 2);
        let fresh = Event::with_arrival(*b"b", 200, 3);

        assert_eq!(keys.credit(&first, 4), 4);
        assert_eq!(keys.credit(&repeat, 4), 0);
        assert_eq!(keys.credit(&fresh, 4), 4);
    }

    #[test]
    fn test_reset_forgets_repeat_history() {
        let mut keys = KeyCredit::new();
        let event = Event::with_arrival(*b"a", 0, 1);

        keys.credit(&event, 4);
        keys.reset();

        assert_eq!(keys.credit(&event, 4), 4);
    }
}
