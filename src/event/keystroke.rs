//! Event type representing a discrete input action with metadata.

use std::sync::OnceLock;
use std::time::Instant;

/// Monotonic origin for arrival timestamps, fixed on first use.
static CLOCK_ORIGIN: OnceLock<Instant> = OnceLock::new();

fn now_micros() -> u64 {
    let origin = CLOCK_ORIGIN.get_or_init(Instant::now);
    origin.elapsed().as_micros() as u64
}

/// A single discrete input event (e.g. one keystroke).
///
/// Carries the raw payload bytes along with arrival metadata needed
/// for timing-jitter estimation. Events are transient: they are
/// consumed by the estimator and mixing pool and never stored verbatim.
#[derive(Clone)]
pub struct Event {
    /// Raw payload bytes (e.g. the pressed key).
    bytes: Vec<u8>,
    /// Arrival time in microseconds on a process-local monotonic clock.
    arrival_micros: u64,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl Event {
    /// Creates a new event stamped with the current monotonic time.
    pub fn new(bytes: impl Into<Vec<u8>>, sequence: u64) -> Self {
        Self {
            bytes: bytes.into(),
            arrival_micros: now_micros(),
            sequence,
        }
    }

    /// Creates an event with an explicit arrival time.
    ///
    /// Used by scripted sources and tests where timing must be
    /// reproducible.
    pub fn with_arrival(bytes: impl Into<Vec<u8>>, arrival_micros: u64, sequence: u64) -> Self {
        Self {
            bytes: bytes.into(),
            arrival_micros,
            sequence,
        }
    }

    /// Returns the raw payload bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the arrival time in microseconds.
    #[inline]
    pub fn arrival_micros(&self) -> u64 {
        self.arrival_micros
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payload is never printed; events feed the entropy pool.
        f.debug_struct("Event")
            .field("payload_bytes", &self.bytes.len())
            .field("arrival_micros", &self.arrival_micros)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
