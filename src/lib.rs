//! Keystroke Entropy Library
//!
//! A software entropy accumulator and threshold-gated CSPRNG in the
//! spirit of `/dev/random`: unpredictable real-world events (keyboard
//! input) are conservatively scored, mixed irreversibly into a fixed
//! pool, and random bytes are released only once a minimum entropy
//! threshold has been met.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! events → estimation → mixing pool → extraction
//!                           ↓
//!                 entropy counter (gate)
//! ```
//!
//! # Design Principles
//!
//! - **Fail-closed**: no output below the minimum-entropy threshold
//! - **Conservative crediting**: under-estimate contributed entropy;
//!   overestimation is the classic CSPRNG security bug
//! - **Uses standard primitives**: BLAKE3/HKDF-SHA256 for mixing and
//!   extraction
//! - **Forward secrecy**: the pool is reseeded inside every extraction,
//!   so released output is unlinkable from later pool state
//!
//! # Example
//!
//! ```no_run
//! use keystroke_entropy::{
//!     csprng::Csprng,
//!     event::{EventSource, ScriptedSource},
//! };
//!
//! let mut rng = Csprng::new();
//! let mut source =
//!     ScriptedSource::from_text("the quick brown fox jumps over the lazy dog 0123456789", 90_000);
//! source.open().unwrap();
//!
//! // Mix events until the threshold gate opens
//! while !rng.is_ready() {
//!     let event = source.next_event().unwrap();
//!     rng.mix_pool_bytes(&event).unwrap();
//! }
//!
//! let bytes = rng.get_random_bytes(32).unwrap();
//! assert_eq!(bytes.len(), 32);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod csprng;
pub mod estimator;
pub mod event;
pub mod extract;
pub mod pool;

// Re-export commonly used types at crate root
pub use analysis::OutputStatistics;
pub use config::{ConfigError, CsprngConfig};
pub use csprng::{Csprng, CsprngError, SharedCsprng, State};
pub use estimator::{EntropyEstimator, EstimatorConfig};
pub use event::{Event, EventSource, ReaderSource, ScriptedSource};
pub use extract::{ExtractAlgorithm, Extractor};
pub use pool::MixingPool;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
