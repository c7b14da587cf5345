//! Entropy accumulation pool.
//!
//! This module owns the fixed-size mixed state and its entropy
//! accounting. Input is folded in through a cryptographic one-way
//! function; the accumulated estimate saturates at pool capacity and
//! only an explicit reset clears it.

mod counter;
mod mixing;

pub use counter::EntropyCounter;
pub use mixing::{MixingPool, DEFAULT_POOL_BYTES};
