//! The entropy pool and its one-way mixing function.
//!
//! The pool is a fixed-length byte buffer mutated only through BLAKE3
//! compression: each absorb hashes the whole pool together with the new
//! input and folds the digest back in at a rotating offset. Knowledge
//! of the pool state does not allow recovering prior inputs, and no
//! input can cancel entropy already present. Raw pool bytes never leave
//! this module except to the extractor.

use super::counter::EntropyCounter;
use zeroize::Zeroize;

/// Default pool length in bytes (4096 bits of raw capacity).
pub const DEFAULT_POOL_BYTES: usize = 512;

/// Bytes folded into the pool per absorb.
const MIX_BLOCK_BYTES: usize = 64;

/// Domain separator for event absorption.
const ABSORB_DOMAIN: &[u8] = b"keystroke-entropy/absorb/v1";
/// Domain separator for post-extraction reseeding.
const RESEED_DOMAIN: &[u8] = b"keystroke-entropy/reseed/v1";

/// Fixed-size entropy pool with one-way mixing.
pub struct MixingPool {
    /// Pool state. Never exposed raw outside the crate.
    pool: Vec<u8>,
    /// Next fold-in offset, advanced per absorb.
    rotor: usize,
    /// Accumulated entropy estimate.
    counter: EntropyCounter,
    /// Total absorbs performed, bound into each digest.
    absorb_count: u64,
    /// Total post-extraction reseeds performed.
    reseed_count: u64,
}

impl MixingPool {
    /// Creates a pool of `pool_bytes` bytes, initially zeroed and
    /// carrying no credited entropy.
    pub fn new(pool_bytes: usize) -> Self {
        Self {
            pool: vec![0u8; pool_bytes],
            rotor: 0,
            counter: EntropyCounter::new((pool_bytes * 8) as u32),
            absorb_count: 0,
            reseed_count: 0,
        }
    }

    /// Folds `event_bytes` into the pool and credits `estimated_bits`.
    ///
    /// All-or-nothing: the digest over (domain, counter, pool, input)
    /// is computed in full before any pool byte changes, so a panic or
    /// malformed input can never leave the pool half-mixed. Zero-length
    /// input is tolerated and still stirs the state.
    pub fn absorb(&mut self, event_bytes: &[u8], estimated_bits: u32) {
        let mut block = [0u8; MIX_BLOCK_BYTES];
        let mut hasher = blake3::Hasher::new();
        hasher.update(ABSORB_DOMAIN);
        hasher.update(&self.absorb_count.to_le_bytes());
        hasher.update(&self.pool);
        hasher.update(event_bytes);
        hasher.finalize_xof().fill(&mut block);

        for (i, byte) in block.iter().enumerate() {
            let idx = (self.rotor + i) % self.pool.len();
            self.pool[idx] ^= byte;
        }
        self.rotor = (self.rotor + MIX_BLOCK_BYTES) % self.pool.len();
        self.absorb_count += 1;
        self.counter.add(estimated_bits);
        block.zeroize();

        tracing::trace!(
            absorb_count = self.absorb_count,
            credited_bits = estimated_bits,
            entropy_bits = self.counter.bits(),
            "Absorbed event into pool"
        );
    }

    /// Returns the current entropy estimate in bits. Side-effect-free.
    #[inline]
    pub fn entropy_count(&self) -> u32 {
        self.counter.bits()
    }

    /// Returns the pool's raw capacity in bits.
    #[inline]
    pub fn capacity_bits(&self) -> u32 {
        self.counter.capacity_bits()
    }

    /// Returns the pool length in bytes.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.pool.len()
    }

    /// Rewrites the entire pool from a derivation of (old pool,
    /// extractor output), unlinking future state from the bytes just
    /// released. Called by the extractor before output is returned.
    ///
    /// The entropy counter is not decremented: the pool is treated as
    /// a ratchet, matching the accumulate-once policy.
    pub fn reseed_from_extraction(&mut self, derived_bytes: &[u8]) {
        let mut hasher = blake3::Hasher::new();
        hasher.update(RESEED_DOMAIN);
        hasher.update(&self.reseed_count.to_le_bytes());
        hasher.update(&self.pool);
        hasher.update(derived_bytes);

        let mut fresh = vec![0u8; self.pool.len()];
        hasher.finalize_xof().fill(&mut fresh);
        self.pool.zeroize();
        self.pool = fresh;
        self.rotor = 0;
        self.reseed_count += 1;

        tracing::debug!(
            reseed_count = self.reseed_count,
            "Pool reseeded after extraction"
        );
    }

    /// Returns the total number of post-extraction reseeds.
    #[inline]
    pub fn reseed_count(&self) -> u64 {
        self.reseed_count
    }

    /// Resets the entropy estimate to zero and stirs the pool state.
    ///
    /// The pool bytes are re-derived rather than zeroed so residual
    /// mixing is kept, but no credit survives the reset.
    pub fn reset(&mut self) {
        self.reseed_from_extraction(&[]);
        self.counter.reset();
        tracing::info!("Pool reset; entropy estimate cleared");
    }

    /// Raw pool state, for the extractor's one-way derivation only.
    #[inline]
    pub(crate) fn state(&self) -> &[u8] {
        &self.pool
    }
}

impl Drop for MixingPool {
    fn drop(&mut self) {
        self.pool.zeroize();
    }
}

impl std::fmt::Debug for MixingPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixingPool")
            .field("len_bytes", &self.pool.len())
            .field("entropy_bits", &self.counter.bits())
            .field("absorb_count", &self.absorb_count)
            .field("reseed_count", &self.reseed_count)
            .finish_non_exhaustive()
    }
}

impl Default for MixingPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_BYTES)
    }
}
