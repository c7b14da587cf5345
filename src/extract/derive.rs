//! One-way output derivation from pool state.

use crate::pool::MixingPool;
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

/// Domain separator for output extraction.
const EXTRACT_DOMAIN: &[u8] = b"keystroke-entropy/extract/v1";

/// Length of the reseed block derived alongside each output.
const RESEED_BLOCK_BYTES: usize = 64;

/// Supported derivation algorithms for extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractAlgorithm {
    /// BLAKE3 in XOF mode - fast, unbounded output, recommended default.
    #[default]
    Blake3Xof,
    /// HKDF-SHA256 - widely deployed, conservative choice. Output is
    /// bounded by the HKDF expand limit.
    HkdfSha256,
}

/// Errors that can occur during extraction.
///
/// A derivation failure means the one-way function itself could not
/// process the request; the facade treats it as fatal.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("one-way derivation cannot produce {requested} bytes")]
    DeriveFailure { requested: usize },
}

/// Derives uniform-looking output from pool state.
///
/// Each extraction derives `n + 64` bytes in a single pass: the first
/// `n` become caller output, the trailing block immediately reseeds
/// the pool. The reseed happens before output is returned, so no two
/// extractions ever observe the same pool state and released bytes are
/// unlinkable from the state that follows them.
#[derive(Debug, Clone)]
pub struct Extractor {
    algorithm: ExtractAlgorithm,
}

impl Extractor {
    /// Creates an extractor using the given algorithm.
    pub fn new(algorithm: ExtractAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Returns the algorithm in use.
    pub fn algorithm(&self) -> ExtractAlgorithm {
        self.algorithm
    }

    /// Extracts `n` output bytes from `pool` and reseeds it.
    ///
    /// All-or-nothing: on failure the pool is untouched and no partial
    /// output exists. On success the pool has already been reseeded by
    /// the time the bytes reach the caller.
    pub fn extract(&self, pool: &mut MixingPool, n: usize) -> Result<Vec<u8>, ExtractError> {
        let total = n
            .checked_add(RESEED_BLOCK_BYTES)
            .ok_or(ExtractError::DeriveFailure { requested: n })?;

        let mut derived = match self.algorithm {
            ExtractAlgorithm::Blake3Xof => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(EXTRACT_DOMAIN);
                hasher.update(&pool.reseed_count().to_le_bytes());
                hasher.update(pool.state());
                let mut out = vec![0u8; total];
                hasher.finalize_xof().fill(&mut out);
                out
            }
            ExtractAlgorithm::HkdfSha256 => {
                let hk = Hkdf::<Sha256>::new(Some(EXTRACT_DOMAIN), pool.state());
                let mut out = vec![0u8; total];
                hk.expand(&pool.reseed_count().to_le_bytes(), &mut out)
                    .map_err(|_| ExtractError::DeriveFailure { requested: n })?;
                out
            }
        };

        let mut reseed_block = [0u8; RESEED_BLOCK_BYTES];
        reseed_block.copy_from_slice(&derived[n..]);
        derived.truncate(n);

        // Forward secrecy: the pool moves on before output is released.
        pool.reseed_from_extraction(&reseed_block);
        reseed_block.zeroize();

        tracing::debug!(
            output_bytes = n,
            algorithm = ?self.algorithm,
            "Extracted output and reseeded pool"
        );

        Ok(derived)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractAlgorithm::default())
    }
}
