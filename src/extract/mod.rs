//! Output extraction.
//!
//! Turns opaque pool state into caller-visible random bytes through a
//! cryptographic one-way derivation, and reseeds the pool in the same
//! operation so extraction is atomic with respect to forward secrecy.

mod derive;

pub use derive::{ExtractAlgorithm, ExtractError, Extractor};
