//! Accumulator configuration.
//!
//! All security-relevant knobs are fixed at construction: the pool
//! size, the minimum-entropy gate, and the estimator's credit caps.
//! Loosening them on a live instance would retroactively weaken
//! already-accumulated guarantees, so there is no runtime mutation.

use crate::estimator::{EstimatorConfig, KEYSPACE_BITS_MAX};
use crate::extract::ExtractAlgorithm;
use crate::pool::DEFAULT_POOL_BYTES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest permitted pool, matching the smallest useful threshold.
const MIN_POOL_BYTES: usize = 64;
/// Largest permitted pool.
const MAX_POOL_BYTES: usize = 4096;

/// Configuration for a CSPRNG instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsprngConfig {
    /// Pool length in bytes.
    pub pool_bytes: usize,
    /// Minimum credited entropy (bits) before extraction is permitted.
    pub min_entropy_bits: u32,
    /// Maximum accepted event payload; larger events are rejected as
    /// malformed.
    pub max_event_bytes: usize,
    /// Output derivation algorithm.
    pub algorithm: ExtractAlgorithm,
    /// Entropy estimation settings.
    pub estimator: EstimatorConfig,
}

impl Default for CsprngConfig {
    fn default() -> Self {
        Self {
            pool_bytes: DEFAULT_POOL_BYTES,
            min_entropy_bits: 128,
            max_event_bytes: 4096,
            algorithm: ExtractAlgorithm::default(),
            estimator: EstimatorConfig::default(),
        }
    }
}

impl CsprngConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_bytes < MIN_POOL_BYTES || self.pool_bytes > MAX_POOL_BYTES {
            return Err(ConfigError::InvalidPoolSize {
                bytes: self.pool_bytes,
            });
        }
        let capacity_bits = (self.pool_bytes * 8) as u32;
        if self.min_entropy_bits == 0 || self.min_entropy_bits > capacity_bits {
            return Err(ConfigError::InvalidThreshold {
                bits: self.min_entropy_bits,
                capacity_bits,
            });
        }
        if self.max_event_bytes == 0 {
            return Err(ConfigError::InvalidEventLimit);
        }
        if self.estimator.key_credit_bits > KEYSPACE_BITS_MAX {
            return Err(ConfigError::InvalidKeyCredit {
                bits: self.estimator.key_credit_bits,
            });
        }
        if self.estimator.jitter_window < 2 {
            return Err(ConfigError::InvalidJitterWindow {
                window: self.estimator.jitter_window,
            });
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: CsprngConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("pool size {bytes} bytes outside supported range")]
    InvalidPoolSize { bytes: usize },
    #[error("entropy threshold {bits} bits invalid for pool capacity {capacity_bits} bits")]
    InvalidThreshold { bits: u32, capacity_bits: u32 },
    #[error("maximum event size must be nonzero")]
    InvalidEventLimit,
    #[error("key credit {bits} bits exceeds practical keyspace bound")]
    InvalidKeyCredit { bits: u32 },
    #[error("jitter window {window} too short (need at least 2 intervals)")]
    InvalidJitterWindow { window: usize },
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CsprngConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tiny_pool_invalid() {
        let config = CsprngConfig {
            pool_bytes: 8,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPoolSize { .. })
        ));
    }

    #[test]
    fn test_threshold_above_capacity_invalid() {
        let config = CsprngConfig {
            pool_bytes: 64,
            min_entropy_bits: 4096,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_key_credit_above_keyspace_invalid() {
        let mut config = CsprngConfig::default();
        config.estimator.key_credit_bits = 12;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKeyCredit { .. })
        ));
    }

    #[test]
    fn test_parse_from_toml() {
        let toml = r#"
            pool_bytes = 256
            min_entropy_bits = 96
            algorithm = "hkdf-sha256"

            [estimator]
            key_credit_bits = 3
            jitter_cap_bits = 1
            jitter_window = 4
        "#;

        let config: CsprngConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pool_bytes, 256);
        assert_eq!(config.min_entropy_bits, 96);
        assert_eq!(config.algorithm, ExtractAlgorithm::HkdfSha256);
        assert_eq!(config.estimator.key_credit_bits, 3);
        assert!(config.validate().is_ok());
    }
}
