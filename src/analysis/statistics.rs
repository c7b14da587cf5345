//! Statistical sanity checks over produced output.
//!
//! These tests detect obvious failures - stuck bits, heavy bias,
//! strong byte-to-byte correlation - in released random bytes. They
//! are sanity checks, not proofs of randomness quality.

/// Statistical test results for a byte sample.
#[derive(Debug, Clone)]
pub struct OutputStatistics {
    /// Bit bias (deviation from 0.5).
    pub bit_bias: f64,
    /// Byte-level variance.
    pub variance: f64,
    /// Lag-1 autocorrelation.
    pub autocorrelation: f64,
    /// Number of bytes analyzed.
    pub sample_size: usize,
}

impl OutputStatistics {
    /// Runs all tests on `data`.
    pub fn analyze(data: &[u8]) -> Self {
        Self {
            bit_bias: Self::compute_bit_bias(data),
            variance: Self::compute_variance(data),
            autocorrelation: Self::compute_autocorrelation(data),
            sample_size: data.len(),
        }
    }

    /// Fraction of set bits minus 0.5; 0.0 is unbiased.
    fn compute_bit_bias(data: &[u8]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        let ones: usize = data.iter().map(|b| b.count_ones() as usize).sum();
        let total = data.len() * 8;
        (ones as f64 / total as f64) - 0.5
    }

    /// Variance of byte values.
    fn compute_variance(data: &[u8]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }

        let n = data.len() as f64;
        let mean: f64 = data.iter().map(|&b| b as f64).sum::<f64>() / n;
        data.iter().map(|&b| (b as f64 - mean).powi(2)).sum::<f64>() / n
    }

    /// Lag-1 autocorrelation between consecutive bytes.
    fn compute_autocorrelation(data: &[u8]) -> f64 {
        if data.len() < 2 {
            return 0.0;
        }

        let n = data.len() as f64;
        let mean: f64 = data.iter().map(|&b| b as f64).sum::<f64>() / n;

        let variance: f64 = data.iter().map(|&b| (b as f64 - mean).powi(2)).sum::<f64>();
        if variance == 0.0 {
            return 1.0; // All same value = perfect correlation
        }

        let covariance: f64 = data
            .windows(2)
            .map(|w| (w[0] as f64 - mean) * (w[1] as f64 - mean))
            .sum();

        covariance / variance
    }

    /// Returns true if results look reasonable (not proof of quality).
    pub fn looks_reasonable(&self) -> bool {
        let bias_ok = self.bit_bias.abs() < 0.1;
        let variance_ok = self.variance > 100.0;
        let autocorr_ok = self.autocorrelation.abs() < 0.5;

        bias_ok && variance_ok && autocorr_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_data_fails() {
        let stats = OutputStatistics::analyze(&[0x80u8; 1000]);

        assert_eq!(stats.variance, 0.0);
        assert!(!stats.looks_reasonable());
    }

    #[test]
    fn test_all_ones_heavily_biased() {
        let stats = OutputStatistics::analyze(&[0xFFu8; 1000]);

        assert!((stats.bit_bias - 0.5).abs() < 0.001);
        assert!(!stats.looks_reasonable());
    }

    #[test]
    fn test_alternating_bits_unbiased() {
        let stats = OutputStatistics::analyze(&[0xAAu8; 1000]);

        assert!(stats.bit_bias.abs() < 0.001);
    }

    #[test]
    fn test_varied_data_has_variance() {
        let data: Vec<u8> = (0..1000).map(|i| (i * 17 + 31) as u8).collect();
        let stats = OutputStatistics::analyze(&data);

        assert!(stats.variance > 100.0);
        assert_eq!(stats.sample_size, 1000);
    }

    #[test]
    fn test_empty_sample() {
        let stats = OutputStatistics::analyze(&[]);

        assert_eq!(stats.bit_bias, 0.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.sample_size, 0);
    }

    #[test]
    fn test_extracted_output_looks_reasonable() {
        use crate::csprng::Csprng;
        use crate::event::Event;

        let mut rng = Csprng::new();
        let mut i = 0u64;
        while !rng.is_ready() {
            let event = Event::with_arrival(vec![(i % 97) as u8], i * 13_337, i + 1);
            rng.mix_pool_bytes(&event).unwrap();
            i += 1;
        }

        let out = rng.get_random_bytes(4096).unwrap();
        let stats = OutputStatistics::analyze(&out);
        assert!(stats.looks_reasonable(), "stats: {:?}", stats);

        // Reseed-after-extraction: a second draw must look just as
        // uniform and share no visible structure with the first.
        let second = rng.get_random_bytes(4096).unwrap();
        assert!(OutputStatistics::analyze(&second).looks_reasonable());

        let xored: Vec<u8> = out.iter().zip(&second).map(|(a, b)| a ^ b).collect();
        assert!(
            OutputStatistics::analyze(&xored).looks_reasonable(),
            "correlated consecutive outputs"
        );
    }
}
