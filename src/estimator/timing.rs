//! Timing-jitter credit from inter-event intervals.
//!
//! Human input arrives with irregular spacing; the spread of recent
//! inter-arrival intervals is the only timing signal credited. A
//! scripted or replayed stream with regular spacing earns nothing.

use std::collections::VecDeque;

/// Tracks inter-arrival intervals over a sliding window.
#[derive(Debug)]
pub struct JitterTracker {
    /// Recent inter-arrival intervals in microseconds.
    deltas: VecDeque<u64>,
    /// Window length.
    window: usize,
    /// Arrival time of the previous event.
    last_arrival: Option<u64>,
}

impl JitterTracker {
    /// Creates a tracker over a window of `window` intervals.
    pub fn new(window: usize) -> Self {
        Self {
            deltas: VecDeque::with_capacity(window),
            window: window.max(2),
            last_arrival: None,
        }
    }

    /// Records an event arrival.
    ///
    /// Non-monotonic arrivals are clamped to a zero interval rather
    /// than rejected; a zero interval contributes no spread.
    pub fn observe(&mut self, arrival_micros: u64) {
        if let Some(last) = self.last_arrival {
            let delta = arrival_micros.saturating_sub(last);
            if self.deltas.len() == self.window {
                self.deltas.pop_front();
            }
            self.deltas.push_back(delta);
        }
        self.last_arrival = Some(arrival_micros);
    }

    /// Returns the jitter credit in bits, capped at `cap_bits`.
    ///
    /// The credit is log2 of the standard deviation of the interval
    /// window, floored. With fewer than two intervals there is no
    /// measurable spread and the credit is zero.
    pub fn credit(&self, cap_bits: u32) -> u32 {
        if self.deltas.len() < 2 || cap_bits == 0 {
            return 0;
        }

        let n = self.deltas.len() as f64;
        let mean: f64 = self.deltas.iter().map(|&d| d as f64).sum::<f64>() / n;
        let variance: f64 = self
            .deltas
            .iter()
            .map(|&d| (d as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        let stddev = variance.sqrt();

        if stddev < 1.0 {
            return 0;
        }

        (stddev.log2().floor() as u32).min(cap_bits)
    }

    /// Clears all timing history.
    pub fn reset(&mut self) {
        self.deltas.clear();
        self.last_arrival = None;
    }
}
