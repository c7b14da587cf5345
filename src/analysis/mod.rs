//! Output quality analysis.
//!
//! Statistical sanity checks applied to released random bytes by the
//! driver and the test suite. Passing them is necessary, never
//! sufficient, for good randomness.

mod statistics;

pub use statistics::OutputStatistics;
