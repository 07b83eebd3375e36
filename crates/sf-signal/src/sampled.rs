//! Sampling period of a discrete-time block.
//!
//! Blocks step once per tick. The sampling period is the physical duration
//! of one tick; its reciprocal is cached because finite differences divide
//! by it on every step.

use serde::{Deserialize, Serialize};
use sf_core::ensure_positive;

use crate::error::SignalResult;

/// Default sampling period in seconds (200 Hz).
pub const DEFAULT_SAMPLING_PERIOD: f64 = 0.005;

/// Sampling period with its cached reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SamplingPeriod {
    dt: f64,
    inv_dt: f64,
}

impl SamplingPeriod {
    /// Create a sampling period.
    ///
    /// # Arguments
    ///
    /// * `dt` - Sample period in seconds (must be positive and finite)
    pub fn new(dt: f64) -> SignalResult<Self> {
        let dt = ensure_positive(dt, "sampling period")?;
        Ok(Self {
            dt,
            inv_dt: 1.0 / dt,
        })
    }

    /// Create a sampling period from frequency in Hz.
    pub fn from_frequency(freq_hz: f64) -> SignalResult<Self> {
        let freq_hz = ensure_positive(freq_hz, "sampling frequency")?;
        Self::new(1.0 / freq_hz)
    }

    /// Sample period in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Cached `1 / dt`.
    pub fn inverse(&self) -> f64 {
        self.inv_dt
    }

    /// Get the sample frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.inv_dt
    }
}

impl Default for SamplingPeriod {
    fn default() -> Self {
        Self {
            dt: DEFAULT_SAMPLING_PERIOD,
            inv_dt: 1.0 / DEFAULT_SAMPLING_PERIOD,
        }
    }
}

impl TryFrom<f64> for SamplingPeriod {
    type Error = crate::error::SignalError;

    fn try_from(dt: f64) -> Result<Self, Self::Error> {
        Self::new(dt)
    }
}

impl From<SamplingPeriod> for f64 {
    fn from(period: SamplingPeriod) -> Self {
        period.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_five_milliseconds() {
        let period = SamplingPeriod::default();
        assert_eq!(period.dt(), 0.005);
        assert!((period.inverse() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn reciprocal_cached() {
        let period = SamplingPeriod::new(0.01).unwrap();
        assert_eq!(period.dt(), 0.01);
        assert!((period.inverse() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn from_frequency() {
        let period = SamplingPeriod::from_frequency(1000.0).unwrap();
        assert!((period.dt() - 0.001).abs() < 1e-15);
    }

    #[test]
    fn non_positive_rejected() {
        assert!(SamplingPeriod::new(0.0).is_err());
        assert!(SamplingPeriod::new(-0.1).is_err());
        assert!(SamplingPeriod::new(f64::NAN).is_err());
        assert!(SamplingPeriod::from_frequency(0.0).is_err());
    }
}
