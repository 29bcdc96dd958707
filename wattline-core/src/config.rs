//! Sampling configuration shared by every stage
//!
//! The same constants must reach every estimator: a zero-crossing count turned
//! into Hz with one sample rate and an RMS window cut with another would
//! disagree silently. [`SamplingConfig`] is therefore a single immutable value
//! built once and passed by reference.

use crate::{
    constants::grid::{
        AMPS_TO_COUNTS, FREQ_NOMINAL_50_HZ, FREQ_NOMINAL_60_HZ, REFERENCE_SAMPLE_RATE_HZ,
        REFERENCE_WINDOW_SAMPLES, VIN_TO_COUNTS,
    },
    errors::{MetrologyError, MetrologyResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Front-end sampling constants for one meter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingConfig {
    /// ADC sample rate in samples/second (may be fractional)
    sample_rate_hz: f64,

    /// Nominal line frequency in Hz
    nominal_frequency_hz: f64,

    /// Samples captured per measurement window
    window_samples: usize,

    /// Volts to raw counts on the voltage channel
    vin_to_counts: f64,

    /// Amps to raw counts on the current channel
    amps_to_counts: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: REFERENCE_SAMPLE_RATE_HZ,
            nominal_frequency_hz: FREQ_NOMINAL_50_HZ,
            window_samples: REFERENCE_WINDOW_SAMPLES,
            vin_to_counts: VIN_TO_COUNTS,
            amps_to_counts: AMPS_TO_COUNTS,
        }
    }
}

impl SamplingConfig {
    /// Create a configuration, rejecting constants no meter could have
    pub fn new(
        sample_rate_hz: f64,
        nominal_frequency_hz: f64,
        window_samples: usize,
        vin_to_counts: f64,
        amps_to_counts: f64,
    ) -> MetrologyResult<Self> {
        check_positive(sample_rate_hz, "sample rate must be positive and finite")?;
        check_positive(nominal_frequency_hz, "nominal frequency must be positive and finite")?;
        check_positive(vin_to_counts, "voltage scale must be positive and finite")?;
        check_positive(amps_to_counts, "current scale must be positive and finite")?;

        if window_samples == 0 {
            return Err(MetrologyError::InvalidConfig {
                reason: "window must hold at least one sample",
            });
        }

        Ok(Self {
            sample_rate_hz,
            nominal_frequency_hz,
            window_samples,
            vin_to_counts,
            amps_to_counts,
        })
    }

    /// Reference front end on a 60 Hz grid
    pub fn nominal_60hz() -> Self {
        Self {
            nominal_frequency_hz: FREQ_NOMINAL_60_HZ,
            ..Self::default()
        }
    }

    /// ADC sample rate (samples/second)
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Nominal line frequency (Hz)
    pub fn nominal_frequency_hz(&self) -> f64 {
        self.nominal_frequency_hz
    }

    /// Samples per measurement window
    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    /// Volts to counts
    pub fn vin_to_counts(&self) -> f64 {
        self.vin_to_counts
    }

    /// Amps to counts
    pub fn amps_to_counts(&self) -> f64 {
        self.amps_to_counts
    }

    /// Exact samples in one nominal cycle, `Fs / F`
    pub fn nominal_cycle_samples(&self) -> f64 {
        self.sample_rate_hz / self.nominal_frequency_hz
    }

    /// Whole samples in one nominal cycle, `trunc(Fs / F)`
    ///
    /// 156 for the reference 50 Hz front end.
    pub fn nominal_cycle_len(&self) -> usize {
        libm::trunc(self.nominal_cycle_samples()) as usize
    }

    /// Divisor taking a counts² product back to watts
    pub fn power_scale(&self) -> f64 {
        self.vin_to_counts * self.amps_to_counts
    }
}

fn check_positive(value: f64, reason: &'static str) -> MetrologyResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MetrologyError::InvalidConfig { reason })
    }
}
