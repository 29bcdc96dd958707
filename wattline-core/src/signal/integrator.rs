//! Rogowski coil integrator
//!
//! ## Why Integrate?
//!
//! A Rogowski coil outputs a voltage proportional to `di/dt`, not to `i`. The
//! current is recovered by integrating the window numerically. Integration
//! has two side effects that must be undone:
//!
//! 1. **Drift**: the running integral starts at an arbitrary constant, so the
//!    result carries a DC offset. Removed with [`remove_offset`].
//! 2. **Attenuation**: integrating `cos(ωt)` yields `sin(ωt) / ω`, so the
//!    magnitude shrinks with frequency. The output is rescaled so its RMS
//!    matches the raw window's RMS ("scale to 0 dB").
//!
//! ## Steps
//!
//! ```text
//! raw ──► orms = RMS(raw, f, Fs/F)
//!  │
//!  └──► trapezoid Σ (s[i] + s[i+1]) / 2, truncated per step
//!        └──► remove offset
//!              └──► integral_rms = RMS(centered, f, len)
//!                    └──► k = integral_rms / orms   (1 if orms == 0)
//!                          └──► out[i] = trunc(centered[i] / k)
//! ```
//!
//! The raw RMS is taken over one nominal cycle; the integrated RMS over the
//! full window length. With a valid frequency both use the measured cycle,
//! so for a single-frequency input the attenuation cancels exactly. With an
//! invalid frequency both fall back to their integer lengths.

use crate::{
    buffer::SampleBuffer,
    config::SamplingConfig,
    errors::MetrologyResult,
    traits::CurrentSensor,
};

use super::{offset::remove_offset, rms::cycle_rms, FrequencyEstimate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Intermediate values of one integration, for diagnostics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrationReport {
    /// Reconstructed current window
    pub output: SampleBuffer,
    /// RMS of the raw window over one nominal cycle (counts)
    pub raw_rms: f64,
    /// RMS of the offset-removed integral over the window (counts)
    pub integral_rms: f64,
    /// Normalisation divisor applied to the integral
    pub gain: f64,
}

/// Integrating front end for derivative-output current sensors
#[derive(Debug, Clone, Copy)]
pub struct RogowskiIntegrator {
    sample_rate_hz: f64,
    nominal_cycle_len: usize,
}

impl Default for RogowskiIntegrator {
    fn default() -> Self {
        Self::new(&SamplingConfig::default())
    }
}

impl RogowskiIntegrator {
    /// Integrator for the given front end
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            sample_rate_hz: config.sample_rate_hz(),
            nominal_cycle_len: config.nominal_cycle_len(),
        }
    }

    /// Reconstruct the current window
    pub fn integrate(&self, raw: &SampleBuffer, frequency: FrequencyEstimate) -> MetrologyResult<SampleBuffer> {
        self.integrate_detailed(raw, frequency).map(|report| report.output)
    }

    /// Reconstruct the current window and keep the intermediate values
    pub fn integrate_detailed(
        &self,
        raw: &SampleBuffer,
        frequency: FrequencyEstimate,
    ) -> MetrologyResult<IntegrationReport> {
        let raw_rms = cycle_rms(raw, frequency, self.nominal_cycle_len, self.sample_rate_hz)?;

        let centered = remove_offset(&cumulative_trapezoid(raw));

        let integral_rms = cycle_rms(&centered, frequency, centered.len(), self.sample_rate_hz)?;

        let gain = if raw_rms != 0.0 { integral_rms / raw_rms } else { 1.0 };

        let output = if gain != 0.0 {
            centered.iter().map(|&s| (s as f64 / gain) as i32).collect()
        } else {
            // Flat integral over a live raw window: nothing to rescale
            log_warn!("Integrated window is flat (raw RMS {}), skipping normalisation", raw_rms);
            centered
        };

        log_trace!(
            "Integrated {} samples: raw RMS {}, integral RMS {}, gain {}",
            raw.len(),
            raw_rms,
            integral_rms,
            gain
        );

        Ok(IntegrationReport {
            output,
            raw_rms,
            integral_rms,
            gain,
        })
    }
}

impl CurrentSensor for RogowskiIntegrator {
    fn reconstruct(&self, raw: &SampleBuffer, frequency: FrequencyEstimate) -> MetrologyResult<SampleBuffer> {
        self.integrate(raw, frequency)
    }

    fn name(&self) -> &'static str {
        "rogowski"
    }
}

/// Running trapezoidal integral, truncated to counts at every step
///
/// The last sample has no successor and is paired with itself. Only the
/// stored sample is truncated; the accumulator keeps full precision.
pub fn cumulative_trapezoid(raw: &SampleBuffer) -> SampleBuffer {
    let samples = raw.as_slice();
    let mut integral: f64 = 0.0;

    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let y_x = s as f64;
            let y_x1 = samples.get(i + 1).map_or(y_x, |&next| next as f64);
            integral += (y_x + y_x1) / 2.0;
            integral as i32
        })
        .collect()
}
