//! Zero-crossing line frequency estimator
//!
//! Scans a window for sign changes, locates each crossing to a fraction of a
//! sample by linear interpolation, and turns the mean half-period into Hz.
//!
//! ```text
//!   y1 ●
//!       \
//!  ──────✕──────── 0      xp = x1 + (0 - y1) / ((y2 - y1) / (x2 - x1))
//!         \
//!          ● y2
//! ```
//!
//! A crossing is `y1 > 0 && y2 <= 0` or `y1 < 0 && y2 >= 0`. A sample that is
//! exactly zero only counts as the far side of a crossing, never the near
//! side. After every crossing the next [`FREQ_ZC_DEBOUNCE`] sample pairs are
//! ignored, which rejects the sign chatter noise produces around a slow
//! crossing.
//!
//! Only the first [`ZERO_CROSSING_MAX_POINTS`] crossings are kept.

use heapless::Vec;

use crate::{
    buffer::SampleBuffer,
    constants::metering::{FREQ_ZC_DEBOUNCE, FREQUENCY_INVALID_SENTINEL, ZERO_CROSSING_MAX_POINTS},
    errors::{MetrologyError, MetrologyResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Measured line frequency, or the absence of one
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrequencyEstimate {
    /// Frequency in Hz, always positive and finite
    Valid(f64),
    /// Fewer than two crossings in the window
    Invalid,
}

impl FrequencyEstimate {
    /// Interpret a raw firmware value: anything not positive and finite is invalid
    pub fn from_raw(hz: f64) -> Self {
        if hz.is_finite() && hz > 0.0 {
            Self::Valid(hz)
        } else {
            Self::Invalid
        }
    }

    /// Frequency in Hz, if valid
    pub fn hz(&self) -> Option<f64> {
        match self {
            Self::Valid(hz) => Some(*hz),
            Self::Invalid => None,
        }
    }

    /// Check if a frequency was measured
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Firmware encoding, with `-1.0` standing for invalid
    pub fn as_raw(&self) -> f64 {
        self.hz().unwrap_or(FREQUENCY_INVALID_SENTINEL)
    }

    /// Measured frequency, or `fallback_hz` when none was measured
    pub fn or_nominal(&self, fallback_hz: f64) -> f64 {
        self.hz().unwrap_or(fallback_hz)
    }
}

impl Default for FrequencyEstimate {
    fn default() -> Self {
        Self::Invalid
    }
}

/// Interpolated crossing positions found in one window
#[derive(Debug, Clone, Default)]
pub struct ZeroCrossings {
    points: Vec<f64, ZERO_CROSSING_MAX_POINTS>,
    detected: usize,
}

impl ZeroCrossings {
    /// Retained crossing positions, in fractional sample indices
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Crossings detected, including those past the retention limit
    pub fn detected(&self) -> usize {
        self.detected
    }

    /// Mean spacing between consecutive retained crossings, in samples
    pub fn mean_half_period(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }

        let sum: f64 = self.points.windows(2).map(|pair| pair[1] - pair[0]).sum();
        Some(sum / (self.points.len() - 1) as f64)
    }
}

/// Locate zero crossings in a window
///
/// Fails only on a zero-slope pair at a detected crossing, where the
/// interpolation would divide by zero.
pub fn find_zero_crossings(buffer: &SampleBuffer) -> MetrologyResult<ZeroCrossings> {
    let samples = buffer.as_slice();
    let mut crossings = ZeroCrossings::default();
    let mut debounce: u32 = 0;

    for (p, pair) in samples.windows(2).enumerate() {
        let (y1, y2) = (pair[0], pair[1]);

        if debounce == 0 && ((y1 > 0 && y2 <= 0) || (y1 < 0 && y2 >= 0)) {
            if y2 == y1 {
                return Err(MetrologyError::DegenerateCrossing { index: p, value: y1 });
            }

            let (x1, x2) = (p as f64, (p + 1) as f64);
            let (y1, y2) = (y1 as f64, y2 as f64);
            let xp = x1 + (0.0 - y1) / ((y2 - y1) / (x2 - x1));

            if crossings.points.push(xp).is_err() {
                log_trace!("Zero crossing at {} dropped: {} points already kept", xp, ZERO_CROSSING_MAX_POINTS);
            }
            crossings.detected += 1;

            debounce = FREQ_ZC_DEBOUNCE;
        }

        if debounce > 0 {
            debounce -= 1;
        }
    }

    Ok(crossings)
}

/// Estimate line frequency from the zero crossings of a window
///
/// Two crossings are half a cycle apart, so the cycle length is twice the mean
/// crossing spacing and the frequency is `Fs / cycle`.
pub fn estimate_frequency(buffer: &SampleBuffer, sample_rate_hz: f64) -> MetrologyResult<FrequencyEstimate> {
    let crossings = find_zero_crossings(buffer)?;

    let estimate = match crossings.mean_half_period() {
        Some(half_period) if half_period > 0.0 => {
            let cycle_samples = half_period * 2.0;
            FrequencyEstimate::from_raw(sample_rate_hz / cycle_samples)
        }
        _ => FrequencyEstimate::Invalid,
    };

    log_trace!(
        "Zero crossings: {} detected, {} kept, estimate {:?}",
        crossings.detected(),
        crossings.points().len(),
        estimate
    );

    Ok(estimate)
}
