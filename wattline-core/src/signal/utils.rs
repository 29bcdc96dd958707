//! Shared numeric helpers for the signal estimators
//!
//! ## Cycle Spans
//!
//! At 7812.5 samples/second a 50 Hz cycle is 156.25 samples long. Estimators
//! that work "over one cycle" therefore need both the whole-sample count and
//! the fractional remainder:
//!
//! ```text
//! Fs / f = 156.25
//!          ├── whole    = 156   (samples summed directly)
//!          └── fraction = 0.25  (weight of one interpolated trailing sample)
//! ```
//!
//! When no valid frequency is known the caller's integer length is used with
//! a zero fraction. That is the degraded path every consumer of an invalid
//! [`FrequencyEstimate`] falls back to.
//!
//! ## Truncation
//!
//! All float-to-integer conversions here truncate toward zero. The device
//! firmware does the same and reference output is compared bit for bit.

use crate::{
    buffer::SampleBuffer,
    constants::grid::{FREQ_NOMINAL_50_HZ, FREQ_NOMINAL_60_HZ, NOMINAL_BAND_HIGH, NOMINAL_BAND_LOW},
};

use super::FrequencyEstimate;

/// One electrical cycle measured in samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSpan {
    /// Whole samples in the cycle
    pub whole: usize,
    /// Fractional trailing sample, in `[0, 1)`
    pub fraction: f64,
}

impl CycleSpan {
    /// Exact cycle length, `whole + fraction`
    pub fn total(&self) -> f64 {
        self.whole as f64 + self.fraction
    }

    /// Samples that must be present to evaluate the span
    ///
    /// Interpolating the fractional sample reads one sample past `whole`.
    pub fn required_samples(&self) -> usize {
        if self.fraction > 0.0 {
            self.whole + 1
        } else {
            self.whole
        }
    }
}

/// Split a cycle into whole and fractional samples
///
/// Uses `Fs / f` when `frequency` is valid, otherwise `fallback_len` with no
/// fractional part.
pub fn split_cycle(frequency: FrequencyEstimate, fallback_len: usize, sample_rate_hz: f64) -> CycleSpan {
    match frequency.hz() {
        Some(hz) => {
            let cycle = sample_rate_hz / hz;
            let whole = libm::trunc(cycle);
            CycleSpan {
                whole: whole as usize,
                fraction: cycle - whole,
            }
        }
        None => CycleSpan {
            whole: fallback_len,
            fraction: 0.0,
        },
    }
}

/// Check whether `freq` falls inside the band accepted for `nominal`
pub fn is_within_nominal_band(freq: f64, nominal: f64) -> bool {
    freq < NOMINAL_BAND_HIGH * nominal && freq > NOMINAL_BAND_LOW * nominal
}

/// Nominal grid frequency a measurement belongs to
///
/// 60 Hz when the measurement sits in the 60 Hz band, 50 Hz otherwise
/// (including when no frequency could be measured).
pub fn classify_nominal(frequency: FrequencyEstimate) -> f64 {
    match frequency.hz() {
        Some(hz) if is_within_nominal_band(hz, FREQ_NOMINAL_60_HZ) => FREQ_NOMINAL_60_HZ,
        _ => FREQ_NOMINAL_50_HZ,
    }
}

/// Largest whole number of cycles that fits in `length` samples
///
/// One cycle is `round(Fs / f)` samples. Returns `length` unchanged when the
/// frequency cannot describe a cycle.
pub fn limit_length_to_cycles(length: usize, frequency_hz: f64, sample_rate_hz: f64) -> usize {
    if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
        return length;
    }

    let one_cycle = libm::round(sample_rate_hz / frequency_hz) as usize;
    if one_cycle == 0 {
        return length;
    }

    ((length / one_cycle) * one_cycle).min(length)
}

/// Exponential moving average step
///
/// A `previous` of exactly zero means "no history" and seeds the average with
/// `sample`.
pub fn ema(previous: f64, sample: f64, alpha: f64) -> f64 {
    if previous == 0.0 {
        sample
    } else {
        previous + alpha * (sample - previous)
    }
}

/// Check the window carries a signal at all
///
/// Needs at least two samples and a peak-to-peak span of `min_counts`.
pub fn has_min_amplitude(buffer: &SampleBuffer, min_counts: i32) -> bool {
    if buffer.len() < 2 {
        return false;
    }

    buffer
        .peak_to_peak()
        .map_or(false, |span| span >= min_counts as i64)
}
