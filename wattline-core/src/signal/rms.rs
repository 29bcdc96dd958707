//! Fractional-cycle RMS
//!
//! The quadratic mean over exactly one electrical cycle. A cycle rarely spans
//! a whole number of samples, so the trailing fraction `d` of a sample is
//! represented by one interpolated value weighted by `d`:
//!
//! ```text
//!           n-1         ┌ d ┐
//!  RMS² = ( Σ  s[i]²  +  d · ŷ² ) / (n + d)
//!           i=0
//!
//!  ŷ = (1 - d)/2 · s[n-1] + (1 + d)/2 · s[n]
//! ```
//!
//! Without a valid frequency the caller's integer length is used and `d = 0`.

use crate::{
    buffer::SampleBuffer,
    errors::{MetrologyError, MetrologyResult},
};

use super::{
    utils::{split_cycle, CycleSpan},
    FrequencyEstimate,
};

/// RMS of `buffer` over one cycle, in counts
///
/// `length` is only used when `frequency` is invalid. Returns 0 for an empty
/// span.
pub fn cycle_rms(
    buffer: &SampleBuffer,
    frequency: FrequencyEstimate,
    length: usize,
    sample_rate_hz: f64,
) -> MetrologyResult<f64> {
    let span = split_cycle(frequency, length, sample_rate_hz);
    span_rms(buffer, span, frequency)
}

fn span_rms(buffer: &SampleBuffer, span: CycleSpan, frequency: FrequencyEstimate) -> MetrologyResult<f64> {
    let CycleSpan { whole: n, fraction: d } = span;

    if span.total() == 0.0 {
        return Ok(0.0);
    }

    // The interpolated sample needs a predecessor
    if d > 0.0 && n == 0 {
        return Err(MetrologyError::InvalidFrequency {
            frequency: frequency.as_raw(),
        });
    }

    let samples = buffer.as_slice();
    let required = span.required_samples();
    if samples.len() < required {
        return Err(MetrologyError::BufferTooShort {
            required,
            available: samples.len(),
        });
    }

    let mut square: f64 = samples[..n]
        .iter()
        .map(|&s| {
            let s = s as f64;
            s * s
        })
        .sum();

    if d > 0.0 {
        let ysample = ((1.0 - d) / 2.0) * samples[n - 1] as f64 + ((1.0 + d) / 2.0) * samples[n] as f64;
        square += ysample * ysample * d;
    }

    Ok(libm::sqrt(square / span.total()))
}
