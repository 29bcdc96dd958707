//! Core traits
//!
//! The only pluggable seam in the pipeline is how a raw current window becomes
//! a window proportional to current. Everything downstream of that is fixed
//! metrology math.

use crate::{buffer::SampleBuffer, errors::MetrologyResult, signal::FrequencyEstimate};

/// Turns a raw current-channel window into a current waveform
///
/// Implementations must not assume `frequency` is valid; an invalid estimate
/// selects their degraded path, it is not an error.
pub trait CurrentSensor {
    /// Reconstruct the current waveform for one window
    fn reconstruct(&self, raw: &SampleBuffer, frequency: FrequencyEstimate) -> MetrologyResult<SampleBuffer>;

    /// Short identifier for logs and reports
    fn name(&self) -> &'static str;
}

impl<S: CurrentSensor + ?Sized> CurrentSensor for &S {
    fn reconstruct(&self, raw: &SampleBuffer, frequency: FrequencyEstimate) -> MetrologyResult<SampleBuffer> {
        (**self).reconstruct(raw, frequency)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
