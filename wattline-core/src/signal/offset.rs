//! DC offset removal
//!
//! The offset is the midpoint of the window's extremes, `(max + min) / 2`
//! truncated toward zero. Numerical integration drifts the mean of a window
//! away from zero, and ADC front ends bias an AC signal to mid-scale; both are
//! cancelled here.

use crate::{
    buffer::SampleBuffer,
    errors::MetrologyResult,
    traits::CurrentSensor,
};

use super::FrequencyEstimate;

/// Midpoint of the window's extremes, or `None` for an empty window
pub fn dc_offset(buffer: &SampleBuffer) -> Option<i32> {
    let (max, min) = (buffer.max()?, buffer.min()?);
    // i64 division truncates toward zero and the midpoint always fits in i32
    Some(((max as i64 + min as i64) / 2) as i32)
}

/// New window with the DC offset subtracted from every sample
pub fn remove_offset(buffer: &SampleBuffer) -> SampleBuffer {
    match dc_offset(buffer) {
        Some(offset) => buffer.iter().map(|&s| s.saturating_sub(offset)).collect(),
        None => SampleBuffer::default(),
    }
}

/// Current sensor whose output is already proportional to current
///
/// Shunts and current transformers only need their DC bias removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSensor;

impl CurrentSensor for DirectSensor {
    fn reconstruct(&self, raw: &SampleBuffer, _frequency: FrequencyEstimate) -> MetrologyResult<SampleBuffer> {
        Ok(remove_offset(raw))
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
