//! Peak and short-circuit detection

use crate::{buffer::SampleBuffer, config::SamplingConfig, constants::metering::SHORT_CIRCUIT_RANK};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Largest absolute sample over one nominal cycle
///
/// Always uses `trunc(Fs / F)` samples, whatever the measured frequency.
/// Returns `None` for an empty window; a window shorter than a cycle is
/// scanned in full.
pub fn nominal_cycle_peak(buffer: &SampleBuffer, config: &SamplingConfig) -> Option<u32> {
    buffer
        .as_slice()
        .iter()
        .take(config.nominal_cycle_len())
        .map(|s| s.unsigned_abs())
        .max()
}

/// Short-circuit threshold over the first `length` samples, in counts
///
/// The absolute samples are sorted ascending and the one at
/// [`SHORT_CIRCUIT_RANK`] is returned. `None` when the span holds too few
/// samples to have that rank.
pub fn short_circuit_threshold(buffer: &SampleBuffer, length: usize) -> Option<u32> {
    let mut magnitudes: Vec<u32> = buffer
        .as_slice()
        .iter()
        .take(length)
        .map(|s| s.unsigned_abs())
        .collect();

    if magnitudes.len() <= SHORT_CIRCUIT_RANK {
        return None;
    }

    magnitudes.sort_unstable();
    Some(magnitudes[SHORT_CIRCUIT_RANK])
}
