//! Odd-harmonic spectrum and total harmonic distortion
//!
//! ## Method
//!
//! One cycle of the channel is analysed, never the whole window, so the
//! fundamental always lands in a single FFT bin:
//!
//! ```text
//! window ──► first trunc(Fs / f) samples
//!              └──► linear resample to FFT_POINTS
//!                    └──► Hann window, remove mean
//!                          └──► real FFT ──► |X[k]|
//!
//!   harmonic n = |X[n]| / |X[1]| · 100 %       n = 1, 3, 5 … 41
//!   THD        = 20 · log10( √(Σ_{n>1} |X[n]|²) / |X[1]| )   dB
//! ```
//!
//! The cycle length comes from the measured frequency when there is one and
//! from the nominal cycle otherwise. A window shorter than that cycle has no
//! spectrum.
//!
//! The FFT itself needs `std`; [`HarmonicSpectrum`] is available everywhere
//! so reports keep the same shape with or without it.

use crate::constants::metering::HARMONIC_ORDERS;

#[cfg(feature = "std")]
use std::{fmt, sync::Arc};

#[cfg(feature = "std")]
use realfft::{RealFftPlanner, RealToComplex};

#[cfg(feature = "std")]
use crate::{
    buffer::SampleBuffer,
    config::SamplingConfig,
    constants::metering::{FFT_POINTS, THD_FLOOR_DB},
};

#[cfg(feature = "std")]
use super::{split_cycle, FrequencyEstimate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Odd harmonics of one cycle, relative to its fundamental
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarmonicSpectrum {
    /// Harmonic `2k + 1` at index `k`, as a percentage of the fundamental
    pub odd_percent: [f64; HARMONIC_ORDERS],
    /// Total harmonic distortion in dB below the fundamental
    pub thd_db: f64,
}

impl HarmonicSpectrum {
    /// Percentage of harmonic `order`, for odd orders 1 through 41
    pub fn order(&self, order: usize) -> Option<f64> {
        if order % 2 == 0 {
            return None;
        }
        self.odd_percent.get(order / 2).copied()
    }

    /// THD as a percentage of the fundamental
    pub fn thd_percent(&self) -> f64 {
        100.0 * libm::pow(10.0, self.thd_db / 20.0)
    }
}

/// Linearly resample `samples` to `points` values
///
/// Positions past the last sample interpolate towards the first one, as if
/// the input were one period of a repeating wave.
pub fn resample_linear(samples: &[f64], points: usize) -> impl Iterator<Item = f64> + '_ {
    let n = samples.len();
    let step = if points == 0 { 0.0 } else { n as f64 / points as f64 };
    let count = if n == 0 { 0 } else { points };

    (0..count).map(move |i| {
        let pos = i as f64 * step;
        let base = libm::floor(pos);
        let i0 = base as usize % n;
        let i1 = (i0 + 1) % n;
        let y0 = samples[i0];
        y0 + (samples[i1] - y0) * (pos - base)
    })
}

/// Reusable single-cycle harmonic analyser
#[cfg(feature = "std")]
pub struct HarmonicAnalyzer {
    fft: Arc<dyn RealToComplex<f64>>,
    sample_rate_hz: f64,
    nominal_cycle_len: usize,
}

#[cfg(feature = "std")]
impl fmt::Debug for HarmonicAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarmonicAnalyzer")
            .field("points", &FFT_POINTS)
            .field("sample_rate_hz", &self.sample_rate_hz)
            .finish()
    }
}

#[cfg(feature = "std")]
impl HarmonicAnalyzer {
    /// Analyser for the given front end, planning the FFT once
    pub fn new(config: &SamplingConfig) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            fft: planner.plan_fft_forward(FFT_POINTS),
            sample_rate_hz: config.sample_rate_hz(),
            nominal_cycle_len: config.nominal_cycle_len(),
        }
    }

    /// Spectrum of the first cycle of `buffer`
    ///
    /// `None` when the window holds less than a cycle or the cycle has no
    /// fundamental to compare against.
    pub fn analyze(&self, buffer: &SampleBuffer, frequency: FrequencyEstimate) -> Option<HarmonicSpectrum> {
        let cycle = split_cycle(frequency, self.nominal_cycle_len, self.sample_rate_hz).whole;
        if cycle < 2 || cycle > buffer.len() {
            log_trace!("No harmonic spectrum: cycle of {} samples, window of {}", cycle, buffer.len());
            return None;
        }

        let samples: Vec<f64> = buffer.as_slice()[..cycle].iter().map(|&s| s as f64).collect();
        let mut input: Vec<f64> = resample_linear(&samples, FFT_POINTS).collect();
        apply_hann(&mut input);
        remove_mean(&mut input);

        let mut spectrum = self.fft.make_output_vec();
        if let Err(e) = self.fft.process(&mut input, &mut spectrum) {
            log_warn!("Harmonic FFT failed: {}", e);
            return None;
        }

        let magnitudes: Vec<f64> = spectrum
            .iter()
            .map(|bin| libm::sqrt(bin.re * bin.re + bin.im * bin.im))
            .collect();

        spectrum_from_magnitudes(&magnitudes)
    }
}

/// One cycle spans the transform, so harmonic `n` sits in bin `n`
#[cfg(feature = "std")]
fn spectrum_from_magnitudes(magnitudes: &[f64]) -> Option<HarmonicSpectrum> {
    let fundamental = magnitudes.get(1).copied()?;
    if fundamental < f64::EPSILON {
        return None;
    }

    let mut odd_percent = [0.0; HARMONIC_ORDERS];
    let mut harmonic_power = 0.0;

    for (k, slot) in odd_percent.iter_mut().enumerate() {
        if let Some(&mag) = magnitudes.get(2 * k + 1) {
            *slot = mag / fundamental * 100.0;
            if k > 0 {
                harmonic_power += mag * mag;
            }
        }
    }

    let thd_db = if harmonic_power > 0.0 {
        20.0 * libm::log10(libm::sqrt(harmonic_power) / fundamental)
    } else {
        THD_FLOOR_DB
    };

    Some(HarmonicSpectrum { odd_percent, thd_db })
}

#[cfg(feature = "std")]
fn apply_hann(samples: &mut [f64]) {
    let span = samples.len() as f64 - 1.0;
    for (i, s) in samples.iter_mut().enumerate() {
        *s *= 0.5 * (1.0 - libm::cos(2.0 * core::f64::consts::PI * i as f64 / span));
    }
}

#[cfg(feature = "std")]
fn remove_mean(samples: &mut [f64]) {
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    for s in samples.iter_mut() {
        *s -= mean;
    }
}
