//! Active, Reactive and Apparent Power
//!
//! ## Overview
//!
//! Power is computed from one voltage window and one current window of the
//! same length, both in raw counts. Results are scaled back to physical units
//! by dividing by `VinToCounts · AmpsToCounts`.
//!
//! ## Formulas
//!
//! ```text
//!        1   L-1
//!  P  = ───   Σ  v[k] · i[k]                     / (Vc · Ac)
//!        L   k=0
//!
//!        1   L-1
//!  Q  = ───   Σ  v[k] · i[(k - L/4 + L) mod L]   / (Vc · Ac)
//!        L   k=0
//!
//!  S  = √(P² + Q²)
//!  PF = P / S            (0 when S = 0)
//! ```
//!
//! Reactive power uses the current delayed by a quarter of the window
//! (`round(L / 4)` samples). When `L` is one cycle that is a 90° shift; the
//! index wraps modulo `L` so the delay stays inside the window.
//!
//! ## Sign Convention
//!
//! Positive `P` is power imported from the grid. Because the current is the
//! delayed operand, `Q` is positive when the current is ahead of the voltage
//! and negative when it is behind. The firmware reports positive `Q` as an
//! inductive load and the energy quadrants follow that, so
//! [`LoadDirection`] does too.

use crate::{
    config::SamplingConfig,
    constants::metering::IN_PHASE_DEAD_BAND_DEG,
    errors::{MetrologyError, MetrologyResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Power readings for one window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerMetrics {
    /// Active power (W)
    pub active_w: f64,
    /// Reactive power (VAR)
    pub reactive_var: f64,
    /// Apparent power (VA)
    pub apparent_va: f64,
    /// Power factor in `[-1, 1]`
    pub power_factor: f64,
}

impl PowerMetrics {
    /// Phase angle between voltage and current, in degrees
    ///
    /// `acos(PF)` carries no sign; it is negated when reactive power is
    /// negative. With no apparent power there is no angle and 0 is returned.
    pub fn phase_angle_degrees(&self) -> f64 {
        if self.apparent_va == 0.0 {
            return 0.0;
        }
        let angle = libm::acos(self.power_factor.clamp(-1.0, 1.0)).to_degrees();
        if self.reactive_var < 0.0 {
            -angle
        } else {
            angle
        }
    }

    /// Classify the load from the phase angle
    pub fn load_direction(&self) -> LoadDirection {
        LoadDirection::from_angle(self.phase_angle_degrees())
    }
}

/// Load character, keyed on the sign of the phase angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoadDirection {
    /// Positive angle (positive reactive power)
    Inductive,
    /// Negative angle (negative reactive power)
    Capacitive,
    /// Angle inside the dead band
    InPhase,
}

impl LoadDirection {
    /// Classify a phase angle in degrees
    pub fn from_angle(degrees: f64) -> Self {
        if degrees > IN_PHASE_DEAD_BAND_DEG {
            Self::Inductive
        } else if degrees < -IN_PHASE_DEAD_BAND_DEG {
            Self::Capacitive
        } else {
            Self::InPhase
        }
    }
}

/// Mean instantaneous power over the first `length` samples, in W
///
/// Callers must have checked both slices hold `length` samples.
pub fn active_power(voltage: &[i32], current: &[i32], length: usize, scale: f64) -> f64 {
    if length == 0 {
        return 0.0;
    }

    let sum: f64 = voltage[..length]
        .iter()
        .zip(&current[..length])
        .map(|(&v, &i)| v as f64 * i as f64)
        .sum();

    sum / length as f64 / scale
}

/// Mean product of voltage and quarter-window-delayed current, in VAR
///
/// Callers must have checked both slices hold `length` samples.
pub fn reactive_power(voltage: &[i32], current: &[i32], length: usize, scale: f64) -> f64 {
    if length == 0 {
        return 0.0;
    }

    let dephase = libm::round(length as f64 / 4.0) as usize % length;

    let sum: f64 = voltage[..length]
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let delayed = (k + length - dephase) % length;
            v as f64 * current[delayed] as f64
        })
        .sum();

    sum / length as f64 / scale
}

/// `√(P² + Q²)`
pub fn apparent_power(active_w: f64, reactive_var: f64) -> f64 {
    libm::sqrt(active_w * active_w + reactive_var * reactive_var)
}

/// `P / S` clamped to `[-1, 1]`, or 0 when `S` is 0
pub fn power_factor(active_w: f64, apparent_va: f64) -> f64 {
    if apparent_va == 0.0 {
        return 0.0;
    }
    (active_w / apparent_va).clamp(-1.0, 1.0)
}

/// Power calculator bound to one front end's scale factors
#[derive(Debug, Clone, Copy)]
pub struct PowerCalculator {
    scale: f64,
}

impl PowerCalculator {
    /// Calculator for the given front end
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            scale: config.power_scale(),
        }
    }

    /// Compute all four readings over the first `length` samples
    pub fn compute(&self, voltage: &[i32], current: &[i32], length: usize) -> MetrologyResult<PowerMetrics> {
        if voltage.len() != current.len() {
            return Err(MetrologyError::LengthMismatch {
                voltage: voltage.len(),
                current: current.len(),
            });
        }

        if voltage.len() < length {
            return Err(MetrologyError::BufferTooShort {
                required: length,
                available: voltage.len(),
            });
        }

        let active_w = active_power(voltage, current, length, self.scale);
        let reactive_var = reactive_power(voltage, current, length, self.scale);
        let apparent_va = apparent_power(active_w, reactive_var);

        Ok(PowerMetrics {
            active_w,
            reactive_var,
            apparent_va,
            power_factor: power_factor(active_w, apparent_va),
        })
    }
}
