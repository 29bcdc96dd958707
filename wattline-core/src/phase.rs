//! Phase angles measured on the waveforms
//!
//! [`PowerMetrics::phase_angle_degrees`](crate::power::PowerMetrics::phase_angle_degrees)
//! derives the angle from the power factor. The helpers here read it off the
//! samples instead:
//!
//! - **Absolute angle** of each channel: where its first zero crossing sits
//!   within the cycle, `index / samples_per_cycle · 360°`, in `[0, 360)`.
//! - **Current-to-voltage angle**: `acos(v·i / (|v| |i|))` over one cycle,
//!   signed like reactive power (positive when the current is ahead).
//!
//! A crossing here is any sign change, rising or falling, with the same
//! "exact zero is the far side" rule as the frequency estimator. It is located
//! to the sample, without interpolation.

use crate::power::{reactive_power, LoadDirection};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angles read from one voltage/current window pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseAngles {
    /// Signed current-to-voltage angle (degrees)
    pub current_to_voltage_deg: f64,
    /// Absolute voltage angle (degrees, `[0, 360)`)
    pub voltage_deg: f64,
    /// Absolute current angle (degrees, `[0, 360)`)
    pub current_deg: f64,
    /// Load character from the current-to-voltage angle
    pub direction: LoadDirection,
}

impl Default for PhaseAngles {
    fn default() -> Self {
        Self {
            current_to_voltage_deg: 0.0,
            voltage_deg: 0.0,
            current_deg: 0.0,
            direction: LoadDirection::InPhase,
        }
    }
}

/// Index of the sample just past the first sign change
pub fn first_zero_crossing(samples: &[i32]) -> Option<usize> {
    samples
        .windows(2)
        .position(|pair| (pair[0] < 0 && pair[1] >= 0) || (pair[0] > 0 && pair[1] <= 0))
        .map(|i| i + 1)
}

/// Position of the first zero crossing as an angle within the cycle
///
/// 0° when the window never crosses zero or the cycle length is unusable.
pub fn absolute_angle(samples: &[i32], samples_per_cycle: f64) -> f64 {
    if !(samples_per_cycle.is_finite() && samples_per_cycle > 0.0) {
        return 0.0;
    }

    let index = first_zero_crossing(samples).unwrap_or(0);
    libm::fmod(index as f64 / samples_per_cycle * 360.0, 360.0)
}

/// Signed angle between the first `length` samples of both channels
///
/// 0° when either channel is silent over the span. Callers must have checked
/// both slices hold `length` samples.
pub fn current_to_voltage_angle(voltage: &[i32], current: &[i32], length: usize) -> f64 {
    let (mut dot, mut v_energy, mut i_energy) = (0.0, 0.0, 0.0);
    for (&v, &i) in voltage[..length].iter().zip(&current[..length]) {
        let (v, i) = (v as f64, i as f64);
        dot += v * i;
        v_energy += v * v;
        i_energy += i * i;
    }

    if v_energy == 0.0 || i_energy == 0.0 {
        return 0.0;
    }

    let cos_phi = (dot / libm::sqrt(v_energy * i_energy)).clamp(-1.0, 1.0);
    let angle = libm::acos(cos_phi).to_degrees();

    if reactive_power(voltage, current, length, 1.0) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// All waveform angles for one window pair
///
/// `length` is the span used for the current-to-voltage angle;
/// `samples_per_cycle` converts crossing positions to degrees.
pub fn phase_angles(voltage: &[i32], current: &[i32], length: usize, samples_per_cycle: f64) -> PhaseAngles {
    let current_to_voltage_deg = current_to_voltage_angle(voltage, current, length);

    PhaseAngles {
        current_to_voltage_deg,
        voltage_deg: absolute_angle(voltage, samples_per_cycle),
        current_deg: absolute_angle(current, samples_per_cycle),
        direction: LoadDirection::from_angle(current_to_voltage_deg),
    }
}
