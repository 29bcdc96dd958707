//! Per-window signal estimators
//!
//! Everything that looks at a single channel in isolation lives here:
//!
//! | Module           | Input        | Output                        |
//! |------------------|--------------|-------------------------------|
//! | `zero_crossing`  | voltage      | [`FrequencyEstimate`]         |
//! | `rms`            | any channel  | RMS in counts                 |
//! | `offset`         | any channel  | centred copy                  |
//! | `integrator`     | raw current  | reconstructed current         |
//! | `peak`           | any channel  | peak / short-circuit counts   |
//! | `harmonics`      | any channel  | odd harmonics and THD (`std`) |
//!
//! The frequency estimate produced from the voltage channel is then handed to
//! every other estimator; none of them measure it themselves.

pub mod harmonics;
pub mod integrator;
pub mod offset;
pub mod peak;
pub mod rms;
pub mod utils;
pub mod zero_crossing;

#[cfg(feature = "std")]
pub use harmonics::HarmonicAnalyzer;
pub use harmonics::{resample_linear, HarmonicSpectrum};
pub use integrator::{cumulative_trapezoid, IntegrationReport, RogowskiIntegrator};
pub use offset::{dc_offset, remove_offset, DirectSensor};
pub use peak::{nominal_cycle_peak, short_circuit_threshold};
pub use rms::cycle_rms;
pub use utils::{classify_nominal, ema, has_min_amplitude, limit_length_to_cycles, split_cycle, CycleSpan};
pub use zero_crossing::{estimate_frequency, find_zero_crossings, FrequencyEstimate, ZeroCrossings};

use crate::{
    buffer::SampleBuffer,
    constants::grid::{MIN_AMPLITUDE_CURRENT_COUNTS, MIN_AMPLITUDE_VOLTAGE_COUNTS},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which channel a window was captured on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignalKind {
    /// Line voltage
    Voltage,
    /// Line current
    Current,
}

impl SignalKind {
    /// Smallest peak-to-peak span (counts) treated as a live signal
    pub fn min_amplitude(&self) -> i32 {
        match self {
            Self::Voltage => MIN_AMPLITUDE_VOLTAGE_COUNTS,
            Self::Current => MIN_AMPLITUDE_CURRENT_COUNTS,
        }
    }

    /// Check a window of this channel carries a signal
    pub fn is_present(&self, buffer: &SampleBuffer) -> bool {
        has_min_amplitude(buffer, self.min_amplitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    #[test]
    fn channel_floors_differ() {
        let window = SampleBuffer::from(vec![-20, 20]);
        assert!(SignalKind::Current.is_present(&window));
        assert!(!SignalKind::Voltage.is_present(&window));
    }
}
