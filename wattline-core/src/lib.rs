//! Core metrology engine for Wattline
//!
//! Turns raw ADC windows from a single-phase energy meter into frequency,
//! RMS, phase, harmonics, power and quadrant energy. Used to check device
//! firmware against known synthetic inputs off-device.
//!
//! Key constraints:
//! - Sample-for-sample agreement with firmware (truncation, not rounding)
//! - Runs without `std` (`libm` for math, `heapless` for fixed buffers)
//! - Inputs are never mutated; every transform returns a new window
//!
//! ```no_run
//! use wattline_core::{Meter, SampleBuffer, SamplingConfig};
//!
//! let mut meter = Meter::new(SamplingConfig::default());
//! # let voltage = SampleBuffer::from(vec![0; 177]);
//! # let raw_current = SampleBuffer::from(vec![0; 177]);
//!
//! match meter.process_window(&voltage, &raw_current) {
//!     Ok(report) => println!("{:.1} W", report.power.active_w),
//!     Err(e) => eprintln!("window rejected: {e}"),
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[macro_use]
mod macros;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod energy;
pub mod errors;
pub mod meter;
pub mod phase;
pub mod power;
pub mod signal;
pub mod traits;

// Public API
pub use buffer::SampleBuffer;
pub use config::SamplingConfig;
pub use energy::{EnergyAccumulator, EnergyTotals, Quadrant};
pub use errors::{MetrologyError, MetrologyResult};
pub use meter::{ChannelReading, Meter, RunningAverages, WindowReport};
pub use phase::PhaseAngles;
pub use power::{LoadDirection, PowerCalculator, PowerMetrics};
pub use signal::{FrequencyEstimate, HarmonicSpectrum, RogowskiIntegrator};
pub use traits::CurrentSensor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
