//! Error Types for Metrology Faults
//!
//! ## Design
//!
//! Errors follow the same rules as the rest of the crate's embedded-first
//! surface:
//!
//! 1. **Small Size**: every variant carries at most two machine words, so a
//!    `MetrologyResult` can be returned from the per-window hot path freely.
//!
//! 2. **No Heap Allocation**: messages are `&'static str` only.
//!
//! 3. **Copy Semantics**: errors are `Copy` and can be stored in reports.
//!
//! ## What Is (and Is Not) an Error
//!
//! Only genuine faults are errors:
//! - `DegenerateCrossing`: a detected zero crossing whose two samples have the
//!   same value, so the interpolation line has zero slope.
//! - `BufferTooShort` / `LengthMismatch`: the caller handed a stage a window
//!   that cannot hold the cycle it asked for.
//! - `InvalidFrequency`: a stage that needs a window duration got none.
//! - `InvalidConfig`: sampling constants that cannot describe a real meter.
//!
//! An invalid *frequency estimate* (fewer than two crossings) is NOT an error.
//! It is represented by [`FrequencyEstimate::Invalid`](crate::signal::FrequencyEstimate)
//! and every consumer defines its own fallback for it. Guarded divisions
//! (zero apparent power, zero raw RMS, zero cycle length) are not errors
//! either; they return their defined fallback values.
//!
//! ```rust
//! use wattline_core::{MetrologyError, SampleBuffer, SamplingConfig};
//! use wattline_core::signal::estimate_frequency;
//!
//! let config = SamplingConfig::default();
//! let flat = SampleBuffer::from(vec![5, 5, 5]);
//!
//! // No sign change, so no crossing and no fault
//! let estimate = estimate_frequency(&flat, config.sample_rate_hz()).unwrap();
//! assert!(!estimate.is_valid());
//! # let _ = MetrologyError::InvalidFrequency { frequency: 0.0 };
//! ```

use thiserror_no_std::Error;

/// Result type for metrology operations
pub type MetrologyResult<T> = Result<T, MetrologyError>;

/// Metrology errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MetrologyError {
    /// Zero-slope segment at a detected crossing (interpolation divides by zero)
    #[error("Degenerate zero crossing at sample {index}: both samples equal {value}")]
    DegenerateCrossing {
        /// Index of the first sample of the offending pair
        index: usize,
        /// Shared value of both samples
        value: i32,
    },

    /// Buffer holds fewer samples than the requested cycle needs
    #[error("Buffer too short: need {required} samples, have {available}")]
    BufferTooShort {
        /// Samples the operation must read
        required: usize,
        /// Samples actually present
        available: usize,
    },

    /// Voltage and current windows are not aligned
    #[error("Length mismatch: voltage has {voltage} samples, current has {current}")]
    LengthMismatch {
        /// Voltage buffer length
        voltage: usize,
        /// Current buffer length
        current: usize,
    },

    /// Frequency is not usable as a window duration
    #[error("Invalid frequency: {frequency} Hz")]
    InvalidFrequency {
        /// The rejected frequency
        frequency: f64,
    },

    /// Sampling configuration constant out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which constant was rejected
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for MetrologyError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DegenerateCrossing { index, value } =>
                defmt::write!(fmt, "Degenerate crossing at {} (value {})", index, value),
            Self::BufferTooShort { required, available } =>
                defmt::write!(fmt, "Need {} samples, have {}", required, available),
            Self::LengthMismatch { voltage, current } =>
                defmt::write!(fmt, "Length mismatch V={} I={}", voltage, current),
            Self::InvalidFrequency { frequency } =>
                defmt::write!(fmt, "Invalid frequency {} Hz", frequency),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}
