//! Constants for Wattline Core
//!
//! Centralised, documented constants used throughout the metrology pipeline.
//!
//! ## Organization
//!
//! - **Grid**: nominal line frequencies, reference front end, amplitude floors
//! - **Metering**: zero-crossing limits, energy conversion, dead bands
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Name constants with their units
//! 3. Firmware-derived values must match the device bit for bit

/// Grid frequencies, reference sampling front end and scale factors.
pub mod grid;

/// Algorithm limits and unit conversions.
pub mod metering;

// Re-export commonly used constants for convenience
pub use grid::{
    FREQ_NOMINAL_50_HZ, FREQ_NOMINAL_60_HZ,
    REFERENCE_SAMPLE_RATE_HZ, REFERENCE_WINDOW_SAMPLES,
    VIN_TO_COUNTS, AMPS_TO_COUNTS,
};

pub use metering::{
    ZERO_CROSSING_MAX_POINTS, FREQ_ZC_DEBOUNCE, FREQUENCY_INVALID_SENTINEL,
    JOULES_PER_KWH,
};
