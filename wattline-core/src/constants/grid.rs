//! Grid and Front-End Constants
//!
//! Nominal line frequencies, the reference sampling front end, and the
//! tolerance bands used to classify a measured frequency.

// ===== NOMINAL LINE FREQUENCIES =====

/// European / IEC nominal line frequency (Hz).
pub const FREQ_NOMINAL_50_HZ: f64 = 50.0;

/// North American nominal line frequency (Hz).
pub const FREQ_NOMINAL_60_HZ: f64 = 60.0;

/// Lower edge of the band accepted as a given nominal frequency, as a
/// fraction of nominal.
///
/// The band is asymmetric (-5% / +7%) to match the device firmware.
pub const NOMINAL_BAND_LOW: f64 = 0.95;

/// Upper edge of the nominal frequency band, as a fraction of nominal.
pub const NOMINAL_BAND_HIGH: f64 = 1.07;

// ===== REFERENCE FRONT END =====

/// ADC sampling rate of the reference front end (samples/second).
///
/// At 50 Hz one cycle spans 156.25 samples, so cycle boundaries never land on
/// a sample. This is why RMS integrates a fractional trailing sample.
pub const REFERENCE_SAMPLE_RATE_HZ: f64 = 7812.5;

/// Samples captured per measurement window by the reference firmware.
///
/// Longer than one 50 Hz cycle so the zero-crossing scan sees two crossings.
pub const REFERENCE_WINDOW_SAMPLES: usize = 177;

/// Volts to raw ADC counts on the reference voltage channel.
pub const VIN_TO_COUNTS: f64 = 9289.14;

/// Amps to raw ADC counts on the reference current channel.
pub const AMPS_TO_COUNTS: f64 = 1048.576;

// ===== SIGNAL PRESENCE =====

/// Minimum peak-to-peak amplitude (counts) for a voltage window to be processed.
pub const MIN_AMPLITUDE_VOLTAGE_COUNTS: i32 = 80;

/// Minimum peak-to-peak amplitude (counts) for a current window to be processed.
pub const MIN_AMPLITUDE_CURRENT_COUNTS: i32 = 25;
