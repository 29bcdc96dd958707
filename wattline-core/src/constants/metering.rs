//! Metering Algorithm Constants
//!
//! Limits and conversion factors shared by the estimators, the power
//! calculator and the energy register.

// ===== ZERO CROSSING =====

/// Maximum crossing points kept per estimation call.
///
/// Further crossings are still detected (they re-arm the debounce) but are
/// not stored.
pub const ZERO_CROSSING_MAX_POINTS: usize = 5;

/// Samples skipped after each detected crossing.
///
/// Noise near a slow crossing can flip the sign several times within a few
/// samples; only the first flip counts.
pub const FREQ_ZC_DEBOUNCE: u32 = 5;

/// Firmware sentinel for "no frequency": fewer than two crossings found.
pub const FREQUENCY_INVALID_SENTINEL: f64 = -1.0;

// ===== ENERGY =====

/// Watt-seconds (joules) per kilowatt-hour.
pub const JOULES_PER_KWH: f64 = 3.6e6;

// ===== PHASE =====

/// Angles within this many degrees of zero are reported as in phase.
pub const IN_PHASE_DEAD_BAND_DEG: f64 = 1e-6;

// ===== SHORT CIRCUIT =====

/// Rank (0-based) into the ascending absolute samples used as the
/// short-circuit threshold.
///
/// The threshold is the magnitude every sample except the ten smallest
/// reaches, so a few samples near a zero crossing never lower it.
pub const SHORT_CIRCUIT_RANK: usize = 10;

// ===== AVERAGING =====

/// Weight of each new window in the running averages.
///
/// With one window per cycle at 50 Hz this settles in about a second.
pub const AVERAGING_WEIGHT: f64 = 0.02;

// ===== HARMONICS =====

/// Points one cycle is resampled to before the FFT.
///
/// The cycle then spans the whole transform, so harmonic `n` lands in bin `n`.
pub const FFT_POINTS: usize = 128;

/// Odd harmonic orders reported, 1st through 41st.
pub const HARMONIC_ORDERS: usize = 21;

/// THD reported when no harmonic energy is found at all.
pub const THD_FLOOR_DB: f64 = -120.0;
