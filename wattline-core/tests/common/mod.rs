//! Common test utilities for integration tests
//!
//! This module provides:
//! - Synthetic voltage/current window generators (`generators`)
//! - Tolerance assertion helpers

#![allow(dead_code)]

pub mod generators;

/// Assert `actual` is within `rel` relative error of `expected`
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr, rel: $rel:expr) => {{
        let (actual, expected): (f64, f64) = ($actual, $expected);
        let err = ((actual - expected) / expected).abs();
        assert!(
            err <= $rel,
            "{} = {} not within {} of {} (relative error {:e})",
            stringify!($actual),
            actual,
            $rel,
            expected,
            err
        );
    }};
    ($actual:expr, $expected:expr, abs: $abs:expr) => {{
        let (actual, expected): (f64, f64) = ($actual, $expected);
        assert!(
            (actual - expected).abs() <= $abs,
            "{} = {} not within ±{} of {}",
            stringify!($actual),
            actual,
            $abs,
            expected
        );
    }};
}

/// RMS of a sinusoid with the given peak
pub fn sine_rms(peak: f64) -> f64 {
    peak / std::f64::consts::SQRT_2
}
