//! Immutable Sample Buffer for One Measurement Window
//!
//! ## Overview
//!
//! A [`SampleBuffer`] is the ordered sequence of raw integer samples captured
//! for one measurement window. Index 0 is the oldest sample; insertion order is
//! temporal order. The buffer is passive data: it has no notion of frequency,
//! scale or cycle length. Those travel alongside it as explicit parameters.
//!
//! ## Copy-on-Transform
//!
//! Every stage that reshapes a window (offset removal, integration) returns a
//! fresh buffer and leaves its input untouched. The firmware this mirrors
//! rewrites its DMA buffer in place; here the caller always keeps the raw
//! window, which is what makes side-by-side comparison against reference
//! output possible.
//!
//! ```text
//! raw current ──► integrate ──► SampleBuffer (new)
//!      │
//!      └── still available for diagnostics
//! ```
//!
//! ## Device Precision
//!
//! Firmware samples are 32-bit integers. Anything computed in floating point
//! and stored back into a buffer is truncated toward zero, never rounded.
//! [`SampleBuffer::from_f64_truncated`] is the single place that conversion
//! happens, so reference and device outputs diverge only where the algorithm
//! does.
//!
//! ## Usage Example
//!
//! ```rust
//! use wattline_core::buffer::SampleBuffer;
//!
//! let window = SampleBuffer::from_f64_truncated(&[1.9, -1.9, 2.5]);
//! assert_eq!(window.as_slice(), &[1, -1, 2]);
//! assert_eq!(window.max(), Some(2));
//! assert_eq!(window.len(), 3);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-length window of raw integer samples
///
/// ## Invariants
///
/// - Length never changes after construction
/// - Contents never change after construction (no `&mut` access)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleBuffer {
    samples: Vec<i32>,
}

impl SampleBuffer {
    /// Wrap an owned sample vector
    pub fn new(samples: Vec<i32>) -> Self {
        Self { samples }
    }

    /// Build a buffer from real values, truncating each toward zero
    ///
    /// Values outside the `i32` range saturate, as Rust float-to-int casts do.
    pub fn from_f64_truncated(values: &[f64]) -> Self {
        Self {
            samples: values.iter().map(|&v| v as i32).collect(),
        }
    }

    /// Number of samples in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the samples, oldest first
    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    /// Sample at `index`, if present
    pub fn get(&self, index: usize) -> Option<i32> {
        self.samples.get(index).copied()
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> core::slice::Iter<'_, i32> {
        self.samples.iter()
    }

    /// Largest sample
    pub fn max(&self) -> Option<i32> {
        self.samples.iter().copied().max()
    }

    /// Smallest sample
    pub fn min(&self) -> Option<i32> {
        self.samples.iter().copied().min()
    }

    /// Peak-to-peak span in counts, computed without overflow
    pub fn peak_to_peak(&self) -> Option<i64> {
        let (min, max) = (self.min()?, self.max()?);
        Some(max as i64 - min as i64)
    }

    /// Consume the buffer and return its samples
    pub fn into_inner(self) -> Vec<i32> {
        self.samples
    }
}

impl From<Vec<i32>> for SampleBuffer {
    fn from(samples: Vec<i32>) -> Self {
        Self::new(samples)
    }
}

impl From<&[i32]> for SampleBuffer {
    fn from(samples: &[i32]) -> Self {
        Self::new(samples.to_vec())
    }
}

impl FromIterator<i32> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for SampleBuffer {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

impl AsRef<[i32]> for SampleBuffer {
    fn as_ref(&self) -> &[i32] {
        &self.samples
    }
}

impl<'a> IntoIterator for &'a SampleBuffer {
    type Item = &'a i32;
    type IntoIter = core::slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
