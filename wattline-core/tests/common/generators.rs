//! Synthetic window generators
//!
//! Waveforms are built the way the device front end would see them:
//! - values scaled to raw counts with the configured `VinToCounts`/`AmpsToCounts`
//! - every sample truncated toward zero, as the firmware stores it
//! - a Rogowski channel carries `di/dt`, so a sine current appears as a cosine
//!
//! Optional impairments (harmonics, noise, DC bias) are deterministic: noise
//! comes from a fixed-seed LCG so every run sees identical windows.

use std::f64::consts::PI;

use wattline_core::{SampleBuffer, SamplingConfig};

/// Waveform shape before scaling
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// `sin(ωn + φ)`
    Sine,
    /// `cos(ωn + φ)`, what a Rogowski coil reports for a sine current
    Cosine,
}

/// Builder for one synthetic channel
#[derive(Debug, Clone)]
pub struct WindowGenerator {
    config: SamplingConfig,
    frequency_hz: f64,
    phase_rad: f64,
    shape: Shape,
    harmonics: Vec<(u32, f64)>,
    noise_counts: f64,
    bias_counts: f64,
    seed: u32,
}

impl WindowGenerator {
    /// Sine at the nominal frequency, no impairments
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            frequency_hz: config.nominal_frequency_hz(),
            phase_rad: 0.0,
            shape: Shape::Sine,
            harmonics: Vec::new(),
            noise_counts: 0.0,
            bias_counts: 0.0,
            seed: 42,
        }
    }

    pub fn frequency(mut self, hz: f64) -> Self {
        self.frequency_hz = hz;
        self
    }

    pub fn phase_degrees(mut self, degrees: f64) -> Self {
        self.phase_rad = degrees.to_radians();
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Add a harmonic with amplitude relative to the fundamental
    pub fn harmonic(mut self, order: u32, relative: f64) -> Self {
        self.harmonics.push((order, relative));
        self
    }

    /// Uniform noise of ±`counts`
    pub fn noise(mut self, counts: f64) -> Self {
        self.noise_counts = counts;
        self
    }

    /// Constant ADC bias in counts
    pub fn bias(mut self, counts: f64) -> Self {
        self.bias_counts = counts;
        self
    }

    /// Voltage window with the given peak in volts
    pub fn voltage(&self, peak_v: f64) -> SampleBuffer {
        self.build(peak_v * self.config.vin_to_counts(), self.config.window_samples())
    }

    /// Current window with the given peak in amps
    pub fn current(&self, peak_a: f64) -> SampleBuffer {
        self.build(peak_a * self.config.amps_to_counts(), self.config.window_samples())
    }

    /// Window of `len` samples with the given peak in raw counts
    pub fn counts(&self, peak_counts: f64, len: usize) -> SampleBuffer {
        self.build(peak_counts, len)
    }

    fn build(&self, peak_counts: f64, len: usize) -> SampleBuffer {
        let w = 2.0 * PI * self.frequency_hz / self.config.sample_rate_hz();
        let mut seed = self.seed;

        let values: Vec<f64> = (0..len)
            .map(|n| {
                let x = w * n as f64 + self.phase_rad;
                let fundamental = match self.shape {
                    Shape::Sine => x.sin(),
                    Shape::Cosine => x.cos(),
                };
                let harmonics: f64 = self
                    .harmonics
                    .iter()
                    .map(|&(order, relative)| relative * (x * order as f64).sin())
                    .sum();

                let noise = if self.noise_counts > 0.0 {
                    seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    let uniform = seed as f64 / u32::MAX as f64;
                    (uniform - 0.5) * 2.0 * self.noise_counts
                } else {
                    0.0
                };

                peak_counts * (fundamental + harmonics) + noise + self.bias_counts
            })
            .collect();

        SampleBuffer::from_f64_truncated(&values)
    }
}

/// Reference bench pair: 325 V sine and a 100 A in-phase current seen
/// through a Rogowski coil (cosine), 177 samples at 7812.5 Hz
pub fn reference_windows(config: SamplingConfig) -> (SampleBuffer, SampleBuffer) {
    let generator = WindowGenerator::new(config);
    let voltage = generator.voltage(325.0);
    let raw_current = generator.clone().shape(Shape::Cosine).current(100.0);
    (voltage, raw_current)
}
