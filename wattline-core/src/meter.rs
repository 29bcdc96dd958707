//! Single-Phase Meter Pipeline
//!
//! ## Overview
//!
//! [`Meter`] runs every estimator over one pair of windows in the order the
//! firmware does, and keeps the state that outlives a window: the energy
//! register and the running averages.
//!
//! ```text
//! voltage ──► frequency ─┬──────────────────────────────┐
//!    │                   │                              │
//!    │        raw current ┴─► CurrentSensor ─► current   │
//!    │                                           │       │
//!    ├──► RMS / peak / harmonics    ◄───────────┤       │
//!    │                                           │       │
//!    └────────► power, phase (nominal cycle) ◄──┘       │
//!                          │                            │
//!                          └──► energy register ◄───────┘
//! ```
//!
//! ## Frequency Fallback
//!
//! RMS, integration and harmonics receive the estimate as measured and apply
//! their own integer-length fallback when it is invalid. A measured frequency
//! whose cycle does not fit in the window is handed to them as invalid too,
//! with a warning; it still sets the energy duration. When nothing was
//! measured the energy register is given the nominal frequency instead and a
//! warning is logged.
//!
//! ## Signal Presence
//!
//! A window pair is only metered when both channels clear their amplitude
//! floor ([`SignalKind::min_amplitude`]). Otherwise the report carries the
//! channel readings with zero power, no energy is accumulated, and only the
//! averages of the live channels move.
//!
//! ## Usage Example
//!
//! ```rust
//! use wattline_core::{Meter, SampleBuffer, SamplingConfig};
//!
//! let config = SamplingConfig::default();
//! let mut meter = Meter::new(config);
//!
//! let w = 2.0 * std::f64::consts::PI * 50.0 / config.sample_rate_hz();
//! let voltage: SampleBuffer = (0..177)
//!     .map(|n| (325.0 * config.vin_to_counts() * (w * n as f64).sin()) as i32)
//!     .collect();
//! let raw_current: SampleBuffer = (0..177)
//!     .map(|n| (100.0 * config.amps_to_counts() * (w * n as f64).cos()) as i32)
//!     .collect();
//!
//! let report = meter.process_window(&voltage, &raw_current).unwrap();
//! assert!((report.frequency_hz - 50.0).abs() < 0.1);
//! assert!(report.power.power_factor > 0.99);
//! assert!(report.metered);
//! ```

use crate::{
    buffer::SampleBuffer,
    config::SamplingConfig,
    constants::metering::AVERAGING_WEIGHT,
    energy::{EnergyAccumulator, EnergyTotals, Quadrant},
    errors::{MetrologyError, MetrologyResult},
    phase::{phase_angles, PhaseAngles},
    power::{LoadDirection, PowerCalculator, PowerMetrics},
    signal::{
        classify_nominal, cycle_rms, ema, estimate_frequency, nominal_cycle_peak, short_circuit_threshold,
        split_cycle, FrequencyEstimate, HarmonicSpectrum, RogowskiIntegrator, SignalKind,
    },
    traits::CurrentSensor,
};

#[cfg(feature = "std")]
use crate::signal::HarmonicAnalyzer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-channel readings for one window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelReading {
    /// RMS in raw counts
    pub rms_counts: f64,
    /// RMS in volts or amps
    pub rms: f64,
    /// Largest absolute sample over the nominal cycle, in counts
    pub peak_counts: u32,
    /// Same peak in volts or amps
    pub peak: f64,
    /// Odd harmonics of the first cycle, when a spectrum could be taken
    pub harmonics: Option<HarmonicSpectrum>,
    /// Window cleared the channel's amplitude floor
    pub present: bool,
}

/// Everything measured over one window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowReport {
    /// Frequency as measured from the voltage window
    pub frequency: FrequencyEstimate,
    /// Frequency used for energy, nominal when none was measured
    pub frequency_hz: f64,
    /// Grid the measurement was classified into (50 or 60 Hz)
    pub grid_hz: f64,
    /// Voltage channel
    pub voltage: ChannelReading,
    /// Reconstructed current channel
    pub current: ChannelReading,
    /// Short-circuit threshold of the current, in amps
    pub short_circuit_a: Option<f64>,
    /// Both channels were live, so power and energy were computed
    pub metered: bool,
    /// Power over one nominal cycle
    pub power: PowerMetrics,
    /// Phase angle from the power factor, in degrees
    pub phase_angle_deg: f64,
    /// Load character
    pub load: LoadDirection,
    /// Angles read from the waveforms
    pub angles: PhaseAngles,
    /// Quadrant credited with this window's energy
    pub quadrant: Option<Quadrant>,
    /// Energy register after this window
    pub energy: EnergyTotals,
}

/// Readings carried across windows
///
/// RMS, frequency and power are exponentially weighted; peaks hold the
/// largest value seen since the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunningAverages {
    /// Voltage RMS (V)
    pub voltage_rms: f64,
    /// Current RMS (A)
    pub current_rms: f64,
    /// Line frequency (Hz), measured windows only
    pub frequency_hz: f64,
    /// Active power (W)
    pub active_w: f64,
    /// Reactive power (VAR)
    pub reactive_var: f64,
    /// Highest voltage peak (V)
    pub voltage_peak: f64,
    /// Highest current peak (A)
    pub current_peak: f64,
}

/// Single-phase meter
pub struct Meter<S: CurrentSensor = RogowskiIntegrator> {
    config: SamplingConfig,
    sensor: S,
    power: PowerCalculator,
    #[cfg(feature = "std")]
    harmonics: HarmonicAnalyzer,
    energy: EnergyAccumulator,
    averages: RunningAverages,
}

impl Meter<RogowskiIntegrator> {
    /// Meter with a Rogowski coil on the current channel
    pub fn new(config: SamplingConfig) -> Self {
        Self::with_sensor(config, RogowskiIntegrator::new(&config))
    }
}

impl<S: CurrentSensor> Meter<S> {
    /// Meter with a custom current front end
    pub fn with_sensor(config: SamplingConfig, sensor: S) -> Self {
        Self {
            config,
            sensor,
            power: PowerCalculator::new(&config),
            #[cfg(feature = "std")]
            harmonics: HarmonicAnalyzer::new(&config),
            energy: EnergyAccumulator::new(),
            averages: RunningAverages::default(),
        }
    }

    /// Process one pair of simultaneously captured windows
    pub fn process_window(
        &mut self,
        voltage: &SampleBuffer,
        raw_current: &SampleBuffer,
    ) -> MetrologyResult<WindowReport> {
        if voltage.len() != raw_current.len() {
            return Err(MetrologyError::LengthMismatch {
                voltage: voltage.len(),
                current: raw_current.len(),
            });
        }

        let fs = self.config.sample_rate_hz();
        let cycle_len = self.config.nominal_cycle_len();

        let measured = estimate_frequency(voltage, fs)?;
        let frequency_hz = match measured {
            FrequencyEstimate::Valid(hz) => hz,
            FrequencyEstimate::Invalid => {
                log_warn!(
                    "No frequency in voltage window, using nominal {} Hz",
                    self.config.nominal_frequency_hz()
                );
                self.config.nominal_frequency_hz()
            }
        };
        let frequency = self.fitting_cycle(measured, voltage.len());

        let current = self.sensor.reconstruct(raw_current, frequency)?;

        let voltage_reading = self.channel(voltage, frequency, SignalKind::Voltage)?;
        let current_reading = self.channel(&current, frequency, SignalKind::Current)?;

        let short_circuit_a =
            short_circuit_threshold(&current, cycle_len).map(|counts| counts as f64 / self.config.amps_to_counts());

        let metered = voltage_reading.present && current_reading.present;
        let (power, angles, quadrant) = if metered {
            let power = self.power.compute(voltage.as_slice(), current.as_slice(), cycle_len)?;
            let samples_per_cycle = split_cycle(measured, cycle_len, fs).total();
            let angles = phase_angles(voltage.as_slice(), current.as_slice(), cycle_len, samples_per_cycle);
            let quadrant = self
                .energy
                .accumulate(power.active_w, power.reactive_var, frequency_hz)?;
            (power, angles, quadrant)
        } else {
            log_debug!(
                "Window below amplitude floor (voltage {}, current {}), not metered",
                voltage_reading.present,
                current_reading.present
            );
            (PowerMetrics::default(), PhaseAngles::default(), None)
        };

        self.update_averages(&voltage_reading, &current_reading, measured, metered.then_some(&power));

        log_debug!(
            "[{}] f={} Hz  V={} V  I={} A  P={} W  Q={} VAR  PF={}",
            self.sensor.name(),
            frequency_hz,
            voltage_reading.rms,
            current_reading.rms,
            power.active_w,
            power.reactive_var,
            power.power_factor
        );

        Ok(WindowReport {
            frequency: measured,
            frequency_hz,
            grid_hz: classify_nominal(measured),
            voltage: voltage_reading,
            current: current_reading,
            short_circuit_a,
            metered,
            phase_angle_deg: power.phase_angle_degrees(),
            load: power.load_direction(),
            power,
            angles,
            quadrant,
            energy: self.energy.snapshot(),
        })
    }

    /// Drop a measured frequency whose cycle the window cannot hold
    fn fitting_cycle(&self, measured: FrequencyEstimate, len: usize) -> FrequencyEstimate {
        let span = split_cycle(measured, self.config.nominal_cycle_len(), self.config.sample_rate_hz());
        if measured.is_valid() && span.required_samples() > len {
            log_warn!(
                "Measured {} Hz needs {} samples per cycle, window holds {}; using nominal cycle",
                measured.as_raw(),
                span.required_samples(),
                len
            );
            return FrequencyEstimate::Invalid;
        }
        measured
    }

    fn channel(
        &self,
        buffer: &SampleBuffer,
        frequency: FrequencyEstimate,
        kind: SignalKind,
    ) -> MetrologyResult<ChannelReading> {
        let rms_counts = cycle_rms(
            buffer,
            frequency,
            self.config.nominal_cycle_len(),
            self.config.sample_rate_hz(),
        )?;

        let counts_per_unit = match kind {
            SignalKind::Voltage => self.config.vin_to_counts(),
            SignalKind::Current => self.config.amps_to_counts(),
        };
        let peak_counts = nominal_cycle_peak(buffer, &self.config).unwrap_or(0);

        Ok(ChannelReading {
            rms_counts,
            rms: rms_counts / counts_per_unit,
            peak_counts,
            peak: peak_counts as f64 / counts_per_unit,
            harmonics: self.spectrum(buffer, frequency),
            present: kind.is_present(buffer),
        })
    }

    #[cfg(feature = "std")]
    fn spectrum(&self, buffer: &SampleBuffer, frequency: FrequencyEstimate) -> Option<HarmonicSpectrum> {
        self.harmonics.analyze(buffer, frequency)
    }

    #[cfg(not(feature = "std"))]
    fn spectrum(&self, _buffer: &SampleBuffer, _frequency: FrequencyEstimate) -> Option<HarmonicSpectrum> {
        None
    }

    fn update_averages(
        &mut self,
        voltage: &ChannelReading,
        current: &ChannelReading,
        frequency: FrequencyEstimate,
        power: Option<&PowerMetrics>,
    ) {
        let avg = &mut self.averages;

        if voltage.present {
            avg.voltage_rms = ema(avg.voltage_rms, voltage.rms, AVERAGING_WEIGHT);
            avg.voltage_peak = libm::fmax(avg.voltage_peak, voltage.peak);
        }
        if current.present {
            avg.current_rms = ema(avg.current_rms, current.rms, AVERAGING_WEIGHT);
            avg.current_peak = libm::fmax(avg.current_peak, current.peak);
        }
        if let Some(power) = power {
            avg.active_w = ema(avg.active_w, power.active_w, AVERAGING_WEIGHT);
            avg.reactive_var = ema(avg.reactive_var, power.reactive_var, AVERAGING_WEIGHT);
        }
        if let Some(hz) = frequency.hz() {
            avg.frequency_hz = ema(avg.frequency_hz, hz, AVERAGING_WEIGHT);
        }
    }

    /// Front-end configuration
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Current front end
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Energy register
    pub fn energy(&self) -> &EnergyAccumulator {
        &self.energy
    }

    /// Running averages and held peaks across processed windows
    pub fn averages(&self) -> &RunningAverages {
        &self.averages
    }

    /// Zero the energy register and forget the averages and peaks
    pub fn reset(&mut self) {
        self.energy.reset();
        self.averages = RunningAverages::default();
    }
}
