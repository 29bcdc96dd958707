//! Integration tests for the window pipeline
//!
//! Runs full voltage/current windows through every stage and checks the
//! physical readings against the known synthetic inputs.

#[macro_use]
mod common;

use wattline_core::{
    signal::{
        cycle_rms, estimate_frequency, limit_length_to_cycles, nominal_cycle_peak, remove_offset, DirectSensor,
        FrequencyEstimate, RogowskiIntegrator,
    },
    LoadDirection, Meter, MetrologyError, PowerCalculator, Quadrant, SampleBuffer, SamplingConfig,
};

use common::{
    generators::{reference_windows, Shape, WindowGenerator},
    sine_rms,
};

#[test]
fn reference_scenario_end_to_end() {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(config);
    assert_eq!(voltage.len(), 177);

    let mut meter = Meter::new(config);
    let report = meter.process_window(&voltage, &raw_current).unwrap();

    assert_close!(report.frequency_hz, 50.0, abs: 0.05);
    assert_close!(report.voltage.rms, sine_rms(325.0), rel: 1e-3);
    assert_close!(report.current.rms, sine_rms(100.0), rel: 1e-3);

    // 325 * 100 / 2, less the one-sample lead of the integrated current
    assert_close!(report.power.active_w, 16_250.0, rel: 0.01);
    assert!(report.power.reactive_var.abs() < 0.05 * report.power.active_w);
    assert!(report.power.power_factor > 0.99);
    assert!(report.power.power_factor <= 1.0);

    assert_eq!(report.grid_hz, 50.0);
    assert!(report.voltage.present && report.current.present);
    assert!(report.short_circuit_a.is_some());
}

#[test]
fn reference_scenario_energy_lands_in_one_quadrant() {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(config);
    let mut meter = Meter::new(config);

    let report = meter.process_window(&voltage, &raw_current).unwrap();
    let quadrant = report.quadrant.expect("non-zero powers must pick a quadrant");

    let expected_kwh = report.power.active_w.abs() * (1.0 / report.frequency_hz) / 3.6e6;
    assert_close!(report.energy.active_in(quadrant), expected_kwh, rel: 1e-12);

    let others: f64 = Quadrant::ALL
        .iter()
        .filter(|&&q| q != quadrant)
        .map(|&q| report.energy.active_in(q) + report.energy.reactive_in(q))
        .sum();
    assert_eq!(others, 0.0);
}

#[test]
fn energy_accumulates_over_windows() {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(config);
    let mut meter = Meter::new(config);

    let first = meter.process_window(&voltage, &raw_current).unwrap();
    for _ in 0..49 {
        meter.process_window(&voltage, &raw_current).unwrap();
    }

    let totals = meter.energy().snapshot();
    assert_eq!(meter.energy().windows(), 50);
    assert_close!(totals.imported(), 50.0 * first.energy.imported(), rel: 1e-9);
    assert_eq!(totals.exported(), 0.0);

    meter.reset();
    assert_eq!(meter.energy().snapshot().imported(), 0.0);
}

#[test]
fn stage_by_stage_matches_meter() {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(config);
    let fs = config.sample_rate_hz();

    let frequency = estimate_frequency(&voltage, fs).unwrap();
    let current = RogowskiIntegrator::new(&config).integrate(&raw_current, frequency).unwrap();
    let power = PowerCalculator::new(&config)
        .compute(voltage.as_slice(), current.as_slice(), config.nominal_cycle_len())
        .unwrap();

    let mut meter = Meter::new(config);
    let report = meter.process_window(&voltage, &raw_current).unwrap();

    assert_eq!(report.frequency, frequency);
    assert_eq!(report.power, power);
    assert_eq!(
        report.current.peak_counts,
        nominal_cycle_peak(&current, &config).unwrap()
    );
}

#[test]
fn integrator_leaves_raw_window_intact() {
    let config = SamplingConfig::default();
    let (_, raw_current) = reference_windows(config);
    let before = raw_current.clone();

    let _ = RogowskiIntegrator::new(&config)
        .integrate(&raw_current, FrequencyEstimate::Valid(50.0))
        .unwrap();

    assert_eq!(raw_current, before);
}

#[test]
fn lagging_and_leading_loads() {
    let config = SamplingConfig::default();
    let generator = WindowGenerator::new(config);
    let voltage = generator.voltage(325.0);

    // Direct sensor, current shifted by ±60°
    for (phase, expected_q_sign, expected_load) in [
        (60.0, 1.0, LoadDirection::Inductive),
        (-60.0, -1.0, LoadDirection::Capacitive),
    ] {
        let current = generator.clone().phase_degrees(phase).current(10.0);
        let mut meter = Meter::with_sensor(config, DirectSensor);
        let report = meter.process_window(&voltage, &current).unwrap();

        assert_close!(report.power.power_factor, 0.5, abs: 0.03);
        assert_eq!(report.power.reactive_var.signum(), expected_q_sign);
        assert_eq!(report.load, expected_load);
        assert_close!(report.phase_angle_deg.abs(), 60.0, abs: 2.0);

        assert_eq!(report.angles.direction, expected_load);
        assert_close!(report.angles.current_to_voltage_deg, report.phase_angle_deg, abs: 2.0);
    }
}

#[test]
fn exporting_load_goes_to_q2_or_q3() {
    let config = SamplingConfig::default();
    let generator = WindowGenerator::new(config);
    let voltage = generator.voltage(230.0);
    let current = generator.clone().phase_degrees(150.0).current(5.0);

    let mut meter = Meter::with_sensor(config, DirectSensor);
    let report = meter.process_window(&voltage, &current).unwrap();

    assert!(report.power.active_w < 0.0);
    assert!(matches!(report.quadrant, Some(Quadrant::Q2) | Some(Quadrant::Q3)));
    assert!(report.energy.exported() > 0.0);
    assert_eq!(report.energy.imported(), 0.0);
}

#[test]
fn sixty_hz_grid() {
    let config = SamplingConfig::nominal_60hz();
    let generator = WindowGenerator::new(config);
    let voltage = generator.voltage(170.0);
    let raw_current = generator.clone().shape(Shape::Cosine).current(20.0);

    let mut meter = Meter::new(config);
    let report = meter.process_window(&voltage, &raw_current).unwrap();

    assert_close!(report.frequency_hz, 60.0, abs: 0.1);
    assert_eq!(report.grid_hz, 60.0);
    assert_close!(report.voltage.rms, sine_rms(170.0), rel: 2e-3);
    assert_close!(report.current.rms, sine_rms(20.0), rel: 2e-3);
}

#[test]
fn off_nominal_frequency_is_tracked() {
    let config = SamplingConfig::default();
    let voltage = WindowGenerator::new(config).frequency(49.5).voltage(325.0);

    let hz = estimate_frequency(&voltage, config.sample_rate_hz()).unwrap().hz().unwrap();
    assert_close!(hz, 49.5, abs: 0.05);

    // RMS over the measured cycle stays exact off nominal
    let rms = cycle_rms(&voltage, FrequencyEstimate::Valid(hz), 0, config.sample_rate_hz()).unwrap();
    assert_close!(rms / config.vin_to_counts(), sine_rms(325.0), rel: 1e-3);
}

#[cfg(feature = "std")]
#[test]
fn third_harmonic_in_voltage_is_reported() {
    let config = SamplingConfig::default();
    let generator = WindowGenerator::new(config);
    let voltage = generator.clone().harmonic(3, 0.10).voltage(325.0);
    let current = generator.current(10.0);

    let mut meter = Meter::with_sensor(config, DirectSensor);
    let report = meter.process_window(&voltage, &current).unwrap();

    let distorted = report.voltage.harmonics.expect("voltage spectrum");
    assert_close!(distorted.order(3).unwrap(), 10.0, abs: 0.5);
    assert_close!(distorted.thd_db, -20.0, abs: 0.5);

    let clean = report.current.harmonics.expect("current spectrum");
    assert!(clean.thd_db < -40.0, "clean current THD {} dB", clean.thd_db);
}

#[test]
fn biased_adc_window_is_centred() {
    let config = SamplingConfig::default();
    let biased = WindowGenerator::new(config).bias(2048.0).counts(1000.0, 177);
    let centred = remove_offset(&biased);

    let (max, min) = (centred.max().unwrap(), centred.min().unwrap());
    assert!((max + min).abs() <= 1);
}

#[test]
fn noisy_window_still_measures() {
    let config = SamplingConfig::default();
    let generator = WindowGenerator::new(config).noise(2_000.0);
    let voltage = generator.voltage(325.0);
    let current = generator.clone().current(10.0);

    let mut meter = Meter::with_sensor(config, DirectSensor);
    let report = meter.process_window(&voltage, &current).unwrap();

    assert_close!(report.frequency_hz, 50.0, abs: 0.5);
    assert_close!(report.voltage.rms, sine_rms(325.0), rel: 0.01);
}

#[test]
fn flat_windows_do_not_fail() {
    let config = SamplingConfig::default();
    let zeros = SampleBuffer::from(vec![0; 177]);

    let mut meter = Meter::new(config);
    let report = meter.process_window(&zeros, &zeros).unwrap();

    assert_eq!(report.frequency, FrequencyEstimate::Invalid);
    assert_eq!(report.frequency_hz, config.nominal_frequency_hz());
    assert_eq!(report.power.power_factor, 0.0);
    assert_eq!(report.quadrant, None);
    assert!(!report.voltage.present);
}

#[test]
fn misaligned_windows_are_rejected() {
    let config = SamplingConfig::default();
    let (voltage, _) = reference_windows(config);
    let short = SampleBuffer::from(&voltage.as_slice()[..100]);

    let mut meter = Meter::new(config);
    assert_eq!(
        meter.process_window(&voltage, &short),
        Err(MetrologyError::LengthMismatch { voltage: 177, current: 100 })
    );
}

#[test]
fn whole_cycle_length_for_long_captures() {
    let config = SamplingConfig::default();
    let long = WindowGenerator::new(config).counts(10_000.0, 1_000);
    let hz = estimate_frequency(&long, config.sample_rate_hz()).unwrap().hz().unwrap();

    let length = limit_length_to_cycles(long.len(), hz, config.sample_rate_hz());
    assert_eq!(length, 936);

    let p = PowerCalculator::new(&config)
        .compute(long.as_slice(), long.as_slice(), length)
        .unwrap();
    let mean_square = 10_000.0 * 10_000.0 / 2.0 / config.power_scale();
    assert_close!(p.active_w, mean_square, rel: 0.02);
}
