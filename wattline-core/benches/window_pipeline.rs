//! Criterion benchmarks for the per-window metrology path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wattline_core::{
    signal::{cycle_rms, estimate_frequency, FrequencyEstimate, HarmonicAnalyzer, RogowskiIntegrator},
    Meter, PowerCalculator, SampleBuffer, SamplingConfig,
};

fn reference_windows(config: &SamplingConfig) -> (SampleBuffer, SampleBuffer) {
    let w = 2.0 * std::f64::consts::PI * 50.0 / config.sample_rate_hz();
    let n = config.window_samples();

    let voltage = (0..n)
        .map(|k| (325.0 * config.vin_to_counts() * (w * k as f64).sin()) as i32)
        .collect();
    let current = (0..n)
        .map(|k| (100.0 * config.amps_to_counts() * (w * k as f64).cos()) as i32)
        .collect();
    (voltage, current)
}

fn bench_stages(c: &mut Criterion) {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(&config);
    let fs = config.sample_rate_hz();
    let frequency = FrequencyEstimate::Valid(50.0);

    let mut group = c.benchmark_group("stages");

    group.bench_function("zero_crossing_177", |b| {
        b.iter(|| estimate_frequency(black_box(&voltage), fs));
    });

    group.bench_function("cycle_rms_177", |b| {
        b.iter(|| cycle_rms(black_box(&voltage), frequency, config.nominal_cycle_len(), fs));
    });

    group.bench_function("rogowski_177", |b| {
        let integrator = RogowskiIntegrator::new(&config);
        b.iter(|| integrator.integrate(black_box(&raw_current), frequency));
    });

    group.bench_function("harmonics_156", |b| {
        let analyzer = HarmonicAnalyzer::new(&config);
        b.iter(|| analyzer.analyze(black_box(&voltage), frequency));
    });

    group.bench_function("power_156", |b| {
        let calc = PowerCalculator::new(&config);
        b.iter(|| calc.compute(black_box(voltage.as_slice()), black_box(raw_current.as_slice()), 156));
    });

    group.finish();
}

fn bench_meter(c: &mut Criterion) {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(&config);

    c.bench_function("meter_process_window_177", |b| {
        let mut meter = Meter::new(config);
        b.iter(|| meter.process_window(black_box(&voltage), black_box(&raw_current)));
    });
}

criterion_group!(benches, bench_stages, bench_meter);
criterion_main!(benches);
