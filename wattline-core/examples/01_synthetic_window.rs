//! Synthetic Window Example
//!
//! Feeds the reference bench window through the meter: a 325 V peak sine on
//! the voltage channel and a 100 A peak current seen through a Rogowski coil.
//!
//! ## What You'll Learn
//!
//! - Building a `SamplingConfig` for a front end
//! - Running one window through `Meter::process_window`
//! - Reading frequency, RMS, power, phase and harmonics out of a `WindowReport`
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_synthetic_window
//! ```

use std::f64::consts::PI;

use wattline_core::{signal::RogowskiIntegrator, Meter, SampleBuffer, SamplingConfig};

fn main() {
    println!("Wattline Synthetic Window Example");
    println!("=================================\n");

    let config = SamplingConfig::default();
    println!("Front end:");
    println!("  Sample rate:   {} Hz", config.sample_rate_hz());
    println!("  Nominal line:  {} Hz", config.nominal_frequency_hz());
    println!("  Window:        {} samples", config.window_samples());
    println!("  Cycle:         {} samples", config.nominal_cycle_samples());
    println!();

    let w = 2.0 * PI * config.nominal_frequency_hz() / config.sample_rate_hz();
    let voltage: Vec<f64> = (0..config.window_samples())
        .map(|n| 325.0 * config.vin_to_counts() * (w * n as f64).sin())
        .collect();
    // di/dt of a sine current is a cosine
    let raw_current: Vec<f64> = (0..config.window_samples())
        .map(|n| 100.0 * config.amps_to_counts() * (w * n as f64).cos())
        .collect();

    let voltage = SampleBuffer::from_f64_truncated(&voltage);
    let raw_current = SampleBuffer::from_f64_truncated(&raw_current);

    // Integration on its own, with its intermediate values
    let integrator = RogowskiIntegrator::new(&config);
    match integrator.integrate_detailed(&raw_current, wattline_core::FrequencyEstimate::Valid(50.0)) {
        Ok(step) => {
            println!("Rogowski integration:");
            println!("  Raw RMS:       {:.1} counts", step.raw_rms);
            println!("  Integral RMS:  {:.1} counts", step.integral_rms);
            println!("  Gain:          {:.4}", step.gain);
            println!();
        }
        Err(e) => println!("Integration failed: {}", e),
    }

    let mut meter = Meter::new(config);
    let report = match meter.process_window(&voltage, &raw_current) {
        Ok(report) => report,
        Err(e) => {
            println!("Window rejected: {}", e);
            return;
        }
    };

    println!("Window report:");
    println!("  Frequency:     {:.3} Hz ({} Hz grid)", report.frequency_hz, report.grid_hz);
    println!("  Voltage RMS:   {:.2} V (expected {:.2})", report.voltage.rms, 325.0 / 2f64.sqrt());
    println!("  Current RMS:   {:.2} A (expected {:.2})", report.current.rms, 100.0 / 2f64.sqrt());
    println!("  Active:        {:.1} W", report.power.active_w);
    println!("  Reactive:      {:.1} VAR", report.power.reactive_var);
    println!("  Apparent:      {:.1} VA", report.power.apparent_va);
    println!("  Power factor:  {:.4}", report.power.power_factor);
    println!("  Phase angle:   {:.2}° ({:?})", report.phase_angle_deg, report.load);
    println!(
        "  Waveforms:     I→V {:.2}°, V at {:.1}°, I at {:.1}°",
        report.angles.current_to_voltage_deg, report.angles.voltage_deg, report.angles.current_deg
    );
    if let Some(spectrum) = report.current.harmonics {
        println!("  Current THD:   {:.1} dB", spectrum.thd_db);
        for order in [3, 5, 7] {
            if let Some(percent) = spectrum.order(order) {
                println!("    H{:<2}         {:.3} %", order, percent);
            }
        }
    }
    if let Some(threshold) = report.short_circuit_a {
        println!("  SC threshold:  {:.1} A", threshold);
    }
}
