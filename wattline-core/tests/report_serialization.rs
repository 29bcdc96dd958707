//! Reports and totals survive a JSON round trip

#![cfg(feature = "serde")]

mod common;

use wattline_core::{EnergyTotals, Meter, SamplingConfig, WindowReport};

use common::generators::reference_windows;

#[test]
fn window_report_round_trip() {
    let config = SamplingConfig::default();
    let (voltage, raw_current) = reference_windows(config);
    let report = Meter::new(config).process_window(&voltage, &raw_current).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let back: WindowReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.frequency, report.frequency);
    assert_eq!(back.quadrant, report.quadrant);
    assert_eq!(back.load, report.load);
    assert_eq!(back.angles, report.angles);
    assert_eq!(back.voltage.harmonics, report.voltage.harmonics);
    assert!((back.power.active_w - report.power.active_w).abs() < 1e-9);
}

#[test]
fn energy_totals_field_names() {
    let totals = EnergyTotals {
        active: [1.0, 0.0, 0.0, 0.5],
        reactive: [0.25, 0.0, 0.0, 0.0],
    };
    let value = serde_json::to_value(totals).unwrap();

    assert_eq!(value["active"][0], 1.0);
    assert_eq!(value["reactive"][0], 0.25);
}

#[test]
fn config_round_trip() {
    let config = SamplingConfig::nominal_60hz();
    let json = serde_json::to_string(&config).unwrap();
    let back: SamplingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
