//! Energy Register Example
//!
//! Accumulates one second of windows for four loads, one per quadrant, and
//! prints the register totals.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_energy_register
//! ```

use wattline_core::{EnergyAccumulator, MetrologyError, Quadrant};

fn main() {
    println!("Wattline Energy Register Example");
    println!("================================\n");

    let mut register = EnergyAccumulator::new();

    // (label, P in W, Q in VAR)
    let loads = [
        ("Motor (import, +Q)", 2_000.0, 900.0),
        ("PV inverter (export, +Q)", -1_500.0, 200.0),
        ("PV inverter (export, -Q)", -1_500.0, -200.0),
        ("Capacitor bank (import, -Q)", 300.0, -1_200.0),
    ];

    for (label, p, q) in loads {
        // 50 windows of one 50 Hz cycle = 1 second
        let mut quadrant = None;
        for _ in 0..50 {
            quadrant = register.accumulate(p, q, 50.0).unwrap_or(None);
        }
        println!("{:<28} → {:?}", label, quadrant);
    }
    println!();

    let totals = register.snapshot();
    println!("Per quadrant (Wh / VARh):");
    for quadrant in Quadrant::ALL {
        println!(
            "  {:?}: {:>8.4} Wh  {:>8.4} VARh",
            quadrant,
            totals.active_in(quadrant) * 1000.0,
            totals.reactive_in(quadrant) * 1000.0
        );
    }
    println!();
    println!("Imported:          {:.4} Wh", totals.imported() * 1000.0);
    println!("Exported:          {:.4} Wh", totals.exported() * 1000.0);
    println!("Active balance:    {:.4} Wh", totals.active_balance() * 1000.0);
    println!("Inductive:         {:.4} VARh", totals.inductive() * 1000.0);
    println!("Capacitive:        {:.4} VARh", totals.capacitive() * 1000.0);
    println!("Reactive balance:  {:.4} VARh", totals.reactive_balance() * 1000.0);
    println!();

    // Axis readings and unusable frequencies
    println!("Edge cases:");
    match register.accumulate(1_000.0, 0.0, 50.0) {
        Ok(None) => println!("  Q = 0: no quadrant, register unchanged"),
        other => println!("  Q = 0: unexpected {:?}", other),
    }
    match register.accumulate(1_000.0, 100.0, 0.0) {
        Err(MetrologyError::InvalidFrequency { frequency }) => {
            println!("  f = {} Hz: rejected, no cycle duration", frequency)
        }
        other => println!("  f = 0 Hz: unexpected {:?}", other),
    }

    register.reset();
    println!("  After reset: {:.1} Wh imported", register.snapshot().imported());
}
