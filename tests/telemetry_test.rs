//! Smoothing, peaks, RMS and reset as seen by an editor polling telemetry.

use approx::assert_relative_eq;
use voltaic_core::components::{AcSource, Battery, ComponentKind, Resistor, Telemetry};
use voltaic_core::{Circuit, ComponentId, Simulator, SolverConfig};

fn source_with_load(source: ComponentKind, ohms: f64) -> (Circuit, ComponentId, ComponentId) {
    let mut circuit = Circuit::new();
    let s = circuit.add(source).unwrap();
    let r = circuit.add(ComponentKind::Resistor(Resistor::new(ohms))).unwrap();
    circuit.connect((s, 0), (r, 0)).unwrap();
    circuit.connect((r, 1), (s, 1)).unwrap();
    (circuit, s, r)
}

#[test]
fn test_current_approaches_target_geometrically() {
    let (mut circuit, _, r) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    let sim = Simulator::new();
    let target = 9.0 / (1000.0 + 2e-4);

    for n in 1..=8 {
        sim.solve(&mut circuit, 1e-3, 0.0).unwrap();
        let current = circuit.component(r).unwrap().telemetry.current;
        assert_relative_eq!(current, target * (1.0 - 0.5f64.powi(n)), max_relative = 1e-6);
    }
}

#[test]
fn test_steady_state_only_decays_toward_target() {
    let (mut circuit, _, r) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    let sim = Simulator::new();
    for _ in 0..80 {
        sim.solve(&mut circuit, 1e-3, 0.0).unwrap();
    }
    let before = circuit.component(r).unwrap().telemetry;
    sim.solve(&mut circuit, 1e-3, 0.0).unwrap();
    let after = circuit.component(r).unwrap().telemetry;

    assert_relative_eq!(after.voltage, before.voltage, max_relative = 1e-12);
    assert_relative_eq!(after.current, before.current, max_relative = 1e-12);
    assert_relative_eq!(after.peak_current, before.peak_current, max_relative = 1e-12);
    // The RMS mean square is still climbing with beta = 0.005
    assert!(after.rms_current > before.rms_current);
}

#[test]
fn test_power_is_product_of_magnitudes() {
    let (mut circuit, s, r) = source_with_load(ComponentKind::Battery(Battery::new(-6.0)), 100.0);
    let sim = Simulator::new();
    for _ in 0..40 {
        sim.solve(&mut circuit, 1e-3, 0.0).unwrap();
    }
    for id in [s, r] {
        let t = circuit.component(id).unwrap().telemetry;
        assert!(t.power > 0.0);
        assert_relative_eq!(t.power, t.voltage.abs() * t.current.abs(), max_relative = 1e-12);
    }
}

#[test]
fn test_sine_rms_and_peak() {
    let amplitude = 10.0;
    let (mut circuit, _, r) = source_with_load(
        ComponentKind::AcSource(AcSource::new(amplitude, 50.0)),
        1000.0,
    );
    let mut sim = Simulator::new();
    // 4 s at 1 kHz: the RMS filter (beta = 0.005) has long settled
    for _ in 0..4000 {
        sim.step(&mut circuit, 1e-3).unwrap();
    }

    let t = circuit.component(r).unwrap().telemetry;
    assert_relative_eq!(t.rms_voltage, amplitude / 2f64.sqrt(), max_relative = 0.02);
    assert!(t.peak_voltage <= amplitude * (1.0 + 1e-6));
    assert!(t.peak_voltage > 0.95 * amplitude);
}

#[test]
fn test_wires_carry_the_loop_current() {
    let (mut circuit, _, r) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    let sim = Simulator::new();
    for _ in 0..200 {
        sim.solve(&mut circuit, 1e-3, 0.0).unwrap();
    }
    let resistor = circuit.component(r).unwrap().telemetry.current;
    for wire in circuit.wires() {
        assert_relative_eq!(wire.telemetry.current.abs(), resistor, max_relative = 1e-6);
        // 0.1 mΩ each
        assert_relative_eq!(wire.telemetry.voltage.abs(), resistor * 1e-4, max_relative = 1e-6);
    }
}

#[test]
fn test_custom_smoothing_is_applied() {
    let (mut circuit, _, r) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    let sim = Simulator::with_config(SolverConfig::new().with_smoothing(1.0, 1.0));
    sim.solve(&mut circuit, 1e-3, 0.0).unwrap();

    let target = 9.0 / (1000.0 + 2e-4);
    assert_relative_eq!(circuit.component(r).unwrap().telemetry.current, target, max_relative = 1e-6);
    assert_relative_eq!(circuit.wires()[0].telemetry.current.abs(), target, max_relative = 1e-6);
}

#[test]
fn test_reset_clears_everything() {
    let (mut circuit, _, _) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    let mut sim = Simulator::new();
    for _ in 0..10 {
        sim.step(&mut circuit, 1e-3).unwrap();
    }
    sim.reset(&mut circuit);

    assert_eq!(sim.time(), 0.0);
    assert!(circuit.components().iter().all(|c| c.telemetry == Telemetry::default()));
    assert!(circuit.wires().iter().all(|w| w.telemetry == Telemetry::default()));
}

#[test]
fn test_removed_component_takes_its_wires() {
    let (mut circuit, _, r) = source_with_load(ComponentKind::Battery(Battery::new(9.0)), 1000.0);
    circuit.remove_component(r).unwrap();
    assert!(circuit.wires().is_empty());

    // The lone battery still solves: its ports only see each other
    Simulator::new().solve(&mut circuit, 1e-3, 0.0).unwrap();
}
