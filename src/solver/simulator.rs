//! Main simulator interface.

use super::picard::PicardIteration;
use super::stamp::StampContext;
use super::{
    COMPONENT_SMOOTHING, DEFAULT_ITERATIONS, MIN_CONDUCTANCE, PEAK_DECAY, PIVOT_THRESHOLD,
    RMS_WEIGHT, WIRE_RESISTANCE, WIRE_SMOOTHING,
};
use crate::circuit::{Circuit, NodeMap, PortRef};
use crate::components::{ComponentKind, TelemetryFilter};
use crate::error::{Result, SimError};

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Picard iterations per tick.
    pub iterations: usize,
    /// Optional early exit once successive estimates agree (volts/amps).
    pub early_exit_tolerance: Option<f64>,
    /// Pivot magnitude below which a column is a free variable.
    pub pivot_threshold: f64,
    /// Conductance added to every diagonal entry.
    pub gmin: f64,
    /// Resistance each wire is stamped with (ohms).
    pub wire_resistance: f64,
    /// Weight of a new current sample for components.
    pub component_smoothing: f64,
    /// Weight of a new current sample for wires.
    pub wire_smoothing: f64,
    /// Per-tick multiplier on held peaks.
    pub peak_decay: f64,
    /// Weight of a new squared sample in the RMS mean square.
    pub rms_weight: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            early_exit_tolerance: None,
            pivot_threshold: PIVOT_THRESHOLD,
            gmin: MIN_CONDUCTANCE,
            wire_resistance: WIRE_RESISTANCE,
            component_smoothing: COMPONENT_SMOOTHING,
            wire_smoothing: WIRE_SMOOTHING,
            peak_decay: PEAK_DECAY,
            rms_weight: RMS_WEIGHT,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Picard iteration budget (at least one pass always runs).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Stop iterating once successive solutions differ by less than `tolerance`.
    ///
    /// Faster for circuits that settle quickly, but results are no longer
    /// bit-identical to spending the whole budget.
    pub fn with_early_exit(mut self, tolerance: f64) -> Self {
        self.early_exit_tolerance = Some(tolerance);
        self
    }

    pub fn with_wire_resistance(mut self, ohms: f64) -> Self {
        self.wire_resistance = ohms;
        self
    }

    pub fn with_gmin(mut self, gmin: f64) -> Self {
        self.gmin = gmin;
        self
    }

    pub fn with_pivot_threshold(mut self, threshold: f64) -> Self {
        self.pivot_threshold = threshold;
        self
    }

    /// Set the current smoothing weights for components and wires.
    pub fn with_smoothing(mut self, component: f64, wire: f64) -> Self {
        self.component_smoothing = component;
        self.wire_smoothing = wire;
        self
    }

    pub fn with_peak_decay(mut self, decay: f64) -> Self {
        self.peak_decay = decay;
        self
    }

    pub fn with_rms_weight(mut self, weight: f64) -> Self {
        self.rms_weight = weight;
        self
    }

    fn component_filter(&self) -> TelemetryFilter {
        TelemetryFilter {
            smoothing: self.component_smoothing,
            peak_decay: self.peak_decay,
            rms_weight: self.rms_weight,
        }
    }

    fn wire_filter(&self) -> TelemetryFilter {
        TelemetryFilter {
            smoothing: self.wire_smoothing,
            ..self.component_filter()
        }
    }
}

/// The committed solution of one tick.
#[derive(Debug, Clone)]
pub struct Solution {
    map: NodeMap,
    values: Vec<f64>,
}

impl Solution {
    /// Raw unknown vector: port voltages, then source branch currents.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Index map the solution was computed with.
    pub fn node_map(&self) -> &NodeMap {
        &self.map
    }

    /// Voltage of a port relative to the ground port.
    pub fn voltage(&self, port: impl Into<PortRef>) -> Option<f64> {
        self.map.port_index(port.into()).map(|i| self.values[i])
    }
}

/// The circuit simulator.
///
/// Holds no circuit of its own: every call borrows the host's [`Circuit`]
/// exclusively for its whole duration, so topology and persisted state
/// cannot change mid-solve and calls are strictly sequential.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SolverConfig,
    /// Absolute time of the last committed [`Simulator::step`]
    time: f64,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create a new simulator with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config, time: 0.0 }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Absolute time reached by [`Simulator::step`].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Solve one tick at absolute time `sim_time` and commit telemetry.
    ///
    /// On error nothing in `circuit` is modified.
    pub fn solve(&self, circuit: &mut Circuit, dt: f64, sim_time: f64) -> Result<()> {
        self.solve_snapshot(circuit, dt, sim_time).map(|_| ())
    }

    /// Like [`Simulator::solve`], also returning the committed solution.
    pub fn solve_snapshot(&self, circuit: &mut Circuit, dt: f64, sim_time: f64) -> Result<Solution> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimeStep { dt });
        }

        let map = NodeMap::build(circuit)?;
        let _span = tracing::debug_span!("solve", unknowns = map.size(), dt, time = sim_time).entered();

        let ctx = StampContext {
            dt,
            time: sim_time,
            wire_conductance: 1.0 / self.config.wire_resistance,
        };
        let values = PicardIteration::from_config(&self.config)
            .run(circuit, &map, &ctx)
            .map_err(|e| {
                tracing::warn!(error = %e, "discarding diverged tick");
                e
            })?;

        self.commit(circuit, &map, &values, &ctx);
        Ok(Solution { map, values })
    }

    /// Advance the internal clock by `dt` and solve at the new time.
    ///
    /// The clock only moves if the tick succeeds.
    pub fn step(&mut self, circuit: &mut Circuit, dt: f64) -> Result<()> {
        let t = self.time + dt;
        self.solve(circuit, dt, t)?;
        self.time = t;
        Ok(())
    }

    /// Rewind the clock and zero the circuit's telemetry and reactive state.
    pub fn reset(&mut self, circuit: &mut Circuit) {
        self.time = 0.0;
        circuit.reset();
    }

    /// Derive telemetry and reactive state from the final solution.
    fn commit(&self, circuit: &mut Circuit, map: &NodeMap, x: &[f64], ctx: &StampContext) {
        let filter = self.config.component_filter();
        for (idx, component) in circuit.components_mut().iter_mut().enumerate() {
            if matches!(component.kind, ComponentKind::Junction) {
                continue;
            }
            let terminals = map.terminals(idx);
            let v = x[terminals.pos] - x[terminals.neg];
            let i = component.branch_current(v, terminals, x, ctx.dt);
            component.update_state(v, i);
            component.telemetry.record(v, i, &filter);
        }

        let filter = self.config.wire_filter();
        for (idx, wire) in circuit.wires_mut().iter_mut().enumerate() {
            let (a, b) = map.wire_ends(idx);
            let v = x[a] - x[b];
            wire.telemetry.record(v, v * ctx.wire_conductance, &filter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Battery, Capacitor, Resistor, Telemetry};
    use approx::assert_relative_eq;

    fn battery_resistor() -> Circuit {
        let mut c = Circuit::new();
        let b = c.add(ComponentKind::Battery(Battery::new(9.0))).unwrap();
        let r = c.add(ComponentKind::Resistor(Resistor::new(1000.0))).unwrap();
        c.connect((b, 0), (r, 0)).unwrap();
        c.connect((r, 1), (b, 1)).unwrap();
        c
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let mut c = battery_resistor();
        let sim = Simulator::new();
        for dt in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sim.solve(&mut c, dt, 0.0),
                Err(SimError::InvalidTimeStep { .. })
            ));
        }
        assert_eq!(c.components()[1].telemetry, Telemetry::default());
    }

    #[test]
    fn test_first_tick_is_half_smoothed() {
        let mut c = battery_resistor();
        Simulator::new().solve(&mut c, 1e-3, 0.0).unwrap();
        let t = c.components()[1].telemetry;
        assert_relative_eq!(t.voltage, 9.0, max_relative = 1e-6);
        // alpha = 0.5 from zero
        assert_relative_eq!(t.current, 0.0045, max_relative = 1e-6);
    }

    #[test]
    fn test_battery_reports_sourced_current() {
        let mut c = battery_resistor();
        let sim = Simulator::new();
        for _ in 0..40 {
            sim.solve(&mut c, 1e-3, 0.0).unwrap();
        }
        let battery = c.components()[0].telemetry;
        assert_relative_eq!(battery.current, 0.009, max_relative = 1e-3);
        assert_relative_eq!(battery.power, 0.081, max_relative = 1e-3);
    }

    #[test]
    fn test_wires_use_heavier_smoothing() {
        let mut c = battery_resistor();
        Simulator::new().solve(&mut c, 1e-3, 0.0).unwrap();
        let wire = c.wires()[0].telemetry;
        assert_relative_eq!(wire.current, 0.2 * 0.009, max_relative = 1e-3);
    }

    #[test]
    fn test_capacitor_state_is_committed() {
        let mut c = Circuit::new();
        let b = c.add(ComponentKind::Battery(Battery::new(1.0))).unwrap();
        let cap = c.add(ComponentKind::Capacitor(Capacitor::new(1e-3))).unwrap();
        c.connect((b, 0), (cap, 0)).unwrap();
        c.connect((cap, 1), (b, 1)).unwrap();

        Simulator::new().solve(&mut c, 1e-3, 0.0).unwrap();
        match &c.components()[1].kind {
            // Shorted straight across the battery: fully charged in one step
            ComponentKind::Capacitor(cap) => assert_relative_eq!(cap.stored_voltage, 1.0, max_relative = 1e-3),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_step_advances_clock_only_on_success() {
        let mut c = battery_resistor();
        let mut sim = Simulator::new();
        sim.step(&mut c, 1e-3).unwrap();
        sim.step(&mut c, 1e-3).unwrap();
        assert_relative_eq!(sim.time(), 2e-3);

        if let ComponentKind::Battery(b) = &mut c.components_mut()[0].kind {
            b.voltage = f64::INFINITY;
        }
        assert!(sim.step(&mut c, 1e-3).is_err());
        assert_relative_eq!(sim.time(), 2e-3);

        sim.reset(&mut c);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_snapshot_exposes_port_voltages() {
        let mut c = battery_resistor();
        let b = c.components()[0].id;
        let solution = Simulator::new().solve_snapshot(&mut c, 1e-3, 0.0).unwrap();
        assert_eq!(solution.voltage((b, 0)), Some(0.0));
        assert_relative_eq!(solution.voltage((b, 1)).unwrap(), -9.0, max_relative = 1e-9);
        assert_eq!(solution.values().len(), solution.node_map().size());
    }
}
