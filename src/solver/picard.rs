//! Fixed-point (Picard) iteration for piecewise-linear diodes.
//!
//! Each pass stamps the circuit using the previous pass's solution to pick
//! every diode's segment, then solves the resulting linear system. There is
//! no Jacobian; diodes simply re-read the last estimate.
//!
//! The full budget is always spent and the last pass is the answer. An
//! optional early exit exists but is off by default because it does not
//! reproduce reference output bit for bit.

use super::mna::MnaMatrix;
use super::simulator::SolverConfig;
use super::stamp::{stamp_circuit, StampContext};
use crate::circuit::{Circuit, NodeMap};
use crate::error::{Result, SimError};

/// Picard driver for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PicardIteration {
    /// Passes per tick
    pub iterations: usize,
    /// Stop once successive estimates differ by less than this (max-norm)
    pub early_exit: Option<f64>,
    /// Diagonal conductance added before pinning ground
    pub gmin: f64,
    /// Pivot magnitude below which a column is a free variable
    pub pivot_threshold: f64,
}

impl Default for PicardIteration {
    fn default() -> Self {
        Self::from_config(&SolverConfig::default())
    }
}

impl PicardIteration {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            iterations: config.iterations,
            early_exit: config.early_exit_tolerance,
            gmin: config.gmin,
            pivot_threshold: config.pivot_threshold,
        }
    }

    /// Run the iteration and return the final solution vector.
    ///
    /// Returns [`SimError::NumericDivergence`] as soon as any pass produces a
    /// non-finite unknown; nothing of that pass is kept.
    pub fn run(&self, circuit: &Circuit, map: &NodeMap, ctx: &StampContext) -> Result<Vec<f64>> {
        let n = map.size();
        let mut matrix = MnaMatrix::new(n);
        let mut estimate = vec![0.0; n];

        // Without diodes every pass assembles the same system, so one pass
        // gives the identical result.
        let budget = if circuit.components().iter().any(|c| c.is_nonlinear()) {
            self.iterations.max(1)
        } else {
            tracing::debug!("linear circuit, single pass");
            1
        };

        for iter in 0..budget {
            matrix.clear();
            stamp_circuit(circuit, map, &estimate, ctx, &mut matrix);
            matrix.normalize_ground(self.gmin);

            let x = matrix.solve(self.pivot_threshold);
            if let Some(unknown) = x.iter().position(|v| !v.is_finite()) {
                return Err(SimError::divergence(iter, unknown));
            }

            let change = x
                .iter()
                .zip(&estimate)
                .fold(0.0f64, |acc, (new, old)| acc.max((new - old).abs()));
            tracing::trace!(iter, change, "picard pass");
            estimate = x;

            if let Some(tolerance) = self.early_exit {
                if change < tolerance {
                    tracing::debug!(iterations = iter + 1, "picard settled early");
                    break;
                }
            }
        }

        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PortRef;
    use crate::components::{Battery, ComponentKind, Diode, Resistor};
    use approx::assert_relative_eq;

    fn ctx() -> StampContext {
        StampContext {
            dt: 1e-3,
            time: 0.0,
            wire_conductance: 1e4,
        }
    }

    /// Battery -> resistor -> diode -> back to battery.
    fn diode_loop(volts: f64) -> Circuit {
        let mut c = Circuit::new();
        let b = c.add(ComponentKind::Battery(Battery::new(volts))).unwrap();
        let r = c.add(ComponentKind::Resistor(Resistor::new(100.0))).unwrap();
        let d = c.add(ComponentKind::Diode(Diode::silicon())).unwrap();
        c.connect((b, 0), (r, 0)).unwrap();
        c.connect((r, 1), (d, 0)).unwrap();
        c.connect((d, 1), (b, 1)).unwrap();
        c
    }

    #[test]
    fn test_forward_biased_diode_settles() {
        let c = diode_loop(5.0);
        let map = NodeMap::build(&c).unwrap();
        let x = PicardIteration::default().run(&c, &map, &ctx()).unwrap();

        let d = c.components()[2].id;
        let vd = x[map.port_index(PortRef::new(d, 0)).unwrap()]
            - x[map.port_index(PortRef::new(d, 1)).unwrap()];
        // (5 - 0.7) / (100 + 0.1 + 3 wires) through the diode
        let i = (5.0 - 0.7) / (100.0 + 0.1 + 3e-4);
        assert_relative_eq!(vd, 0.7 + i * 0.1, max_relative = 1e-6);
    }

    #[test]
    fn test_reverse_biased_diode_blocks() {
        let c = diode_loop(-5.0);
        let map = NodeMap::build(&c).unwrap();
        let x = PicardIteration::default().run(&c, &map, &ctx()).unwrap();

        let b = map.terminals(0).branch.unwrap();
        assert!(x[b].abs() < 1e-9);
    }

    #[test]
    fn test_ground_is_exactly_zero() {
        let c = diode_loop(5.0);
        let map = NodeMap::build(&c).unwrap();
        let x = PicardIteration::default().run(&c, &map, &ctx()).unwrap();
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn test_non_finite_source_diverges() {
        let mut c = diode_loop(5.0);
        if let ComponentKind::Battery(b) = &mut c.components_mut()[0].kind {
            b.voltage = f64::NAN;
        }
        let map = NodeMap::build(&c).unwrap();
        let err = PicardIteration::default().run(&c, &map, &ctx()).unwrap_err();
        assert!(err.is_divergence());
        assert!(matches!(err, SimError::NumericDivergence { iteration: 0, .. }));
    }

    #[test]
    fn test_early_exit_matches_full_budget() {
        let c = diode_loop(5.0);
        let map = NodeMap::build(&c).unwrap();
        let full = PicardIteration::default().run(&c, &map, &ctx()).unwrap();
        let quick = PicardIteration {
            early_exit: Some(1e-12),
            ..PicardIteration::default()
        }
        .run(&c, &map, &ctx())
        .unwrap();
        for (a, b) in full.iter().zip(&quick) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}
