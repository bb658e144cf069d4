//! Assembly of the whole circuit into an [`MnaMatrix`].

use super::mna::MnaMatrix;
use crate::circuit::{Circuit, NodeMap};

/// Per-tick inputs every stamp may need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampContext {
    /// Time step in seconds
    pub dt: f64,
    /// Absolute simulation time of this tick in seconds
    pub time: f64,
    /// Conductance of one wire
    pub wire_conductance: f64,
}

/// Stamp wires, then components, in declared order.
///
/// Accumulates into `matrix` without clearing it first.
pub fn stamp_circuit(
    circuit: &Circuit,
    map: &NodeMap,
    estimate: &[f64],
    ctx: &StampContext,
    matrix: &mut MnaMatrix,
) {
    for idx in 0..circuit.wires().len() {
        let (a, b) = map.wire_ends(idx);
        matrix.stamp_conductance(a, b, ctx.wire_conductance);
    }

    for (idx, component) in circuit.components().iter().enumerate() {
        component.stamp(matrix, map.terminals(idx), estimate, ctx);
    }
}
