//! Mapping from component ports to unknowns of the MNA system.
//!
//! Every `(component, port)` pair gets its own voltage unknown; a junction
//! contributes its single port. Wires are not merged into shared nodes:
//! each is stamped as a small resistor between its two endpoints, so no
//! union-find pass is needed and every wire keeps a measurable current.
//! One branch-current unknown per ideal source follows all port unknowns.
//!
//! Unknown 0 is the ground reference: the circuit's explicit ground port
//! when one is set, otherwise port 0 of the first component.

use std::collections::HashMap;

use super::graph::Circuit;
use super::types::PortRef;
use crate::error::{Result, SimError};

/// Unknown indices for one component.
///
/// A junction reports its single port as both `pos` and `neg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminals {
    pub pos: usize,
    pub neg: usize,
    /// Branch-current unknown for ideal sources
    pub branch: Option<usize>,
}

/// Index map for one topology snapshot.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    ports: HashMap<PortRef, usize>,
    /// Per component, in declared order
    terminals: Vec<Terminals>,
    /// Per wire, in declared order
    wire_ends: Vec<(usize, usize)>,
    num_ports: usize,
    num_branches: usize,
}

impl NodeMap {
    /// Assign unknowns for the circuit's current topology.
    ///
    /// Fails with [`SimError::DanglingPort`] if the ground port or a wire
    /// endpoint names a port that does not exist.
    pub fn build(circuit: &Circuit) -> Result<Self> {
        let mut ports = HashMap::new();
        let mut next = 0usize;

        if let Some(ground) = circuit.ground() {
            let exists = circuit
                .component(ground.component)
                .is_some_and(|c| ground.port < c.port_count());
            if !exists {
                return Err(SimError::dangling_port(ground.component, ground.port));
            }
            ports.insert(ground, 0);
            next = 1;
        }

        for component in circuit.components() {
            for port in 0..component.port_count() {
                ports
                    .entry(PortRef::new(component.id, port))
                    .or_insert_with(|| {
                        let idx = next;
                        next += 1;
                        idx
                    });
            }
        }
        let num_ports = next;

        let mut num_branches = 0usize;
        let mut terminals = Vec::with_capacity(circuit.components().len());
        for component in circuit.components() {
            let pos = ports[&PortRef::positive(component.id)];
            let neg = if component.port_count() > 1 {
                ports[&PortRef::negative(component.id)]
            } else {
                pos
            };
            let branch = if component.has_branch() {
                num_branches += 1;
                Some(num_ports + num_branches - 1)
            } else {
                None
            };
            terminals.push(Terminals { pos, neg, branch });
        }

        let lookup = |port: PortRef| {
            ports
                .get(&port)
                .copied()
                .ok_or_else(|| SimError::dangling_port(port.component, port.port))
        };
        let wire_ends = circuit
            .wires()
            .iter()
            .map(|w| Ok((lookup(w.a)?, lookup(w.b)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ports,
            terminals,
            wire_ends,
            num_ports,
            num_branches,
        })
    }

    /// Total number of unknowns (ports + voltage sources).
    pub fn size(&self) -> usize {
        self.num_ports + self.num_branches
    }

    pub fn num_ports(&self) -> usize {
        self.num_ports
    }

    pub fn num_branches(&self) -> usize {
        self.num_branches
    }

    /// Unknown index of a port.
    pub fn port_index(&self, port: PortRef) -> Option<usize> {
        self.ports.get(&port).copied()
    }

    /// Unknowns of the component at `index` in declared order.
    pub fn terminals(&self, index: usize) -> Terminals {
        self.terminals[index]
    }

    /// Unknowns of both ends of the wire at `index` in declared order.
    pub fn wire_ends(&self, index: usize) -> (usize, usize) {
        self.wire_ends[index]
    }
}
