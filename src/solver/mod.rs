//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for circuit simulation.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains port voltages and source branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (one row per component port)
//! - B, C connect voltage sources to ports
//! - D is 0 (ideal voltage sources)
//! - v is the vector of port voltages
//! - j is the vector of voltage source currents
//! - i is the sum of companion current sources into each port
//! - e is the vector of voltage source values
//!
//! ## One tick
//!
//! Each call rebuilds the index map, then runs a fixed number of Picard
//! iterations (stamp everything, solve, let diodes pick their segment from
//! the result) and finally commits telemetry from the last solution.

mod mna;
mod picard;
mod simulator;
mod stamp;

pub use mna::MnaMatrix;
pub use picard::PicardIteration;
pub use simulator::{Simulator, Solution, SolverConfig};
pub use stamp::{stamp_circuit, StampContext};

/// Picard iterations per tick.
pub const DEFAULT_ITERATIONS: usize = 50;

/// Conductance added to every diagonal entry to prevent a singular matrix.
pub const MIN_CONDUCTANCE: f64 = 1e-12;

/// Pivots smaller than this mark a free variable.
pub const PIVOT_THRESHOLD: f64 = 1e-20;

/// Resistance a wire is stamped with.
pub const WIRE_RESISTANCE: f64 = 1e-4;

/// Weight of a new current sample in component telemetry.
pub const COMPONENT_SMOOTHING: f64 = 0.5;

/// Weight of a new current sample in wire telemetry.
pub const WIRE_SMOOTHING: f64 = 0.2;

/// Per-tick decay of held peak values.
pub const PEAK_DECAY: f64 = 0.999;

/// Weight of a new squared sample in the RMS mean square.
pub const RMS_WEIGHT: f64 = 0.005;
