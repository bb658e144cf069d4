//! # Voltaic Core
//!
//! A time-stepped circuit solver for interactive breadboard-style editors.
//!
//! This library provides:
//! - Modified Nodal Analysis (MNA) assembly from an arbitrary topology
//! - Backward Euler companion models for capacitors and inductors
//! - Piecewise-linear diodes and LEDs settled by fixed-point iteration
//! - Per-component and per-wire telemetry (voltage, current, power, RMS, peak)
//!
//! ## Architecture
//!
//! - [`circuit`] - Components, wires, and the port-to-unknown index map
//! - [`components`] - Component models, their stamps, and telemetry
//! - [`solver`] - Dense MNA matrix, Picard iteration, and the simulator
//!
//! ## Usage
//!
//! ```
//! use voltaic_core::{components::{Battery, ComponentKind, Resistor}, Circuit, Simulator};
//!
//! let mut circuit = Circuit::new();
//! let b = circuit.add(ComponentKind::Battery(Battery::new(9.0)))?;
//! let r = circuit.add(ComponentKind::Resistor(Resistor::new(1000.0)))?;
//! circuit.connect((b, 0), (r, 0))?;
//! circuit.connect((r, 1), (b, 1))?;
//!
//! let mut sim = Simulator::new();
//! for _ in 0..60 {
//!     sim.step(&mut circuit, 1.0 / 60.0)?;
//! }
//! let current = circuit.component(r).map(|c| c.telemetry.current);
//! assert!((current.unwrap_or_default() - 0.009).abs() < 1e-5);
//! # Ok::<(), voltaic_core::SimError>(())
//! ```
//!
//! ## Circuit Simulation Method
//!
//! Every port of every component is its own unknown; wires are stamped as
//! 0.1 mΩ resistors between ports instead of merging nodes. For each tick:
//!
//! 1. Map ports and ideal sources to unknowns
//! 2. Stamp all elements into A and z, pin unknown 0 to ground, solve Ax = z
//! 3. Repeat step 2 for a fixed budget, letting diodes re-pick their segment
//!    from the previous result
//! 4. Commit telemetry and reactive state from the final solution
//!
//! A tick that produces a non-finite value is discarded and reported as
//! [`SimError::NumericDivergence`]; the circuit is left untouched.

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Circuit, ComponentId, PortRef, WireId};
pub use error::{Result, SimError};
pub use solver::{Simulator, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuit;

/// Default tick length in seconds (60 ticks per second).
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;
