//! Circuit topology and its mapping onto MNA unknowns.
//!
//! [`Circuit`] holds components and wires in declared order; the editing
//! layer mutates it between ticks. [`NodeMap`] is rebuilt from it at the
//! start of every solve.

mod graph;
mod topology;
mod types;

pub use graph::{Circuit, Wire};
pub use topology::{NodeMap, Terminals};
pub use types::*;
