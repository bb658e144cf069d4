//! Error types for the Voltaic circuit solver.
//!
//! This module provides a unified error type [`SimError`] covering topology
//! edits, topology mapping, and per-tick solving.

use thiserror::Error;

use crate::circuit::ComponentId;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Unified error type for all Voltaic operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    // ============ Topology Errors ============
    /// A wire endpoint names a component or port that does not exist
    #[error("Wire endpoint references missing port {port} of component {component}")]
    DanglingPort { component: ComponentId, port: usize },

    /// Lookup of a component id that is not part of the circuit
    #[error("Component {component} not found in circuit")]
    UnknownComponent { component: ComponentId },

    /// A component with this id is already part of the circuit
    #[error("Duplicate component id {component}")]
    DuplicateComponent { component: ComponentId },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component {component}: {message}")]
    InvalidParameter {
        component: ComponentId,
        param: String,
        message: String,
    },

    // ============ Simulation Errors ============
    /// A solved unknown came out NaN or infinite; nothing was committed
    #[error("Numeric divergence at iteration {iteration} (unknown {unknown} is not finite)")]
    NumericDivergence { iteration: usize, unknown: usize },

    /// Time step must be finite and strictly positive
    #[error("Invalid time step {dt} s (must be finite and positive)")]
    InvalidTimeStep { dt: f64 },
}

impl SimError {
    /// Create a dangling port error
    pub fn dangling_port(component: ComponentId, port: usize) -> Self {
        Self::DanglingPort { component, port }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: ComponentId,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component,
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a numeric divergence error
    pub fn divergence(iteration: usize, unknown: usize) -> Self {
        Self::NumericDivergence { iteration, unknown }
    }

    /// Whether the caller may retry the tick (e.g. after shrinking dt).
    pub fn is_divergence(&self) -> bool {
        matches!(self, Self::NumericDivergence { .. })
    }
}
