//! Core types for circuit representation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unique identifier for a component, assigned by the editing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A unique identifier for a wire, assigned by the editing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireId(pub usize);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// One terminal of a component.
///
/// Two-terminal parts use port 0 as the positive / anode side and port 1 as
/// the negative / cathode side. A junction has only port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortRef {
    pub component: ComponentId,
    pub port: usize,
}

impl PortRef {
    /// Create a port reference.
    pub fn new(component: ComponentId, port: usize) -> Self {
        Self { component, port }
    }

    /// Port 0 of a component.
    pub fn positive(component: ComponentId) -> Self {
        Self::new(component, 0)
    }

    /// Port 1 of a component.
    pub fn negative(component: ComponentId) -> Self {
        Self::new(component, 1)
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.port)
    }
}

impl From<(ComponentId, usize)> for PortRef {
    fn from((component, port): (ComponentId, usize)) -> Self {
        Self::new(component, port)
    }
}
