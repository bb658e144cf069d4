//! Control components: Switch and PushButton.
//!
//! Both are resistances rather than a change in topology, so opening or
//! closing them never changes the size of the system.

use crate::solver::MnaMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resistance of closed contacts.
pub const R_CLOSED: f64 = 0.001;
/// Resistance of open contacts.
pub const R_OPEN: f64 = 1e12;

fn contact_conductance(closed: bool) -> f64 {
    if closed {
        1.0 / R_CLOSED
    } else {
        1.0 / R_OPEN
    }
}

/// A latching switch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Switch {
    pub closed: bool,
}

impl Switch {
    /// Create a new switch.
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    /// Get the current conductance.
    pub fn conductance(&self) -> f64 {
        contact_conductance(self.closed)
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize) {
        matrix.stamp_conductance(n1, n2, self.conductance());
    }

    /// Set the switch state.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

/// A momentary, normally-open push button.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PushButton {
    pub pressed: bool,
}

impl PushButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conductance(&self) -> f64 {
        contact_conductance(self.pressed)
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize) {
        matrix.stamp_conductance(n1, n2, self.conductance());
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_switch_conductance() {
        let mut s = Switch::new(true);
        assert_relative_eq!(s.conductance(), 1000.0);
        s.toggle();
        assert_relative_eq!(s.conductance(), 1e-12);
    }

    #[test]
    fn test_push_button_is_momentary() {
        let mut b = PushButton::new();
        assert!(!b.pressed);
        b.press();
        assert_relative_eq!(b.conductance(), 1000.0);
        b.release();
        assert_relative_eq!(b.conductance(), 1e-12);
    }
}
