//! Linear passive components: Resistor, Lamp, Capacitor, Inductor.

use crate::solver::MnaMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest resistance accepted before stamping, to avoid infinite conductance.
const MIN_RESISTANCE: f64 = 1e-12;

/// 1/R with R clamped to at least [`MIN_RESISTANCE`].
///
/// NaN is passed through so the solve reports it as divergence.
fn clamped_conductance(resistance: f64) -> f64 {
    let r = if resistance < MIN_RESISTANCE {
        MIN_RESISTANCE
    } else {
        resistance
    };
    1.0 / r
}

/// A resistor component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resistor {
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self { resistance }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        clamped_conductance(self.resistance)
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize) {
        matrix.stamp_conductance(n1, n2, self.conductance());
    }
}

/// An incandescent lamp, modeled as a fixed (hot) filament resistance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lamp {
    pub resistance: f64,
    /// Power at which the lamp is drawn at full brightness
    pub rated_power: f64,
}

impl Default for Lamp {
    fn default() -> Self {
        // 6 V / 0.5 W bulb
        Self::new(72.0, 0.5)
    }
}

impl Lamp {
    pub fn new(resistance: f64, rated_power: f64) -> Self {
        Self {
            resistance,
            rated_power,
        }
    }

    pub fn conductance(&self) -> f64 {
        clamped_conductance(self.resistance)
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize) {
        matrix.stamp_conductance(n1, n2, self.conductance());
    }

    /// Brightness in 0..=1 for a dissipated power.
    pub fn brightness(&self, power: f64) -> f64 {
        if self.rated_power <= 0.0 {
            return 0.0;
        }
        (power / self.rated_power).clamp(0.0, 1.0)
    }
}

/// A capacitor component.
///
/// In discrete-time simulation, a capacitor is modeled using a companion model.
/// Using backward Euler:
///   i(t) = (C/dt) * (v(t) - v(t-dt))
///
/// This gives an equivalent conductance G_eq = C/dt in parallel with a
/// current source I_eq = -G_eq * v(t-dt).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capacitor {
    pub capacitance: f64,
    /// Electrolytic part with a marked positive lead (port 0)
    pub polarized: bool,
    /// Voltage across the capacitor at the end of the previous tick
    pub stored_voltage: f64,
}

impl Capacitor {
    /// Parallel leakage conductance keeping an isolated plate solvable.
    pub const LEAK_CONDUCTANCE: f64 = 1e-12;

    /// Create a new (uncharged) capacitor.
    pub fn new(capacitance: f64) -> Self {
        Self {
            capacitance,
            polarized: false,
            stored_voltage: 0.0,
        }
    }

    /// Create a new (uncharged) electrolytic capacitor.
    pub fn polarized(capacitance: f64) -> Self {
        Self {
            polarized: true,
            ..Self::new(capacitance)
        }
    }

    /// Get the equivalent conductance for the backward Euler companion model.
    pub fn conductance(&self, dt: f64) -> f64 {
        self.capacitance / dt
    }

    /// Get the equivalent current source value for the companion model.
    pub fn current_source(&self, dt: f64) -> f64 {
        -self.conductance(dt) * self.stored_voltage
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize, dt: f64) {
        matrix.stamp_conductance(n1, n2, self.conductance(dt));
        matrix.stamp_current_source(n1, n2, self.current_source(dt));
        matrix.stamp_conductance(n1, n2, Self::LEAK_CONDUCTANCE);
    }

    /// Current through the capacitor for a newly solved voltage.
    pub fn current(&self, v: f64, dt: f64) -> f64 {
        self.conductance(dt) * (v - self.stored_voltage)
    }

    /// Update the state after solving.
    pub fn update_state(&mut self, v_new: f64) {
        self.stored_voltage = v_new;
    }

    /// Whether a polarized part is currently charged backwards.
    pub fn is_reverse_biased(&self) -> bool {
        self.polarized && self.stored_voltage < 0.0
    }
}

/// An inductor component.
///
/// Backward Euler with a series winding resistance R_s:
///   v(t) = R_s * i(t) + (L/dt) * (i(t) - i(t-dt))
///
/// Rearranged into a Norton companion:
///   i(t) = G_eq * v(t) + G_eq * (L/dt) * i(t-dt),   G_eq = 1 / (R_s + L/dt)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inductor {
    pub inductance: f64,
    /// Equivalent series (winding) resistance
    pub series_resistance: f64,
    /// Current through the inductor at the end of the previous tick
    pub stored_current: f64,
}

impl Inductor {
    /// Winding resistance used when none is given.
    pub const DEFAULT_ESR: f64 = 0.01;

    /// Create a new (de-energized) inductor.
    pub fn new(inductance: f64) -> Self {
        Self::with_esr(inductance, Self::DEFAULT_ESR)
    }

    pub fn with_esr(inductance: f64, series_resistance: f64) -> Self {
        Self {
            inductance,
            series_resistance,
            stored_current: 0.0,
        }
    }

    /// Get the equivalent conductance for the companion model.
    pub fn conductance(&self, dt: f64) -> f64 {
        1.0 / (self.series_resistance + self.inductance / dt)
    }

    /// Get the equivalent current source value for the companion model.
    pub fn current_source(&self, dt: f64) -> f64 {
        self.stored_current * (self.inductance / dt) * self.conductance(dt)
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n1: usize, n2: usize, dt: f64) {
        matrix.stamp_conductance(n1, n2, self.conductance(dt));
        matrix.stamp_current_source(n1, n2, self.current_source(dt));
    }

    /// Current through the inductor for a newly solved voltage.
    pub fn current(&self, v: f64, dt: f64) -> f64 {
        self.conductance(dt) * v + self.current_source(dt)
    }

    /// Update the state after solving.
    pub fn update_state(&mut self, i_new: f64) {
        self.stored_current = i_new;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new(1000.0);
        assert_relative_eq!(r.conductance(), 0.001);

        // Zero resistance is clamped instead of producing infinity
        assert!(Resistor::new(0.0).conductance().is_finite());
    }

    #[test]
    fn test_nan_resistance_is_not_clamped() {
        assert!(Resistor::new(f64::NAN).conductance().is_nan());
        assert!(Lamp::new(f64::NAN, 0.5).conductance().is_nan());
        assert_relative_eq!(Lamp::new(0.0, 0.5).conductance(), 1.0 / MIN_RESISTANCE);
    }

    #[test]
    fn test_capacitor_companion_model() {
        let mut c = Capacitor::new(1e-6);
        let dt = 1e-3;

        // G_eq = C/dt = 1 mS
        assert_relative_eq!(c.conductance(dt), 1e-3);

        // Initial current source should be 0
        assert_eq!(c.current_source(dt), 0.0);

        // Charged to 2 V: history source pushes -G * 2 V
        c.update_state(2.0);
        assert_relative_eq!(c.current_source(dt), -2e-3);
        // Holding the same voltage draws no current
        assert_eq!(c.current(2.0, dt), 0.0);
    }

    #[test]
    fn test_capacitor_stamp_includes_leak() {
        let c = Capacitor::new(1e-6);
        let mut m = MnaMatrix::new(2);
        c.stamp(&mut m, 0, 1, 1e-3);
        assert_relative_eq!(m.get(0, 0), 1e-3 + Capacitor::LEAK_CONDUCTANCE);
        assert_relative_eq!(m.get(1, 0), -(1e-3 + Capacitor::LEAK_CONDUCTANCE));
    }

    #[test]
    fn test_polarized_reverse_bias() {
        let mut c = Capacitor::polarized(100e-6);
        c.update_state(-1.0);
        assert!(c.is_reverse_biased());

        let mut plain = Capacitor::new(100e-6);
        plain.update_state(-1.0);
        assert!(!plain.is_reverse_biased());
    }

    #[test]
    fn test_inductor_companion_model() {
        let mut l = Inductor::with_esr(1e-3, 1.0);
        let dt = 1e-3;
        // L/dt = 1 ohm, so G_eq = 1 / (1 + 1) = 0.5 S
        assert_relative_eq!(l.conductance(dt), 0.5);
        assert_eq!(l.current_source(dt), 0.0);

        l.update_state(2.0);
        // 2 A * 1 ohm * 0.5 S = 1 A carried over
        assert_relative_eq!(l.current_source(dt), 1.0);
        assert_relative_eq!(l.current(0.0, dt), 1.0);
    }

    #[test]
    fn test_lamp_brightness() {
        let lamp = Lamp::new(10.0, 2.0);
        assert_relative_eq!(lamp.brightness(1.0), 0.5);
        assert_relative_eq!(lamp.brightness(10.0), 1.0);
        assert_eq!(lamp.brightness(-1.0), 0.0);
    }
}
