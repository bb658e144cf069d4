//! Ideal voltage sources: Battery and AC source.
//!
//! Voltage sources require an extra row/column in the MNA matrix for the
//! branch current. The source enforces: V+ - V- = V_source

use std::f64::consts::TAU;

use crate::solver::MnaMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ideal DC cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Battery {
    pub voltage: f64,
}

impl Battery {
    pub fn new(voltage: f64) -> Self {
        Self { voltage }
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n_pos: usize, n_neg: usize, br: usize) {
        matrix.stamp_voltage_source(n_pos, n_neg, br, self.voltage);
    }
}

/// An ideal sinusoidal source: v(t) = amplitude * sin(2*pi*frequency*t).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcSource {
    /// Peak voltage
    pub amplitude: f64,
    /// Frequency in Hz
    pub frequency: f64,
}

impl AcSource {
    pub fn new(amplitude: f64, frequency: f64) -> Self {
        Self {
            amplitude,
            frequency,
        }
    }

    /// Source voltage at absolute simulation time `t` (seconds).
    pub fn voltage_at(&self, t: f64) -> f64 {
        self.amplitude * (TAU * self.frequency * t).sin()
    }

    pub fn stamp(&self, matrix: &mut MnaMatrix, n_pos: usize, n_neg: usize, br: usize, t: f64) {
        matrix.stamp_voltage_source(n_pos, n_neg, br, self.voltage_at(t));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ac_waveform() {
        let ac = AcSource::new(10.0, 50.0);
        assert_abs_diff_eq!(ac.voltage_at(0.0), 0.0);
        // Quarter period of 50 Hz is 5 ms
        assert_abs_diff_eq!(ac.voltage_at(0.005), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ac.voltage_at(0.015), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_battery_constraint_row() {
        let b = Battery::new(9.0);
        let mut m = MnaMatrix::new(3);
        b.stamp(&mut m, 0, 1, 2);
        assert_eq!(m.get(2, 0), 1.0);
        assert_eq!(m.get(2, 1), -1.0);
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(1, 2), -1.0);
        assert_eq!(m.z[2], 9.0);
    }
}
