//! Piecewise-linear diode and LED models.
//!
//! A diode is one of three straight-line segments depending on the voltage
//! across it (anode minus cathode):
//!
//! ```text
//!   forward    Vd >  Vf          i = (Vd - Vf) / R_on
//!   breakdown  Vd < -Vz (zener)  i = (Vd + Vz) / R_on
//!   blocking   otherwise         i = Vd * G_off
//! ```
//!
//! The segment is chosen from the previous iteration's solution, so each
//! stamp is linear: a conductance in parallel with an offset current source.

use crate::solver::MnaMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether the part conducts in reverse above its breakdown voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiodeType {
    #[default]
    Standard,
    Zener,
}

/// Linear segment a diode sits on for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiodeRegion {
    Forward,
    Breakdown,
    Blocking,
}

/// A diode component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diode {
    /// Forward knee voltage (Vf)
    pub forward_voltage: f64,
    pub diode_type: DiodeType,
    /// Reverse breakdown voltage (Vz), only used by zener diodes
    pub zener_voltage: f64,
}

impl Default for Diode {
    fn default() -> Self {
        Self::silicon()
    }
}

impl Diode {
    /// Resistance of a conducting segment.
    pub const ON_RESISTANCE: f64 = 0.1;
    /// Conductance while blocking.
    pub const OFF_CONDUCTANCE: f64 = 1e-12;

    /// Silicon rectifier, 0.7 V knee.
    pub fn silicon() -> Self {
        Self::new(0.7)
    }

    /// Germanium signal diode, 0.3 V knee.
    pub fn germanium() -> Self {
        Self::new(0.3)
    }

    /// Standard diode with the given forward voltage.
    pub fn new(forward_voltage: f64) -> Self {
        Self {
            forward_voltage,
            diode_type: DiodeType::Standard,
            zener_voltage: 5.1,
        }
    }

    /// Zener diode with the given breakdown voltage and a 0.7 V knee.
    pub fn zener(zener_voltage: f64) -> Self {
        Self {
            forward_voltage: 0.7,
            diode_type: DiodeType::Zener,
            zener_voltage,
        }
    }

    /// Pick the segment for a voltage across the diode.
    pub fn region(&self, vd: f64) -> DiodeRegion {
        if vd > self.forward_voltage {
            DiodeRegion::Forward
        } else if self.diode_type == DiodeType::Zener && vd < -self.zener_voltage {
            DiodeRegion::Breakdown
        } else {
            DiodeRegion::Blocking
        }
    }

    /// Linear model of a segment as (G, I_eq) such that I = G * V + I_eq.
    pub fn companion(&self, region: DiodeRegion) -> (f64, f64) {
        let g_on = 1.0 / Self::ON_RESISTANCE;
        match region {
            DiodeRegion::Forward => (g_on, -g_on * self.forward_voltage),
            DiodeRegion::Breakdown => (g_on, g_on * self.zener_voltage),
            DiodeRegion::Blocking => (Self::OFF_CONDUCTANCE, 0.0),
        }
    }

    /// Anode-to-cathode current at a given voltage.
    pub fn current(&self, vd: f64) -> f64 {
        let (g, i_eq) = self.companion(self.region(vd));
        g * vd + i_eq
    }

    /// Stamp the segment selected by `vd`, the voltage from the previous estimate.
    pub fn stamp(&self, matrix: &mut MnaMatrix, anode: usize, cathode: usize, vd: f64) {
        let (g, i_eq) = self.companion(self.region(vd));
        matrix.stamp_conductance(anode, cathode, g);
        matrix.stamp_current_source(anode, cathode, i_eq);
    }
}

/// Common LED colours and their forward voltages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LedColor {
    #[default]
    Red,
    Yellow,
    Green,
    Blue,
    White,
}

impl LedColor {
    /// Typical forward voltage for the colour.
    pub fn forward_voltage(self) -> f64 {
        match self {
            LedColor::Red => 1.8,
            LedColor::Yellow => 2.0,
            LedColor::Green => 2.2,
            LedColor::Blue => 3.3,
            LedColor::White => 3.2,
        }
    }
}

/// A light-emitting diode. Electrically a standard diode with a higher knee.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Led {
    pub junction: Diode,
    pub color: LedColor,
}

impl Default for Led {
    fn default() -> Self {
        Self::new(LedColor::default())
    }
}

impl Led {
    /// Forward current above which the LED is drawn as lit.
    pub const LIT_CURRENT: f64 = 1e-3;

    /// LED with the typical forward voltage of its colour.
    pub fn new(color: LedColor) -> Self {
        Self {
            junction: Diode::new(color.forward_voltage()),
            color,
        }
    }

    /// Whether a (smoothed) forward current is enough to light it.
    pub fn is_lit(&self, current: f64) -> bool {
        current > Self::LIT_CURRENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regions() {
        let d = Diode::silicon();
        assert_eq!(d.region(0.69), DiodeRegion::Blocking);
        assert_eq!(d.region(0.71), DiodeRegion::Forward);
        // Standard diodes never break down
        assert_eq!(d.region(-100.0), DiodeRegion::Blocking);

        let z = Diode::zener(5.1);
        assert_eq!(z.region(-5.0), DiodeRegion::Blocking);
        assert_eq!(z.region(-5.2), DiodeRegion::Breakdown);
        assert_eq!(z.region(1.0), DiodeRegion::Forward);
    }

    #[test]
    fn test_forward_current_is_offset_line() {
        let d = Diode::silicon();
        // (1.7 - 0.7) / 0.1 = 10 A
        assert_relative_eq!(d.current(1.7), 10.0, max_relative = 1e-12);
        assert_relative_eq!(d.current(-1.0), -1e-12, max_relative = 1e-12);
    }

    #[test]
    fn test_zener_breakdown_current() {
        let z = Diode::zener(5.0);
        // (-5.5 + 5.0) / 0.1 = -5 A
        assert_relative_eq!(z.current(-5.5), -5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_stamp_matches_companion() {
        let d = Diode::silicon();
        let mut m = MnaMatrix::new(2);
        d.stamp(&mut m, 0, 1, 1.0);
        assert_relative_eq!(m.get(0, 0), 10.0);
        assert_relative_eq!(m.get(0, 1), -10.0);
        // I_eq = -7 A flows anode -> cathode, so +7 A is injected at the anode
        assert_relative_eq!(m.z[0], 7.0);
        assert_relative_eq!(m.z[1], -7.0);
    }

    #[test]
    fn test_led_colours() {
        let red = Led::new(LedColor::Red);
        let blue = Led::new(LedColor::Blue);
        assert!(red.junction.forward_voltage < blue.junction.forward_voltage);
        assert!(red.is_lit(0.01));
        assert!(!red.is_lit(0.0));
    }
}
