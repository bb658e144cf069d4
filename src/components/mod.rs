//! Component models for circuit simulation.
//!
//! This module provides models for all supported circuit components:
//! - Linear: Resistor, Lamp, Capacitor, Inductor
//! - Sources: Battery, AC Source
//! - Nonlinear: Diode, LED
//! - Controls: Switch, Push Button
//! - Junction: a single shared connection point
//!
//! Each kind owns its stamp into the MNA matrix and its constitutive law for
//! telemetry; [`Component`] dispatches on the [`ComponentKind`] tag.

mod controls;
mod diode;
mod linear;
mod sources;
mod telemetry;

pub use controls::{PushButton, Switch, R_CLOSED, R_OPEN};
pub use diode::{Diode, DiodeRegion, DiodeType, Led, LedColor};
pub use linear::{Capacitor, Inductor, Lamp, Resistor};
pub use sources::{AcSource, Battery};
pub use telemetry::{Telemetry, TelemetryFilter};

use crate::circuit::{ComponentId, Terminals};
use crate::error::{Result, SimError};
use crate::solver::{MnaMatrix, StampContext};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind-specific parameters and persisted reactive state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentKind {
    Battery(Battery),
    Switch(Switch),
    PushButton(PushButton),
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    AcSource(AcSource),
    Diode(Diode),
    Led(Led),
    Lamp(Lamp),
    Junction,
}

impl ComponentKind {
    /// Short lowercase name of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Battery(_) => "battery",
            ComponentKind::Switch(_) => "switch",
            ComponentKind::PushButton(_) => "push button",
            ComponentKind::Resistor(_) => "resistor",
            ComponentKind::Capacitor(_) => "capacitor",
            ComponentKind::Inductor(_) => "inductor",
            ComponentKind::AcSource(_) => "ac source",
            ComponentKind::Diode(_) => "diode",
            ComponentKind::Led(_) => "led",
            ComponentKind::Lamp(_) => "lamp",
            ComponentKind::Junction => "junction",
        }
    }
}

/// A circuit component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub kind: ComponentKind,
    pub telemetry: Telemetry,
}

impl Component {
    /// Create a component with zeroed telemetry.
    pub fn new(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            name: format!("{}{}", kind.label(), id.0),
            kind,
            telemetry: Telemetry::default(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of terminals: one for a junction, two otherwise.
    pub fn port_count(&self) -> usize {
        match self.kind {
            ComponentKind::Junction => 1,
            _ => 2,
        }
    }

    /// Whether the component adds a branch-current unknown (ideal sources).
    pub fn has_branch(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Battery(_) | ComponentKind::AcSource(_)
        )
    }

    /// Check if this component is nonlinear (needs the iteration driver).
    pub fn is_nonlinear(&self) -> bool {
        matches!(self.kind, ComponentKind::Diode(_) | ComponentKind::Led(_))
    }

    /// Lamp brightness in 0..=1 from the committed power; `None` for other kinds.
    pub fn brightness(&self) -> Option<f64> {
        match &self.kind {
            ComponentKind::Lamp(l) => Some(l.brightness(self.telemetry.power)),
            _ => None,
        }
    }

    /// Add this component's contribution to the system.
    ///
    /// `estimate` is the previous iteration's solution and only matters to
    /// diodes, which pick their linear segment from it.
    pub fn stamp(
        &self,
        matrix: &mut MnaMatrix,
        terminals: Terminals,
        estimate: &[f64],
        ctx: &StampContext,
    ) {
        let Terminals { pos, neg, branch } = terminals;
        match &self.kind {
            ComponentKind::Battery(b) => {
                if let Some(br) = branch {
                    b.stamp(matrix, pos, neg, br);
                }
            }
            ComponentKind::AcSource(ac) => {
                if let Some(br) = branch {
                    ac.stamp(matrix, pos, neg, br, ctx.time);
                }
            }
            ComponentKind::Switch(s) => s.stamp(matrix, pos, neg),
            ComponentKind::PushButton(b) => b.stamp(matrix, pos, neg),
            ComponentKind::Resistor(r) => r.stamp(matrix, pos, neg),
            ComponentKind::Lamp(l) => l.stamp(matrix, pos, neg),
            ComponentKind::Capacitor(c) => c.stamp(matrix, pos, neg, ctx.dt),
            ComponentKind::Inductor(l) => l.stamp(matrix, pos, neg, ctx.dt),
            ComponentKind::Diode(d) => {
                d.stamp(matrix, pos, neg, estimate[pos] - estimate[neg]);
            }
            ComponentKind::Led(led) => {
                led.junction
                    .stamp(matrix, pos, neg, estimate[pos] - estimate[neg]);
            }
            ComponentKind::Junction => {}
        }
    }

    /// Branch current at the solved voltage `v`, from the component's own law.
    ///
    /// Sources read their branch unknown and report the current leaving the
    /// positive terminal into the circuit.
    pub fn branch_current(&self, v: f64, terminals: Terminals, solution: &[f64], dt: f64) -> f64 {
        match &self.kind {
            ComponentKind::Battery(_) | ComponentKind::AcSource(_) => {
                terminals.branch.map_or(0.0, |br| -solution[br])
            }
            ComponentKind::Switch(s) => v * s.conductance(),
            ComponentKind::PushButton(b) => v * b.conductance(),
            ComponentKind::Resistor(r) => v * r.conductance(),
            ComponentKind::Lamp(l) => v * l.conductance(),
            ComponentKind::Capacitor(c) => c.current(v, dt),
            ComponentKind::Inductor(l) => l.current(v, dt),
            ComponentKind::Diode(d) => d.current(v),
            ComponentKind::Led(led) => led.junction.current(v),
            ComponentKind::Junction => 0.0,
        }
    }

    /// Carry reactive state into the next tick.
    pub fn update_state(&mut self, v: f64, i: f64) {
        match &mut self.kind {
            ComponentKind::Capacitor(c) => c.update_state(v),
            ComponentKind::Inductor(l) => l.update_state(i),
            _ => {}
        }
    }

    /// Zero telemetry and reactive state ("reset simulation").
    pub fn reset(&mut self) {
        self.telemetry.reset();
        match &mut self.kind {
            ComponentKind::Capacitor(c) => c.stored_voltage = 0.0,
            ComponentKind::Inductor(l) => l.stored_current = 0.0,
            _ => {}
        }
    }

    /// Reject parameters that cannot produce a meaningful stamp.
    pub fn validate(&self) -> Result<()> {
        let id = self.id;
        match &self.kind {
            ComponentKind::Battery(b) => finite(id, "voltage", b.voltage),
            ComponentKind::AcSource(ac) => {
                finite(id, "amplitude", ac.amplitude)?;
                non_negative(id, "frequency", ac.frequency)
            }
            ComponentKind::Resistor(r) => positive(id, "resistance", r.resistance),
            ComponentKind::Lamp(l) => {
                positive(id, "resistance", l.resistance)?;
                non_negative(id, "rated_power", l.rated_power)
            }
            ComponentKind::Capacitor(c) => {
                positive(id, "capacitance", c.capacitance)?;
                finite(id, "stored_voltage", c.stored_voltage)
            }
            ComponentKind::Inductor(l) => {
                positive(id, "inductance", l.inductance)?;
                non_negative(id, "series_resistance", l.series_resistance)?;
                finite(id, "stored_current", l.stored_current)
            }
            ComponentKind::Diode(d) => validate_diode(id, d),
            ComponentKind::Led(led) => validate_diode(id, &led.junction),
            ComponentKind::Switch(_) | ComponentKind::PushButton(_) | ComponentKind::Junction => {
                Ok(())
            }
        }
    }
}

fn validate_diode(id: ComponentId, d: &Diode) -> Result<()> {
    non_negative(id, "forward_voltage", d.forward_voltage)?;
    positive(id, "zener_voltage", d.zener_voltage)
}

fn finite(id: ComponentId, param: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(id, param, format!("{value} is not finite")))
    }
}

fn positive(id: ComponentId, param: &str, value: f64) -> Result<()> {
    finite(id, param, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(id, param, format!("{value} must be positive")))
    }
}

fn non_negative(id: ComponentId, param: &str, value: f64) -> Result<()> {
    finite(id, param, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(id, param, format!("{value} must not be negative")))
    }
}
