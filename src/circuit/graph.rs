//! Circuit container edited by the host between ticks.

use super::types::{ComponentId, PortRef, WireId};
use crate::components::{Component, ComponentKind, Telemetry};
use crate::error::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A connection between two component ports.
///
/// Wires are stamped as tiny resistors rather than merged into shared
/// nodes, so each one carries its own current and telemetry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wire {
    pub id: WireId,
    pub a: PortRef,
    pub b: PortRef,
    pub telemetry: Telemetry,
}

impl Wire {
    pub fn new(id: WireId, a: PortRef, b: PortRef) -> Self {
        Self {
            id,
            a,
            b,
            telemetry: Telemetry::default(),
        }
    }

    /// Whether either end sits on the given component.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.a.component == component || self.b.component == component
    }
}

/// A complete circuit ready for simulation.
///
/// Components and wires keep their insertion order, which fixes the order
/// of unknowns and of stamping.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circuit {
    components: Vec<Component>,
    wires: Vec<Wire>,
    /// Port pinned to 0 V; defaults to port 0 of the first component
    ground: Option<PortRef>,
    next_wire_id: usize,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, zeroing its telemetry and reactive state.
    pub fn add_component(&mut self, mut component: Component) -> Result<ComponentId> {
        if self.component(component.id).is_some() {
            return Err(SimError::DuplicateComponent {
                component: component.id,
            });
        }
        component.validate()?;
        component.reset();
        let id = component.id;
        self.components.push(component);
        Ok(id)
    }

    /// Add a component of the given kind under the next free id.
    pub fn add(&mut self, kind: ComponentKind) -> Result<ComponentId> {
        let id = self.next_component_id();
        self.add_component(Component::new(id, kind))
    }

    /// Smallest id greater than every id in use.
    pub fn next_component_id(&self) -> ComponentId {
        let next = self
            .components
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0);
        ComponentId(next)
    }

    /// Remove a component together with every wire attached to it.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or(SimError::UnknownComponent { component: id })?;
        self.wires.retain(|w| !w.touches(id));
        if self.ground.is_some_and(|g| g.component == id) {
            self.ground = None;
        }
        Ok(self.components.remove(idx))
    }

    /// Wire two ports together.
    pub fn connect(&mut self, a: impl Into<PortRef>, b: impl Into<PortRef>) -> Result<WireId> {
        let (a, b) = (a.into(), b.into());
        self.check_port(a)?;
        self.check_port(b)?;
        let id = WireId(self.next_wire_id);
        self.next_wire_id += 1;
        self.wires.push(Wire::new(id, a, b));
        Ok(id)
    }

    pub fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let idx = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(idx))
    }

    /// Pin a specific port to 0 V.
    pub fn set_ground(&mut self, port: impl Into<PortRef>) -> Result<()> {
        let port = port.into();
        self.check_port(port)?;
        self.ground = Some(port);
        Ok(())
    }

    /// Explicitly chosen ground port, if any.
    pub fn ground(&self) -> Option<PortRef> {
        self.ground
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn wires_mut(&mut self) -> &mut [Wire] {
        &mut self.wires
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Zero telemetry and reactive state everywhere ("reset simulation").
    pub fn reset(&mut self) {
        for component in &mut self.components {
            component.reset();
        }
        for wire in &mut self.wires {
            wire.telemetry.reset();
        }
    }

    fn check_port(&self, port: PortRef) -> Result<()> {
        match self.component(port.component) {
            Some(c) if port.port < c.port_count() => Ok(()),
            _ => Err(SimError::dangling_port(port.component, port.port)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Capacitor, Resistor};

    fn resistor(id: usize) -> Component {
        Component::new(ComponentId(id), ComponentKind::Resistor(Resistor::new(100.0)))
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut c = Circuit::new();
        c.add_component(resistor(1)).unwrap();
        assert_eq!(
            c.add_component(resistor(1)),
            Err(SimError::DuplicateComponent {
                component: ComponentId(1)
            })
        );
    }

    #[test]
    fn test_connect_checks_ports() {
        let mut c = Circuit::new();
        let r = c.add_component(resistor(0)).unwrap();
        let j = c.add(ComponentKind::Junction).unwrap();
        assert_eq!(j, ComponentId(1));

        assert!(c.connect((r, 1), (j, 0)).is_ok());
        assert_eq!(
            c.connect((r, 0), (j, 1)),
            Err(SimError::dangling_port(j, 1))
        );
        assert!(c.connect((r, 0), (ComponentId(9), 0)).is_err());
    }

    #[test]
    fn test_remove_component_drops_its_wires() {
        let mut c = Circuit::new();
        let a = c.add_component(resistor(0)).unwrap();
        let b = c.add_component(resistor(1)).unwrap();
        let d = c.add_component(resistor(2)).unwrap();
        c.connect((a, 1), (b, 0)).unwrap();
        let keep = c.connect((a, 0), (d, 1)).unwrap();
        c.set_ground((b, 1)).unwrap();

        let removed = c.remove_component(b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(c.wires().len(), 1);
        assert_eq!(c.wires()[0].id, keep);
        assert_eq!(c.ground(), None);
        assert!(c.remove_component(b).is_err());
    }

    #[test]
    fn test_add_zeroes_state_and_reset_clears() {
        let mut cap = Capacitor::new(1e-6);
        cap.stored_voltage = 5.0;
        let mut c = Circuit::new();
        let id = c.add(ComponentKind::Capacitor(cap)).unwrap();
        assert_eq!(
            c.component(id).map(|x| &x.kind),
            Some(&ComponentKind::Capacitor(Capacitor::new(1e-6)))
        );

        if let Some(comp) = c.component_mut(id) {
            comp.telemetry.voltage = 2.0;
        }
        c.reset();
        assert_eq!(c.component(id).map(|x| x.telemetry), Some(Telemetry::default()));
    }
}
