//! WASM bindings for Voltaic Core.
//!
//! This module provides JavaScript-friendly bindings so a browser editor can
//! own the topology while the solver runs in WebAssembly.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuit } from 'voltaic_core';
//!
//! await init();
//!
//! const circuit = new WasmCircuit();
//! const bat = circuit.add_battery(9.0);
//! const led = circuit.add_led(0);
//! const res = circuit.add_resistor(330);
//! circuit.connect(bat, 0, res, 0);
//! circuit.connect(res, 1, led, 0);
//! circuit.connect(led, 1, bat, 1);
//!
//! // Once per animation frame:
//! if (!circuit.step(1 / 60)) pauseSimulation();
//! const amps = circuit.current(led);
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, ComponentId, PortRef};
use crate::components::{
    AcSource, Battery, Capacitor, ComponentKind, Diode, Inductor, Lamp, Led, LedColor, PushButton,
    Resistor, Switch, Telemetry,
};
use crate::error::{Result, SimError};
use crate::solver::{Simulator, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: SimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible circuit plus simulator.
#[wasm_bindgen]
pub struct WasmCircuit {
    circuit: Circuit,
    simulator: Simulator,
}

impl Default for WasmCircuit {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmCircuit {
    fn add(&mut self, kind: ComponentKind) -> std::result::Result<usize, JsValue> {
        self.circuit.add(kind).map(|id| id.0).map_err(to_js)
    }

    fn telemetry(&self, id: usize) -> Option<Telemetry> {
        self.circuit.component(ComponentId(id)).map(|c| c.telemetry)
    }

    fn with_kind(&mut self, id: usize, f: impl FnOnce(&mut ComponentKind)) -> Result<()> {
        let component = self
            .circuit
            .component_mut(ComponentId(id))
            .ok_or(SimError::UnknownComponent {
                component: ComponentId(id),
            })?;
        f(&mut component.kind);
        Ok(())
    }
}

#[wasm_bindgen]
impl WasmCircuit {
    /// Create an empty circuit with the default solver configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuit {
        Self::with_iterations(SolverConfig::default().iterations)
    }

    /// Create an empty circuit with a custom Picard iteration budget.
    #[wasm_bindgen]
    pub fn with_iterations(iterations: usize) -> WasmCircuit {
        WasmCircuit {
            circuit: Circuit::new(),
            simulator: Simulator::with_config(SolverConfig::new().with_iterations(iterations)),
        }
    }

    pub fn add_battery(&mut self, voltage: f64) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Battery(Battery::new(voltage)))
    }

    pub fn add_ac_source(&mut self, amplitude: f64, frequency: f64) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::AcSource(AcSource::new(amplitude, frequency)))
    }

    pub fn add_resistor(&mut self, ohms: f64) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Resistor(Resistor::new(ohms)))
    }

    pub fn add_lamp(&mut self, ohms: f64, rated_power: f64) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Lamp(Lamp::new(ohms, rated_power)))
    }

    pub fn add_capacitor(&mut self, farads: f64, polarized: bool) -> std::result::Result<usize, JsValue> {
        let cap = if polarized {
            Capacitor::polarized(farads)
        } else {
            Capacitor::new(farads)
        };
        self.add(ComponentKind::Capacitor(cap))
    }

    pub fn add_inductor(&mut self, henries: f64) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Inductor(Inductor::new(henries)))
    }

    /// Add a diode; a positive `zener_voltage` makes it a zener.
    pub fn add_diode(&mut self, forward_voltage: f64, zener_voltage: f64) -> std::result::Result<usize, JsValue> {
        let diode = if zener_voltage > 0.0 {
            Diode {
                forward_voltage,
                ..Diode::zener(zener_voltage)
            }
        } else {
            Diode::new(forward_voltage)
        };
        self.add(ComponentKind::Diode(diode))
    }

    /// Add an LED: 0 red, 1 yellow, 2 green, 3 blue, anything else white.
    pub fn add_led(&mut self, color: u8) -> std::result::Result<usize, JsValue> {
        let color = match color {
            0 => LedColor::Red,
            1 => LedColor::Yellow,
            2 => LedColor::Green,
            3 => LedColor::Blue,
            _ => LedColor::White,
        };
        self.add(ComponentKind::Led(Led::new(color)))
    }

    pub fn add_switch(&mut self, closed: bool) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Switch(Switch::new(closed)))
    }

    pub fn add_push_button(&mut self) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::PushButton(PushButton::new()))
    }

    pub fn add_junction(&mut self) -> std::result::Result<usize, JsValue> {
        self.add(ComponentKind::Junction)
    }

    pub fn remove(&mut self, id: usize) -> std::result::Result<(), JsValue> {
        self.circuit
            .remove_component(ComponentId(id))
            .map(|_| ())
            .map_err(to_js)
    }

    /// Wire two ports together, returning the wire id.
    pub fn connect(
        &mut self,
        a: usize,
        a_port: usize,
        b: usize,
        b_port: usize,
    ) -> std::result::Result<usize, JsValue> {
        self.circuit
            .connect(
                PortRef::new(ComponentId(a), a_port),
                PortRef::new(ComponentId(b), b_port),
            )
            .map(|w| w.0)
            .map_err(to_js)
    }

    /// Open or close a switch, or press/release a push button.
    pub fn set_closed(&mut self, id: usize, closed: bool) -> std::result::Result<(), JsValue> {
        self.with_kind(id, |kind| match kind {
            ComponentKind::Switch(s) => s.set_closed(closed),
            ComponentKind::PushButton(b) if closed => b.press(),
            ComponentKind::PushButton(b) => b.release(),
            _ => {}
        })
        .map_err(to_js)
    }

    /// Advance one tick. Returns `false` if the tick diverged and was discarded.
    pub fn step(&mut self, dt: f64) -> std::result::Result<bool, JsValue> {
        match self.simulator.step(&mut self.circuit, dt) {
            Ok(()) => Ok(true),
            Err(e) if e.is_divergence() => Ok(false),
            Err(e) => Err(to_js(e)),
        }
    }

    /// Zero all telemetry and stored charge, and rewind the clock.
    pub fn reset(&mut self) {
        self.simulator.reset(&mut self.circuit);
    }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f64 {
        self.simulator.time()
    }

    pub fn voltage(&self, id: usize) -> Option<f64> {
        self.telemetry(id).map(|t| t.voltage)
    }

    pub fn current(&self, id: usize) -> Option<f64> {
        self.telemetry(id).map(|t| t.current)
    }

    pub fn power(&self, id: usize) -> Option<f64> {
        self.telemetry(id).map(|t| t.power)
    }

    /// Lamp brightness in 0..=1; `None` for unknown ids and non-lamps.
    pub fn brightness(&self, id: usize) -> Option<f64> {
        self.circuit
            .component(ComponentId(id))
            .and_then(|c| c.brightness())
    }

    /// `[voltage, current, power, peak_voltage, peak_current, rms_voltage, rms_current]`,
    /// empty for an unknown id.
    pub fn readings(&self, id: usize) -> Vec<f64> {
        self.telemetry(id).map_or_else(Vec::new, |t| {
            vec![
                t.voltage,
                t.current,
                t.power,
                t.peak_voltage,
                t.peak_current,
                t.rms_voltage,
                t.rms_current,
            ]
        })
    }

    /// Smoothed current through a wire.
    pub fn wire_current(&self, wire: usize) -> Option<f64> {
        self.circuit
            .wire(crate::circuit::WireId(wire))
            .map(|w| w.telemetry.current)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
