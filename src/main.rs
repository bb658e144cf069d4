//! Voltaic - breadboard circuit solver demo
//!
//! Runs one of the built-in demo circuits tick by tick and prints the
//! telemetry of its watched component as tab-separated rows.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=voltaic_core=debug voltaic rectifier --ticks 240 --every 4
//! ```

use clap::{Parser, ValueEnum};
use voltaic_core::{
    components::{
        AcSource, Battery, Capacitor, ComponentKind, Diode, Led, LedColor, Resistor, Telemetry,
    },
    Circuit, ComponentId, Result, Simulator, SolverConfig, DEFAULT_TIME_STEP,
};

/// Built-in demo circuits.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    /// 9 V battery across 1 kΩ
    Resistor,
    /// 5 V battery charging 100 µF through 1 kΩ
    Rc,
    /// 10 V 60 Hz source through a silicon diode into 1 kΩ
    Rectifier,
    /// 9 V battery driving a red LED through 330 Ω
    Led,
}

/// Time-stepped circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Demo circuit to run
    #[arg(value_enum, default_value_t = Scenario::Resistor)]
    scenario: Scenario,

    /// Tick length in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_STEP)]
    dt: f64,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 120)]
    ticks: usize,

    /// Print every Nth tick
    #[arg(short, long, default_value_t = 1)]
    every: usize,

    /// Picard iterations per tick
    #[arg(short, long, default_value_t = SolverConfig::default().iterations)]
    iterations: usize,
}

/// Build the demo circuit, returning it with the component to report on.
fn build(scenario: Scenario) -> Result<(Circuit, ComponentId)> {
    let mut circuit = Circuit::new();
    let watched = match scenario {
        Scenario::Resistor => {
            let b = circuit.add(ComponentKind::Battery(Battery::new(9.0)))?;
            let r = circuit.add(ComponentKind::Resistor(Resistor::new(1000.0)))?;
            circuit.connect((b, 0), (r, 0))?;
            circuit.connect((r, 1), (b, 1))?;
            r
        }
        Scenario::Rc => {
            let b = circuit.add(ComponentKind::Battery(Battery::new(5.0)))?;
            let r = circuit.add(ComponentKind::Resistor(Resistor::new(1000.0)))?;
            let c = circuit.add(ComponentKind::Capacitor(Capacitor::new(100e-6)))?;
            circuit.connect((b, 0), (r, 0))?;
            circuit.connect((r, 1), (c, 0))?;
            circuit.connect((c, 1), (b, 1))?;
            c
        }
        Scenario::Rectifier => {
            let ac = circuit.add(ComponentKind::AcSource(AcSource::new(10.0, 60.0)))?;
            let d = circuit.add(ComponentKind::Diode(Diode::silicon()))?;
            let r = circuit.add(ComponentKind::Resistor(Resistor::new(1000.0)))?;
            circuit.connect((ac, 0), (d, 0))?;
            circuit.connect((d, 1), (r, 0))?;
            circuit.connect((r, 1), (ac, 1))?;
            r
        }
        Scenario::Led => {
            let b = circuit.add(ComponentKind::Battery(Battery::new(9.0)))?;
            let r = circuit.add(ComponentKind::Resistor(Resistor::new(330.0)))?;
            let led = circuit.add(ComponentKind::Led(Led::new(LedColor::Red)))?;
            circuit.connect((b, 0), (r, 0))?;
            circuit.connect((r, 1), (led, 0))?;
            circuit.connect((led, 1), (b, 1))?;
            led
        }
    };
    Ok((circuit, watched))
}

fn print_row(time: f64, t: &Telemetry) {
    println!(
        "{:.4}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
        time, t.voltage, t.current, t.power, t.rms_current, t.peak_current
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (mut circuit, watched) = build(args.scenario)?;
    let mut simulator =
        Simulator::with_config(SolverConfig::new().with_iterations(args.iterations));

    tracing::info!(scenario = ?args.scenario, watched = %watched, ticks = args.ticks, "starting");
    println!("time\tvoltage\tcurrent\tpower\trms_current\tpeak_current");

    let every = args.every.max(1);
    for tick in 1..=args.ticks {
        simulator.step(&mut circuit, args.dt)?;
        if tick % every == 0 {
            if let Some(component) = circuit.component(watched) {
                print_row(simulator.time(), &component.telemetry);
            }
        }
    }

    Ok(())
}
