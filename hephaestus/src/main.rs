// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Hephaestus command line
//!
//! ```text
//! hephaestus run scenarios/pendulum.toml --output pendulum.csv
//! hephaestus pendulum --theta 0.5 --integrator rk4
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hephaestus::config::{Scenario, ScenarioConfig};
use hephaestus::integration::IntegratorKind;
use hephaestus::systems::solar_system::DAY;
use hephaestus::systems::{PendulumRun, SinglePendulum, SolarSystemRun};
use hephaestus::{logging, output};
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed-step physics simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a TOML scenario file
    Run(RunArgs),
    /// Run a single pendulum without a scenario file
    Pendulum(PendulumArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Scenario file
    scenario: PathBuf,

    /// Override the scenario's integrator (euler, verlet, rk4)
    #[arg(short, long)]
    integrator: Option<IntegratorKind>,

    /// Override the scenario's number of steps
    #[arg(short, long)]
    steps: Option<usize>,

    /// Write the run to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PendulumArgs {
    /// Starting angle in radians
    #[arg(long, default_value_t = 0.5)]
    theta: f64,

    /// Mass of the bob in kilograms
    #[arg(long, default_value_t = 1.0)]
    mass: f64,

    /// Rod length in meters
    #[arg(long, default_value_t = hephaestus::systems::single_pendulum::DEFAULT_LENGTH)]
    length: f64,

    /// Gravitational acceleration in m/s²
    #[arg(long, default_value_t = 9.81)]
    gravity: f64,

    /// Number of recorded states
    #[arg(short, long, default_value_t = 1000)]
    steps: usize,

    /// Timestep in seconds
    #[arg(short = 't', long, default_value_t = 0.01)]
    time_step: f64,

    /// Integrator (euler, verlet, rk4)
    #[arg(short, long, default_value_t = IntegratorKind::VelocityVerlet)]
    integrator: IntegratorKind,

    /// Write the run to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Run(args) => run_scenario(args),
        Command::Pendulum(args) => run_pendulum(args),
    }
}

fn run_scenario(args: RunArgs) -> Result<()> {
    let mut config = ScenarioConfig::from_file(&args.scenario)
        .with_context(|| format!("failed to load {}", args.scenario.display()))?;
    if let Some(kind) = args.integrator {
        config = config.with_integrator(kind);
    }
    if let Some(steps) = args.steps {
        config = config.with_steps(steps);
    }

    let kind = config.simulation.integrator;
    info!(scenario = %args.scenario.display(), integrator = %kind, "loaded scenario");

    match config.build()? {
        Scenario::Pendulum(pendulum) => {
            let run = pendulum.run_simulation(kind)?;
            report_pendulum(&pendulum, &run, kind);
            if let Some(path) = &args.output {
                write_csv(path, || output::write_pendulum_csv(&run, path))?;
            }
        }
        Scenario::SolarSystem(system) => {
            let run = system.run_simulation(kind)?;
            report_solar_system(&run, kind);
            if let Some(path) = &args.output {
                write_csv(path, || output::write_solar_system_csv(&run, path))?;
            }
        }
    }

    Ok(())
}

fn run_pendulum(args: PendulumArgs) -> Result<()> {
    let pendulum = SinglePendulum::with_length(
        args.mass,
        args.length,
        args.gravity,
        args.theta,
        args.steps,
        args.time_step,
    )?;
    let run = pendulum.run_simulation(args.integrator)?;
    report_pendulum(&pendulum, &run, args.integrator);

    if let Some(path) = &args.output {
        write_csv(path, || output::write_pendulum_csv(&run, path))?;
    }
    Ok(())
}

fn write_csv(path: &Path, write: impl FnOnce() -> hephaestus::Result<()>) -> Result<()> {
    write().with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn report_pendulum(pendulum: &SinglePendulum, run: &PendulumRun, kind: IntegratorKind) {
    let duration = run.len().saturating_sub(1) as f64 * run.time_step;
    let energy = run.total_energy();

    println!("=== Single pendulum ({kind}) ===");
    println!("  steps:              {}", run.len());
    println!("  simulated time:     {duration:.3} s");
    println!("  small-angle period: {:.4} s", pendulum.small_angle_period());
    if let (Some(first), Some(last)) = (energy.first(), energy.last()) {
        println!("  energy:             {first:.6e} J -> {last:.6e} J");
    }
    println!("  max energy drift:   {:.3e}", run.max_relative_energy_drift());
}

fn report_solar_system(run: &SolarSystemRun, kind: IntegratorKind) {
    let duration = run.len().saturating_sub(1) as f64 * run.time_step;
    let energy = run.total_energy();

    println!("=== Solar system ({kind}) ===");
    println!("  bodies:             {}", run.names.join(", "));
    println!("  steps:              {}", run.len());
    println!("  simulated time:     {:.2} days", duration / DAY);
    if let (Some(first), Some(last)) = (energy.first(), energy.last()) {
        println!("  energy:             {first:.6e} J -> {last:.6e} J");
    }
    println!("  max energy drift:   {:.3e}", run.max_relative_energy_drift());

    if let Some(last) = run.positions.last() {
        for (name, position) in run.names.iter().zip(last) {
            println!("  {name:<10} {position}");
        }
    }
}
