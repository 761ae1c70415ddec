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
//! Inner Solar System N-Body Example
//!
//! Integrates the Sun and the four inner planets and reports how well each
//! integrator keeps the total energy and momentum.
//!
//! # Physical Constants
//!
//! All values use SI units (meters, kilograms, seconds) based on the
//! NASA Planetary Fact Sheet: https://nssdc.gsfc.nasa.gov/planetary/factsheet/
//!
//! # Running
//!
//! ```bash
//! # One Earth year with every integrator, 1 day timestep
//! cargo run --example solar_system --release
//!
//! # Only RK4, 2 years, 6 hour timestep
//! cargo run --example solar_system --release -- --integrator rk4 --years 2 --timestep 21600
//! ```

use hephaestus::integration::IntegratorKind;
use hephaestus::systems::solar_system::{AU, DAY, GRAVITATIONAL_CONSTANT};
use hephaestus::systems::{SolarSystem, SolarSystemRun};
use hephaestus::logging;

/// One Earth year in seconds (365.25 days)
const YEAR: f64 = 365.25 * DAY;

struct Options {
    integrators: Vec<IntegratorKind>,
    timestep: f64,
    years: f64,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        integrators: IntegratorKind::ALL.to_vec(),
        timestep: DAY,
        years: 1.0,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).ok_or_else(|| format!("{} requires an argument", args[i]))?;
        match args[i].as_str() {
            "--integrator" => {
                let kind = value.parse::<IntegratorKind>().map_err(|e| e.to_string())?;
                options.integrators = vec![kind];
            }
            "--timestep" => {
                options.timestep = value.parse().map_err(|_| format!("invalid timestep '{value}'"))?;
            }
            "--years" => {
                options.years = value.parse().map_err(|_| format!("invalid years '{value}'"))?;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
        i += 2;
    }

    Ok(options)
}

fn print_summary(system: &SolarSystem, run: &SolarSystemRun) -> hephaestus::Result<()> {
    let (Some(first), Some(last)) = (run.velocities.first(), run.velocities.last()) else {
        return Ok(());
    };
    let momentum_start = system.total_momentum(first)?;
    let momentum_end = system.total_momentum(last)?;

    println!("  Max relative energy drift: {:.3e}", run.max_relative_energy_drift());
    println!("  Momentum: {momentum_start} -> {momentum_end}");

    let (Some(sun), Some(earth)) = (run.body_index("Sun"), run.body_index("Earth")) else {
        return Ok(());
    };
    if let Some(last) = run.positions.last() {
        let r = (last[earth] - last[sun]).norm();
        println!("  Earth distance from Sun: {:.4e} m ({:.4} AU)", r, r / AU);
    }
    Ok(())
}

fn main() {
    logging::init(false);

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {message}");
            std::process::exit(2);
        }
    };

    println!("==========================================================");
    println!("       Inner Solar System N-Body Simulation");
    println!("==========================================================");
    println!("  G = {:.5e} m³/(kg⋅s²)", GRAVITATIONAL_CONSTANT);
    println!("  1 AU = {:.5e} m", AU);
    println!("  Timestep: {:.0} s ({:.2} days)", options.timestep, options.timestep / DAY);
    println!("  Duration: {:.2} years", options.years);
    println!();

    let steps = (options.years * YEAR / options.timestep).round() as usize + 1;
    let system = match SolarSystem::inner_planets(steps, options.timestep) {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for body in system.bodies() {
        println!(
            "  {:<8} mass {:.3e} kg, r = {:.3} AU",
            body.name,
            body.mass,
            body.position.norm() / AU
        );
    }

    for kind in options.integrators {
        println!();
        println!("--- {kind} ---");
        let outcome = system
            .run_simulation(kind)
            .and_then(|run| print_summary(&system, &run));
        if let Err(e) = outcome {
            println!("  failed: {e}");
        }
    }
}
