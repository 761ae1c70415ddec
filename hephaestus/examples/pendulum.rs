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
//! Single pendulum integrator comparison
//!
//! Swings a 1 m pendulum from 0.5 rad for twenty seconds with each
//! integrator and prints the energy behaviour:
//!
//! - Euler gains energy every step
//! - Velocity Verlet oscillates around the true energy without drifting
//! - RK4 is far more accurate per step but slowly drifts
//!
//! ```bash
//! cargo run --example pendulum
//! ```

use hephaestus::integration::IntegratorKind;
use hephaestus::systems::SinglePendulum;

fn main() -> hephaestus::Result<()> {
    hephaestus::logging::init(false);

    let time_step = 0.01;
    let steps = 2001;
    let pendulum = SinglePendulum::new(1.0, 9.81, 0.5, steps, time_step)?;

    println!("Single pendulum: L = {} m, g = {} m/s², θ0 = {} rad",
             pendulum.length(), pendulum.gravity(), pendulum.theta_start());
    println!("Small-angle period: {:.4} s", pendulum.small_angle_period());
    println!();
    println!("{:<16} {:>12} {:>12} {:>14}", "integrator", "θ(end)", "ω(end)", "energy drift");

    for kind in IntegratorKind::ALL {
        let run = pendulum.run_simulation(kind)?;
        let last = run.len() - 1;
        println!(
            "{:<16} {:>12.6} {:>12.6} {:>14.3e}",
            kind.as_str(),
            run.theta[last],
            run.omega[last],
            run.max_relative_energy_drift()
        );
    }

    Ok(())
}
