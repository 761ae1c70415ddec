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
//! CSV export of simulation runs
//!
//! Pendulum runs produce one row per step:
//! `step,time,theta,omega,alpha,kinetic,potential,total`.
//!
//! Solar system runs produce one row per step and body:
//! `step,time,body,x,y,z,vx,vy,vz,kinetic,potential`.

use crate::error::{Error, Result};
use crate::systems::{PendulumRun, SolarSystemRun};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct PendulumRow {
    step: usize,
    time: f64,
    theta: f64,
    omega: f64,
    alpha: f64,
    kinetic: f64,
    potential: f64,
    total: f64,
}

#[derive(Debug, Serialize)]
struct BodyRow<'a> {
    step: usize,
    time: f64,
    body: &'a str,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    kinetic: f64,
    potential: f64,
}

/// Fail unless a table has `expected` entries
fn check_rows(column: &str, found: usize, expected: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::invalid(
            "run",
            format!("`{column}` has {found} entries, expected {expected}"),
        ))
    }
}

/// Write a pendulum run as CSV to any writer
///
/// Fails without writing if the run's columns differ in length.
pub fn write_pendulum<W: Write>(run: &PendulumRun, writer: W) -> Result<()> {
    let steps = run.len();
    check_rows("omega", run.omega.len(), steps)?;
    check_rows("alpha", run.alpha.len(), steps)?;
    check_rows("kinetic", run.kinetic.len(), steps)?;
    check_rows("potential", run.potential.len(), steps)?;

    let mut out = csv::Writer::from_writer(writer);

    for step in 0..run.len() {
        let kinetic = run.kinetic[step];
        let potential = run.potential[step];
        out.serialize(PendulumRow {
            step,
            time: step as f64 * run.time_step,
            theta: run.theta[step],
            omega: run.omega[step],
            alpha: run.alpha[step],
            kinetic,
            potential,
            total: kinetic + potential,
        })?;
    }

    out.flush()?;
    Ok(())
}

/// Write a solar system run as CSV to any writer
///
/// Fails without writing unless every table has one row per step and one
/// entry per body.
pub fn write_solar_system<W: Write>(run: &SolarSystemRun, writer: W) -> Result<()> {
    let steps = run.len();
    let bodies = run.names.len();
    check_rows("velocities", run.velocities.len(), steps)?;
    check_rows("kinetic", run.kinetic.len(), steps)?;
    check_rows("potential", run.potential.len(), steps)?;
    for step in 0..steps {
        check_rows("positions", run.positions[step].len(), bodies)?;
        check_rows("velocities", run.velocities[step].len(), bodies)?;
        check_rows("kinetic", run.kinetic[step].len(), bodies)?;
        check_rows("potential", run.potential[step].len(), bodies)?;
    }

    let mut out = csv::Writer::from_writer(writer);

    for step in 0..run.len() {
        let time = step as f64 * run.time_step;
        for (body, name) in run.names.iter().enumerate() {
            let p = run.positions[step][body];
            let v = run.velocities[step][body];
            out.serialize(BodyRow {
                step,
                time,
                body: name,
                x: p.x,
                y: p.y,
                z: p.z,
                vx: v.x,
                vy: v.y,
                vz: v.z,
                kinetic: run.kinetic[step][body],
                potential: run.potential[step][body],
            })?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Write a pendulum run to a CSV file, replacing it if present
pub fn write_pendulum_csv(run: &PendulumRun, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_pendulum(run, File::create(path)?)?;
    info!(path = %path.display(), rows = run.len(), "wrote pendulum csv");
    Ok(())
}

/// Write a solar system run to a CSV file, replacing it if present
pub fn write_solar_system_csv(run: &SolarSystemRun, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_solar_system(run, File::create(path)?)?;
    info!(
        path = %path.display(),
        rows = run.len() * run.names.len(),
        "wrote solar system csv"
    );
    Ok(())
}
