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
//! Scenario files
//!
//! A scenario is a TOML document describing one system and how to integrate
//! it. Exactly one of `[pendulum]` or `[solar_system]` must be present.
//!
//! ```toml
//! format_version = "1.0.0"
//!
//! [simulation]
//! integrator = "velocity_verlet"   # euler | velocity_verlet | runge_kutta
//! steps = 1000
//! time_step = 0.01
//!
//! [pendulum]
//! mass = 1.0
//! length = 1.0
//! gravity = 9.81
//! theta_start = 0.5
//! ```
//!
//! A solar system lists its bodies, or names a preset:
//!
//! ```toml
//! format_version = "1.0.0"
//!
//! [simulation]
//! steps = 365
//! time_step = 86400.0
//!
//! [solar_system]
//! gravitational_constant = 6.674e-11
//! softening = 0.0
//!
//! [[solar_system.bodies]]
//! name = "Sun"
//! mass = 1.989e30
//! position = [0.0, 0.0, 0.0]
//!
//! [[solar_system.bodies]]
//! name = "Earth"
//! mass = 5.972e24
//! position = [1.496e11, 0.0, 0.0]
//! velocity = [0.0, 29780.0, 0.0]
//! ```

use crate::error::{Error, Result};
use crate::integration::IntegratorKind;
use crate::systems::solar_system::GRAVITATIONAL_CONSTANT;
use crate::systems::{CelestialBody, SinglePendulum, SolarSystem};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Scenario format understood by this build
///
/// Files must share the major version and may not be newer in minor version.
pub const SCENARIO_FORMAT_VERSION: &str = "1.0.0";

/// Top-level scenario document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Format version of the file, semantic versioning
    pub format_version: String,
    /// Integration settings
    pub simulation: SimulationConfig,
    /// Single pendulum parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pendulum: Option<PendulumConfig>,
    /// Planetary system parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_system: Option<SolarSystemConfig>,
}

/// Integration settings shared by every system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Integrator to use
    #[serde(default)]
    pub integrator: IntegratorKind,
    /// Number of recorded states, including the initial one
    pub steps: usize,
    /// Timestep in the system's time unit
    pub time_step: f64,
}

/// `[pendulum]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PendulumConfig {
    /// Mass of the bob
    pub mass: f64,
    /// Length of the rod
    #[serde(default = "default_length")]
    pub length: f64,
    /// Gravitational acceleration
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Starting angle in radians
    pub theta_start: f64,
}

fn default_length() -> f64 {
    crate::systems::single_pendulum::DEFAULT_LENGTH
}

fn default_gravity() -> f64 {
    9.81
}

/// Built-in body sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// [`SolarSystem::inner_planets`]
    InnerPlanets,
}

/// `[solar_system]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarSystemConfig {
    /// Gravitational constant
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    /// Softening length
    #[serde(default)]
    pub softening: f64,
    /// Start from a built-in body set instead of `bodies`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    /// Explicit bodies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bodies: Vec<CelestialBody>,
}

fn default_gravitational_constant() -> f64 {
    GRAVITATIONAL_CONSTANT
}

/// A validated, ready to run system
#[derive(Debug, Clone, PartialEq)]
pub enum Scenario {
    /// Single pendulum
    Pendulum(SinglePendulum),
    /// Planetary system
    SolarSystem(SolarSystem),
}

impl ScenarioConfig {
    /// Load and parse a scenario file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scenario");
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Render back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override the integrator
    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.simulation.integrator = integrator;
        self
    }

    /// Override the number of recorded states
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.simulation.steps = steps;
        self
    }

    /// Check that the file's format version is readable by this build
    pub fn check_format(&self) -> Result<()> {
        let found = Version::parse(self.format_version.trim())?;
        let supported = Version::parse(SCENARIO_FORMAT_VERSION)?;

        if is_format_compatible(&found, &supported) {
            Ok(())
        } else {
            Err(Error::IncompatibleFormat {
                found: found.to_string(),
                supported: SCENARIO_FORMAT_VERSION.to_string(),
            })
        }
    }

    /// Validate the document and build the system it describes
    pub fn build(&self) -> Result<Scenario> {
        self.check_format()?;

        let SimulationConfig {
            steps, time_step, ..
        } = self.simulation;

        match (&self.pendulum, &self.solar_system) {
            (Some(_), Some(_)) => Err(Error::Config(
                "scenario defines both [pendulum] and [solar_system]; pick one".to_string(),
            )),
            (None, None) => Err(Error::Config(
                "scenario defines no system; add [pendulum] or [solar_system]".to_string(),
            )),
            (Some(p), None) => Ok(Scenario::Pendulum(SinglePendulum::with_length(
                p.mass,
                p.length,
                p.gravity,
                p.theta_start,
                steps,
                time_step,
            )?)),
            (None, Some(s)) => {
                let system = match (s.preset, s.bodies.is_empty()) {
                    (Some(_), false) => {
                        return Err(Error::Config(
                            "[solar_system] sets both `preset` and `bodies`".to_string(),
                        ))
                    }
                    (Some(Preset::InnerPlanets), true) => {
                        SolarSystem::inner_planets(steps, time_step)?
                    }
                    (None, _) => SolarSystem::new(s.bodies.clone(), steps, time_step)?,
                };
                Ok(Scenario::SolarSystem(
                    system
                        .with_gravitational_constant(s.gravitational_constant)?
                        .with_softening(s.softening)?,
                ))
            }
        }
    }
}

impl FromStr for ScenarioConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Major versions must match; the file's minor version must not exceed ours
///
/// For 0.x versions every minor bump is breaking, so minors must match.
fn is_format_compatible(found: &Version, supported: &Version) -> bool {
    if found.major != supported.major {
        return false;
    }

    if found.major != 0 {
        found.minor <= supported.minor
    } else {
        found.minor == supported.minor
    }
}
