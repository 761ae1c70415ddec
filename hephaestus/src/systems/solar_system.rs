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
//! Planetary motion under Newtonian gravity
//!
//! Every body attracts every other body with a force proportional to the
//! product of their masses and inversely proportional to the square of the
//! distance between them:
//!
//! **F = G * (m₁ * m₂) / r²**
//!
//! # Softening
//!
//! An optional softening length ε replaces r² with r² + ε², which keeps
//! forces finite during close encounters. The potential energy uses the same
//! softened distance so that energy bookkeeping stays consistent with the
//! forces. The default is no softening.
//!
//! # Parallel Computation
//!
//! For N bodies the acceleration evaluation costs N*(N-1) pair interactions.
//! With the `parallel` feature the per-body sums are distributed across the
//! Rayon thread pool.
//!
//! # References
//!
//! - Newton, I. (1687). "Philosophiæ Naturalis Principia Mathematica"
//! - Aarseth, S. J. (2003). "Gravitational N-Body Simulations"

use crate::error::{Error, Result};
use crate::integration::{ForceModel, IntegratorKind};
use crate::simulation::{self, Trajectory};
use crate::state::{IntegrationState, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gravitational constant in SI units (m³/(kg⋅s²))
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

/// Astronomical Unit in meters (average Earth-Sun distance)
pub const AU: f64 = 1.495978707e11;

/// One Earth day in seconds
pub const DAY: f64 = 86400.0;

/// A body taking part in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Unique name, e.g. "Earth"
    pub name: String,
    /// Mass in kilograms
    pub mass: f64,
    /// Initial position in meters
    pub position: Vector3,
    /// Initial velocity in meters per second
    #[serde(default)]
    pub velocity: Vector3,
}

impl CelestialBody {
    /// Create a body
    pub fn new(name: impl Into<String>, mass: f64, position: Vector3, velocity: Vector3) -> Self {
        CelestialBody {
            name: name.into(),
            mass,
            position,
            velocity,
        }
    }
}

/// Bodies from the NASA Planetary Fact Sheet: mass (kg), mean distance (m),
/// mean orbital velocity (m/s)
const INNER_PLANETS: &[(&str, f64, f64, f64)] = &[
    ("Mercury", 3.301e23, 0.387 * AU, 47870.0),
    ("Venus", 4.867e24, 0.723 * AU, 35020.0),
    ("Earth", 5.972e24, 1.0 * AU, 29780.0),
    ("Mars", 6.417e23, 1.524 * AU, 24070.0),
];

const SUN_MASS: f64 = 1.989e30;

/// N-body gravitational simulation of a planetary system
///
/// # Example
///
/// ```
/// use hephaestus::systems::SolarSystem;
/// use hephaestus::systems::solar_system::DAY;
/// use hephaestus::integration::IntegratorKind;
///
/// let system = SolarSystem::inner_planets(30, DAY).unwrap();
/// let run = system.run_simulation(IntegratorKind::VelocityVerlet).unwrap();
/// assert_eq!(run.positions.len(), 30);
/// assert_eq!(run.names.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
    gravitational_constant: f64,
    softening: f64,
    steps: usize,
    time_step: f64,
}

impl SolarSystem {
    /// Create a system with the standard gravitational constant and no softening
    ///
    /// Body names must be unique and masses positive and finite.
    pub fn new(bodies: Vec<CelestialBody>, steps: usize, time_step: f64) -> Result<Self> {
        if bodies.is_empty() {
            return Err(Error::MissingInput { what: "solar system bodies" });
        }

        let mut seen = HashSet::new();
        for body in &bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(Error::invalid(
                    "bodies",
                    format!("duplicate body name `{}`", body.name),
                ));
            }
            if !(body.mass > 0.0 && body.mass.is_finite()) {
                return Err(Error::invalid(
                    "mass",
                    format!("{} has mass {}; must be positive and finite", body.name, body.mass),
                ));
            }
            if !body.position.is_finite() || !body.velocity.is_finite() {
                return Err(Error::invalid(
                    "bodies",
                    format!("{} has a non-finite position or velocity", body.name),
                ));
            }
        }

        if steps == 0 {
            return Err(Error::invalid("steps", "at least one step is required"));
        }
        if !(time_step > 0.0 && time_step.is_finite()) {
            return Err(Error::InvalidTimestep(time_step));
        }

        Ok(SolarSystem {
            bodies,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            softening: 0.0,
            steps,
            time_step,
        })
    }

    /// Sun, Mercury, Venus, Earth and Mars on circular orbits in the x-y plane
    ///
    /// Planets start on the positive x axis moving in +y. The Sun is given
    /// the recoil velocity that makes the total momentum zero, so the system
    /// does not drift.
    pub fn inner_planets(steps: usize, time_step: f64) -> Result<Self> {
        let mut bodies = vec![CelestialBody::new(
            "Sun",
            SUN_MASS,
            Vector3::zero(),
            Vector3::zero(),
        )];
        let mut planet_momentum = Vector3::zero();

        for &(name, mass, distance, speed) in INNER_PLANETS {
            let velocity = Vector3::new(0.0, speed, 0.0);
            planet_momentum += velocity * mass;
            bodies.push(CelestialBody::new(
                name,
                mass,
                Vector3::new(distance, 0.0, 0.0),
                velocity,
            ));
        }
        bodies[0].velocity = -planet_momentum * (1.0 / SUN_MASS);

        Self::new(bodies, steps, time_step)
    }

    /// Replace the gravitational constant
    pub fn with_gravitational_constant(mut self, g: f64) -> Result<Self> {
        if !(g >= 0.0 && g.is_finite()) {
            return Err(Error::invalid(
                "gravitational_constant",
                format!("{g} must be non-negative and finite"),
            ));
        }
        self.gravitational_constant = g;
        Ok(self)
    }

    /// Set the softening length ε in meters
    pub fn with_softening(mut self, softening: f64) -> Result<Self> {
        if !(softening >= 0.0 && softening.is_finite()) {
            return Err(Error::invalid(
                "softening",
                format!("{softening} must be non-negative and finite"),
            ));
        }
        self.softening = softening;
        Ok(self)
    }

    /// Bodies in simulation order
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Gravitational constant in use
    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Softening length in use
    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// Number of recorded states
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Simulation timestep in seconds
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Gravitational force on the first body exerted by the second
    ///
    /// Points from `pos_1` towards `pos_2`. Coincident bodies with no
    /// softening feel no force.
    pub fn compute_forces(&self, pos_1: Vector3, pos_2: Vector3, mass_1: f64, mass_2: f64) -> Vector3 {
        let separation = pos_2 - pos_1;
        let softened_r_squared = separation.norm_squared() + self.softening * self.softening;

        if softened_r_squared == 0.0 {
            return Vector3::zero();
        }

        // F_vec = G*m1*m2 * r_vec / (r²+ε²)^(3/2)
        let r = softened_r_squared.sqrt();
        let scale = self.gravitational_constant * mass_1 * mass_2 / (softened_r_squared * r);
        separation * scale
    }

    /// Fail unless `count` matches the number of bodies
    fn check_body_count(&self, count: usize) -> Result<()> {
        if count == self.bodies.len() {
            Ok(())
        } else {
            Err(Error::invalid(
                "bodies",
                format!("state has {count} bodies, system has {}", self.bodies.len()),
            ))
        }
    }

    /// Acceleration of the body at `own` due to every other body
    fn acceleration_of(&self, index: usize, own: Vector3, positions: &[Vector3]) -> Vector3 {
        let mut total = Vector3::zero();

        for (other, (body, position)) in self.bodies.iter().zip(positions).enumerate() {
            if other == index {
                continue;
            }
            // Unit mass for the receiving body yields acceleration directly
            total += self.compute_forces(own, *position, 1.0, body.mass);
        }

        total
    }

    #[cfg(feature = "parallel")]
    fn accelerations(&self, positions: &[Vector3]) -> Vec<Vector3> {
        positions
            .par_iter()
            .enumerate()
            .map(|(index, own)| self.acceleration_of(index, *own, positions))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn accelerations(&self, positions: &[Vector3]) -> Vec<Vector3> {
        positions
            .iter()
            .enumerate()
            .map(|(index, own)| self.acceleration_of(index, *own, positions))
            .collect()
    }

    /// Pairwise Euclidean distances, `matrix[i][j] = |r_i - r_j|`
    pub fn distance_matrix(&self, positions: &[Vector3]) -> Vec<Vec<f64>> {
        positions
            .iter()
            .map(|a| positions.iter().map(|b| (*a - *b).norm()).collect())
            .collect()
    }

    /// Kinetic energy ½ m v² of every body
    ///
    /// Fails if `velocities` does not hold one entry per body.
    pub fn kinetic_energies(&self, velocities: &[Vector3]) -> Result<Vec<f64>> {
        self.check_body_count(velocities.len())?;
        Ok(self
            .bodies
            .iter()
            .zip(velocities)
            .map(|(body, v)| 0.5 * body.mass * v.norm_squared())
            .collect())
    }

    /// Potential energy share of every body
    ///
    /// Each pair contributes -G m₁ m₂ / r, split evenly between the two
    /// bodies, so the shares sum to [`potential_energy`](Self::potential_energy).
    pub fn potential_energies(&self, positions: &[Vector3]) -> Result<Vec<f64>> {
        self.check_body_count(positions.len())?;
        let n = self.bodies.len();
        let mut shares = vec![0.0; n];
        let softening_squared = self.softening * self.softening;

        for i in 0..n {
            for j in (i + 1)..n {
                let r_squared = (positions[j] - positions[i]).norm_squared() + softening_squared;
                if r_squared == 0.0 {
                    continue;
                }
                let pe = -self.gravitational_constant * self.bodies[i].mass * self.bodies[j].mass
                    / r_squared.sqrt();
                shares[i] += 0.5 * pe;
                shares[j] += 0.5 * pe;
            }
        }

        Ok(shares)
    }

    /// Total gravitational potential energy
    pub fn potential_energy(&self, positions: &[Vector3]) -> Result<f64> {
        Ok(self.potential_energies(positions)?.iter().sum())
    }

    /// Total linear momentum Σ m v
    pub fn total_momentum(&self, velocities: &[Vector3]) -> Result<Vector3> {
        self.check_body_count(velocities.len())?;
        Ok(self
            .bodies
            .iter()
            .zip(velocities)
            .fold(Vector3::zero(), |acc, (body, v)| acc + *v * body.mass))
    }

    /// Initial positions, velocities and accelerations of all bodies
    pub fn initial_state(&self) -> IntegrationState<Vec<Vector3>> {
        let positions: Vec<Vector3> = self.bodies.iter().map(|b| b.position).collect();
        let velocities = self.bodies.iter().map(|b| b.velocity).collect();
        let accelerations = self.accelerations(&positions);
        IntegrationState::new(positions, velocities, accelerations)
    }

    /// Integrate the system for [`steps`](Self::steps) states
    pub fn run_simulation(&self, kind: IntegratorKind) -> Result<SolarSystemRun> {
        let model: Arc<dyn ForceModel<Vec<Vector3>>> = Arc::new(self.clone());
        let integrator = kind.build(self.time_step, Some(model))?;
        let trajectory = simulation::run(integrator.as_ref(), self.initial_state(), self.steps)?;
        let run = SolarSystemRun::from_trajectory(self, trajectory)?;

        let drift = run.max_relative_energy_drift();
        info!(
            model = ForceModel::name(self),
            integrator = %kind,
            bodies = self.bodies.len(),
            energy_drift = drift,
            "solar system run finished"
        );

        if drift > simulation::ENERGY_DRIFT_WARNING {
            warn!(
                integrator = %kind,
                drift,
                "solar system energy drifted; consider a smaller time step or another integrator"
            );
        }

        Ok(run)
    }
}

impl ForceModel<Vec<Vector3>> for SolarSystem {
    fn acceleration(&self, position: &Vec<Vector3>) -> Vec<Vector3> {
        self.accelerations(position)
    }

    fn name(&self) -> &str {
        "solar system"
    }

    fn check_shape(&self, position: &Vec<Vector3>) -> Result<()> {
        self.check_body_count(position.len())
    }
}

/// Recorded time series of a solar system run
///
/// Every per-body table is indexed `[step][body]`, bodies in the order of
/// [`names`](Self::names).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolarSystemRun {
    /// Timestep between samples in seconds
    pub time_step: f64,
    /// Body names
    pub names: Vec<String>,
    /// Positions in meters
    pub positions: Vec<Vec<Vector3>>,
    /// Velocities in meters per second
    pub velocities: Vec<Vec<Vector3>>,
    /// Accelerations in meters per second squared
    pub accelerations: Vec<Vec<Vector3>>,
    /// Net gravitational force on each body in newtons
    pub forces: Vec<Vec<Vector3>>,
    /// Kinetic energy of each body
    pub kinetic: Vec<Vec<f64>>,
    /// Potential energy share of each body
    pub potential: Vec<Vec<f64>>,
}

impl SolarSystemRun {
    fn from_trajectory(system: &SolarSystem, trajectory: Trajectory<Vec<Vector3>>) -> Result<Self> {
        let mut run = SolarSystemRun {
            time_step: trajectory.time_step(),
            names: system.bodies.iter().map(|b| b.name.clone()).collect(),
            ..Default::default()
        };

        for state in trajectory.into_states() {
            run.kinetic.push(system.kinetic_energies(&state.velocity)?);
            run.potential.push(system.potential_energies(&state.position)?);
            run.forces.push(
                system
                    .bodies
                    .iter()
                    .zip(&state.acceleration)
                    .map(|(body, a)| *a * body.mass)
                    .collect(),
            );
            run.positions.push(state.position);
            run.velocities.push(state.velocity);
            run.accelerations.push(state.acceleration);
        }

        Ok(run)
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index of the body called `name`
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Position history of the body called `name`
    ///
    /// `None` if no such body exists or a step lacks its entry.
    pub fn body_positions(&self, name: &str) -> Option<Vec<Vector3>> {
        let index = self.body_index(name)?;
        self.positions.iter().map(|step| step.get(index).copied()).collect()
    }

    /// Total (kinetic + potential) energy per step
    pub fn total_energy(&self) -> Vec<f64> {
        self.kinetic
            .iter()
            .zip(&self.potential)
            .map(|(ke, pe)| ke.iter().sum::<f64>() + pe.iter().sum::<f64>())
            .collect()
    }

    /// Largest |E(t) - E(0)| / |E(0)| over the run
    pub fn max_relative_energy_drift(&self) -> f64 {
        let energy = self.total_energy();
        let Some(&initial) = energy.first() else {
            return 0.0;
        };
        let scale = if initial.abs() > f64::EPSILON { initial.abs() } else { 1.0 };

        energy
            .iter()
            .map(|e| (e - initial).abs() / scale)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bodies() -> Vec<CelestialBody> {
        vec![
            CelestialBody::new("A", 1.0, Vector3::new(0.0, 0.0, 0.0), Vector3::zero()),
            CelestialBody::new("B", 2.0, Vector3::new(2.0, 0.0, 0.0), Vector3::zero()),
        ]
    }

    #[test]
    fn test_gravitational_constant() {
        assert!(GRAVITATIONAL_CONSTANT > 6.6e-11);
        assert!(GRAVITATIONAL_CONSTANT < 6.7e-11);
    }

    #[test]
    fn test_rejects_invalid_systems() {
        assert!(matches!(
            SolarSystem::new(vec![], 10, 1.0),
            Err(Error::MissingInput { .. })
        ));

        let mut duplicate = two_bodies();
        duplicate[1].name = "A".to_string();
        assert!(SolarSystem::new(duplicate, 10, 1.0).is_err());

        let mut massless = two_bodies();
        massless[0].mass = 0.0;
        assert!(SolarSystem::new(massless, 10, 1.0).is_err());

        assert!(SolarSystem::new(two_bodies(), 0, 1.0).is_err());
        assert!(SolarSystem::new(two_bodies(), 10, -1.0).is_err());

        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        assert!(system.clone().with_softening(-1.0).is_err());
        assert!(system.with_gravitational_constant(f64::NAN).is_err());
    }

    #[test]
    fn test_pairwise_force() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0)
            .unwrap()
            .with_gravitational_constant(1.0)
            .unwrap();

        // F = G m1 m2 / r² = 1 * 1 * 2 / 4, towards B
        let force = system.compute_forces(Vector3::zero(), Vector3::new(2.0, 0.0, 0.0), 1.0, 2.0);
        assert!((force.x - 0.5).abs() < 1e-12);
        assert_eq!(force.y, 0.0);

        // Newton's third law
        let reaction = system.compute_forces(Vector3::new(2.0, 0.0, 0.0), Vector3::zero(), 2.0, 1.0);
        assert_eq!(reaction, -force);
    }

    #[test]
    fn test_coincident_bodies_feel_no_force() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        let force = system.compute_forces(Vector3::zero(), Vector3::zero(), 1.0, 1.0);
        assert_eq!(force, Vector3::zero());
    }

    #[test]
    fn test_softening_reduces_force() {
        let hard = SolarSystem::new(two_bodies(), 10, 1.0)
            .unwrap()
            .with_gravitational_constant(1.0)
            .unwrap();
        let soft = hard.clone().with_softening(1.0).unwrap();

        let a = Vector3::zero();
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert!(soft.compute_forces(a, b, 1.0, 1.0).norm() < hard.compute_forces(a, b, 1.0, 1.0).norm());
    }

    #[test]
    fn test_accelerations() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0)
            .unwrap()
            .with_gravitational_constant(1.0)
            .unwrap();
        let state = system.initial_state();

        // a_A = G m_B / r² = 0.5 towards +x, a_B = G m_A / r² = 0.25 towards -x
        assert!((state.acceleration[0].x - 0.5).abs() < 1e-12);
        assert!((state.acceleration[1].x + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_distance_matrix() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        let positions = vec![Vector3::zero(), Vector3::new(3.0, 4.0, 0.0)];
        let matrix = system.distance_matrix(&positions);
        assert_eq!(matrix, vec![vec![0.0, 5.0], vec![5.0, 0.0]]);
    }

    #[test]
    fn test_energies() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0)
            .unwrap()
            .with_gravitational_constant(1.0)
            .unwrap();
        let positions = vec![Vector3::zero(), Vector3::new(2.0, 0.0, 0.0)];
        let velocities = vec![Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)];

        assert_eq!(system.kinetic_energies(&velocities).unwrap(), vec![2.0, 1.0]);

        // -G m1 m2 / r = -1, split evenly
        assert_eq!(system.potential_energies(&positions).unwrap(), vec![-0.5, -0.5]);
        assert_eq!(system.potential_energy(&positions).unwrap(), -1.0);
    }

    #[test]
    fn test_total_momentum() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        let velocities = vec![Vector3::new(2.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)];
        assert_eq!(system.total_momentum(&velocities).unwrap(), Vector3::zero());
    }

    #[test]
    fn test_body_count_mismatch_rejected() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        let one = vec![Vector3::zero()];

        for result in [
            system.kinetic_energies(&one).map(|_| ()),
            system.potential_energies(&one).map(|_| ()),
            system.total_momentum(&one).map(|_| ()),
            system.check_shape(&one),
        ] {
            assert!(matches!(result, Err(Error::InvalidParameter { name: "bodies", .. })));
        }

        // Direct evaluation on a short state must not panic
        assert_eq!(system.acceleration(&one).len(), 1);
    }

    #[test]
    fn test_force_model_name() {
        let system = SolarSystem::new(two_bodies(), 10, 1.0).unwrap();
        assert_eq!(ForceModel::name(&system), "solar system");
    }

    #[test]
    fn test_inner_planets_preset() {
        let system = SolarSystem::inner_planets(10, DAY).unwrap();
        let names: Vec<&str> = system.bodies().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Sun", "Mercury", "Venus", "Earth", "Mars"]);

        let velocities: Vec<Vector3> = system.bodies().iter().map(|b| b.velocity).collect();
        let momentum = system.total_momentum(&velocities).unwrap();
        assert!(momentum.norm() < 1e-6 * SUN_MASS);
    }

    #[test]
    fn test_run_tables_are_consistent() {
        let system = SolarSystem::inner_planets(20, DAY).unwrap();
        let run = system.run_simulation(IntegratorKind::RungeKutta).unwrap();

        assert_eq!(run.len(), 20);
        assert_eq!(run.body_index("Earth"), Some(3));
        assert_eq!(run.body_index("Pluto"), None);
        assert_eq!(run.body_positions("Earth").unwrap().len(), 20);

        for step in 0..run.len() {
            assert_eq!(run.positions[step].len(), 5);
            assert_eq!(run.kinetic[step].len(), 5);
            let sun_force = run.forces[step][0];
            let expected = run.accelerations[step][0] * SUN_MASS;
            assert!((sun_force - expected).norm() <= 1e-9 * expected.norm());
        }
    }
}
