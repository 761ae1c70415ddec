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
//! Simple (single) pendulum
//!
//! A point mass on a massless rigid rod of length L swinging under uniform
//! gravity g. The configuration is the angle θ from the downward vertical:
//!
//! ```text
//! θ'' = -(g/L) sin θ
//! KE  = ½ m L² ω²
//! PE  = m g L (1 - cos θ)
//! ```

use crate::error::{Error, Result};
use crate::integration::{ForceModel, IntegratorKind};
use crate::simulation::{self, Trajectory};
use crate::state::IntegrationState;
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::{info, warn};

/// Default rod length in meters
pub const DEFAULT_LENGTH: f64 = 1.0;

/// Single pendulum simulation
///
/// # Example
///
/// ```
/// use hephaestus::systems::SinglePendulum;
/// use hephaestus::integration::IntegratorKind;
///
/// let pendulum = SinglePendulum::new(1.0, 9.81, 0.2, 500, 0.01).unwrap();
/// let run = pendulum.run_simulation(IntegratorKind::VelocityVerlet).unwrap();
/// assert_eq!(run.theta.len(), 500);
/// assert!(run.max_relative_energy_drift() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePendulum {
    mass: f64,
    length: f64,
    gravity: f64,
    theta_start: f64,
    steps: usize,
    time_step: f64,
}

impl SinglePendulum {
    /// Create a pendulum with a rod of [`DEFAULT_LENGTH`]
    ///
    /// The bob starts at rest at `theta_start` radians.
    pub fn new(
        mass: f64,
        gravity: f64,
        theta_start: f64,
        steps: usize,
        time_step: f64,
    ) -> Result<Self> {
        Self::with_length(mass, DEFAULT_LENGTH, gravity, theta_start, steps, time_step)
    }

    /// Create a pendulum with an explicit rod length
    pub fn with_length(
        mass: f64,
        length: f64,
        gravity: f64,
        theta_start: f64,
        steps: usize,
        time_step: f64,
    ) -> Result<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(Error::invalid("mass", format!("{mass} must be positive and finite")));
        }
        if !(length > 0.0 && length.is_finite()) {
            return Err(Error::invalid("length", format!("{length} must be positive and finite")));
        }
        if !(gravity >= 0.0 && gravity.is_finite()) {
            return Err(Error::invalid(
                "gravity",
                format!("{gravity} must be non-negative and finite"),
            ));
        }
        if !theta_start.is_finite() {
            return Err(Error::invalid("theta_start", "must be finite"));
        }
        if steps == 0 {
            return Err(Error::invalid("steps", "at least one step is required"));
        }
        if !(time_step > 0.0 && time_step.is_finite()) {
            return Err(Error::InvalidTimestep(time_step));
        }

        Ok(SinglePendulum {
            mass,
            length,
            gravity,
            theta_start,
            steps,
            time_step,
        })
    }

    /// Mass of the bob
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Length of the rod
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Gravitational acceleration
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Starting angle in radians
    pub fn theta_start(&self) -> f64 {
        self.theta_start
    }

    /// Number of recorded states
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Simulation timestep
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Angular acceleration at angle `theta`
    pub fn compute_forces(&self, theta: f64) -> f64 {
        -(self.gravity / self.length) * theta.sin()
    }

    /// Potential energy at angle `theta`, zero at the bottom of the swing
    pub fn potential_energy(&self, theta: f64) -> f64 {
        self.mass * self.gravity * self.length * (1.0 - theta.cos())
    }

    /// Kinetic energy at angular velocity `omega`
    pub fn kinetic_energy(&self, omega: f64) -> f64 {
        0.5 * self.mass * self.length * self.length * omega * omega
    }

    /// Period of small oscillations, 2π√(L/g)
    ///
    /// Infinite when gravity is zero.
    pub fn small_angle_period(&self) -> f64 {
        2.0 * PI * (self.length / self.gravity).sqrt()
    }

    /// The bob at rest at `theta_start`
    pub fn initial_state(&self) -> IntegrationState<f64> {
        IntegrationState::new(
            self.theta_start,
            0.0,
            self.compute_forces(self.theta_start),
        )
    }

    /// Integrate the pendulum for [`steps`](Self::steps) states
    pub fn run_simulation(&self, kind: IntegratorKind) -> Result<PendulumRun> {
        let model: Arc<dyn ForceModel<f64>> = Arc::new(self.clone());
        let integrator = kind.build(self.time_step, Some(model))?;
        let trajectory = simulation::run(integrator.as_ref(), self.initial_state(), self.steps)?;
        let run = PendulumRun::from_trajectory(self, &trajectory);

        let drift = run.max_relative_energy_drift();
        info!(
            model = ForceModel::name(self),
            integrator = %kind,
            energy_drift = drift,
            "pendulum run finished"
        );

        if drift > simulation::ENERGY_DRIFT_WARNING {
            warn!(
                integrator = %kind,
                drift,
                "pendulum energy drifted; consider a smaller time step or another integrator"
            );
        }

        Ok(run)
    }
}

impl ForceModel<f64> for SinglePendulum {
    fn acceleration(&self, position: &f64) -> f64 {
        self.compute_forces(*position)
    }

    fn name(&self) -> &str {
        "single pendulum"
    }
}

/// Recorded time series of a pendulum run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendulumRun {
    /// Timestep between samples
    pub time_step: f64,
    /// Angle θ per step
    pub theta: Vec<f64>,
    /// Angular velocity ω per step
    pub omega: Vec<f64>,
    /// Angular acceleration α per step
    pub alpha: Vec<f64>,
    /// Kinetic energy per step
    pub kinetic: Vec<f64>,
    /// Potential energy per step
    pub potential: Vec<f64>,
}

impl PendulumRun {
    fn from_trajectory(pendulum: &SinglePendulum, trajectory: &Trajectory<f64>) -> Self {
        let mut run = PendulumRun {
            time_step: trajectory.time_step(),
            ..Default::default()
        };

        for state in trajectory.states() {
            run.theta.push(state.position);
            run.omega.push(state.velocity);
            run.alpha.push(state.acceleration);
            run.kinetic.push(pendulum.kinetic_energy(state.velocity));
            run.potential.push(pendulum.potential_energy(state.position));
        }

        run
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Total mechanical energy per step
    pub fn total_energy(&self) -> Vec<f64> {
        self.kinetic
            .iter()
            .zip(&self.potential)
            .map(|(ke, pe)| ke + pe)
            .collect()
    }

    /// Largest |E(t) - E(0)| / E(0) over the run
    ///
    /// Falls back to absolute drift when the initial energy is zero
    /// (pendulum starting at rest at the bottom).
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
