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
//! Fixed-step simulation driver
//!
//! Repeatedly hands the previous state to an integrator and records every
//! outcome. Systems build their initial state, call [`run`], and derive
//! energies and forces from the resulting [`Trajectory`].

use crate::error::{Error, Result, TimestepWarning};
use crate::integration::Integrator;
use crate::state::{IntegrationState, PhaseVector};
use tracing::{debug, info, warn};

/// Relative energy drift above which a finished run is logged as a warning
pub const ENERGY_DRIFT_WARNING: f64 = 0.01;

/// Time-ordered record of integration states
///
/// Index 0 holds the initial conditions; index `i` the state at
/// `t = i * time_step`.
#[derive(Debug, Clone)]
pub struct Trajectory<S> {
    time_step: f64,
    states: Vec<IntegrationState<S>>,
}

impl<S: PhaseVector> Trajectory<S> {
    /// Timestep between consecutive states
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Number of recorded states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no states were recorded
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All recorded states
    pub fn states(&self) -> &[IntegrationState<S>] {
        &self.states
    }

    /// The final state
    pub fn last(&self) -> Option<&IntegrationState<S>> {
        self.states.last()
    }

    /// Simulation time of every recorded state
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.states.len()).map(move |i| i as f64 * self.time_step)
    }

    /// Consume the trajectory, yielding its states
    pub fn into_states(self) -> Vec<IntegrationState<S>> {
        self.states
    }
}

/// Run `integrator` from `initial` until `steps` states are recorded
///
/// The initial state counts as the first of the `steps` states. Stops with
/// [`Error::Diverged`] at the first step that produces NaN or infinity.
///
/// # Examples
///
/// ```
/// use hephaestus::integration::{EulerIntegrator};
/// use hephaestus::simulation::run;
/// use hephaestus::state::IntegrationState;
///
/// // Free fall without a force model: acceleration stays constant
/// let integrator = EulerIntegrator::<f64>::new(0.1, None).unwrap();
/// let trajectory = run(&integrator, IntegrationState::new(0.0, 0.0, -9.81), 11).unwrap();
/// assert_eq!(trajectory.len(), 11);
/// let fallen = trajectory.last().unwrap().position;
/// assert!((fallen + 0.5 * 9.81).abs() < 1e-9);
/// ```
pub fn run<S: PhaseVector>(
    integrator: &dyn Integrator<S>,
    initial: IntegrationState<S>,
    steps: usize,
) -> Result<Trajectory<S>> {
    if steps == 0 {
        return Err(Error::invalid("steps", "at least one step is required"));
    }
    if !initial.is_finite() {
        return Err(Error::NonFiniteState);
    }
    // TooLarge assumes seconds-scale dynamics; planetary steps always trip it
    match integrator.validate_timestep() {
        Err(warning @ TimestepWarning::TooSmall(_)) => warn!("{warning}"),
        Err(warning) => debug!("{warning}"),
        Ok(()) => {}
    }

    info!(
        integrator = integrator.name(),
        steps,
        time_step = integrator.timestep(),
        "running simulation"
    );

    let report_every = (steps / 10).max(1);
    let mut states = Vec::new();
    states
        .try_reserve(steps)
        .map_err(|e| Error::invalid("steps", format!("cannot record {steps} states: {e}")))?;
    states.push(initial);

    for step in 1..steps {
        let next = integrator.perform_step(&states[step - 1])?;
        if !next.is_finite() {
            warn!(step, "integration produced non-finite state");
            return Err(Error::Diverged { step });
        }
        states.push(next);

        if step % report_every == 0 {
            debug!(step, total = steps, "simulation progress");
        }
    }

    info!(states = states.len(), "simulation complete");

    Ok(Trajectory {
        time_step: integrator.timestep(),
        states,
    })
}
