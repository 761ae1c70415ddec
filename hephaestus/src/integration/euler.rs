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
//! Euler integrator implementation
//!
//! ```text
//! x(t + dt) = x(t) + v(t)*dt + 0.5*a(t)*dt²
//! v(t + dt) = v(t) + a(t)*dt
//! a(t + dt) = model(x(t + dt))
//! ```
//!
//! The position update treats the acceleration as constant over the step.
//! Without a force model the acceleration is carried over unchanged, which
//! makes this integrator exact for uniformly accelerated motion.

use super::{check_state, check_timestep, ForceModel, Integrator};
use crate::error::Result;
use crate::state::{IntegrationState, PhaseVector};
use std::sync::Arc;

/// First-order integrator with a constant-acceleration position update
///
/// # Example
///
/// ```
/// use hephaestus::integration::{EulerIntegrator, Integrator};
/// use hephaestus::state::IntegrationState;
///
/// let integrator = EulerIntegrator::<f64>::new(1.0, None).unwrap();
/// let next = integrator.perform_step(&IntegrationState::new(1.0, 0.5, 2.0)).unwrap();
/// assert_eq!(next.position, 2.5);
/// ```
pub struct EulerIntegrator<S> {
    timestep: f64,
    model: Option<Arc<dyn ForceModel<S>>>,
}

impl<S: PhaseVector> EulerIntegrator<S> {
    /// Create a new Euler integrator
    ///
    /// `model` is optional; without one the acceleration stays constant.
    pub fn new(timestep: f64, model: Option<Arc<dyn ForceModel<S>>>) -> Result<Self> {
        Ok(EulerIntegrator {
            timestep: check_timestep(timestep)?,
            model,
        })
    }
}

impl<S: PhaseVector> Integrator<S> for EulerIntegrator<S> {
    fn name(&self) -> &str {
        "Euler"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) -> Result<()> {
        self.timestep = check_timestep(dt)?;
        Ok(())
    }

    fn perform_step(&self, state: &IntegrationState<S>) -> Result<IntegrationState<S>> {
        check_state(state, self.model.as_ref())?;

        let dt = self.timestep;

        let position = state
            .position
            .add_scaled(&state.velocity, dt)
            .add_scaled(&state.acceleration, 0.5 * dt * dt);
        let velocity = state.velocity.add_scaled(&state.acceleration, dt);
        let acceleration = match &self.model {
            Some(model) => model.acceleration(&position),
            None => state.acceleration.clone(),
        };

        Ok(IntegrationState::new(position, velocity, acceleration))
    }
}
