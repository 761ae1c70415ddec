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
//! Runge-Kutta 4th order (RK4) integrator implementation
//!
//! The RK4 method is a classical explicit integrator that provides fourth-order
//! accuracy for smooth ordinary differential equations.
//!
//! # Algorithm
//!
//! For the second-order system x'' = a(x), written as y = (x, v):
//!
//! ```text
//! k1_x = v                    k1_v = a(x)
//! k2_x = v + k1_v*dt/2        k2_v = a(x + k1_x*dt/2)
//! k3_x = v + k2_v*dt/2        k3_v = a(x + k2_x*dt/2)
//! k4_x = v + k3_v*dt          k4_v = a(x + k3_x*dt)
//! x(t + dt) = x + (k1_x + 2*k2_x + 2*k3_x + k4_x)*dt/6
//! v(t + dt) = v + (k1_v + 2*k2_v + 2*k3_v + k4_v)*dt/6
//! ```
//!
//! The incoming acceleration is used as `k1_v`, so a step costs four model
//! evaluations: three stages plus the acceleration at the new position.
//!
//! # Properties
//!
//! - **Fourth-order accurate**: Local error O(dt⁵), global error O(dt⁴)
//! - **Not symplectic**: Energy may drift over long simulations
//!
//! # References
//!
//! - Butcher, J. C. (2016). Numerical Methods for Ordinary Differential Equations
//!   (3rd ed.). Wiley. Chapter 3.
//! - Press, W. H., Teukolsky, S. A., Vetterling, W. T., & Flannery, B. P. (2007).
//!   Numerical Recipes: The Art of Scientific Computing (3rd ed.). Cambridge
//!   University Press. Section 17.1.

use super::{check_state, check_timestep, require, ForceModel, Integrator};
use crate::error::Result;
use crate::state::{IntegrationState, PhaseVector};
use std::sync::Arc;

/// Runge-Kutta 4th order integrator for physics simulation
///
/// # Example
///
/// ```
/// use hephaestus::integration::{RK4Integrator, Integrator};
///
/// let integrator = RK4Integrator::<f64>::new(1.0 / 60.0, None).unwrap();
/// assert_eq!(integrator.name(), "Runge-Kutta 4");
/// ```
pub struct RK4Integrator<S> {
    timestep: f64,
    model: Option<Arc<dyn ForceModel<S>>>,
}

impl<S: PhaseVector> RK4Integrator<S> {
    /// Create a new RK4 integrator with the given timestep
    pub fn new(timestep: f64, model: Option<Arc<dyn ForceModel<S>>>) -> Result<Self> {
        Ok(RK4Integrator {
            timestep: check_timestep(timestep)?,
            model,
        })
    }
}

impl<S: PhaseVector> Integrator<S> for RK4Integrator<S> {
    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) -> Result<()> {
        self.timestep = check_timestep(dt)?;
        Ok(())
    }

    fn perform_step(&self, state: &IntegrationState<S>) -> Result<IntegrationState<S>> {
        let model = require(self.model.as_ref(), "force model")?;
        check_state(state, Some(model))?;

        let dt = self.timestep;
        let dt_2 = 0.5 * dt;
        let dt_6 = dt / 6.0;
        let x = &state.position;
        let v = &state.velocity;

        let k1_x = v.clone();
        let k1_v = state.acceleration.clone();

        let k2_x = v.add_scaled(&k1_v, dt_2);
        let k2_v = model.acceleration(&x.add_scaled(&k1_x, dt_2));

        let k3_x = v.add_scaled(&k2_v, dt_2);
        let k3_v = model.acceleration(&x.add_scaled(&k2_x, dt_2));

        let k4_x = v.add_scaled(&k3_v, dt);
        let k4_v = model.acceleration(&x.add_scaled(&k3_x, dt));

        let position = x
            .add_scaled(&k1_x, dt_6)
            .add_scaled(&k2_x, 2.0 * dt_6)
            .add_scaled(&k3_x, 2.0 * dt_6)
            .add_scaled(&k4_x, dt_6);
        let velocity = v
            .add_scaled(&k1_v, dt_6)
            .add_scaled(&k2_v, 2.0 * dt_6)
            .add_scaled(&k3_v, 2.0 * dt_6)
            .add_scaled(&k4_v, dt_6);
        let acceleration = model.acceleration(&position);

        Ok(IntegrationState::new(position, velocity, acceleration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Spring;

    impl ForceModel<f64> for Spring {
        fn acceleration(&self, position: &f64) -> f64 {
            -position
        }

        fn name(&self) -> &str {
            "spring"
        }
    }

    struct Uniform(f64);

    impl ForceModel<f64> for Uniform {
        fn acceleration(&self, _position: &f64) -> f64 {
            self.0
        }

        fn name(&self) -> &str {
            "uniform"
        }
    }

    #[test]
    fn test_rk4_creation() {
        let integrator = RK4Integrator::<f64>::new(0.01, None).unwrap();
        assert_eq!(integrator.timestep(), 0.01);
        assert_eq!(integrator.name(), "Runge-Kutta 4");
    }

    #[test]
    fn test_rk4_invalid_timestep() {
        assert!(matches!(
            RK4Integrator::<f64>::new(0.0, None),
            Err(Error::InvalidTimestep(_))
        ));
    }

    #[test]
    fn test_rk4_set_timestep() {
        let mut integrator = RK4Integrator::<f64>::new(0.01, None).unwrap();
        integrator.set_timestep(0.02).unwrap();
        assert_eq!(integrator.timestep(), 0.02);
    }

    #[test]
    fn test_rk4_requires_model() {
        let integrator = RK4Integrator::<f64>::new(0.01, None).unwrap();
        let result = integrator.perform_step(&IntegrationState::new(0.0, 1.0, 0.0));
        assert!(matches!(result, Err(Error::MissingInput { .. })));
    }

    #[test]
    fn test_rk4_exact_for_uniform_acceleration() {
        let model: Arc<dyn ForceModel<f64>> = Arc::new(Uniform(10.0));
        let integrator = RK4Integrator::new(0.1, Some(model)).unwrap();

        let outcome = integrator
            .perform_step(&IntegrationState::new(0.0, 0.0, 10.0))
            .unwrap();

        // x = 0.5*a*dt² = 0.05, v = a*dt = 1.0
        assert!((outcome.position - 0.05).abs() < 1e-12);
        assert!((outcome.velocity - 1.0).abs() < 1e-12);
        assert_eq!(outcome.acceleration, 10.0);
    }

    #[test]
    fn test_rk4_harmonic_oscillator_accuracy() {
        // x'' = -x with x(0) = 1, v(0) = 0 has x(t) = cos(t)
        let model: Arc<dyn ForceModel<f64>> = Arc::new(Spring);
        let integrator = RK4Integrator::new(0.01, Some(model)).unwrap();

        let mut state = IntegrationState::new(1.0, 0.0, -1.0);
        for _ in 0..100 {
            state = integrator.perform_step(&state).unwrap();
        }

        assert!((state.position - 1.0_f64.cos()).abs() < 1e-9);
        assert!((state.velocity + 1.0_f64.sin()).abs() < 1e-9);
    }
}
