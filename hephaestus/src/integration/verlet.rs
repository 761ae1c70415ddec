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
//! Velocity Verlet integrator implementation
//!
//! The velocity Verlet algorithm is a symplectic integrator that provides
//! excellent energy conservation for Hamiltonian systems. It is particularly
//! well-suited for pendulums and orbital mechanics.
//!
//! # Algorithm
//!
//! ```text
//! x(t + dt)   = x(t) + v(t)*dt + 0.5*a(t)*dt²
//! v(t + dt/2) = v(t) + 0.5*a(t)*dt
//! a(t + dt)   = model(x(t + dt))
//! v(t + dt)   = v(t + dt/2) + 0.5*a(t + dt)*dt
//! ```
//!
//! # Properties
//!
//! - **Symplectic**: Preserves phase space volume (Liouville's theorem)
//! - **Time-reversible**: Running forward then backward returns to start
//! - **Energy conservation**: Bounded energy error over long periods
//! - **Second-order accurate**: Local error O(dt³), global error O(dt²)
//!
//! # References
//!
//! - Hairer, E., Lubich, C., & Wanner, G. (2006). Geometric Numerical Integration:
//!   Structure-Preserving Algorithms for Ordinary Differential Equations (2nd ed.).
//!   Springer. Section II.3.
//! - Swope, W. C., Andersen, H. C., Berens, P. H., & Wilson, K. R. (1982).
//!   A computer simulation method for the calculation of equilibrium constants for the
//!   formation of physical clusters of molecules: Application to small water clusters.
//!   The Journal of Chemical Physics, 76(1), 637-649.

use super::{check_state, check_timestep, require, ForceModel, Integrator};
use crate::error::Result;
use crate::state::{IntegrationState, PhaseVector};
use std::sync::Arc;

/// Velocity Verlet integrator for physics simulation
///
/// Needs a force model: the acceleration at the new position closes the
/// velocity update.
///
/// # Example
///
/// ```
/// use hephaestus::integration::{VelocityVerletIntegrator, Integrator};
///
/// let integrator = VelocityVerletIntegrator::<f64>::new(1.0 / 60.0, None).unwrap();
/// assert_eq!(integrator.timestep(), 1.0 / 60.0);
/// ```
pub struct VelocityVerletIntegrator<S> {
    timestep: f64,
    model: Option<Arc<dyn ForceModel<S>>>,
}

impl<S: PhaseVector> VelocityVerletIntegrator<S> {
    /// Create a new velocity Verlet integrator with the given timestep
    pub fn new(timestep: f64, model: Option<Arc<dyn ForceModel<S>>>) -> Result<Self> {
        Ok(VelocityVerletIntegrator {
            timestep: check_timestep(timestep)?,
            model,
        })
    }
}

impl<S: PhaseVector> Integrator<S> for VelocityVerletIntegrator<S> {
    fn name(&self) -> &str {
        "Velocity Verlet"
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

        // Step 1: drift with the current acceleration
        let position = state
            .position
            .add_scaled(&state.velocity, dt)
            .add_scaled(&state.acceleration, 0.5 * dt * dt);

        // Step 2: half kick
        let half_velocity = state.velocity.add_scaled(&state.acceleration, 0.5 * dt);

        // Step 3: acceleration at the new position, then the second half kick
        let acceleration = model.acceleration(&position);
        let velocity = half_velocity.add_scaled(&acceleration, 0.5 * dt);

        Ok(IntegrationState::new(position, velocity, acceleration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::state::Vector3;

    // a = -sin(x), the unit pendulum
    struct UnitPendulum;

    impl ForceModel<f64> for UnitPendulum {
        fn acceleration(&self, position: &f64) -> f64 {
            -position.sin()
        }

        fn name(&self) -> &str {
            "unit pendulum"
        }
    }

    struct NoForce;

    impl ForceModel<Vec<Vector3>> for NoForce {
        fn acceleration(&self, position: &Vec<Vector3>) -> Vec<Vector3> {
            position.zeros_like()
        }

        fn name(&self) -> &str {
            "free"
        }
    }

    #[test]
    fn test_verlet_creation() {
        let integrator = VelocityVerletIntegrator::<f64>::new(0.01, None).unwrap();
        assert_eq!(integrator.timestep(), 0.01);
        assert_eq!(integrator.name(), "Velocity Verlet");
    }

    #[test]
    fn test_verlet_invalid_timestep() {
        assert!(matches!(
            VelocityVerletIntegrator::<f64>::new(0.0, None),
            Err(Error::InvalidTimestep(_))
        ));
        assert!(VelocityVerletIntegrator::<f64>::new(-0.01, None).is_err());
        assert!(VelocityVerletIntegrator::<f64>::new(f64::NAN, None).is_err());
    }

    #[test]
    fn test_verlet_set_timestep() {
        let mut integrator = VelocityVerletIntegrator::<f64>::new(0.01, None).unwrap();
        integrator.set_timestep(0.02).unwrap();
        assert_eq!(integrator.timestep(), 0.02);
    }

    #[test]
    fn test_verlet_requires_model() {
        let integrator = VelocityVerletIntegrator::<f64>::new(0.1, None).unwrap();
        let result = integrator.perform_step(&IntegrationState::new(1.0, 0.0, 0.0));
        assert!(matches!(result, Err(Error::MissingInput { what: "force model" })));
    }

    #[test]
    fn test_verlet_pendulum_step() {
        let model: Arc<dyn ForceModel<f64>> = Arc::new(UnitPendulum);
        let integrator = VelocityVerletIntegrator::new(1.0, Some(model)).unwrap();

        let outcome = integrator
            .perform_step(&IntegrationState::new(1.0, 0.5, 2.0))
            .unwrap();

        assert!((outcome.position - 2.5).abs() < 1e-12);
        assert!((outcome.velocity - 1.200764).abs() < 1e-6);
        assert!((outcome.acceleration - -0.5984721).abs() < 1e-6);
    }

    #[test]
    fn test_verlet_free_motion() {
        // No forces: velocity stays constant, position moves linearly
        let model: Arc<dyn ForceModel<Vec<Vector3>>> = Arc::new(NoForce);
        let integrator = VelocityVerletIntegrator::new(0.1, Some(model)).unwrap();

        let state = IntegrationState::new(
            vec![Vector3::zero()],
            vec![Vector3::new(1.0, 2.0, 3.0)],
            vec![Vector3::zero()],
        );
        let outcome = integrator.perform_step(&state).unwrap();

        let pos = outcome.position[0];
        assert!((pos.x - 0.1).abs() < 1e-10);
        assert!((pos.y - 0.2).abs() < 1e-10);
        assert!((pos.z - 0.3).abs() < 1e-10);
        assert_eq!(outcome.velocity[0], Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_verlet_rejects_non_finite_state() {
        let model: Arc<dyn ForceModel<f64>> = Arc::new(UnitPendulum);
        let integrator = VelocityVerletIntegrator::new(0.1, Some(model)).unwrap();
        let result = integrator.perform_step(&IntegrationState::new(0.0, f64::INFINITY, 0.0));
        assert!(matches!(result, Err(Error::NonFiniteState)));
    }
}
