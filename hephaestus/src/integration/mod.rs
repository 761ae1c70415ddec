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
//! Numerical integration methods for physics simulation
//!
//! This module provides different numerical integration schemes that advance
//! an [`IntegrationState`] by one timestep. Each integrator has different
//! accuracy, stability, and performance characteristics.
//!
//! # Integrators
//!
//! - **Euler**: Constant-acceleration update, one model evaluation per step
//! - **Velocity Verlet**: Symplectic integrator with good energy conservation
//! - **RK4 (Runge-Kutta 4th order)**: Higher accuracy for smooth dynamics
//!
//! # Choosing an Integrator
//!
//! - **Velocity Verlet**: Best for long-running simulations with oscillatory motion
//!   (pendulums, orbital mechanics). Bounded energy error.
//!
//! - **RK4**: Best for short simulations requiring high accuracy. Four model
//!   evaluations per step and energy drifts slowly over long runs.
//!
//! - **Euler**: Cheapest, mostly useful as a baseline. Energy grows steadily.
//!
//! # Timestep Guidelines
//!
//! - Too small: Numerical precision issues and wasted computation
//! - Too large: Instability and inaccuracy
//! - For stiff systems: Smaller timesteps or implicit integrators may be needed

use crate::error::{Error, Result, TimestepWarning};
use crate::state::{IntegrationState, PhaseVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod euler;
mod rk4;
mod verlet;

pub use euler::EulerIntegrator;
pub use rk4::RK4Integrator;
pub use verlet::VelocityVerletIntegrator;

/// The simulated system, as seen by an integrator
///
/// Integrators only need to know the acceleration at a given configuration.
/// Systems with velocity-dependent forces are out of scope.
pub trait ForceModel<S>: Send + Sync {
    /// Acceleration of the system when it is at `position`
    fn acceleration(&self, position: &S) -> S;

    /// Descriptive name used in logs
    fn name(&self) -> &str;

    /// Reject positions this model cannot evaluate
    ///
    /// Integrators call this before every step. The default accepts any
    /// position.
    fn check_shape(&self, _position: &S) -> Result<()> {
        Ok(())
    }
}

/// Unwrap a required input or report which one was missing
///
/// # Examples
///
/// ```
/// use hephaestus::integration::require;
///
/// assert_eq!(require(Some(3), "steps").unwrap(), 3);
/// assert!(require::<u32>(None, "steps").is_err());
/// ```
pub fn require<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(Error::MissingInput { what })
}

/// Validate a state before stepping it, against `model` if there is one
pub(crate) fn check_state<S: PhaseVector>(
    state: &IntegrationState<S>,
    model: Option<&Arc<dyn ForceModel<S>>>,
) -> Result<()> {
    if !state.is_finite() {
        return Err(Error::NonFiniteState);
    }
    if !state.is_consistent() {
        return Err(Error::invalid(
            "state",
            "position, velocity and acceleration differ in shape",
        ));
    }
    match model {
        Some(model) => model.check_shape(&state.position),
        None => Ok(()),
    }
}

pub(crate) fn check_timestep(dt: f64) -> Result<f64> {
    if dt > 0.0 && dt.is_finite() {
        Ok(dt)
    } else {
        Err(Error::InvalidTimestep(dt))
    }
}

/// Trait for numerical integration methods
///
/// Integrators advance position, velocity and acceleration by one timestep.
/// Different integrators trade off between accuracy, stability, and
/// computational cost.
pub trait Integrator<S: PhaseVector>: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// Fails if the timestep is non-positive, NaN, or infinite.
    fn set_timestep(&mut self, dt: f64) -> Result<()>;

    /// Check the timestep for numerical risk
    ///
    /// Extremely small timesteps may lead to precision loss, while large
    /// timesteps may cause instability.
    fn validate_timestep(&self) -> std::result::Result<(), TimestepWarning> {
        let dt = self.timestep();

        if dt < 1e-9 {
            return Err(TimestepWarning::TooSmall(dt));
        }

        if dt > 1.0 {
            return Err(TimestepWarning::TooLarge(dt));
        }

        Ok(())
    }

    /// Advance `state` by one timestep
    ///
    /// Returns the new position, velocity and acceleration. Rejects input
    /// containing NaN or infinity.
    fn perform_step(&self, state: &IntegrationState<S>) -> Result<IntegrationState<S>>;
}

/// Integrators selectable by name from scenario files and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// [`EulerIntegrator`]
    Euler,
    /// [`VelocityVerletIntegrator`]
    #[default]
    #[serde(alias = "verlet")]
    VelocityVerlet,
    /// [`RK4Integrator`]
    #[serde(alias = "rk4")]
    RungeKutta,
}

impl IntegratorKind {
    /// All selectable integrators
    pub const ALL: [IntegratorKind; 3] = [
        IntegratorKind::Euler,
        IntegratorKind::VelocityVerlet,
        IntegratorKind::RungeKutta,
    ];

    /// Build the integrator for `model`
    ///
    /// `model` may be `None` for integrators that can run without one; the
    /// failure then surfaces on the first step of those that cannot.
    pub fn build<S: PhaseVector + 'static>(
        self,
        timestep: f64,
        model: Option<Arc<dyn ForceModel<S>>>,
    ) -> Result<Box<dyn Integrator<S>>> {
        Ok(match self {
            IntegratorKind::Euler => Box::new(EulerIntegrator::new(timestep, model)?),
            IntegratorKind::VelocityVerlet => {
                Box::new(VelocityVerletIntegrator::new(timestep, model)?)
            }
            IntegratorKind::RungeKutta => Box::new(RK4Integrator::new(timestep, model)?),
        })
    }

    /// Canonical name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::VelocityVerlet => "velocity_verlet",
            IntegratorKind::RungeKutta => "runge_kutta",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "euler" => Ok(IntegratorKind::Euler),
            "velocity_verlet" | "verlet" => Ok(IntegratorKind::VelocityVerlet),
            "runge_kutta" | "rk4" => Ok(IntegratorKind::RungeKutta),
            other => Err(Error::invalid(
                "integrator",
                format!("unknown integrator `{other}` (expected euler, velocity_verlet or runge_kutta)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Spring {
        stiffness: f64,
    }

    impl ForceModel<f64> for Spring {
        fn acceleration(&self, position: &f64) -> f64 {
            -self.stiffness * position
        }

        fn name(&self) -> &str {
            "spring"
        }
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(1.5), "time step").unwrap(), 1.5);

        let err = require::<f64>(None, "initial conditions").unwrap_err();
        assert!(matches!(err, Error::MissingInput { what: "initial conditions" }));
        assert!(err.to_string().contains("initial conditions"));
    }

    #[test]
    fn test_check_timestep() {
        assert!(check_timestep(0.01).is_ok());
        assert!(matches!(check_timestep(0.0), Err(Error::InvalidTimestep(_))));
        assert!(matches!(check_timestep(-1.0), Err(Error::InvalidTimestep(_))));
        assert!(matches!(check_timestep(f64::NAN), Err(Error::InvalidTimestep(_))));
        assert!(matches!(check_timestep(f64::INFINITY), Err(Error::InvalidTimestep(_))));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("euler".parse::<IntegratorKind>().unwrap(), IntegratorKind::Euler);
        assert_eq!("verlet".parse::<IntegratorKind>().unwrap(), IntegratorKind::VelocityVerlet);
        assert_eq!(
            "Velocity-Verlet".parse::<IntegratorKind>().unwrap(),
            IntegratorKind::VelocityVerlet
        );
        assert_eq!("rk4".parse::<IntegratorKind>().unwrap(), IntegratorKind::RungeKutta);
        assert!("leapfrog".parse::<IntegratorKind>().is_err());

        for kind in IntegratorKind::ALL {
            assert_eq!(kind.as_str().parse::<IntegratorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_build() {
        let model: Arc<dyn ForceModel<f64>> = Arc::new(Spring { stiffness: 4.0 });
        for kind in IntegratorKind::ALL {
            let integrator = kind.build(0.01, Some(model.clone())).unwrap();
            assert_eq!(integrator.timestep(), 0.01);
            let next = integrator
                .perform_step(&IntegrationState::new(1.0, 0.0, -4.0))
                .unwrap();
            assert!(next.position < 1.0);
        }

        assert!(IntegratorKind::Euler.build::<f64>(0.0, None).is_err());
    }

    #[test]
    fn test_timestep_validation() {
        let fine = IntegratorKind::VelocityVerlet.build::<f64>(0.01, None).unwrap();
        assert!(fine.validate_timestep().is_ok());

        let tiny = IntegratorKind::VelocityVerlet.build::<f64>(1e-10, None).unwrap();
        assert_eq!(tiny.validate_timestep(), Err(TimestepWarning::TooSmall(1e-10)));

        let large = IntegratorKind::VelocityVerlet.build::<f64>(2.0, None).unwrap();
        assert_eq!(large.validate_timestep(), Err(TimestepWarning::TooLarge(2.0)));
    }
}
