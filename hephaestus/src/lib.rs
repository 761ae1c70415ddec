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
//! # Hephaestus
//!
//! Small physics systems integrated with interchangeable fixed-step
//! numerical methods.
//!
//! ## Features
//!
//! - **Integrators**: Euler, Velocity Verlet and Runge-Kutta 4, generic over
//!   the shape of the state
//! - **Systems**: a single pendulum and an N-body planetary system
//! - **Energy bookkeeping**: kinetic and potential energy per step, with drift
//!   summaries for comparing methods
//! - **Parallelization**: optional Rayon pairwise force evaluation
//! - **Scenarios**: TOML scenario files and CSV export
//!
//! ## Example
//!
//! ```rust
//! use hephaestus::integration::IntegratorKind;
//! use hephaestus::systems::SinglePendulum;
//!
//! let pendulum = SinglePendulum::new(1.0, 9.81, 0.1, 1000, 0.001).unwrap();
//! let run = pendulum.run_simulation(IntegratorKind::RungeKutta).unwrap();
//!
//! assert_eq!(run.len(), 1000);
//! assert!(run.max_relative_energy_drift() < 1e-6);
//! ```

#![warn(missing_docs)]

/// Scenario files
pub mod config;

/// Error types
pub mod error;

/// Numerical integration methods
pub mod integration;

pub mod logging;

/// CSV export
pub mod output;

pub mod simulation;

/// Vectors and integration state
pub mod state;

/// Physical systems
pub mod systems;

pub use error::{Error, Result};
pub use integration::{Integrator, IntegratorKind};
pub use state::{IntegrationState, Vector3};
