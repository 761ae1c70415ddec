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
//! Error types for simulations, integrators and scenario loading

use thiserror::Error;

/// Result type alias for hephaestus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running a simulation
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Time step was zero, negative, NaN or infinite
    #[error("invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(f64),

    /// A physical or numerical parameter was out of range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the API or scenario file
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A required input was not supplied
    #[error("{what} cannot be empty, set it and re-run")]
    MissingInput {
        /// Human readable name of the missing input
        what: &'static str,
    },

    /// Integrator was handed a state containing NaN or infinity
    #[error("integration state contains non-finite values")]
    NonFiniteState,

    /// A step produced a non-finite state
    #[error("simulation diverged at step {step}")]
    Diverged {
        /// Index of the step whose outcome was non-finite
        step: usize,
    },

    /// Scenario file is structurally valid TOML but semantically wrong
    #[error("configuration error: {0}")]
    Config(String),

    /// Scenario file could not be parsed
    #[error("failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    /// Scenario declares a format this build does not understand
    #[error("scenario format {found} is not supported (expected {supported})")]
    IncompatibleFormat {
        /// Version string found in the scenario
        found: String,
        /// Supported version requirement
        supported: String,
    },

    /// Version string could not be parsed
    #[error("invalid format version: {0}")]
    Version(#[from] semver::Error),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Non-fatal advice about a timestep that is valid but risky
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestepWarning {
    /// Timestep so small that f64 round-off dominates
    #[error("timestep {0} is extremely small and may cause precision loss with f64")]
    TooSmall(f64),

    /// Timestep large enough to threaten stability
    #[error("timestep {0} is large and may cause instability")]
    TooLarge(f64),
}
