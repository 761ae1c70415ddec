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
//! Phase-space values advanced by the integrators
//!
//! Integrators are written once against [`PhaseVector`] and work for any
//! system whose configuration can be added and scaled: a single angle for a
//! pendulum, or a list of 3D positions for an N-body system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 3D vector with double-precision components
///
/// Used for positions, velocities and accelerations of bodies.
///
/// # Examples
///
/// ```
/// use hephaestus::state::Vector3;
///
/// let v = Vector3::new(3.0, 4.0, 0.0);
/// assert_eq!(v.norm(), 5.0);
/// assert!(v.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vector3::new(0.0, 0.0, 0.0)
    }

    /// Dot product
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared Euclidean length
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Get the vector as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(arr: [f64; 3]) -> Self {
        Vector3::new(arr[0], arr[1], arr[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.as_array()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6e}, {:.6e}, {:.6e})", self.x, self.y, self.z)
    }
}

/// A value in configuration space that integrators can advance
///
/// Implementations behave like elements of a real vector space. Binary
/// operations assume both operands have the same shape (same body count).
pub trait PhaseVector: Clone + Send + Sync + fmt::Debug {
    /// A zero value with the same shape as `self`
    fn zeros_like(&self) -> Self;

    /// Return `self + factor * other`
    fn add_scaled(&self, other: &Self, factor: f64) -> Self;

    /// Return `factor * self`
    fn scale(&self, factor: f64) -> Self;

    /// Check that every component is finite
    fn is_finite(&self) -> bool;

    /// Number of independent entries, e.g. bodies in a system
    fn dim(&self) -> usize;
}

impl PhaseVector for f64 {
    fn zeros_like(&self) -> Self {
        0.0
    }

    fn add_scaled(&self, other: &Self, factor: f64) -> Self {
        self + factor * other
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    fn dim(&self) -> usize {
        1
    }
}

impl PhaseVector for Vec<Vector3> {
    fn zeros_like(&self) -> Self {
        vec![Vector3::zero(); self.len()]
    }

    fn add_scaled(&self, other: &Self, factor: f64) -> Self {
        debug_assert_eq!(self.len(), other.len(), "phase vectors differ in shape");
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| *a + *b * factor)
            .collect()
    }

    fn scale(&self, factor: f64) -> Self {
        self.iter().map(|v| *v * factor).collect()
    }

    fn is_finite(&self) -> bool {
        self.iter().all(Vector3::is_finite)
    }

    fn dim(&self) -> usize {
        self.len()
    }
}

/// Conditions handed to an integrator and the outcome it returns
///
/// On input these are `x0`, `v0` and `a0`: position, velocity and the
/// acceleration at that position. On output they describe the system one
/// timestep later.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationState<S> {
    /// Configuration (angle, or body positions)
    pub position: S,
    /// First time derivative of `position`
    pub velocity: S,
    /// Second time derivative of `position`
    pub acceleration: S,
}

impl<S: PhaseVector> IntegrationState<S> {
    /// Bundle a position, velocity and acceleration
    pub fn new(position: S, velocity: S, acceleration: S) -> Self {
        IntegrationState {
            position,
            velocity,
            acceleration,
        }
    }

    /// Check that every part of the state is finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }

    /// Check that position, velocity and acceleration have the same shape
    pub fn is_consistent(&self) -> bool {
        let dim = self.position.dim();
        self.velocity.dim() == dim && self.acceleration.dim() == dim
    }
}
