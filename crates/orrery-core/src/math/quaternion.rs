// Copyright 2025 eraflo
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

//! Provides a Quaternion type for representing 3D rotations.

use serde::{Deserialize, Serialize};

use super::{Vec3, EPSILON};
use std::ops::Mul;

/// Represents a quaternion used for 3D rotations.
///
/// Stored scalar-first as `(w, x, y, z)`, where `w` is the scalar part and
/// `[x, y, z]` the vector part. Rotations are represented by unit quaternions
/// where `w² + x² + y² + z² = 1`; composing unit quaternions keeps the result
/// a unit quaternion up to floating-point drift.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The scalar (real) part.
    pub w: f64,
    /// The x component of the vector part.
    pub x: f64,
    /// The y component of the vector part.
    pub y: f64,
    /// The z component of the vector part.
    pub z: f64,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// This does not guarantee a unit quaternion. For creating rotations,
    /// prefer [`Quaternion::from_axis_angle`].
    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Creates a rotation quaternion from an axis/angle notation.
    ///
    /// The axis is normalized before use; a zero axis yields
    /// [`Quaternion::IDENTITY`] since it describes no rotation.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f64) -> Self {
        let unit = axis.normalized();
        if unit == Vec3::ZERO {
            return Self::IDENTITY;
        }

        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        Self {
            w: half_angle.cos(),
            x: unit.x * s,
            y: unit.y * s,
            z: unit.z * s,
        }
    }

    /// Gets the vector part `[x, y, z]` of this quaternion.
    #[inline]
    pub fn vector_part(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculates the squared magnitude of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculates the magnitude of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the conjugate, which for a unit quaternion is its inverse
    /// rotation.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Scales this rotation by a factor, yielding a fractional (or extended)
    /// rotation about the same axis.
    ///
    /// This decomposes the unit quaternion into axis/angle form, scales the
    /// angle, and recomposes. Used by the integrator to apply a per-second
    /// rotation rate over a sub-second tick. When the rotation is degenerate
    /// (no rotation, or a half-turn angle whose sine vanishes) the identity
    /// is returned rather than dividing by a near-zero sine.
    pub fn scale(&self, factor: f64) -> Self {
        let half_angle = self.w.clamp(-1.0, 1.0).acos();
        let sin_half = half_angle.sin();
        if sin_half.abs() < EPSILON {
            return Self::IDENTITY;
        }

        let axis = self.vector_part() / sin_half;
        let scaled_half = half_angle * factor;
        let s = scaled_half.sin();
        Self {
            w: scaled_half.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// The Hamilton product, with `self` on the left. Applying the product
    /// `a * b` as a rotation is equivalent to rotating by `b` first and `a`
    /// second.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let w = self.w * rhs.w - self.vector_part().dot(rhs.vector_part());
        let v = rhs.vector_part() * self.w
            + self.vector_part() * rhs.w
            + self.vector_part().cross(rhs.vector_part());
        Self::new(w, v.x, v.y, v.z)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    /// Componentwise quaternion-scalar multiplication.
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.w * scalar,
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}
