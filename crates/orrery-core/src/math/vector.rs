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

//! Provides the 3D vector type and its associated operations.

use serde::{Deserialize, Serialize};

use super::Quaternion;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3-dimensional vector with `f64` components.
///
/// Used for locations, accelerations, gravity, and direction sampling
/// throughout the simulation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f64,
    /// The y component of the vector.
    pub y: f64,
    /// The z component of the vector.
    pub z: f64,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// Creates a new `Vec3` with the specified components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Computes the dot product of this vector and `other`.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product of this vector and `other`, with `self`
    /// on the left.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Computes the squared magnitude of the vector.
    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Computes the magnitude (Euclidean length) of the vector.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector pointing in this vector's direction.
    ///
    /// A unit vector cannot be derived from the zero vector; in that case
    /// [`Vec3::ZERO`] is returned instead of dividing by zero.
    #[inline]
    pub fn normalized(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            Self::ZERO
        } else {
            *self / magnitude
        }
    }

    /// Computes the distance from this vector to `other`.
    #[inline]
    pub fn distance_to(&self, other: Self) -> f64 {
        (*self - other).magnitude()
    }

    /// Rotates this vector by a rotation quaternion, computed as `q·v·q*`.
    ///
    /// If `rotation` is not a unit quaternion the magnitude of the result
    /// will be altered accordingly.
    #[inline]
    pub fn rotated_by(&self, rotation: Quaternion) -> Self {
        (rotation * self.to_pure_quaternion() * rotation.conjugate()).vector_part()
    }

    /// Converts this vector to a pure quaternion (zero scalar part).
    #[inline]
    pub fn to_pure_quaternion(&self) -> Quaternion {
        Quaternion::new(0.0, self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl MulAssign<f64> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn arithmetic_componentwise() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, -3.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, 7.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Vec3::new(2.0, -2.5, 3.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn dot_and_cross_of_axes() {
        assert_eq!(Vec3::X.dot(Vec3::Y), 0.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
    }

    #[test]
    fn magnitude_and_distance() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(v.magnitude(), 5.0);
        assert_relative_eq!(v.magnitude_squared(), 25.0);
        assert_relative_eq!(Vec3::ZERO.distance_to(v), 5.0);
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec3::new(0.0, 0.0, 10.0).normalized();
        assert_relative_eq!(v.magnitude(), 1.0);
        assert_eq!(v, Vec3::Z);
    }

    #[test]
    fn normalized_zero_vector_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn rotation_about_y_maps_x_to_negative_z() {
        let rotation = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let rotated = Vec3::X.rotated_by(rotation);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_by_identity_is_a_noop() {
        let v = Vec3::new(1.5, -2.5, 4.0);
        let rotated = v.rotated_by(Quaternion::IDENTITY);
        assert_relative_eq!(rotated.x, v.x);
        assert_relative_eq!(rotated.y, v.y);
        assert_relative_eq!(rotated.z, v.z);
    }
}
