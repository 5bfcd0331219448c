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

//! The [`Solid`] capability trait and the spherical implementation.

use crate::math::{Quaternion, Vec3};
use std::f64::consts::PI;

/// A three-dimensional region of space, positioned in world coordinates.
///
/// The interface is deliberately narrow: it is exactly what the physics tick
/// needs for overlap detection and fluid resistance. Overlap is expressed
/// through [`Solid::centroid`] and [`Solid::enclosing_radius`] so no
/// downcasting between shape types is required; for spheres the enclosing
/// radius is the radius itself and the test is exact.
pub trait Solid: Send + Sync {
    /// Gets the geometric centroid of this solid.
    fn centroid(&self) -> Vec3;

    /// Gets the radius of the smallest sphere centered on the centroid that
    /// fully encloses this solid.
    fn enclosing_radius(&self) -> f64;

    /// Gets the volume of this solid.
    fn volume(&self) -> f64;

    /// Gets the coefficient of drag when moving in the given direction.
    fn drag_coefficient(&self, direction: Vec3) -> f64;

    /// Gets the cross-sectional area presented to the given direction.
    fn cross_section(&self, direction: Vec3) -> f64;

    /// Checks whether the given point lies within this solid. Points on the
    /// boundary are contained.
    fn contains(&self, point: Vec3) -> bool;

    /// Checks whether this solid intersects `other`. Boundary contact counts
    /// as overlap.
    ///
    /// The default implementation compares centroid distance against the sum
    /// of enclosing radii, which is exact for spheres and conservative for
    /// other shapes.
    fn overlaps(&self, other: &dyn Solid) -> bool {
        self.centroid().distance_to(other.centroid())
            <= self.enclosing_radius() + other.enclosing_radius()
    }
}

/// A spherical solid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    centroid: Vec3,
    rotation: Quaternion,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Arguments
    ///
    /// * `centroid`: Center of the sphere in world coordinates.
    /// * `rotation`: Orientation of the sphere.
    /// * `radius`: Radius of the sphere.
    pub fn new(centroid: Vec3, rotation: Quaternion, radius: f64) -> Self {
        Self {
            centroid,
            rotation,
            radius,
        }
    }

    /// Gets the orientation of this sphere.
    ///
    /// Rotation does not affect any of the [`Solid`] queries on a sphere; it
    /// is carried so a positioned solid fully describes its source body's
    /// placement.
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// Gets the radius of this sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Solid for Sphere {
    fn centroid(&self) -> Vec3 {
        self.centroid
    }

    fn enclosing_radius(&self) -> f64 {
        self.radius
    }

    fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }

    fn drag_coefficient(&self, _direction: Vec3) -> f64 {
        // A sphere presents the same profile from every direction.
        0.5
    }

    fn cross_section(&self, _direction: Vec3) -> f64 {
        PI * self.radius * self.radius
    }

    fn contains(&self, point: Vec3) -> bool {
        self.centroid.distance_to(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sphere_at(x: f64, y: f64, z: f64, radius: f64) -> Sphere {
        Sphere::new(Vec3::new(x, y, z), Quaternion::IDENTITY, radius)
    }

    #[test]
    fn contains_centroid_and_boundary() {
        let sphere = sphere_at(1.0, 2.0, 3.0, 4.0);
        assert!(sphere.contains(Vec3::new(1.0, 2.0, 3.0)));
        assert!(sphere.contains(Vec3::new(5.0, 2.0, 3.0)));
        assert!(!sphere.contains(Vec3::new(5.1, 2.0, 3.0)));
    }

    #[test]
    fn overlap_is_inclusive_of_boundary_contact() {
        let a = sphere_at(0.0, 0.0, 0.0, 10.0);
        let near = sphere_at(0.0, 0.0, 15.0, 10.0);
        let touching = sphere_at(0.0, 0.0, 20.0, 10.0);
        let apart = sphere_at(0.0, 0.0, 20.1, 10.0);

        assert!(a.overlaps(&near));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn volume_and_cross_section() {
        let sphere = sphere_at(0.0, 0.0, 0.0, 2.0);
        assert_relative_eq!(sphere.volume(), 4.0 / 3.0 * PI * 8.0);
        assert_relative_eq!(sphere.cross_section(Vec3::X), PI * 4.0);
        assert_relative_eq!(sphere.drag_coefficient(Vec3::Y), 0.5);
    }

    #[test]
    fn zero_radius_sphere_has_no_volume() {
        let sphere = sphere_at(0.0, 0.0, 0.0, 0.0);
        assert_eq!(sphere.volume(), 0.0);
        assert!(sphere.contains(Vec3::ZERO));
    }
}
