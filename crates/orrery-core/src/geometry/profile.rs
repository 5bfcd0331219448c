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

//! Geometric profiles: shape descriptions independent of placement.

use super::solid::{Solid, Sphere};
use crate::math::{Quaternion, Vec3};
use std::fmt;

/// A shape description that can be resolved into a positioned [`Solid`].
///
/// A profile carries only intrinsic shape parameters. Bodies re-resolve
/// their profile every time a discrete solid is needed, so the solid always
/// reflects the body's current location and rotation.
pub trait GeometricProfile: fmt::Debug + Send + Sync {
    /// Resolves this profile into a solid placed at `location` with the
    /// given `rotation`.
    fn resolve(&self, location: Vec3, rotation: Quaternion) -> Box<dyn Solid>;
}

/// A spherical geometric profile.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereProfile {
    radius: f64,
}

impl SphereProfile {
    /// Creates a new spherical profile with the given radius.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Gets the radius of this spherical profile.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl GeometricProfile for SphereProfile {
    fn resolve(&self, location: Vec3, rotation: Quaternion) -> Box<dyn Solid> {
        Box::new(Sphere::new(location, rotation, self.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_sphere_is_centered_on_the_location() {
        let profile = SphereProfile::new(3.0);
        let location = Vec3::new(7.0, -1.0, 2.0);
        let solid = profile.resolve(location, Quaternion::IDENTITY);

        assert_eq!(solid.centroid(), location);
        assert!(solid.contains(location));
    }

    #[test]
    fn resolving_twice_tracks_movement() {
        let profile = SphereProfile::new(1.0);
        let first = profile.resolve(Vec3::ZERO, Quaternion::IDENTITY);
        let second = profile.resolve(Vec3::new(10.0, 0.0, 0.0), Quaternion::IDENTITY);

        assert!(first.contains(Vec3::ZERO));
        assert!(!second.contains(Vec3::ZERO));
    }
}
