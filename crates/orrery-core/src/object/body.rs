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

//! Simulation bodies: mass, geometry, and kinematic state.

use super::ObjectId;
use crate::geometry::{GeometricProfile, Solid, SphereProfile};
use crate::math::{Quaternion, Vec3};
use std::fmt;
use std::sync::Arc;

/// A physical object that exists in a level and interacts with the other
/// objects placed in the same level.
///
/// The `acceleration` vector doubles as the integrator's velocity term: the
/// tick moves a body by `acceleration * dt`, and the drag step damps the
/// same vector. [`Body::velocity`] is therefore its magnitude.
#[derive(Debug, Clone)]
pub struct Body {
    id: ObjectId,
    mass: f64,
    profile: Arc<dyn GeometricProfile>,
    location: Vec3,
    acceleration: Vec3,
    rotation: Quaternion,
    rotation_rate: Quaternion,
}

impl Body {
    /// Starts building a new body.
    pub fn builder() -> BodyBuilder {
        BodyBuilder::new()
    }

    /// Gets the stable identifier of this body.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Gets the mass of this body.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Sets the mass of this body.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Gets the geometric profile of this body.
    pub fn profile(&self) -> &Arc<dyn GeometricProfile> {
        &self.profile
    }

    /// Replaces the geometric profile of this body.
    pub fn set_profile(&mut self, profile: Arc<dyn GeometricProfile>) {
        self.profile = profile;
    }

    /// Gets the location of this body.
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Sets the location of this body.
    pub fn set_location(&mut self, location: Vec3) {
        self.location = location;
    }

    /// Gets the acceleration of this body.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Sets the acceleration of this body.
    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// Gets the rotation of this body.
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// Sets the rotation of this body.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
    }

    /// Gets the per-second rotation rate of this body.
    pub fn rotation_rate(&self) -> Quaternion {
        self.rotation_rate
    }

    /// Sets the per-second rotation rate of this body.
    pub fn set_rotation_rate(&mut self, rotation_rate: Quaternion) {
        self.rotation_rate = rotation_rate;
    }

    /// Resolves this body's profile into a solid at the current location and
    /// rotation.
    pub fn solid(&self) -> Box<dyn Solid> {
        self.profile.resolve(self.location, self.rotation)
    }

    /// Gets the speed of this body, the magnitude of its acceleration
    /// vector.
    pub fn velocity(&self) -> f64 {
        self.acceleration.magnitude()
    }

    /// Gets the density of this body, derived as mass over volume.
    /// Returns zero when the volume is zero or negative.
    pub fn density(&self) -> f64 {
        let volume = self.solid().volume();
        if volume <= 0.0 {
            return 0.0;
        }
        self.mass / volume
    }

    /// Gets the drag coefficient presented against the current direction of
    /// motion.
    pub fn drag_coefficient(&self) -> f64 {
        self.solid().drag_coefficient(-self.acceleration)
    }

    /// Gets the cross-sectional area presented against the current direction
    /// of motion.
    pub fn cross_section(&self) -> f64 {
        self.solid().cross_section(-self.acceleration)
    }

    /// Checks whether the given point lies within this body's solid.
    pub fn contains(&self, point: Vec3) -> bool {
        self.solid().contains(point)
    }

    /// Checks whether this body's solid intersects another body's solid.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.solid().overlaps(other.solid().as_ref())
    }

    /// Moves this body by the given delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.location += delta;
    }

    /// Composes a rotation onto this body's current rotation. The new
    /// rotation is applied in the body's current reference frame, on the
    /// left of the existing one.
    pub fn rotate_by(&mut self, rotation: Quaternion) {
        self.rotation = rotation * self.rotation;
    }

    /// Adds the given delta to this body's acceleration.
    pub fn accelerate(&mut self, delta: Vec3) {
        self.acceleration += delta;
    }
}

/// Builder for [`Body`].
///
/// Defaults: zero mass, a zero-radius spherical profile, everything at the
/// origin with no motion and no rotation.
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    id: Option<ObjectId>,
    mass: f64,
    profile: Arc<dyn GeometricProfile>,
    location: Vec3,
    acceleration: Vec3,
    rotation: Quaternion,
    rotation_rate: Quaternion,
}

impl BodyBuilder {
    fn new() -> Self {
        Self {
            id: None,
            mass: 0.0,
            profile: Arc::new(SphereProfile::new(0.0)),
            location: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            rotation_rate: Quaternion::IDENTITY,
        }
    }

    /// Sets an explicit identifier. A random one is generated otherwise.
    pub fn id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the mass.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the geometric profile.
    pub fn profile(mut self, profile: impl GeometricProfile + 'static) -> Self {
        self.profile = Arc::new(profile);
        self
    }

    /// Sets the initial location.
    pub fn location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    /// Sets the initial acceleration.
    pub fn acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Sets the initial rotation.
    pub fn rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the per-second rotation rate.
    pub fn rotation_rate(mut self, rotation_rate: Quaternion) -> Self {
        self.rotation_rate = rotation_rate;
        self
    }

    /// Finalizes the builder into a body.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::InvalidMass`] when the mass is negative or not
    /// finite.
    pub fn build(self) -> Result<Body, BodyError> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(BodyError::InvalidMass(self.mass));
        }

        Ok(Body {
            id: self.id.unwrap_or_else(ObjectId::generate),
            mass: self.mass,
            profile: self.profile,
            location: self.location,
            acceleration: self.acceleration,
            rotation: self.rotation,
            rotation_rate: self.rotation_rate,
        })
    }
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An error produced while constructing a [`Body`].
#[derive(Debug, Clone, PartialEq)]
pub enum BodyError {
    /// The mass was negative or not finite.
    InvalidMass(f64),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidMass(mass) => {
                write!(f, "Body mass must be finite and non-negative, got {mass}")
            }
        }
    }
}

impl std::error::Error for BodyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn builder_applies_every_field() {
        let id = ObjectId::generate();
        let body = Body::builder()
            .id(id)
            .mass(2.5)
            .profile(SphereProfile::new(1.0))
            .location(Vec3::new(1.0, 2.0, 3.0))
            .acceleration(Vec3::X)
            .build()
            .unwrap();

        assert_eq!(body.id(), id);
        assert_eq!(body.mass(), 2.5);
        assert_eq!(body.location(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.acceleration(), Vec3::X);
        assert_eq!(body.rotation(), Quaternion::IDENTITY);
    }

    #[test]
    fn builder_rejects_negative_and_non_finite_mass() {
        assert_eq!(
            Body::builder().mass(-1.0).build().unwrap_err(),
            BodyError::InvalidMass(-1.0)
        );
        assert!(Body::builder().mass(f64::NAN).build().is_err());
    }

    #[test]
    fn velocity_is_acceleration_magnitude() {
        let body = Body::builder()
            .acceleration(Vec3::new(3.0, 4.0, 0.0))
            .build()
            .unwrap();
        assert_relative_eq!(body.velocity(), 5.0);
    }

    #[test]
    fn density_is_zero_without_volume() {
        let body = Body::builder().mass(10.0).build().unwrap();
        assert_eq!(body.density(), 0.0);

        let dense = Body::builder()
            .mass(10.0)
            .profile(SphereProfile::new(1.0))
            .build()
            .unwrap();
        assert!(dense.density() > 0.0);
    }

    #[test]
    fn translate_and_accelerate_accumulate() {
        let mut body = Body::builder().build().unwrap();
        body.translate(Vec3::X);
        body.translate(Vec3::X);
        body.accelerate(Vec3::Y * 2.0);
        assert_eq!(body.location(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(body.acceleration(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn rotate_by_composes_on_the_left() {
        let mut body = Body::builder().build().unwrap();
        let quarter = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        body.rotate_by(quarter);
        body.rotate_by(quarter);

        let rotated = Vec3::X.rotated_by(body.rotation());
        assert_relative_eq!(rotated.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn bodies_overlap_through_their_solids() {
        let a = Body::builder()
            .profile(SphereProfile::new(10.0))
            .build()
            .unwrap();
        let b = Body::builder()
            .profile(SphereProfile::new(10.0))
            .location(Vec3::new(0.0, 0.0, 15.0))
            .build()
            .unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }
}
