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

//! Levels: the simulated spaces objects live in, and their physics tick.
//!
//! A level owns its member bodies in an arena keyed by [`ObjectId`]; overlap
//! tracking and event payloads refer to bodies by identifier and resolve
//! them through the arena at use time.

mod manager;

pub use manager::LevelManager;

use crate::error::LevelError;
use crate::event::EventManager;
use crate::physics::CollisionEvent;
use orrery_core::geometry::Solid;
use orrery_core::math::Vec3;
use orrery_core::{Body, ObjectId, Pair};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Stable identifier of a level, unique within the scope of a runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(Uuid);

impl LevelId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A simulated space: a set of bodies, an ambient medium, and the contact
/// state between the bodies.
///
/// The overlap set is persistent across ticks and updated in place, which
/// is what makes collision events edge-triggered: an event fires only on
/// the transition from separated to overlapping, never for steady-state
/// contact.
#[derive(Debug)]
pub struct Level {
    id: LevelId,
    name: String,
    bodies: HashMap<ObjectId, Body>,
    gravity: Vec3,
    air_density: f64,
    overlapping: HashSet<Pair<ObjectId>>,
}

impl Level {
    /// Starts building a new level.
    pub fn builder() -> LevelBuilder {
        LevelBuilder::new()
    }

    /// Gets the identifier of this level.
    pub fn id(&self) -> LevelId {
        self.id
    }

    /// Gets the name of this level.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the gravity vector of this level, a constant acceleration
    /// applied to every body each tick.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Sets the gravity vector of this level.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Gets the density of the ambient medium.
    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    /// Sets the density of the ambient medium.
    pub fn set_air_density(&mut self, air_density: f64) {
        self.air_density = air_density;
    }

    /// Adds a body to this level.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::DuplicateObject`] when a body with the same
    /// identifier is already a member.
    pub fn add_body(&mut self, body: Body) -> Result<ObjectId, LevelError> {
        let id = body.id();
        if self.bodies.contains_key(&id) {
            return Err(LevelError::DuplicateObject { id });
        }
        self.bodies.insert(id, body);
        Ok(id)
    }

    /// Removes a body from this level, dropping any contact state that
    /// involves it.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::ObjectNotFound`] when no body with the given
    /// identifier is a member.
    pub fn remove_body(&mut self, id: ObjectId) -> Result<Body, LevelError> {
        let body = self
            .bodies
            .remove(&id)
            .ok_or(LevelError::ObjectNotFound { id })?;
        self.overlapping.retain(|pair| !pair.contains(&id));
        Ok(body)
    }

    /// Looks up a body by identifier.
    pub fn body(&self, id: ObjectId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Looks up a body by identifier for mutation.
    pub fn body_mut(&mut self, id: ObjectId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// Iterates over the bodies in this level, in no particular order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Counts the bodies in this level.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Gets a snapshot of the currently-overlapping pairs of bodies.
    pub fn overlapping_pairs(&self) -> Vec<Pair<ObjectId>> {
        self.overlapping.iter().copied().collect()
    }

    /// Checks whether two bodies are currently tracked as overlapping.
    pub fn is_overlapping(&self, a: ObjectId, b: ObjectId) -> bool {
        self.overlapping.contains(&Pair::new(a, b))
    }

    /// Advances this level by one tick of `delta` wall-clock time.
    ///
    /// In order: gravity is applied to every body's acceleration, locations
    /// and rotations are integrated, the pairwise overlap scan updates the
    /// contact state and emits one [`CollisionEvent`] per newly-overlapping
    /// pair, and fluid resistance damps each body's acceleration. Each
    /// body's and pair's handling is independent: one degenerate body never
    /// aborts the tick for the rest.
    pub fn tick(&mut self, delta: Duration, events: &EventManager) {
        let seconds = delta.as_secs_f64();

        // Snapshot the membership so additions and removals made by event
        // handlers between ticks never perturb an in-progress iteration.
        let ids: Vec<ObjectId> = self.bodies.keys().copied().collect();

        // Gravity.
        let gravity_step = self.gravity * seconds;
        for id in &ids {
            if let Some(body) = self.bodies.get_mut(id) {
                body.accelerate(gravity_step);
            }
        }

        // Motion and rotation integration.
        for id in &ids {
            if let Some(body) = self.bodies.get_mut(id) {
                let step = body.acceleration() * seconds;
                body.translate(step);
                let spin = body.rotation_rate().scale(seconds);
                body.rotate_by(spin);
            }
        }

        // Pairwise overlap scan with edge-triggered collision events.
        // Quadratic in the number of bodies, which is fine at the scale the
        // engine targets (tens of bodies).
        let solids: Vec<(ObjectId, Box<dyn Solid>)> = ids
            .iter()
            .filter_map(|id| self.bodies.get(id).map(|body| (*id, body.solid())))
            .collect();
        for i in 0..solids.len() {
            for j in (i + 1)..solids.len() {
                let (id_a, solid_a) = &solids[i];
                let (id_b, solid_b) = &solids[j];
                let pair = Pair::new(*id_a, *id_b);
                if solid_a.overlaps(solid_b.as_ref()) {
                    if self.overlapping.insert(pair) {
                        log::debug!("Bodies {id_a} and {id_b} started overlapping.");
                        events.call_event(CollisionEvent::new(self.id, pair));
                    }
                } else {
                    self.overlapping.remove(&pair);
                }
            }
        }

        // Fluid resistance. The denser of the ambient medium and any
        // overlapped body's material wins.
        for id in &ids {
            let Some(body) = self.bodies.get(id) else {
                continue;
            };

            let mut fluid_density = self.air_density;
            for pair in self.overlapping.iter().filter(|pair| pair.contains(id)) {
                if let Some(other) = pair
                    .other(id)
                    .and_then(|other_id| self.bodies.get(other_id))
                {
                    fluid_density = fluid_density.max(other.density());
                }
            }

            let velocity = body.velocity();
            let drag_force =
                body.drag_coefficient() * fluid_density * body.cross_section() * velocity * velocity;
            let kinetic_energy = 0.5 * body.mass() * velocity;
            let Some(ratio) = deceleration_ratio(drag_force, kinetic_energy, seconds) else {
                continue;
            };

            let damped = body.acceleration() * ratio;
            if let Some(body) = self.bodies.get_mut(id) {
                body.set_acceleration(damped);
            }
        }
    }
}

/// Computes the factor a body's acceleration is scaled by to model fluid
/// resistance over one tick, or `None` when the damping step must be
/// skipped (non-finite or non-positive drag, or no kinetic energy to divide
/// by).
///
/// This is a velocity-proportional damping approximation rather than a
/// physically exact drag integration; the ratio is clamped to `[0, 1]` so
/// drag can stop a body within a tick but never reverse it.
fn deceleration_ratio(drag_force: f64, kinetic_energy: f64, seconds: f64) -> Option<f64> {
    if !drag_force.is_finite() || drag_force <= 0.0 {
        return None;
    }
    if !kinetic_energy.is_finite() || kinetic_energy == 0.0 {
        return None;
    }
    Some((1.0 - (drag_force * seconds / kinetic_energy)).clamp(0.0, 1.0))
}

/// Builder for [`Level`].
#[derive(Default)]
pub struct LevelBuilder {
    id: Option<LevelId>,
    name: String,
    gravity: Vec3,
    air_density: f64,
    bodies: Vec<Body>,
}

impl LevelBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit identifier. A random one is generated otherwise.
    pub fn id(mut self, id: LevelId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the name of the level.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the gravity vector of the level.
    pub fn gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the density of the ambient medium.
    pub fn air_density(mut self, air_density: f64) -> Self {
        self.air_density = air_density;
        self
    }

    /// Adds a body to the level.
    pub fn body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }

    /// Adds multiple bodies to the level.
    pub fn bodies(mut self, bodies: impl IntoIterator<Item = Body>) -> Self {
        self.bodies.extend(bodies);
        self
    }

    /// Finalizes the builder into a level with an empty contact state.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::DuplicateObject`] when two added bodies share
    /// an identifier.
    pub fn build(self) -> Result<Level, LevelError> {
        let mut level = Level {
            id: self.id.unwrap_or_else(LevelId::generate),
            name: self.name,
            bodies: HashMap::new(),
            gravity: self.gravity,
            air_density: self.air_density,
            overlapping: HashSet::new(),
        };
        for body in self.bodies {
            level.add_body(body)?;
        }
        Ok(level)
    }
}
