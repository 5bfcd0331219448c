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

//! Listens for collision events and resolves them.

use super::CollisionEvent;
use crate::event::{EventManager, ListenerId};
use crate::level::LevelManager;
use orrery_core::event::{Cancellable, HandlerPriority};
use orrery_core::math::Vec3;
use std::sync::{Arc, PoisonError};

/// The built-in collision response listener.
///
/// On a non-cancelled collision it exchanges momentum between the two
/// bodies with the one-dimensional elastic collision formula, applied per
/// body to its full acceleration vector (the integrator's velocity proxy).
/// It subscribes at [`HandlerPriority::PostMonitor`] so every other handler
/// has had its chance to cancel or observe the event first.
pub struct CollisionResponder;

impl CollisionResponder {
    /// Subscribes the response handler and returns its listener identity.
    pub fn attach(events: &EventManager, levels: Arc<LevelManager>) -> ListenerId {
        let listener = events.register_listener();
        events.subscribe::<CollisionEvent, _>(
            listener,
            HandlerPriority::PostMonitor,
            move |event| {
                if event.is_cancelled() {
                    return;
                }
                respond(&levels, event);
            },
        );
        listener
    }
}

fn respond(levels: &LevelManager, event: &CollisionEvent) {
    let level = match levels.level(event.level()) {
        Ok(level) => level,
        Err(error) => {
            log::warn!("Dropping collision response: {error}.");
            return;
        }
    };
    let mut level = level.lock().unwrap_or_else(PoisonError::into_inner);

    let id_a = *event.bodies().first();
    let id_b = *event.bodies().second();
    let (Some(body_a), Some(body_b)) = (level.body(id_a), level.body(id_b)) else {
        log::warn!("Dropping collision response: a collided body left the level.");
        return;
    };

    let (velocity_a, velocity_b) = elastic_exchange(
        body_a.mass(),
        body_a.acceleration(),
        body_b.mass(),
        body_b.acceleration(),
    );

    if let Some(body) = level.body_mut(id_a) {
        body.set_acceleration(velocity_a);
    }
    if let Some(body) = level.body_mut(id_b) {
        body.set_acceleration(velocity_b);
    }
    log::trace!("Resolved collision between {id_a} and {id_b}.");
}

/// The one-dimensional elastic collision formula applied componentwise to
/// both velocity vectors.
///
/// The combined mass in the denominator carries a negligible epsilon so two
/// massless bodies divide by a small number instead of zero. This masks
/// true zero-mass collisions rather than special-casing them, a known
/// approximation.
fn elastic_exchange(
    mass_a: f64,
    velocity_a: Vec3,
    mass_b: f64,
    velocity_b: Vec3,
) -> (Vec3, Vec3) {
    let combined = mass_a + mass_b + f64::EPSILON;
    let after_a = velocity_a * ((mass_a - mass_b) / combined)
        + velocity_b * (2.0 * mass_b / combined);
    let after_b = velocity_b * ((mass_b - mass_a) / combined)
        + velocity_a * (2.0 * mass_a / combined);
    (after_a, after_b)
}
