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

//! The collision event payload.

use crate::level::LevelId;
use orrery_core::event::{Cancellable, Event};
use orrery_core::{ObjectId, Pair};
use std::any::Any;

/// Emitted when two bodies overlap for the first time.
///
/// Carries identifiers rather than bodies; handlers resolve them through
/// the owning level's arena at dispatch time, so a body removed between
/// emission and dispatch simply fails to resolve.
#[derive(Debug)]
pub struct CollisionEvent {
    level: LevelId,
    bodies: Pair<ObjectId>,
    cancelled: bool,
}

impl CollisionEvent {
    /// Creates a new collision event for the given pair of bodies.
    pub fn new(level: LevelId, bodies: Pair<ObjectId>) -> Self {
        Self {
            level,
            bodies,
            cancelled: false,
        }
    }

    /// Gets the level the collision happened in.
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// Gets the pair of bodies involved in this collision.
    pub fn bodies(&self) -> Pair<ObjectId> {
        self.bodies
    }
}

impl Event for CollisionEvent {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Cancellable for CollisionEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
