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

//! The simulation object model.
//!
//! A [`Body`] is owned by exactly one level's arena and addressed everywhere
//! else (overlap pairs, event payloads) by its [`ObjectId`], resolved back
//! through the arena at use time. This keeps the shared mutable object graph
//! of the simulation behind a single owner.

mod body;

pub use body::{Body, BodyBuilder, BodyError};

use std::fmt;
use uuid::Uuid;

/// Stable identifier of a simulation object.
///
/// Identifiers are unique within the scope of a runtime and survive the
/// object moving between levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
