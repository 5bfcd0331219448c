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

//! Defines the error types for the runtime services.
//!
//! Not-found and duplicate-registration conditions are caller errors: they
//! are surfaced immediately and distinctly, and never retried internally.

use crate::level::LevelId;
use orrery_core::ObjectId;
use std::fmt;

/// An error related to the membership of a single level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// An object with the same identifier is already a member of the level.
    DuplicateObject {
        /// The identifier that was registered twice.
        id: ObjectId,
    },
    /// No object with the given identifier is a member of the level.
    ObjectNotFound {
        /// The identifier that could not be resolved.
        id: ObjectId,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::DuplicateObject { id } => {
                write!(f, "Object {id} is already a member of this level")
            }
            LevelError::ObjectNotFound { id } => {
                write!(f, "Object {id} is not a member of this level")
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// An error related to the registry of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A level with the same identifier is already registered.
    DuplicateLevel {
        /// The identifier that was registered twice.
        id: LevelId,
    },
    /// No level with the given identifier is registered.
    LevelNotFound {
        /// The identifier that could not be resolved.
        id: LevelId,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateLevel { id } => {
                write!(f, "Level {id} is already registered")
            }
            RegistryError::LevelNotFound { id } => {
                write!(f, "Level {id} does not exist")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
