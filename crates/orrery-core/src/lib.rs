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

//! # Orrery Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the simulation runtime's architecture: math primitives, the
//! geometric capability seam, the simulation object model, the task/scheduler
//! contract, and the event contracts consumed by higher-level crates.

#![warn(missing_docs)]

pub mod event;
pub mod geometry;
pub mod math;
pub mod object;
pub mod task;
pub mod util;

pub use object::{Body, BodyBuilder, ObjectId};
pub use util::Pair;
