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

//! # Orrery Engine
//!
//! Concrete runtime services built on the `orrery-core` contracts: the
//! interval-respecting task schedulers, the queued event dispatcher, the
//! per-level physics tick, and the collision response listener, plus the
//! [`Engine`] facade that wires them together.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod event;
pub mod level;
pub mod physics;
pub mod scheduler;

pub use engine::{Engine, EngineConfig};

use std::any::Any;

/// Best-effort extraction of a human-readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "opaque panic payload"
    }
}
