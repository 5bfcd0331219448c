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

//! Queued event dispatch.
//!
//! [`EventManager`] decouples the code that observes something (a collision,
//! a lifecycle change) from the code that reacts to it: producers enqueue
//! events without blocking, and a scheduler-driven drain task dispatches
//! them to priority-ordered typed handlers, one event per tick.

mod manager;

pub use manager::{EventManager, ListenerId};

pub use orrery_core::event::{Cancellable, Event, HandlerPriority};
