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

//! Event contracts: the event marker traits and handler priority tiers.
//!
//! Concrete event types and the dispatching machinery live in higher-level
//! crates; this module only defines the vocabulary they share.

use std::any::Any;

/// A payload describing something that happened in the simulation.
///
/// Events are constructed once and then only mutated through the narrow
/// channels their type exposes (for example a [`Cancellable`] flag).
/// The `as_any` accessors support the typed handler tables of the
/// dispatcher.
pub trait Event: Any + Send {
    /// Borrows this event as [`Any`] for type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrows this event as [`Any`] for typed dispatch.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A cancellable event carries a flag that any handler may set.
///
/// The dispatcher itself never consults the flag: cancellation set by an
/// earlier (lower-tier) handler is only visible to later handlers, and each
/// handler decides at its own entry whether to honor it.
pub trait Cancellable: Event {
    /// Checks whether an earlier handler has cancelled this event.
    fn is_cancelled(&self) -> bool;

    /// Sets the cancellation state of this event.
    fn set_cancelled(&mut self, cancelled: bool);
}

/// The priority tier of an event handler.
///
/// Handlers for one event are invoked in ascending tier order, from
/// [`HandlerPriority::PreEarly`] to [`HandlerPriority::PostMonitor`]. Order
/// among handlers in the same tier is unspecified.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerPriority {
    /// Called first.
    PreEarly,
    /// Early observation and vetoing.
    Early,
    /// After the early tier.
    PostEarly,
    /// Before the normal tier.
    PreNormal,
    /// Default tier for most handlers.
    Normal,
    /// After the normal tier.
    PostNormal,
    /// Before the monitor tier.
    PreMonitor,
    /// Observation of the settled outcome.
    Monitor,
    /// Called last.
    PostMonitor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(HandlerPriority::PreEarly < HandlerPriority::Early);
        assert!(HandlerPriority::Early < HandlerPriority::Normal);
        assert!(HandlerPriority::Normal < HandlerPriority::Monitor);
        assert!(HandlerPriority::Monitor < HandlerPriority::PostMonitor);
    }
}
