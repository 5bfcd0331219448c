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

//! The event queue and priority-ordered handler dispatch.

use orrery_core::event::{Event, HandlerPriority};
use orrery_core::task::{Scheduler, Task, TaskHandle};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Identity token for a registered listener.
///
/// Every handler subscription is tagged with one of these; unregistering
/// the listener removes all of its subscriptions at once.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// One typed handler subscription.
#[derive(Clone)]
struct HandlerEntry {
    listener: ListenerId,
    priority: HandlerPriority,
    invoke: Arc<dyn Fn(&mut dyn Any) + Send + Sync>,
}

struct ManagerInner {
    queue_tx: flume::Sender<Box<dyn Event>>,
    queue_rx: flume::Receiver<Box<dyn Event>>,
    handlers: Mutex<HashMap<TypeId, Vec<HandlerEntry>>>,
    next_listener: AtomicU64,
}

impl ManagerInner {
    /// Dequeues and dispatches at most one pending event. Returns whether an
    /// event was dispatched.
    fn dispatch_next(&self) -> bool {
        let mut event = match self.queue_rx.try_recv() {
            Ok(event) => event,
            Err(_) => return false,
        };
        self.dispatch(event.as_mut());
        true
    }

    fn dispatch(&self, event: &mut dyn Event) {
        let type_id = event.as_any().type_id();

        // Snapshot the handler list up front: listener changes made while
        // this event is being dispatched only affect later events. The lock
        // is released before any handler runs, so handlers are free to
        // subscribe and unsubscribe.
        let mut snapshot = {
            let handlers = self.handlers.lock().unwrap();
            handlers.get(&type_id).cloned().unwrap_or_default()
        };
        snapshot.sort_by_key(|entry| entry.priority);

        for entry in &snapshot {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| (entry.invoke)(event.as_any_mut())));
            if let Err(payload) = outcome {
                log::error!(
                    "Event handler ({} at {:?}) panicked: {}",
                    entry.listener,
                    entry.priority,
                    crate::panic_message(payload.as_ref())
                );
            }
        }
    }
}

/// Handles the lifecycle of events: an unbounded FIFO of pending events and
/// a registry of typed, priority-ordered handlers.
///
/// [`EventManager::call_event`] never blocks on handler execution. A
/// dedicated drain task, registered on a scheduler through
/// [`EventManager::start`], dispatches one event per tick; bursts of events
/// are spread across ticks instead of stalling a single tick with unbounded
/// handler work.
pub struct EventManager {
    inner: Arc<ManagerInner>,
    drain_task: Mutex<Option<TaskHandle>>,
}

impl EventManager {
    /// Creates a new event manager with an empty queue and no listeners.
    pub fn new() -> Self {
        let (queue_tx, queue_rx) = flume::unbounded();
        log::info!("EventManager initialized.");
        Self {
            inner: Arc::new(ManagerInner {
                queue_tx,
                queue_rx,
                handlers: Mutex::new(HashMap::new()),
                next_listener: AtomicU64::new(0),
            }),
            drain_task: Mutex::new(None),
        }
    }

    /// Enqueues an event to be handled. Returns immediately; the event is
    /// dispatched by the drain task on a later tick.
    pub fn call_event<E: Event>(&self, event: E) {
        log::trace!("Queueing an event for dispatch.");
        if let Err(error) = self.inner.queue_tx.send(Box::new(event)) {
            log::error!("Failed to queue event: {error}.");
        }
    }

    /// Allocates an identity for a listener. Subscriptions are installed
    /// against it with [`EventManager::subscribe`].
    pub fn register_listener(&self) -> ListenerId {
        ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed))
    }

    /// Removes every subscription tagged with the given listener identity.
    /// Events already mid-dispatch still see the snapshot taken when their
    /// dispatch began.
    pub fn unregister_listener(&self, listener: ListenerId) {
        let mut handlers = self.inner.handlers.lock().unwrap();
        for entries in handlers.values_mut() {
            entries.retain(|entry| entry.listener != listener);
        }
        handlers.retain(|_, entries| !entries.is_empty());
    }

    /// Removes every subscription of every given listener identity.
    pub fn unregister_listeners(&self, listeners: &[ListenerId]) {
        for listener in listeners {
            self.unregister_listener(*listener);
        }
    }

    /// Installs a typed handler for events of type `E` at the given
    /// priority tier, tagged with the given listener identity.
    ///
    /// Handlers for one event run in ascending tier order; order within one
    /// tier is unspecified. A handler only ever receives the exact event
    /// type it subscribed to.
    pub fn subscribe<E, F>(&self, listener: ListenerId, priority: HandlerPriority, handler: F)
    where
        E: Event,
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        let invoke = Arc::new(move |event: &mut dyn Any| {
            if let Some(event) = event.downcast_mut::<E>() {
                handler(event);
            }
        });
        self.inner
            .handlers
            .lock()
            .unwrap()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(HandlerEntry {
                listener,
                priority,
                invoke,
            });
    }

    /// Counts the events waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.inner.queue_rx.len()
    }

    /// Dequeues and dispatches at most one pending event on the calling
    /// thread. Returns whether an event was dispatched.
    ///
    /// This is the drain task's step, exposed for callers that pump events
    /// manually instead of through a scheduler.
    pub fn dispatch_next(&self) -> bool {
        self.inner.dispatch_next()
    }

    /// Registers the drain task on the given scheduler, starting dispatch.
    /// No-op if already started.
    pub fn start(&self, scheduler: &dyn Scheduler) {
        let mut drain_task = self.drain_task.lock().unwrap();
        if drain_task.is_some() {
            return;
        }
        let task: TaskHandle = Arc::new(Mutex::new(EventDrainTask {
            inner: Arc::clone(&self.inner),
        }));
        scheduler.register_task(Arc::clone(&task));
        *drain_task = Some(task);
    }

    /// Unregisters the drain task from the given scheduler, stopping
    /// dispatch. Queued events are retained.
    pub fn stop(&self, scheduler: &dyn Scheduler) {
        if let Some(task) = self.drain_task.lock().unwrap().take() {
            scheduler.unregister_task(&task);
        }
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler-driven queue drain.
struct EventDrainTask {
    inner: Arc<ManagerInner>,
}

impl Task for EventDrainTask {
    /// Handles one event per tick. Draining more per tick would let a burst
    /// of events starve the other tasks sharing this scheduler's thread.
    fn execute(&mut self, _delta: Duration) {
        self.inner.dispatch_next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::event::Cancellable;

    struct ProbeEvent {
        value: i32,
        cancelled: bool,
    }

    impl ProbeEvent {
        fn new(value: i32) -> Self {
            Self {
                value,
                cancelled: false,
            }
        }
    }

    impl Event for ProbeEvent {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl Cancellable for ProbeEvent {
        fn is_cancelled(&self) -> bool {
            self.cancelled
        }

        fn set_cancelled(&mut self, cancelled: bool) {
            self.cancelled = cancelled;
        }
    }

    struct OtherEvent;

    impl Event for OtherEvent {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn trace(manager: &EventManager, listener: ListenerId) -> Arc<Mutex<Vec<&'static str>>> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        for (label, priority) in [
            ("monitor", HandlerPriority::Monitor),
            ("early", HandlerPriority::Early),
            ("normal", HandlerPriority::Normal),
        ] {
            let calls = Arc::clone(&calls);
            manager.subscribe::<ProbeEvent, _>(listener, priority, move |_event| {
                calls.lock().unwrap().push(label);
            });
        }
        calls
    }

    #[test]
    fn handlers_run_in_ascending_priority_order() {
        let manager = EventManager::new();
        let listener = manager.register_listener();
        let calls = trace(&manager, listener);

        manager.call_event(ProbeEvent::new(1));
        assert!(manager.dispatch_next());

        assert_eq!(*calls.lock().unwrap(), vec!["early", "normal", "monitor"]);
    }

    #[test]
    fn one_event_is_dispatched_per_step() {
        let manager = EventManager::new();
        manager.call_event(ProbeEvent::new(1));
        manager.call_event(ProbeEvent::new(2));

        assert_eq!(manager.pending_events(), 2);
        assert!(manager.dispatch_next());
        assert_eq!(manager.pending_events(), 1);
        assert!(manager.dispatch_next());
        assert!(!manager.dispatch_next());
    }

    #[test]
    fn cancellation_does_not_suppress_later_tiers() {
        let manager = EventManager::new();
        let listener = manager.register_listener();
        let observed = Arc::new(Mutex::new(Vec::new()));

        {
            let observed = Arc::clone(&observed);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Early, move |event| {
                event.set_cancelled(true);
                observed.lock().unwrap().push("early ran");
            });
        }
        {
            // Honors the earlier cancellation at its own entry.
            let observed = Arc::clone(&observed);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Monitor, move |event| {
                if event.is_cancelled() {
                    return;
                }
                observed.lock().unwrap().push("monitor mutated");
            });
        }
        {
            // Ignores cancellation entirely; the dispatcher must still
            // invoke it.
            let observed = Arc::clone(&observed);
            manager.subscribe::<ProbeEvent, _>(
                listener,
                HandlerPriority::PostMonitor,
                move |_event| {
                    observed.lock().unwrap().push("post-monitor ran");
                },
            );
        }

        manager.call_event(ProbeEvent::new(1));
        manager.dispatch_next();

        assert_eq!(*observed.lock().unwrap(), vec!["early ran", "post-monitor ran"]);
    }

    #[test]
    fn handlers_only_see_their_event_type() {
        let manager = EventManager::new();
        let listener = manager.register_listener();
        let calls = trace(&manager, listener);

        manager.call_event(OtherEvent);
        assert!(manager.dispatch_next());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn a_panicking_handler_does_not_abort_dispatch() {
        let manager = EventManager::new();
        let listener = manager.register_listener();

        manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Early, |_event| {
            panic!("deliberate test fault");
        });
        let reached = Arc::new(Mutex::new(false));
        {
            let reached = Arc::clone(&reached);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Normal, move |_event| {
                *reached.lock().unwrap() = true;
            });
        }

        manager.call_event(ProbeEvent::new(1));
        manager.dispatch_next();
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn unregistering_a_listener_removes_its_handlers() {
        let manager = EventManager::new();
        let kept = manager.register_listener();
        let dropped = manager.register_listener();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for (listener, label) in [(kept, "kept"), (dropped, "dropped")] {
            let calls = Arc::clone(&calls);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Normal, move |_event| {
                calls.lock().unwrap().push(label);
            });
        }

        manager.unregister_listener(dropped);
        manager.call_event(ProbeEvent::new(1));
        manager.dispatch_next();

        assert_eq!(*calls.lock().unwrap(), vec!["kept"]);
    }

    #[test]
    fn subscriptions_made_mid_dispatch_apply_to_later_events_only() {
        let manager = Arc::new(EventManager::new());
        let listener = manager.register_listener();
        let late_calls = Arc::new(Mutex::new(0));

        {
            let manager_for_handler = Arc::clone(&manager);
            let late_calls = Arc::clone(&late_calls);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Early, move |_event| {
                let late_calls = Arc::clone(&late_calls);
                manager_for_handler.subscribe::<ProbeEvent, _>(
                    listener,
                    HandlerPriority::Monitor,
                    move |_event| {
                        *late_calls.lock().unwrap() += 1;
                    },
                );
            });
        }

        manager.call_event(ProbeEvent::new(1));
        manager.dispatch_next();
        assert_eq!(*late_calls.lock().unwrap(), 0, "snapshot must not grow");

        manager.call_event(ProbeEvent::new(2));
        manager.dispatch_next();
        assert_eq!(*late_calls.lock().unwrap(), 1);
    }

    #[test]
    fn event_values_reach_handlers() {
        let manager = EventManager::new();
        let listener = manager.register_listener();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            manager.subscribe::<ProbeEvent, _>(listener, HandlerPriority::Normal, move |event| {
                seen.lock().unwrap().push(event.value);
            });
        }

        for value in [3, 1, 4] {
            manager.call_event(ProbeEvent::new(value));
        }
        while manager.dispatch_next() {}
        assert_eq!(*seen.lock().unwrap(), vec![3, 1, 4]);
    }
}
