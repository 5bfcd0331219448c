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

//! The single-threaded, sequentially-executing scheduler.

use crossbeam_channel::{Receiver, Sender};
use orrery_core::task::{Scheduler, TaskHandle, MIN_TASK_INTERVAL};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Tuning for a [`SyncScheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Sleep between execution passes. This bounds the timing accuracy of
    /// every task on the scheduler: a task can never run more often than
    /// once per pass.
    pub pass_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pass_interval: Duration::from_millis(1),
        }
    }
}

/// An active task together with the timestamp of its previous execution.
///
/// `last_run` is `None` until the execution thread first observes the task;
/// that pass only seeds the timestamp so the first real delta is measured
/// between two observations, never from registration time.
struct ActiveTask {
    handle: TaskHandle,
    last_run: Option<Instant>,
}

/// State shared between the scheduler handle and its execution thread.
///
/// The add/remove caches are channels so registration never touches the
/// active list: callers enqueue from any thread, and only the execution
/// thread folds the caches into the list at the top of each pass. The active
/// list itself is locked exclusively by the execution thread during a pass.
struct Shared {
    add_rx: Receiver<TaskHandle>,
    remove_rx: Receiver<TaskHandle>,
    active: Mutex<Vec<ActiveTask>>,
    running: AtomicBool,
}

/// A perfectly synchronous scheduler.
///
/// One dedicated execution thread runs all registered tasks in a single
/// deterministic pass per loop iteration, in registration order, respecting
/// each task's individual interval. Tasks on the same scheduler are
/// guaranteed never to execute concurrently with each other, and successive
/// executions of one task never overlap.
pub struct SyncScheduler {
    config: SchedulerConfig,
    add_tx: Sender<TaskHandle>,
    remove_tx: Sender<TaskHandle>,
    shared: Arc<Shared>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl SyncScheduler {
    /// Creates a stopped scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        let (add_tx, add_rx) = crossbeam_channel::unbounded();
        let (remove_tx, remove_rx) = crossbeam_channel::unbounded();
        Self {
            config,
            add_tx,
            remove_tx,
            shared: Arc::new(Shared {
                add_rx,
                remove_rx,
                active: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
            }),
            thread: Mutex::new(None),
        }
    }

    /// Checks whether the execution thread is currently running.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Counts the tasks held by this scheduler, including registrations not
    /// yet folded into the active list and net of pending removals.
    pub fn task_count(&self) -> usize {
        let active = self.shared.active.lock().unwrap().len();
        (active + self.shared.add_rx.len()).saturating_sub(self.shared.remove_rx.len())
    }
}

impl Scheduler for SyncScheduler {
    fn register_task(&self, task: TaskHandle) {
        let _ = self.add_tx.send(Arc::clone(&task));
        task.lock().unwrap().on_registered(self);
    }

    fn unregister_task(&self, task: &TaskHandle) {
        let _ = self.remove_tx.send(Arc::clone(task));
        task.lock().unwrap().on_unregistered(self);
    }

    fn start(&self) {
        if self.shared.running.load(Ordering::SeqCst) {
            return;
        }
        self.shared.running.store(true, Ordering::SeqCst);

        // A restarted scheduler measures deltas from fresh observations, not
        // from before it was stopped.
        for entry in self.shared.active.lock().unwrap().iter_mut() {
            entry.last_run = None;
        }

        let shared = Arc::clone(&self.shared);
        let pass_interval = self.config.pass_interval;
        let handle = thread::spawn(move || {
            log::debug!("Scheduler execution thread started.");
            while shared.running.load(Ordering::Relaxed) {
                run_pass(&shared);
                thread::sleep(pass_interval);
            }
            log::debug!("Scheduler execution thread stopped.");
        });
        *self.thread.lock().unwrap() = Some(handle);
    }

    fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

/// One iteration of the execution loop: fold the caches into the active
/// list, then give every due task a tick.
fn run_pass(shared: &Shared) {
    let mut active = shared.active.lock().unwrap();

    // Merge pending registrations first so that a task registered and
    // unregistered between passes is removed below before it can ever run.
    while let Ok(task) = shared.add_rx.try_recv() {
        active.push(ActiveTask {
            handle: task,
            last_run: None,
        });
    }
    while let Ok(task) = shared.remove_rx.try_recv() {
        active.retain(|entry| !Arc::ptr_eq(&entry.handle, &task));
    }

    for entry in active.iter_mut() {
        let now = Instant::now();
        let Some(last_run) = entry.last_run else {
            entry.last_run = Some(now);
            continue;
        };

        let delta = now - last_run;
        let mut task = entry.handle.lock().unwrap();
        if delta < task.interval().max(MIN_TASK_INTERVAL) {
            continue;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.execute(delta)));
        drop(task);
        if let Err(payload) = outcome {
            log::error!(
                "Task panicked during execution: {}",
                crate::panic_message(payload.as_ref())
            );
        }
        entry.last_run = Some(now);
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
