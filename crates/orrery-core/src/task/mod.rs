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

//! The task and scheduler contracts.
//!
//! A [`Task`] is a unit of repeatable work with a minimum re-execution
//! interval. A [`Scheduler`] calls registered tasks on a regular basis,
//! passing each the wall-clock time elapsed since that task's own previous
//! execution.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// The smallest task interval a scheduler will honor.
///
/// A zero interval would allow a zero delta between executions, which makes
/// rate-dependent computations (anything dividing by elapsed time)
/// ill-defined. Schedulers clamp every task's interval to this floor.
pub const MIN_TASK_INTERVAL: Duration = Duration::from_millis(1);

/// A shared, lockable handle to a task.
///
/// Handles are compared by pointer identity: the handle passed to
/// [`Scheduler::unregister_task`] must be a clone of the one that was
/// registered.
pub type TaskHandle = Arc<Mutex<dyn Task>>;

/// A unit of work that can be performed on regular intervals.
pub trait Task: Send {
    /// Executes this task.
    ///
    /// # Arguments
    ///
    /// * `delta`: The wall-clock duration between the last execution of this
    ///   task and now.
    fn execute(&mut self, delta: Duration);

    /// Gets the minimum interval the scheduler must let pass between
    /// executions of this task. Defaults to [`MIN_TASK_INTERVAL`].
    fn interval(&self) -> Duration {
        MIN_TASK_INTERVAL
    }

    /// Called upon registration to a scheduler, synchronously from the
    /// registering thread.
    fn on_registered(&mut self, _scheduler: &dyn Scheduler) {}

    /// Called upon unregistration from a scheduler, synchronously from the
    /// unregistering thread.
    fn on_unregistered(&mut self, _scheduler: &dyn Scheduler) {}
}

/// Schedulers handle calling tasks on a regular basis.
///
/// Registration and unregistration are safe to call from any thread while
/// the scheduler is running; implementations buffer the changes and fold
/// them in at the start of the next execution pass.
pub trait Scheduler: Send + Sync {
    /// Registers a task to this scheduler. The task's
    /// [`Task::on_registered`] hook fires immediately, on the calling
    /// thread.
    fn register_task(&self, task: TaskHandle);

    /// Registers multiple tasks to this scheduler.
    fn register_tasks(&self, tasks: &[TaskHandle]) {
        for task in tasks {
            self.register_task(Arc::clone(task));
        }
    }

    /// Unregisters a task from this scheduler. Unregistering a task that was
    /// never registered is a no-op, though the task's
    /// [`Task::on_unregistered`] hook still fires.
    fn unregister_task(&self, task: &TaskHandle);

    /// Unregisters multiple tasks from this scheduler.
    fn unregister_tasks(&self, tasks: &[TaskHandle]) {
        for task in tasks {
            self.unregister_task(task);
        }
    }

    /// Starts the scheduler. Starting a running scheduler is a no-op.
    fn start(&self);

    /// Stops the scheduler. Tasks stay registered and the scheduler can be
    /// started again later.
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopTask;

    impl Task for NoopTask {
        fn execute(&mut self, _delta: Duration) {}
    }

    #[test]
    fn default_interval_is_the_floor() {
        assert_eq!(NoopTask.interval(), MIN_TASK_INTERVAL);
        assert!(MIN_TASK_INTERVAL > Duration::ZERO);
    }
}
