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

//! The fan-out scheduler: a fixed pool of synchronous schedulers.

use super::sync::{SchedulerConfig, SyncScheduler};
use orrery_core::task::{Scheduler, TaskHandle};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tuning for an [`AsyncScheduler`].
#[derive(Debug, Clone)]
pub struct AsyncSchedulerConfig {
    /// Number of pooled synchronous schedulers, each with its own execution
    /// thread. Clamped to at least one.
    pub pool_size: usize,
    /// Configuration applied to every pool member.
    pub member: SchedulerConfig,
}

impl Default for AsyncSchedulerConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            member: SchedulerConfig::default(),
        }
    }
}

/// An asynchronous scheduler.
///
/// Essentially a container of multiple [`SyncScheduler`]s: each registered
/// task is assigned to exactly one pool member, chosen round-robin by a
/// counter shared across all registrations. Two tasks on the same member
/// execute sequentially relative to each other; two tasks on different
/// members may execute concurrently and their relative order is undefined.
pub struct AsyncScheduler {
    members: Vec<SyncScheduler>,
    cursor: AtomicUsize,
}

impl AsyncScheduler {
    /// Creates a stopped scheduler pool with the given configuration.
    pub fn new(config: AsyncSchedulerConfig) -> Self {
        let pool_size = config.pool_size.max(1);
        Self {
            members: (0..pool_size)
                .map(|_| SyncScheduler::new(config.member.clone()))
                .collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Gets the number of pooled schedulers.
    pub fn pool_size(&self) -> usize {
        self.members.len()
    }

    /// Counts the tasks held by each pool member, in pool order. Useful for
    /// observing load distribution.
    pub fn task_counts(&self) -> Vec<usize> {
        self.members.iter().map(SyncScheduler::task_count).collect()
    }

    /// Counts the tasks held across the whole pool.
    pub fn task_count(&self) -> usize {
        self.task_counts().into_iter().sum()
    }
}

impl Scheduler for AsyncScheduler {
    /// Assigns the task to the next pool member in round-robin order.
    fn register_task(&self, task: TaskHandle) {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.members.len();
        self.members[index].register_task(task);
    }

    /// Broadcasts the removal to every pool member, since the caller does
    /// not know which member holds the task. Members that do not hold it
    /// treat the removal as a no-op, though each still fires the task's
    /// unregistration hook.
    fn unregister_task(&self, task: &TaskHandle) {
        for member in &self.members {
            member.unregister_task(task);
        }
    }

    fn start(&self) {
        for member in &self.members {
            member.start();
        }
    }

    fn stop(&self) {
        for member in &self.members {
            member.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::task::Task;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    struct CountingTask {
        executions: Arc<AtomicUsize>,
    }

    impl Task for CountingTask {
        fn execute(&mut self, _delta: Duration) {
            self.executions.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn noop_task() -> TaskHandle {
        Arc::new(Mutex::new(CountingTask {
            executions: Arc::new(AtomicUsize::new(0)),
        }))
    }

    #[test]
    fn registrations_distribute_round_robin() {
        let pool = AsyncScheduler::new(AsyncSchedulerConfig::default());
        for _ in 0..10 {
            pool.register_task(noop_task());
        }

        let counts = pool.task_counts();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts.iter().sum::<usize>(), 10);
        assert!(counts.iter().all(|count| (2..=3).contains(count)));
    }

    #[test]
    fn unregistration_broadcast_is_idempotent() {
        let pool = AsyncScheduler::new(AsyncSchedulerConfig::default());
        let task = noop_task();
        pool.register_task(Arc::clone(&task));
        assert_eq!(pool.task_count(), 1);

        pool.unregister_task(&task);
        pool.unregister_task(&task); // removing again is a no-op
        pool.start();
        thread::sleep(Duration::from_millis(20));
        pool.stop();
        assert_eq!(pool.task_count(), 0);
    }

    #[test]
    fn start_and_stop_fan_out_to_every_member() {
        let pool = AsyncScheduler::new(AsyncSchedulerConfig {
            pool_size: 2,
            member: SchedulerConfig::default(),
        });
        pool.start();
        assert_eq!(pool.pool_size(), 2);

        let executions = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            pool.register_task(Arc::new(Mutex::new(CountingTask {
                executions: Arc::clone(&executions),
            })));
        }
        thread::sleep(Duration::from_millis(50));
        pool.stop();

        assert!(executions.load(Ordering::Relaxed) >= 4);
    }

    #[test]
    fn zero_pool_size_is_clamped() {
        let pool = AsyncScheduler::new(AsyncSchedulerConfig {
            pool_size: 0,
            member: SchedulerConfig::default(),
        });
        assert_eq!(pool.pool_size(), 1);
    }
}
