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

//! Task schedulers.
//!
//! [`SyncScheduler`] runs all of its tasks sequentially on one dedicated
//! execution thread, respecting each task's individual interval.
//! [`AsyncScheduler`] fans registrations out round-robin across a fixed pool
//! of synchronous schedulers, trading ordering guarantees for concurrency.

mod pool;
mod sync;

pub use pool::{AsyncScheduler, AsyncSchedulerConfig};
pub use sync::{SchedulerConfig, SyncScheduler};

pub use orrery_core::task::{Scheduler, Task, TaskHandle, MIN_TASK_INTERVAL};
