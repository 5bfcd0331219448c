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

//! The engine facade: owns and wires the runtime services.

use crate::event::{EventManager, ListenerId};
use crate::level::LevelManager;
use crate::physics::CollisionResponder;
use crate::scheduler::{
    AsyncScheduler, AsyncSchedulerConfig, Scheduler, SchedulerConfig, SyncScheduler,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Top-level configuration for an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Configuration of the synchronous scheduler carrying the event drain.
    pub sync: SchedulerConfig,
    /// Configuration of the scheduler pool carrying the level tick.
    pub pool: AsyncSchedulerConfig,
}

/// Owns the schedulers, the event manager, and the level registry, and
/// wires them into a running simulation.
///
/// The event drain runs on the dedicated synchronous scheduler; the level
/// tick runs on the asynchronous pool. Collision response therefore mutates
/// levels from a different thread than the physics tick, which is exactly
/// the cross-thread sharing the per-level mutexes in [`LevelManager`]
/// serialize.
pub struct Engine {
    sync_scheduler: SyncScheduler,
    async_scheduler: AsyncScheduler,
    events: Arc<EventManager>,
    levels: Arc<LevelManager>,
    collision_listener: Mutex<Option<ListenerId>>,
    running: AtomicBool,
}

impl Engine {
    /// Creates a stopped engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let events = Arc::new(EventManager::new());
        let levels = Arc::new(LevelManager::new(Arc::clone(&events)));
        Self {
            sync_scheduler: SyncScheduler::new(config.sync),
            async_scheduler: AsyncScheduler::new(config.pool),
            events,
            levels,
            collision_listener: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Gets the event manager.
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    /// Gets the level registry.
    pub fn levels(&self) -> &Arc<LevelManager> {
        &self.levels
    }

    /// Gets the dedicated synchronous scheduler.
    pub fn sync_scheduler(&self) -> &SyncScheduler {
        &self.sync_scheduler
    }

    /// Gets the asynchronous scheduler pool.
    pub fn async_scheduler(&self) -> &AsyncScheduler {
        &self.async_scheduler
    }

    /// Checks whether the engine is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the engine: registers the built-in collision response, puts
    /// the event drain and the level ticker on their schedulers, and starts
    /// every scheduler thread. No-op if already running.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let listener = CollisionResponder::attach(&self.events, Arc::clone(&self.levels));
        *self.collision_listener.lock().unwrap() = Some(listener);

        self.events.start(&self.sync_scheduler);
        self.levels.start(&self.async_scheduler);

        self.sync_scheduler.start();
        self.async_scheduler.start();
        log::info!("Engine started.");
    }

    /// Stops the engine: detaches the service tasks, stops every scheduler
    /// thread, and removes the built-in collision response. Levels, queued
    /// events, and listener registrations made by callers survive a
    /// stop/start cycle. No-op if already stopped.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        self.events.stop(&self.sync_scheduler);
        self.levels.stop(&self.async_scheduler);

        self.sync_scheduler.stop();
        self.async_scheduler.stop();

        if let Some(listener) = self.collision_listener.lock().unwrap().take() {
            self.events.unregister_listener(listener);
        }
        log::info!("Engine stopped.");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}
