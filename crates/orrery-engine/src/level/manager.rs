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

//! Handles the lifecycle of levels.

use super::{Level, LevelId};
use crate::error::RegistryError;
use crate::event::EventManager;
use orrery_core::task::{Scheduler, Task, TaskHandle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Registry of levels plus the scheduler task that ticks them.
///
/// Levels are shared as `Arc<Mutex<Level>>` because the physics tick task
/// and listener-side mutation (collision response runs inside the event
/// drain task) generally execute on different scheduler threads. The
/// per-level mutex is the synchronization between them; whoever resolves a
/// level through this registry participates in it.
pub struct LevelManager {
    levels: Arc<Mutex<HashMap<LevelId, Arc<Mutex<Level>>>>>,
    events: Arc<EventManager>,
    ticker: Mutex<Option<TaskHandle>>,
}

impl LevelManager {
    /// Creates an empty registry whose levels will emit events through the
    /// given manager.
    pub fn new(events: Arc<EventManager>) -> Self {
        Self {
            levels: Arc::new(Mutex::new(HashMap::new())),
            events,
            ticker: Mutex::new(None),
        }
    }

    /// Adds a level to this registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateLevel`] when a level with the same
    /// identifier is already registered.
    pub fn add_level(&self, level: Level) -> Result<LevelId, RegistryError> {
        let id = level.id();
        let mut levels = self.levels.lock().unwrap();
        if levels.contains_key(&id) {
            return Err(RegistryError::DuplicateLevel { id });
        }
        levels.insert(id, Arc::new(Mutex::new(level)));
        log::info!("Level {id} registered.");
        Ok(id)
    }

    /// Removes a level from this registry and returns the handle.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LevelNotFound`] when no level with the given
    /// identifier is registered.
    pub fn remove_level(&self, id: LevelId) -> Result<Arc<Mutex<Level>>, RegistryError> {
        let removed = self
            .levels
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(RegistryError::LevelNotFound { id })?;
        log::info!("Level {id} unregistered.");
        Ok(removed)
    }

    /// Looks up a level by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LevelNotFound`] when no level with the given
    /// identifier is registered.
    pub fn level(&self, id: LevelId) -> Result<Arc<Mutex<Level>>, RegistryError> {
        self.levels
            .lock()
            .unwrap()
            .get(&id)
            .map(Arc::clone)
            .ok_or(RegistryError::LevelNotFound { id })
    }

    /// Looks up a level by name. Returns the first match, or `None` when no
    /// registered level carries the name.
    pub fn find_level(&self, name: &str) -> Option<Arc<Mutex<Level>>> {
        self.levels
            .lock()
            .unwrap()
            .values()
            .find(|level| {
                level
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .name()
                    == name
            })
            .map(Arc::clone)
    }

    /// Gets a snapshot of every registered level.
    pub fn levels(&self) -> Vec<Arc<Mutex<Level>>> {
        self.levels.lock().unwrap().values().map(Arc::clone).collect()
    }

    /// Counts the registered levels.
    pub fn level_count(&self) -> usize {
        self.levels.lock().unwrap().len()
    }

    /// Registers the tick task on the given scheduler, starting simulation
    /// of every registered level. No-op if already started.
    pub fn start(&self, scheduler: &dyn Scheduler) {
        let mut ticker = self.ticker.lock().unwrap();
        if ticker.is_some() {
            return;
        }
        let task: TaskHandle = Arc::new(Mutex::new(LevelTickTask {
            levels: Arc::clone(&self.levels),
            events: Arc::clone(&self.events),
        }));
        scheduler.register_task(Arc::clone(&task));
        *ticker = Some(task);
    }

    /// Unregisters the tick task from the given scheduler, freezing every
    /// level in place.
    pub fn stop(&self, scheduler: &dyn Scheduler) {
        if let Some(task) = self.ticker.lock().unwrap().take() {
            scheduler.unregister_task(&task);
        }
    }
}

/// Scheduler-driven advancement of every registered level.
struct LevelTickTask {
    levels: Arc<Mutex<HashMap<LevelId, Arc<Mutex<Level>>>>>,
    events: Arc<EventManager>,
}

impl Task for LevelTickTask {
    fn execute(&mut self, delta: Duration) {
        let snapshot: Vec<Arc<Mutex<Level>>> =
            self.levels.lock().unwrap().values().map(Arc::clone).collect();
        for level in snapshot {
            // A level poisoned by a faulty event handler keeps simulating;
            // the handler fault was already logged by the dispatcher.
            let mut level = level.lock().unwrap_or_else(PoisonError::into_inner);
            level.tick(delta, &self.events);
        }
    }
}
