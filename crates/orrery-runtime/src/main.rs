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

//! Boots a demo simulation: two spheres on a head-on course inside a level,
//! with the full scheduler/event/physics pipeline running on real threads.

use anyhow::Result;
use orrery_core::geometry::SphereProfile;
use orrery_core::math::Vec3;
use orrery_core::Body;
use orrery_engine::event::HandlerPriority;
use orrery_engine::level::Level;
use orrery_engine::physics::CollisionEvent;
use orrery_engine::{Engine, EngineConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn sphere(offset: f64, velocity: f64) -> Result<Body> {
    Ok(Body::builder()
        .mass(1.0)
        .profile(SphereProfile::new(1.0))
        .location(Vec3::new(offset, 0.0, 0.0))
        .acceleration(Vec3::new(velocity, 0.0, 0.0))
        .build()?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = Engine::new(EngineConfig::default());

    let level = Level::builder()
        .name("proving-grounds")
        .gravity(Vec3::ZERO)
        .air_density(0.0)
        .body(sphere(-5.0, 2.0)?)
        .body(sphere(5.0, -2.0)?)
        .build()?;
    let body_ids: Vec<_> = level.bodies().map(|body| body.id()).collect();
    let level_id = engine.levels().add_level(level)?;

    let collisions = Arc::new(AtomicUsize::new(0));
    {
        let collisions = Arc::clone(&collisions);
        let monitor = engine.events().register_listener();
        engine.events().subscribe::<CollisionEvent, _>(
            monitor,
            HandlerPriority::Monitor,
            move |event| {
                collisions.fetch_add(1, Ordering::Relaxed);
                log::info!(
                    "Collision observed between {} and {}.",
                    event.bodies().first(),
                    event.bodies().second()
                );
            },
        );
    }

    log::info!("Starting the proving-grounds simulation for four seconds.");
    engine.start();

    for _ in 0..8 {
        thread::sleep(Duration::from_millis(500));
        let level = engine.levels().level(level_id)?;
        let level = level.lock().unwrap();
        for id in &body_ids {
            if let Some(body) = level.body(*id) {
                let location = body.location();
                log::info!(
                    "{id}: at ({:+.2}, {:+.2}, {:+.2}) moving {:+.2} u/s",
                    location.x,
                    location.y,
                    location.z,
                    body.velocity()
                );
            }
        }
    }

    engine.stop();
    log::info!(
        "Simulation finished with {} collision(s).",
        collisions.load(Ordering::Relaxed)
    );
    Ok(())
}
