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

//! End-to-end pipeline test with manual, deterministic pumping: physics
//! ticks emit collision events, the dispatcher drains them one at a time,
//! and the built-in response feeds back into the next tick.

use orrery_core::geometry::SphereProfile;
use orrery_core::math::Vec3;
use orrery_core::Body;
use orrery_engine::event::{Cancellable, EventManager, HandlerPriority};
use orrery_engine::level::{Level, LevelManager};
use orrery_engine::physics::{CollisionEvent, CollisionResponder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(10);

fn sphere(mass: f64, radius: f64, location: Vec3, velocity: Vec3) -> Body {
    Body::builder()
        .mass(mass)
        .profile(SphereProfile::new(radius))
        .location(location)
        .acceleration(velocity)
        .build()
        .unwrap()
}

#[test]
fn collision_events_flow_from_tick_through_dispatch_to_response() {
    let events = Arc::new(EventManager::new());
    let levels = Arc::new(LevelManager::new(Arc::clone(&events)));
    CollisionResponder::attach(&events, Arc::clone(&levels));

    let collisions = Arc::new(AtomicUsize::new(0));
    {
        let collisions = Arc::clone(&collisions);
        let monitor = events.register_listener();
        events.subscribe::<CollisionEvent, _>(monitor, HandlerPriority::Monitor, move |_event| {
            collisions.fetch_add(1, Ordering::Relaxed);
        });
    }

    // Two unit spheres on a head-on course along the x axis.
    let mut level = Level::builder().name("head-on").build().unwrap();
    let left = level
        .add_body(sphere(
            1.0,
            1.0,
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ))
        .unwrap();
    let right = level
        .add_body(sphere(
            1.0,
            1.0,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-2.0, 0.0, 0.0),
        ))
        .unwrap();
    let level_id = levels.add_level(level).unwrap();
    let level = levels.level(level_id).unwrap();

    let pump = |level: &Arc<Mutex<Level>>| {
        level
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick(TICK, &events);
        while events.dispatch_next() {}
    };

    // Closing speed 4 over an 8 unit gap: contact within 2 simulated
    // seconds. 300 ticks of 10ms gives 3 seconds with margin.
    let mut ticks_until_contact = None;
    for tick_index in 0..300 {
        pump(&level);
        if collisions.load(Ordering::Relaxed) > 0 {
            ticks_until_contact = Some(tick_index);
            break;
        }
    }
    assert!(
        ticks_until_contact.is_some(),
        "the approaching spheres never collided"
    );
    assert_eq!(collisions.load(Ordering::Relaxed), 1);

    // Equal masses on a head-on elastic collision swap velocities, so the
    // spheres separate again. While they still overlap no further event may
    // fire, and after separation the count must still be exactly one.
    {
        let level = level.lock().unwrap();
        let going_left = level.body(left).unwrap().acceleration().x;
        let going_right = level.body(right).unwrap().acceleration().x;
        assert!(
            going_left < 0.0 && going_right > 0.0,
            "collision response should have reversed the courses"
        );
    }
    for _ in 0..300 {
        pump(&level);
    }
    assert_eq!(collisions.load(Ordering::Relaxed), 1);
    assert!(level.lock().unwrap().overlapping_pairs().is_empty());

    // Steer the spheres back together: exactly one more event.
    {
        let mut level = level.lock().unwrap();
        let toward_right = Vec3::new(2.0, 0.0, 0.0);
        level.body_mut(left).unwrap().set_acceleration(toward_right);
        level
            .body_mut(right)
            .unwrap()
            .set_acceleration(-toward_right);
    }
    for _ in 0..600 {
        pump(&level);
    }
    assert_eq!(collisions.load(Ordering::Relaxed), 2);
}

#[test]
fn cancellation_suppresses_the_response_but_not_later_handlers() {
    let events = Arc::new(EventManager::new());
    let levels = Arc::new(LevelManager::new(Arc::clone(&events)));

    let canceller = events.register_listener();
    events.subscribe::<CollisionEvent, _>(canceller, HandlerPriority::PreEarly, |event| {
        event.set_cancelled(true);
    });
    CollisionResponder::attach(&events, Arc::clone(&levels));
    let observed = Arc::new(AtomicUsize::new(0));
    {
        let observed = Arc::clone(&observed);
        let monitor = events.register_listener();
        events.subscribe::<CollisionEvent, _>(monitor, HandlerPriority::PostMonitor, move |_| {
            observed.fetch_add(1, Ordering::Relaxed);
        });
    }

    // The massless partner has no material density, so the overlap applies
    // no drag and the cancelled response is the only thing that could move
    // the velocity.
    let mut level = Level::builder().build().unwrap();
    let a = level
        .add_body(sphere(1.0, 10.0, Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)))
        .unwrap();
    let level_id = {
        level
            .add_body(sphere(0.0, 10.0, Vec3::new(0.0, 0.0, 15.0), Vec3::ZERO))
            .unwrap();
        levels.add_level(level).unwrap()
    };

    let level = levels.level(level_id).unwrap();
    level.lock().unwrap().tick(TICK, &events);
    while events.dispatch_next() {}

    // The later-tier monitor still ran, but the cancelled response left the
    // velocities alone.
    assert_eq!(observed.load(Ordering::Relaxed), 1);
    let level = level.lock().unwrap();
    let velocity = level.body(a).unwrap().acceleration();
    assert!((velocity.x - 3.0).abs() < 1e-9);
}
