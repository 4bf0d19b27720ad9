// Copyright 2025 John Brosnihan
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
//! Integration tests for stepping bodies through a space

use phys2d::math::DVec2;
use phys2d::{
    Body, BodyEvent, Circle, MotionType, Particle, SleepConfig, SleepState, Space, SpaceConfig,
};
use std::sync::{Arc, Mutex};

const DT: f64 = 1.0 / 60.0;
const G: f64 = 9.801;

#[test]
fn test_free_fall_one_second() {
    let mut space = Space::new();
    let handle = space.add_body(Particle::new(1.0));

    for _ in 0..60 {
        space.update(DT);
    }

    let body = space.body(handle).unwrap();
    assert!((body.velocity().y + G).abs() < 1e-9);
    assert_eq!(body.velocity().x, 0.0);

    // semi-implicit Euler: y_n = -g dt^2 n(n+1)/2
    let discrete = -G * DT * DT * (60.0 * 61.0) / 2.0;
    assert!((body.position().y - discrete).abs() < 1e-9);

    // within one step's worth of drift from y = -g t^2 / 2
    let continuous = -0.5 * G;
    assert!((body.position().y - continuous).abs() < G * DT);
}

#[test]
fn test_linear_motion_without_force() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    let v = DVec2::new(3.0, -1.5);
    let p0 = DVec2::new(1.0, 2.0);
    let handle = space.add_body(Body::new().with_mass(2.0).with_position(p0).with_velocity(v));

    for _ in 0..120 {
        space.update(DT);
    }

    let body = space.body(handle).unwrap();
    assert!((body.velocity() - v).length() < 1e-12);
    assert!((body.position() - (p0 + v * 2.0)).length() < 1e-9);
}

#[test]
fn test_rotation_integrates_angular_velocity() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    let handle = space.add_body(
        Body::new()
            .with_shape(Circle::new(1.0))
            .with_angular_velocity(std::f64::consts::PI),
    );

    for _ in 0..60 {
        space.update(DT);
    }

    let body = space.body(handle).unwrap();
    assert!((body.rotation() - std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn test_linear_damping_decays_speed() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    let handle = space.add_body(
        Body::new()
            .with_mass(1.0)
            .with_velocity(DVec2::new(4.0, 0.0))
            .with_linear_damping(0.5),
    );

    for _ in 0..60 {
        space.update(DT);
    }

    // (1 - 0.5)^(60 * dt) = 0.5
    let speed = space.body(handle).unwrap().velocity().x;
    assert!((speed - 2.0).abs() < 1e-9);
}

#[test]
fn test_sleeping_body_accumulates_velocity_but_does_not_move() {
    let mut space = Space::new();
    let handle = space.add_body(Body::new().with_mass(1.0).with_position(DVec2::new(0.0, 10.0)));
    space.body_mut(handle).unwrap().sleep();

    space.update(DT);

    let body = space.body(handle).unwrap();
    assert_eq!(body.position(), DVec2::new(0.0, 10.0));
    assert!(body.velocity().y < 0.0);
    assert!(body.is_sleeping());
}

#[test]
fn test_kinematic_body_ignores_gravity() {
    let mut space = Space::new();
    let handle = space.add_body(
        Body::new()
            .with_motion_type(MotionType::Kinematic)
            .with_shape(Circle::new(1.0)),
    );
    space.body_mut(handle).unwrap().set_velocity(DVec2::new(1.0, 0.0));

    for _ in 0..60 {
        space.update(DT);
    }

    let body = space.body(handle).unwrap();
    assert_eq!(body.mass(), 0.0);
    assert!((body.position() - DVec2::new(1.0, 0.0)).length() < 1e-9);
}

#[test]
fn test_auto_sleep_and_wake() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let config = SpaceConfig::new()
        .with_gravity(DVec2::ZERO)
        .with_sleep(SleepConfig::default().with_enabled(true).with_time_to_sleep(0.25));
    let mut space = Space::with_config(config);
    let handle = space.add_body(Body::new().with_shape(Circle::new(0.5)));

    let sink = Arc::clone(&events);
    space
        .body_mut(handle)
        .unwrap()
        .subscribe(move |e| sink.lock().unwrap().push(*e));

    space.update(DT);
    assert_eq!(space.body(handle).unwrap().sleep_state(), SleepState::Sleepy);

    for _ in 0..30 {
        space.update(DT);
    }
    assert!(space.body(handle).unwrap().is_sleeping());

    space
        .body_mut(handle)
        .unwrap()
        .apply_impulse(DVec2::new(1.0, 0.0), None);
    assert!(space.body(handle).unwrap().is_awake());
    assert_eq!(*events.lock().unwrap(), vec![BodyEvent::Sleep, BodyEvent::Wake]);
}

#[test]
fn test_body_aabb_follows_motion() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    let handle = space.add_body(
        Body::new()
            .with_shape(Circle::new(0.5))
            .with_velocity(DVec2::new(6.0, 0.0)),
    );

    for _ in 0..60 {
        space.update(DT);
    }

    let aabb = space.body(handle).unwrap().aabb();
    assert!((aabb.center() - DVec2::new(6.0, 0.0)).length() < 1e-9);
    assert!((aabb.extents() - DVec2::ONE).length() < 1e-12);
}
