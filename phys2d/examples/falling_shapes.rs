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
//! Falling shapes example
//!
//! Drops a ball, a box and a hull-repaired polygon onto a static floor with
//! the simple impulse resolver installed, and prints their state once per
//! simulated second.

use phys2d::math::DVec2;
use phys2d::resolver::ImpulseResolver;
use phys2d::{Body, BodyEvent, Circle, Convex, MotionType, ShapeParams, SleepConfig, Space, SpaceConfig};

fn main() {
    println!("phys2d - Falling Shapes Example");
    println!("===============================\n");

    let config = SpaceConfig::new().with_sleep(SleepConfig::default().with_enabled(true));
    let mut space = Space::with_config(config);
    space.subscribe(|event| println!("  [space] {event:?}"));

    if let Err(err) = space.set_resolver(Box::new(ImpulseResolver)) {
        eprintln!("Could not install resolver: {err}");
        return;
    }

    space.add_body(
        Body::new()
            .with_motion_type(MotionType::Static)
            .with_shape(Convex::with_extents(DVec2::new(20.0, 0.5))),
    );

    let ball = space.add_body(
        Body::new()
            .with_position(DVec2::new(-2.0, 4.0))
            .with_shape(Circle::new(0.5).with_elasticity(0.8)),
    );
    let crate_box = space.add_body(
        Body::new()
            .with_position(DVec2::new(0.0, 6.0))
            .with_rotation(0.3)
            .with_shape(Convex::with_extents(DVec2::new(0.6, 0.4))),
    );
    // clockwise and with an interior point: repaired into a hull
    let rock = space.add_body(
        Body::new().with_position(DVec2::new(2.0, 8.0)).with_shape(Convex::new(vec![
            DVec2::new(0.0, 0.8),
            DVec2::new(0.7, 0.0),
            DVec2::new(0.1, 0.1),
            DVec2::new(0.0, -0.6),
            DVec2::new(-0.7, 0.0),
        ])),
    );

    for handle in [ball, crate_box, rock] {
        if let Some(body) = space.body_mut(handle) {
            body.subscribe(move |event| {
                if matches!(event, BodyEvent::Sleep | BodyEvent::Wake) {
                    println!("  [{handle}] {event:?}");
                }
            });
        }
    }

    println!("Bodies: {}", space.body_count());
    for handle in [ball, crate_box, rock] {
        if let Some(body) = space.body(handle) {
            println!(
                "  {handle}: mass {:.3}, inertia {:.3}, shapes {}",
                body.mass(),
                body.inertia(),
                body.shape_count()
            );
        }
    }

    let dt = 1.0 / 60.0;
    for second in 1..=4 {
        for _ in 0..60 {
            space.update(dt);
        }
        println!("\nt = {second}s, {} contacts", space.contacts().len());
        for handle in [ball, crate_box, rock] {
            if let Some(body) = space.body(handle) {
                let p = body.position();
                let v = body.velocity();
                println!(
                    "  {handle}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}) {:?}",
                    p.x,
                    p.y,
                    v.x,
                    v.y,
                    body.sleep_state()
                );
            }
        }
    }
}
