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
//! Integration tests for force providers and contact resolvers

use phys2d::forces::ConstantForce;
use phys2d::math::DVec2;
use phys2d::resolver::ImpulseResolver;
use phys2d::{
    AppliedForce, Body, Circle, Contact, ContactResolver, ForceProvider, MotionType,
    ResolverError, ShapeParams, Space, SpaceConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DT: f64 = 1.0 / 60.0;

/// Spring pulling bodies toward the origin
struct Spring {
    stiffness: f64,
}

impl ForceProvider for Spring {
    fn compute_force(&self, body: &Body) -> Option<AppliedForce> {
        Some(AppliedForce::linear(-body.position() * self.stiffness))
    }

    fn name(&self) -> &str {
        "spring"
    }
}

/// Counts contacts it is shown
struct Counting {
    seen: Arc<AtomicUsize>,
    api: &'static str,
}

impl ContactResolver for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn api_version(&self) -> &str {
        self.api
    }

    fn resolve(
        &mut self,
        _bodies: &mut [Body],
        contacts: &[Contact],
        _dt: f64,
    ) -> Result<(), ResolverError> {
        self.seen.fetch_add(contacts.len(), Ordering::SeqCst);
        Ok(())
    }
}

/// Always fails
struct Failing;

impl ContactResolver for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn resolve(&mut self, _: &mut [Body], _: &[Contact], _: f64) -> Result<(), ResolverError> {
        Err(ResolverError::Failed {
            name: "failing".to_string(),
            reason: "always".to_string(),
        })
    }
}

fn overlapping_pair(space: &mut Space) {
    space.add_body(Body::new().with_shape(Circle::new(1.0)));
    space.add_body(
        Body::new()
            .with_position(DVec2::new(1.5, 0.0))
            .with_shape(Circle::new(1.0)),
    );
}

#[test]
fn test_provider_force_adds_to_gravity() {
    let mut space = Space::new();
    space.add_force_provider(Box::new(ConstantForce::new(
        "lift",
        AppliedForce::linear(DVec2::new(0.0, 9.801)),
    )));
    let handle = space.add_body(Body::new().with_mass(1.0));

    for _ in 0..60 {
        space.update(DT);
    }
    let body = space.body(handle).unwrap();
    assert!(body.velocity().length() < 1e-9);
    assert!(body.position().length() < 1e-9);
}

#[test]
fn test_spring_provider_oscillates() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    space.add_force_provider(Box::new(Spring { stiffness: 1.0 }));
    let handle = space.add_body(Body::new().with_mass(1.0).with_position(DVec2::new(1.0, 0.0)));

    // half a period of a unit oscillator
    let steps = (std::f64::consts::PI / 0.001).round() as usize;
    for _ in 0..steps {
        space.update(0.001);
    }
    let x = space.body(handle).unwrap().position().x;
    assert!((x + 1.0).abs() < 1e-2, "x = {x}");
}

#[test]
fn test_provider_does_not_wake_sleeping_body() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    space.add_force_provider(Box::new(ConstantForce::new(
        "wind",
        AppliedForce::linear(DVec2::new(1.0, 0.0)),
    )));
    let handle = space.add_body(Body::new().with_mass(1.0));
    space.body_mut(handle).unwrap().sleep();

    space.update(DT);
    let body = space.body(handle).unwrap();
    assert!(body.is_sleeping());
    assert_eq!(body.position(), DVec2::ZERO);
}

#[test]
fn test_resolver_sees_contacts() {
    let seen = Arc::new(AtomicUsize::new(0));
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    overlapping_pair(&mut space);
    space
        .set_resolver(Box::new(Counting {
            seen: Arc::clone(&seen),
            api: phys2d::RESOLVER_API_VERSION,
        }))
        .unwrap();
    assert!(space.has_resolver());

    space.update(DT);
    space.update(DT);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_incompatible_resolver_is_rejected() {
    let mut space = Space::new();
    let result = space.set_resolver(Box::new(Counting {
        seen: Arc::new(AtomicUsize::new(0)),
        api: "1.0.0",
    }));
    assert!(matches!(result, Err(ResolverError::IncompatibleVersion { .. })));
    assert!(!space.has_resolver());
}

#[test]
fn test_failing_resolver_does_not_stop_step() {
    let mut space = Space::new();
    overlapping_pair(&mut space);
    space.set_resolver(Box::new(Failing)).unwrap();
    space.update(DT);
    assert_eq!(space.step_count(), 1);
    assert!(space.take_resolver().is_some());
}

#[test]
fn test_no_resolver_leaves_overlap_unresolved() {
    let mut space = Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO));
    overlapping_pair(&mut space);
    for _ in 0..10 {
        space.update(DT);
    }
    assert_eq!(space.contacts().len(), 1);
    assert_eq!(space.bodies()[0].position(), DVec2::ZERO);
}

#[test]
fn test_impulse_resolver_bounces_ball() {
    let mut space = Space::new();
    space.add_body(
        Body::new()
            .with_motion_type(MotionType::Static)
            .with_shape(phys2d::Convex::with_extents(DVec2::new(10.0, 0.5)).with_elasticity(1.0)),
    );
    let ball = space.add_body(
        Body::new()
            .with_position(DVec2::new(0.0, 0.95))
            .with_velocity(DVec2::new(0.0, -2.0))
            .with_shape(Circle::new(0.5).with_elasticity(1.0)),
    );
    space.set_resolver(Box::new(ImpulseResolver)).unwrap();

    space.update(DT);
    assert!(space.body(ball).unwrap().velocity().y > 0.0);
}
