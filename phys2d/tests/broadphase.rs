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
//! Integration tests for candidate pair generation

use phys2d::collision::{Broadphase, BruteForceBroadphase, Candidate};
use phys2d::math::DVec2;
use phys2d::{Body, Circle, Convex, MotionType, ShapeParams, Space, SpaceConfig};

fn space() -> Space {
    Space::with_config(SpaceConfig::new().with_gravity(DVec2::ZERO))
}

fn disc_at(x: f64) -> Body {
    Body::new()
        .with_position(DVec2::new(x, 0.0))
        .with_shape(Circle::new(1.0))
}

fn pair_count(space: &Space) -> usize {
    space.candidate_pairs().0.len()
}

#[test]
fn test_overlapping_dynamic_bodies_pair() {
    let mut space = space();
    space.add_body(disc_at(0.0));
    space.add_body(disc_at(1.5));
    space.update(1.0 / 60.0);

    let (a, b) = space.candidate_pairs();
    assert_eq!(a, &[Candidate::shape(1, 0)]);
    assert_eq!(b, &[Candidate::shape(0, 0)]);
}

#[test]
fn test_disjoint_boxes_do_not_pair() {
    let mut space = space();
    space.add_body(disc_at(0.0));
    space.add_body(disc_at(2.5));
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 0);
}

#[test]
fn test_sleeping_pair_is_pruned() {
    let mut space = space();
    let a = space.add_body(disc_at(0.0));
    let b = space.add_body(disc_at(0.5));
    space.body_mut(a).unwrap().sleep();
    space.body_mut(b).unwrap().sleep();
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 0);

    space.body_mut(b).unwrap().wake();
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 1);
}

#[test]
fn test_non_dynamic_pair_is_pruned() {
    let mut space = space();
    space.add_body(disc_at(0.0).with_motion_type(MotionType::Static));
    space.add_body(disc_at(0.5).with_motion_type(MotionType::Kinematic));
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 0);
}

#[test]
fn test_static_against_dynamic_pairs() {
    let mut space = space();
    space.add_body(
        Body::new()
            .with_motion_type(MotionType::Static)
            .with_shape(Convex::with_extents(DVec2::new(5.0, 0.5))),
    );
    space.add_body(disc_at(0.0));
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 1);
}

#[test]
fn test_shapeless_body_pairs_with_each_shape() {
    let mut space = space();
    space.add_body(
        Body::new()
            .with_shape(Circle::new(1.0))
            .with_shape(Circle::new(1.0).with_local_position(DVec2::new(1.0, 0.0))),
    );
    space.add_body(Body::new().with_mass(1.0).with_position(DVec2::new(0.5, 0.0)));
    space.update(1.0 / 60.0);

    let (a, b) = space.candidate_pairs();
    assert_eq!(a, &[Candidate::point(1), Candidate::point(1)]);
    assert_eq!(b, &[Candidate::shape(0, 1), Candidate::shape(0, 0)]);
}

#[test]
fn test_two_shapeless_bodies_do_not_pair() {
    let mut space = space();
    space.add_body(Body::new().with_mass(1.0));
    space.add_body(Body::new().with_mass(1.0));
    space.update(1.0 / 60.0);
    assert_eq!(pair_count(&space), 0);
}

#[test]
fn test_pair_order_is_reverse_outer_forward_inner() {
    let mut space = space();
    for _ in 0..3 {
        space.add_body(disc_at(0.0));
    }

    let mut a = Vec::new();
    let mut b = Vec::new();
    BruteForceBroadphase::new().collisions(space.bodies(), &mut a, &mut b);

    let bodies: Vec<(usize, usize)> = a.iter().zip(&b).map(|(x, y)| (x.body, y.body)).collect();
    assert_eq!(bodies, vec![(2, 0), (2, 1), (1, 0)]);
}

#[test]
fn test_shape_level_filtering() {
    let mut space = space();
    space.add_body(
        Body::new()
            .with_shape(Circle::new(0.5))
            .with_shape(Circle::new(0.5).with_local_position(DVec2::new(4.0, 0.0))),
    );
    space.add_body(disc_at(4.5));
    space.update(1.0 / 60.0);

    let (a, b) = space.candidate_pairs();
    assert_eq!(a, &[Candidate::shape(1, 0)]);
    assert_eq!(b, &[Candidate::shape(0, 1)]);
}
