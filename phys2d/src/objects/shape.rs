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
//! Collision shapes
//!
//! A shape is a circle (or annulus) or a convex polygon attached to a body at
//! a local offset and rotation. Mass properties are computed in the body
//! frame; world data (transform, world vertices, bounding box) is refreshed
//! by [`Shape::update`] each time the owning body moves.

use super::circle::Circle;
use super::convex::Convex;
use crate::math::{compose, Aabb2, DAffine2, DVec2};

/// Default density in mass per unit area
pub const DEFAULT_DENSITY: f64 = 1.0;
/// Default friction coefficient
pub const DEFAULT_FRICTION: f64 = 0.25;
/// Default restitution coefficient
pub const DEFAULT_ELASTICITY: f64 = 0.25;

/// Material and placement data shared by every shape kind
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCommon {
    density: f64,
    friction: f64,
    elasticity: f64,
    local_position: DVec2,
    local_rotation: f64,
    local: DAffine2,
    world: Option<DAffine2>,
    world_position: DVec2,
    aabb: Aabb2,
}

impl ShapeCommon {
    pub(crate) fn new() -> Self {
        ShapeCommon {
            density: DEFAULT_DENSITY,
            friction: DEFAULT_FRICTION,
            elasticity: DEFAULT_ELASTICITY,
            local_position: DVec2::ZERO,
            local_rotation: 0.0,
            local: DAffine2::IDENTITY,
            world: None,
            world_position: DVec2::ZERO,
            aabb: Aabb2::empty(),
        }
    }

    /// Mass per unit area
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Friction coefficient
    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Restitution coefficient
    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Offset from the body origin
    pub fn local_position(&self) -> DVec2 {
        self.local_position
    }

    /// Rotation relative to the body, in radians
    pub fn local_rotation(&self) -> f64 {
        self.local_rotation
    }

    /// Shape-to-body transform
    pub fn local_transform(&self) -> DAffine2 {
        self.local
    }

    /// Shape-to-world transform; `None` until the owning body is registered
    pub fn world_transform(&self) -> Option<DAffine2> {
        self.world
    }

    /// World position of the shape origin as of the last update
    pub fn world_position(&self) -> DVec2 {
        self.world_position
    }

    /// World bounding box as of the last update
    pub fn aabb(&self) -> Aabb2 {
        self.aabb
    }

    pub(crate) fn set_density(&mut self, density: f64) {
        if !density.is_finite() || density < 0.0 {
            log::warn!("Shape::set_density: ignoring invalid density {density}");
            return;
        }
        self.density = density;
    }

    pub(crate) fn set_friction(&mut self, friction: f64) {
        self.friction = friction.max(0.0);
    }

    pub(crate) fn set_elasticity(&mut self, elasticity: f64) {
        self.elasticity = elasticity.max(0.0);
    }

    pub(crate) fn set_local_placement(&mut self, position: DVec2, rotation: f64) {
        self.local_position = position;
        self.local_rotation = rotation;
        self.local = compose(position, rotation);
    }

    /// Store the world transform for `body` and return it
    pub(crate) fn place(&mut self, body: &DAffine2) -> DAffine2 {
        let world = *body * self.local;
        self.world = Some(world);
        self.world_position = world.translation;
        world
    }

    pub(crate) fn set_aabb(&mut self, aabb: Aabb2) {
        self.aabb = aabb;
    }
}

/// Builder-style setters shared by [`Circle`], [`Convex`] and [`Shape`]
pub trait ShapeParams: Sized {
    /// Access the shared material and placement data
    fn common(&self) -> &ShapeCommon;

    /// Mutable access to the shared data
    fn common_mut(&mut self) -> &mut ShapeCommon;

    /// Set the density
    fn with_density(mut self, density: f64) -> Self {
        self.common_mut().set_density(density);
        self
    }

    /// Set the friction coefficient
    fn with_friction(mut self, friction: f64) -> Self {
        self.common_mut().set_friction(friction);
        self
    }

    /// Set the restitution coefficient
    fn with_elasticity(mut self, elasticity: f64) -> Self {
        self.common_mut().set_elasticity(elasticity);
        self
    }

    /// Set the offset from the body origin
    fn with_local_position(mut self, position: DVec2) -> Self {
        let rotation = self.common().local_rotation();
        self.common_mut().set_local_placement(position, rotation);
        self
    }

    /// Set the rotation relative to the body
    fn with_local_rotation(mut self, rotation: f64) -> Self {
        let position = self.common().local_position();
        self.common_mut().set_local_placement(position, rotation);
        self
    }
}

/// A collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle or annulus
    Circle(Circle),
    /// Convex polygon
    Convex(Convex),
}

impl Shape {
    /// Area in square units
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Convex(c) => c.area(),
        }
    }

    /// `density * area`
    pub fn mass(&self) -> f64 {
        self.common().density() * self.area()
    }

    /// Centroid in the body frame
    pub fn centroid(&self) -> DVec2 {
        match self {
            Shape::Circle(c) => c.centroid(),
            Shape::Convex(c) => c.centroid(),
        }
    }

    /// Moment of inertia about the body origin for the given mass
    pub fn inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(c) => c.inertia(mass),
            Shape::Convex(c) => c.inertia(mass),
        }
    }

    /// Whether a world point lies inside the shape
    ///
    /// Always false before the first [`Shape::update`].
    pub fn point_query(&self, point: DVec2) -> bool {
        match self {
            Shape::Circle(c) => c.point_query(point),
            Shape::Convex(c) => c.point_query(point),
        }
    }

    /// Recompute world data from the owning body's transform
    pub fn update(&mut self, body: &DAffine2) {
        match self {
            Shape::Circle(c) => c.update(body),
            Shape::Convex(c) => c.update(body),
        }
    }

    /// World bounding box as of the last update
    pub fn aabb(&self) -> Aabb2 {
        self.common().aabb()
    }

    /// Set the density; the body must re-run
    /// [`Body::reset_mass_data`](crate::Body::reset_mass_data) to pick it up
    pub fn set_density(&mut self, density: f64) {
        self.common_mut().set_density(density);
    }

    /// Set the friction coefficient
    pub fn set_friction(&mut self, friction: f64) {
        self.common_mut().set_friction(friction);
    }

    /// Set the restitution coefficient
    pub fn set_elasticity(&mut self, elasticity: f64) {
        self.common_mut().set_elasticity(elasticity);
    }
}

impl ShapeParams for Shape {
    fn common(&self) -> &ShapeCommon {
        match self {
            Shape::Circle(c) => c.common(),
            Shape::Convex(c) => c.common(),
        }
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        match self {
            Shape::Circle(c) => c.common_mut(),
            Shape::Convex(c) => c.common_mut(),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Convex> for Shape {
    fn from(convex: Convex) -> Self {
        Shape::Convex(convex)
    }
}
