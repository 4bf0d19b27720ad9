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
//! Circles and annuli

use super::shape::{ShapeCommon, ShapeParams};
use crate::math::{Aabb2, DAffine2, DVec2};
use std::f64::consts::PI;

/// Default outer radius
pub const DEFAULT_RADIUS: f64 = 0.5;

/// A disc of radius `radius`, optionally hollowed to `inner_radius`
///
/// # Examples
///
/// ```
/// use phys2d::objects::Circle;
///
/// let ring = Circle::new(2.0).with_inner_radius(1.0);
/// assert!((ring.area() - 3.0 * std::f64::consts::PI).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    common: ShapeCommon,
    radius: f64,
    inner_radius: f64,
}

impl Circle {
    /// Create a solid circle
    pub fn new(radius: f64) -> Self {
        let radius = if radius.is_finite() && radius >= 0.0 {
            radius
        } else {
            log::warn!("Circle::new: invalid radius {radius}, using {DEFAULT_RADIUS}");
            DEFAULT_RADIUS
        };
        Circle {
            common: ShapeCommon::new(),
            radius,
            inner_radius: 0.0,
        }
    }

    /// Hollow the circle out to `inner_radius`, clamped to `[0, radius]`
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = if inner_radius.is_finite() {
            inner_radius.clamp(0.0, self.radius)
        } else {
            0.0
        };
        self
    }

    /// Outer radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Inner radius (0 for a solid disc)
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// `pi * (r^2 - ir^2)`
    pub fn area(&self) -> f64 {
        PI * (self.radius * self.radius - self.inner_radius * self.inner_radius)
    }

    /// The center in the body frame
    pub fn centroid(&self) -> DVec2 {
        self.common.local_position()
    }

    /// Inertia about the body origin: `m * ((r^2 + ir^2) / 2 + |offset|^2)`
    pub fn inertia(&self, mass: f64) -> f64 {
        let r2 = self.radius * self.radius;
        let ir2 = self.inner_radius * self.inner_radius;
        mass * ((r2 + ir2) * 0.5 + self.common.local_position().length_squared())
    }

    /// Whether a world point lies within the ring
    ///
    /// The outer boundary is inclusive; the inner one exclusive when hollow.
    pub fn point_query(&self, point: DVec2) -> bool {
        if self.common.world_transform().is_none() {
            return false;
        }
        let d2 = self.common.world_position().distance_squared(point);
        let ir2 = self.inner_radius * self.inner_radius;
        d2 <= self.radius * self.radius && (self.inner_radius == 0.0 || d2 > ir2)
    }

    /// World center as of the last update
    pub fn world_center(&self) -> DVec2 {
        self.common.world_position()
    }

    /// Refresh world center and bounding box
    pub fn update(&mut self, body: &DAffine2) {
        let world = self.common.place(body);
        let aabb = Aabb2::from_center_half_extents(world.translation, DVec2::splat(self.radius));
        self.common.set_aabb(aabb);
    }
}

impl Default for Circle {
    fn default() -> Self {
        Circle::new(DEFAULT_RADIUS)
    }
}

impl ShapeParams for Circle {
    fn common(&self) -> &ShapeCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        &mut self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::compose;

    #[test]
    fn test_area() {
        assert!((Circle::new(1.0).area() - PI).abs() < 1e-12);
        assert!((Circle::new(2.0).with_inner_radius(1.0).area() - 3.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_inner_radius_clamped() {
        assert_eq!(Circle::new(1.0).with_inner_radius(5.0).inner_radius(), 1.0);
        assert_eq!(Circle::new(1.0).with_inner_radius(-1.0).inner_radius(), 0.0);
    }

    #[test]
    fn test_inertia_parallel_axis() {
        let centered = Circle::new(1.0);
        assert!((centered.inertia(PI) - PI / 2.0).abs() < 1e-12);

        let offset = Circle::new(1.0).with_local_position(DVec2::new(2.0, 0.0));
        assert!((offset.inertia(1.0) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_point_query_annulus() {
        let mut ring = Circle::new(2.0).with_inner_radius(1.0);
        ring.update(&compose(DVec2::ZERO, 0.0));

        assert!(!ring.point_query(DVec2::ZERO));
        assert!(!ring.point_query(DVec2::new(1.0, 0.0)));
        assert!(ring.point_query(DVec2::new(1.5, 0.0)));
        assert!(ring.point_query(DVec2::new(0.0, 2.0)));
        assert!(!ring.point_query(DVec2::new(2.1, 0.0)));
    }

    #[test]
    fn test_solid_circle_contains_center() {
        let mut disc = Circle::new(1.0);
        disc.update(&compose(DVec2::new(3.0, 3.0), 0.7));
        assert!(disc.point_query(DVec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_aabb() {
        let mut disc = Circle::new(0.5).with_local_position(DVec2::new(1.0, 0.0));
        disc.update(&compose(DVec2::ZERO, std::f64::consts::FRAC_PI_2));
        let aabb = disc.common().aabb();
        assert!((aabb.center() - DVec2::new(0.0, 1.0)).length() < 1e-12);
        assert!((aabb.extents() - DVec2::ONE).length() < 1e-12);
    }
}
