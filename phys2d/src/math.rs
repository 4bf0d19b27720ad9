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
//! 2D math primitives
//!
//! Vectors and affine transforms are `glam`'s double-precision types. This
//! module adds the axis-aligned bounding box used by the broadphase and a few
//! helpers shared by the shape and collision code.

pub use glam::{DAffine2, DVec2};

/// Tolerance for zero-length edges, distances and degenerate areas
pub const EPSILON: f64 = 1e-9;

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Compose a rigid transform from a translation and a rotation in radians
#[inline]
pub fn compose(position: DVec2, rotation: f64) -> DAffine2 {
    DAffine2::from_angle_translation(rotation, position)
}

/// Axis-aligned bounding box in world coordinates
///
/// An empty box has `min = +inf` and `max = -inf`, so it intersects nothing
/// and is the identity for [`Aabb2::union`].
///
/// # Examples
///
/// ```
/// use phys2d::math::{Aabb2, DVec2};
///
/// let a = Aabb2::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0));
/// let b = Aabb2::new(DVec2::new(1.0, 0.5), DVec2::new(2.0, 2.0));
/// assert!(a.intersects(&b)); // touching faces overlap
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner
    pub min: DVec2,
    /// Maximum corner
    pub max: DVec2,
}

impl Aabb2 {
    /// Create a box from its corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Aabb2 { min, max }
    }

    /// The empty box
    pub fn empty() -> Self {
        Aabb2 {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// A degenerate box containing exactly one point
    pub fn point(p: DVec2) -> Self {
        Aabb2 { min: p, max: p }
    }

    /// A box centered at `center` with the given half extents
    pub fn from_center_half_extents(center: DVec2, half: DVec2) -> Self {
        Aabb2 {
            min: center - half,
            max: center + half,
        }
    }

    /// The smallest box containing every point; empty when `points` is empty
    pub fn from_points(points: &[DVec2]) -> Self {
        points.iter().fold(Aabb2::empty(), |aabb, p| aabb.expanded(*p))
    }

    /// Whether `min <= max` on both axes
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Reset to the empty box
    pub fn clear(&mut self) {
        *self = Aabb2::empty();
    }

    /// Grow this box to include `other`
    pub fn union(&mut self, other: &Aabb2) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// A copy of this box grown to include `p`
    pub fn expanded(&self, p: DVec2) -> Self {
        Aabb2 {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Overlap test, inclusive on faces
    pub fn intersects(&self, other: &Aabb2) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Point containment, inclusive on faces
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Center of the box
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Size of the box along each axis
    pub fn extents(&self) -> DVec2 {
        self.max - self.min
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Aabb2::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box_intersects_nothing() {
        let empty = Aabb2::empty();
        let unit = Aabb2::new(DVec2::ZERO, DVec2::ONE);
        assert!(!empty.is_valid());
        assert!(!empty.intersects(&unit));
        assert!(!unit.intersects(&empty));
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        let mut aabb = Aabb2::empty();
        let unit = Aabb2::new(DVec2::new(-1.0, -2.0), DVec2::new(3.0, 4.0));
        aabb.union(&unit);
        assert_eq!(aabb, unit);
    }

    #[test]
    fn test_intersects_separated_and_touching() {
        let a = Aabb2::new(DVec2::ZERO, DVec2::ONE);
        let touching = Aabb2::new(DVec2::new(1.0, 0.0), DVec2::new(2.0, 1.0));
        let apart = Aabb2::new(DVec2::new(1.5, 0.0), DVec2::new(2.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb2::from_points(&[
            DVec2::new(1.0, -1.0),
            DVec2::new(-2.0, 0.5),
            DVec2::new(0.0, 3.0),
        ]);
        assert_eq!(aabb.min, DVec2::new(-2.0, -1.0));
        assert_eq!(aabb.max, DVec2::new(1.0, 3.0));
        assert!(aabb.contains(DVec2::ZERO));
        assert!(!aabb.contains(DVec2::new(1.5, 0.0)));
    }

    #[test]
    fn test_cross_sign() {
        assert_eq!(cross(DVec2::X, DVec2::Y), 1.0);
        assert_eq!(cross(DVec2::Y, DVec2::X), -1.0);
    }

    #[test]
    fn test_compose_rotates_then_translates() {
        let t = compose(DVec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
        let p = t.transform_point2(DVec2::new(1.0, 0.0));
        assert!((p - DVec2::new(1.0, 1.0)).length() < 1e-12);
    }
}
