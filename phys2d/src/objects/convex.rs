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
//! Convex polygons
//!
//! Vertices are stored counter-clockwise in the shape frame together with
//! their outward edge normals. Normal `i` belongs to the edge from vertex `i`
//! to vertex `i + 1`.

use super::hull::{box_vertices, convex_hull, signed_area, validate_vertices};
use super::shape::{ShapeCommon, ShapeParams};
use crate::error::HullError;
use crate::math::{cross, Aabb2, DAffine2, DVec2, EPSILON};

/// Default half extents of the fallback square
pub const DEFAULT_HALF_EXTENTS: DVec2 = DVec2::new(0.5, 0.5);

/// Convex polygon shape
#[derive(Debug, Clone, PartialEq)]
pub struct Convex {
    common: ShapeCommon,
    vertices: Vec<DVec2>,
    normals: Vec<DVec2>,
    world_vertices: Vec<DVec2>,
    world_normals: Vec<DVec2>,
}

impl Convex {
    /// Build a polygon, repairing bad input
    ///
    /// Vertices that are not a convex counter-clockwise loop are replaced by
    /// their convex hull; if that fails too the polygon becomes the default
    /// unit square. Both recoveries are logged as warnings.
    ///
    /// # Examples
    ///
    /// ```
    /// use phys2d::objects::Convex;
    /// use phys2d::math::DVec2;
    ///
    /// // clockwise input is rewound
    /// let tri = Convex::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(0.0, 1.0),
    ///     DVec2::new(1.0, 0.0),
    /// ]);
    /// assert!((tri.area() - 0.5).abs() < 1e-12);
    /// ```
    pub fn new(vertices: Vec<DVec2>) -> Self {
        let mut convex = Convex::empty();
        convex.set_vertices(vertices);
        convex
    }

    /// Build a polygon, returning an error instead of repairing
    ///
    /// Input that is already a valid loop is kept as is. Anything else goes
    /// through [`convex_hull`] and its error is returned on failure.
    pub fn try_new(vertices: Vec<DVec2>) -> Result<Self, HullError> {
        let vertices = dedup_loop(vertices);
        let vertices = if validate_vertices(&vertices) {
            vertices
        } else {
            convex_hull(&vertices)?
        };
        let mut convex = Convex::empty();
        convex.assign(vertices);
        Ok(convex)
    }

    /// Axis-aligned box with the given half extents
    pub fn with_extents(half_extents: DVec2) -> Self {
        Convex::new(box_vertices(half_extents))
    }

    fn empty() -> Self {
        Convex {
            common: ShapeCommon::new(),
            vertices: Vec::new(),
            normals: Vec::new(),
            world_vertices: Vec::new(),
            world_normals: Vec::new(),
        }
    }

    /// Replace the vertex loop, repairing it like [`Convex::new`]
    ///
    /// World data is cleared until the next update.
    pub fn set_vertices(&mut self, vertices: Vec<DVec2>) {
        let vertices = dedup_loop(vertices);
        if validate_vertices(&vertices) {
            self.assign(vertices);
            return;
        }

        log::warn!(
            "Convex: {} vertices do not form a convex counter-clockwise loop, rebuilding as convex hull",
            vertices.len()
        );
        match convex_hull(&vertices) {
            Ok(hull) => self.assign(hull),
            Err(err) => {
                log::warn!("Convex: {err}, falling back to default square");
                self.assign(box_vertices(DEFAULT_HALF_EXTENTS));
            }
        }
    }

    fn assign(&mut self, vertices: Vec<DVec2>) {
        let n = vertices.len();
        self.normals = (0..n)
            .map(|i| {
                let edge = vertices[(i + 1) % n] - vertices[i];
                DVec2::new(edge.y, -edge.x).normalize_or_zero()
            })
            .collect();
        self.vertices = vertices;
        self.world_vertices.clear();
        self.world_normals.clear();
        self.common.set_aabb(Aabb2::empty());
    }

    /// Vertices in the shape frame
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Outward edge normals in the shape frame
    pub fn normals(&self) -> &[DVec2] {
        &self.normals
    }

    /// Vertices in world coordinates as of the last update
    pub fn world_vertices(&self) -> &[DVec2] {
        &self.world_vertices
    }

    /// Edge normals in world coordinates as of the last update
    pub fn world_normals(&self) -> &[DVec2] {
        &self.world_normals
    }

    /// Enclosed area
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    fn body_vertices(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let local = self.common.local_transform();
        let n = self.vertices.len();
        (0..n).map(move |i| {
            (
                local.transform_point2(self.vertices[i]),
                local.transform_point2(self.vertices[(i + 1) % n]),
            )
        })
    }

    /// Area-weighted centroid in the body frame
    pub fn centroid(&self) -> DVec2 {
        let mut sum = DVec2::ZERO;
        let mut twice_area = 0.0;
        for (a, b) in self.body_vertices() {
            let c = cross(a, b);
            twice_area += c;
            sum += (a + b) * c;
        }
        if twice_area.abs() <= EPSILON {
            return self.common.local_position();
        }
        sum / (3.0 * twice_area)
    }

    /// Inertia about the body origin for the given mass
    pub fn inertia(&self, mass: f64) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (a, b) in self.body_vertices() {
            let c = cross(a, b);
            numerator += c * (a.dot(a) + a.dot(b) + b.dot(b));
            denominator += c;
        }
        if denominator.abs() <= EPSILON {
            return 0.0;
        }
        mass * numerator / (6.0 * denominator)
    }

    /// Whether a world point lies inside or on the polygon
    pub fn point_query(&self, point: DVec2) -> bool {
        if self.common.world_transform().is_none() || !self.common.aabb().contains(point) {
            return false;
        }
        self.world_vertices
            .iter()
            .zip(&self.world_normals)
            .all(|(v, n)| n.dot(point - *v) <= 0.0)
    }

    /// Refresh world vertices, normals and bounding box
    pub fn update(&mut self, body: &DAffine2) {
        let world = self.common.place(body);
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.vertices.iter().map(|v| world.transform_point2(*v)));
        self.world_normals.clear();
        self.world_normals
            .extend(self.normals.iter().map(|n| world.transform_vector2(*n)));
        self.common.set_aabb(Aabb2::from_points(&self.world_vertices));
    }
}

impl Default for Convex {
    fn default() -> Self {
        Convex::with_extents(DEFAULT_HALF_EXTENTS)
    }
}

impl ShapeParams for Convex {
    fn common(&self) -> &ShapeCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ShapeCommon {
        &mut self.common
    }
}

/// Drop consecutive duplicate vertices, including a closing duplicate
fn dedup_loop(mut vertices: Vec<DVec2>) -> Vec<DVec2> {
    vertices.dedup_by(|b, a| a.distance_squared(*b) <= EPSILON * EPSILON);
    while vertices.len() > 1 {
        let first = vertices[0];
        match vertices.last() {
            Some(last) if last.distance_squared(first) <= EPSILON * EPSILON => {
                vertices.pop();
            }
            _ => break,
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::compose;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_default_square() {
        let square = Convex::default();
        assert_eq!(square.vertices().len(), 4);
        assert!((square.area() - 1.0).abs() < 1e-12);
        assert!(square.centroid().length() < 1e-12);
        assert!((square.inertia(1.0) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_normals_are_outward() {
        let square = Convex::default();
        for (i, n) in square.normals().iter().enumerate() {
            let v = square.vertices()[i];
            assert!(n.dot(v) > 0.0, "normal {i} points inward");
            assert!((n.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_input_becomes_hull() {
        let mut cw = box_vertices(DVec2::new(1.0, 2.0));
        cw.reverse();
        let rect = Convex::new(cw);
        assert!(validate_vertices(rect.vertices()));
        assert!((rect.area() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_unrecoverable_input_falls_back_to_square() {
        let line = Convex::new(vec![DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)]);
        assert!((line.area() - 1.0).abs() < 1e-12);
        assert!(Convex::try_new(vec![DVec2::ZERO, DVec2::X]).is_err());
    }

    #[test]
    fn test_duplicate_vertices_are_dropped() {
        let mut verts = box_vertices(DEFAULT_HALF_EXTENTS);
        let first = verts[0];
        verts.insert(1, first);
        verts.push(first);
        let square = Convex::try_new(verts).unwrap();
        assert_eq!(square.vertices().len(), 4);
    }

    #[test]
    fn test_offset_centroid_and_parallel_axis() {
        let square = Convex::default().with_local_position(DVec2::new(2.0, 0.0));
        assert!((square.centroid() - DVec2::new(2.0, 0.0)).length() < 1e-12);
        // 1/6 + |d|^2
        assert!((square.inertia(1.0) - (1.0 / 6.0 + 4.0)).abs() < 1e-12);
    }

    #[test]
    fn test_point_query() {
        let mut square = Convex::default();
        square.update(&compose(DVec2::new(10.0, 0.0), FRAC_PI_4));

        assert!(square.point_query(DVec2::new(10.0, 0.0)));
        assert!(square.point_query(DVec2::new(10.0, 0.6)));
        assert!(!square.point_query(DVec2::new(10.45, 0.45)));
        assert!(!square.point_query(DVec2::ZERO));
    }

    #[test]
    fn test_update_rotates_normals() {
        let mut square = Convex::default();
        square.update(&compose(DVec2::ZERO, std::f64::consts::FRAC_PI_2));
        // edge 0 runs from (0.5, 0.5) to (-0.5, 0.5): normal +y, rotated to -x
        assert!((square.world_normals()[0] - DVec2::new(-1.0, 0.0)).length() < 1e-12);
        let aabb = square.common().aabb();
        assert!((aabb.extents() - DVec2::ONE).length() < 1e-12);
    }
}
