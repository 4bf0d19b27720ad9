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
//! Convex loop validation and gift-wrapping hull construction

use crate::error::HullError;
use crate::math::{cross, DVec2, EPSILON};

/// Check that `vertices` form a convex, counter-clockwise loop
///
/// Every consecutive triple `a, b, c` must turn left or go straight, and the
/// loop must enclose a positive area.
pub fn validate_vertices(vertices: &[DVec2]) -> bool {
    let n = vertices.len();
    if n < 3 || vertices.iter().any(|v| !v.is_finite()) {
        return false;
    }

    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        if cross(c - b, b - a) > 0.0 {
            return false;
        }
    }

    signed_area(vertices) > EPSILON
}

/// Signed area of a closed loop; positive for counter-clockwise winding
pub fn signed_area(vertices: &[DVec2]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        twice_area += cross(vertices[i], vertices[(i + 1) % n]);
    }
    twice_area * 0.5
}

/// Build the counter-clockwise convex hull of a point cloud
///
/// Gift wrapping from the right-most point (lowest on ties). Collinear
/// candidates are resolved toward the farther point, so hull edges carry no
/// intermediate vertices.
///
/// # Examples
///
/// ```
/// use phys2d::objects::{convex_hull, validate_vertices};
/// use phys2d::math::DVec2;
///
/// let cloud = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.2, 0.5),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let hull = convex_hull(&cloud).unwrap();
/// assert_eq!(hull.len(), 4);
/// assert!(validate_vertices(&hull));
/// ```
pub fn convex_hull(points: &[DVec2]) -> Result<Vec<DVec2>, HullError> {
    let n = points.len();
    if n < 3 {
        return Err(HullError::TooFewPoints(n));
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(HullError::NonFinitePoint(index));
    }

    let mut start = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let s = points[start];
        if p.x > s.x || (p.x == s.x && p.y < s.y) {
            start = i;
        }
    }

    let mut hull = Vec::new();
    let mut current = start;
    loop {
        let origin = points[current];
        hull.push(origin);

        let mut next = if current == 0 { 1 } else { 0 };
        for (i, p) in points.iter().enumerate() {
            if i == current || i == next {
                continue;
            }
            let r = points[next] - origin;
            let v = *p - origin;
            let turn = cross(r, v);
            if turn < 0.0 || (turn == 0.0 && v.length_squared() > r.length_squared()) {
                next = i;
            }
        }

        current = next;
        if current == start || points[current] == points[start] {
            break;
        }
        if hull.len() > n {
            return Err(HullError::DidNotClose(n));
        }
    }

    if !validate_vertices(&hull) {
        return Err(HullError::InvalidHull(hull.len()));
    }
    Ok(hull)
}

/// Axis-aligned box with the given half extents, counter-clockwise
pub(crate) fn box_vertices(half: DVec2) -> Vec<DVec2> {
    vec![
        DVec2::new(half.x, half.y),
        DVec2::new(-half.x, half.y),
        DVec2::new(-half.x, -half.y),
        DVec2::new(half.x, -half.y),
    ]
}
