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
//! Exact contact generation
//!
//! Each candidate pair is reduced to one of three geometric cases:
//!
//! - circle vs circle: one contact along the center line
//! - circle vs polygon: nearest edge or vertex (Voronoi regions)
//! - polygon vs polygon: separating axis test, then the incident edge is
//!   clipped against the reference edge's side planes, giving up to two points
//!
//! A shapeless body takes part as a circle of radius zero at its position.
//! An annulus collides as a solid disc of its outer radius.

use super::broadphase::Candidate;
use super::contact::Contact;
use crate::handle::ShapeId;
use crate::math::{DVec2, EPSILON};
use crate::objects::{Body, Shape, ShapeParams};

/// Contact tolerance used when choosing the reference polygon
pub const LINEAR_SLOP: f64 = 0.005;

/// Collision geometry of one side of a pair, in world coordinates
#[derive(Debug, Clone, Copy)]
enum Collider<'a> {
    Circle { center: DVec2, radius: f64 },
    Polygon { vertices: &'a [DVec2], normals: &'a [DVec2] },
}

/// Contact points sharing a normal (A to B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Unit normal from A to B
    pub normal: DVec2,
    points: [(DVec2, f64); 2],
    len: usize,
}

impl Manifold {
    fn single(normal: DVec2, point: DVec2, separation: f64) -> Self {
        Manifold {
            normal,
            points: [(point, separation), (point, separation)],
            len: 1,
        }
    }

    /// `(point, separation)` pairs
    pub fn points(&self) -> &[(DVec2, f64)] {
        &self.points[..self.len]
    }

    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Narrowphase contact generator
#[derive(Debug, Clone, Default)]
pub struct Nearphase;

impl Nearphase {
    /// Create the narrowphase
    pub fn new() -> Self {
        Nearphase
    }

    /// Replace `contacts` with the contacts of every candidate pair
    ///
    /// Pairs are visited last to first. Candidates that reference missing
    /// bodies or shapes are skipped.
    pub fn collisions(
        &mut self,
        bodies: &[Body],
        pairs_a: &[Candidate],
        pairs_b: &[Candidate],
        contacts: &mut Vec<Contact>,
    ) {
        contacts.clear();

        for (a, b) in pairs_a.iter().zip(pairs_b).rev() {
            let (Some((collider_a, shape_a)), Some((collider_b, shape_b))) =
                (resolve(bodies, a), resolve(bodies, b))
            else {
                log::debug!("nearphase: skipping stale candidate pair {a:?} / {b:?}");
                continue;
            };

            let Some(manifold) = collide(&collider_a, &collider_b) else {
                continue;
            };

            let (elasticity_a, friction_a) = material(shape_a);
            let (elasticity_b, friction_b) = material(shape_b);
            for &(point, separation) in manifold.points() {
                contacts.push(Contact {
                    point,
                    normal: manifold.normal,
                    separation,
                    restitution: elasticity_a * elasticity_b,
                    friction: friction_a * friction_b,
                    body_a: a.body,
                    body_b: b.body,
                    shape_a: shape_a.map(|(id, _)| id),
                    shape_b: shape_b.map(|(id, _)| id),
                });
            }
        }

        log::trace!("nearphase: {} contacts", contacts.len());
    }
}

type ResolvedShape<'a> = Option<(ShapeId, &'a Shape)>;

fn resolve<'a>(
    bodies: &'a [Body],
    candidate: &Candidate,
) -> Option<(Collider<'a>, ResolvedShape<'a>)> {
    let body = bodies.get(candidate.body)?;
    let Some(index) = candidate.shape else {
        let point = Collider::Circle {
            center: body.position(),
            radius: 0.0,
        };
        return Some((point, None));
    };

    let (id, shape) = body.shape_at(index)?;
    let collider = match shape {
        Shape::Circle(circle) => Collider::Circle {
            center: circle.world_center(),
            radius: circle.radius(),
        },
        Shape::Convex(convex) => {
            if convex.world_vertices().len() < 3 {
                return None;
            }
            Collider::Polygon {
                vertices: convex.world_vertices(),
                normals: convex.world_normals(),
            }
        }
    };
    Some((collider, Some((id, shape))))
}

fn material(shape: ResolvedShape<'_>) -> (f64, f64) {
    shape.map_or((1.0, 1.0), |(_, s)| {
        (s.common().elasticity(), s.common().friction())
    })
}

fn collide(a: &Collider<'_>, b: &Collider<'_>) -> Option<Manifold> {
    match (*a, *b) {
        (
            Collider::Circle { center: ca, radius: ra },
            Collider::Circle { center: cb, radius: rb },
        ) => circle_circle(ca, ra, cb, rb),
        (Collider::Circle { center, radius }, Collider::Polygon { vertices, normals }) => {
            circle_polygon(center, radius, vertices, normals)
        }
        (Collider::Polygon { vertices, normals }, Collider::Circle { center, radius }) => {
            circle_polygon(center, radius, vertices, normals).map(Manifold::flipped)
        }
        (
            Collider::Polygon { vertices: va, normals: na },
            Collider::Polygon { vertices: vb, normals: nb },
        ) => polygon_polygon(va, na, vb, nb),
    }
}

/// Two circles; the contact sits midway through the overlap
pub fn circle_circle(ca: DVec2, ra: f64, cb: DVec2, rb: f64) -> Option<Manifold> {
    let delta = cb - ca;
    let distance = delta.length();
    let radii = ra + rb;
    if distance > radii {
        return None;
    }

    let normal = if distance > EPSILON {
        delta / distance
    } else {
        DVec2::Y
    };
    let separation = distance - radii;
    let point = ca + normal * (ra + 0.5 * separation);
    Some(Manifold::single(normal, point, separation))
}

/// Circle (A) against a counter-clockwise polygon (B)
pub fn circle_polygon(
    center: DVec2,
    radius: f64,
    vertices: &[DVec2],
    normals: &[DVec2],
) -> Option<Manifold> {
    let n = vertices.len();
    let mut best = f64::NEG_INFINITY;
    let mut edge = 0;
    for i in 0..n {
        let s = normals[i].dot(center - vertices[i]);
        if s > radius {
            return None;
        }
        if s > best {
            best = s;
            edge = i;
        }
    }

    let v1 = vertices[edge];
    let v2 = vertices[(edge + 1) % n];
    let face = |normal: DVec2| {
        let point = center - normal * (0.5 * (best + radius));
        Some(Manifold::single(-normal, point, best - radius))
    };

    if best < EPSILON {
        return face(normals[edge]);
    }

    let vertex = |v: DVec2| {
        let delta = center - v;
        let distance = delta.length();
        if distance > radius {
            return None;
        }
        let outward = delta / distance;
        let separation = distance - radius;
        let point = v + outward * (0.5 * separation);
        Some(Manifold::single(-outward, point, separation))
    };

    if (center - v1).dot(v2 - v1) <= 0.0 {
        vertex(v1)
    } else if (center - v2).dot(v1 - v2) <= 0.0 {
        vertex(v2)
    } else {
        face(normals[edge])
    }
}

/// Largest separation of `b` along the edge normals of `a`
fn max_separation(va: &[DVec2], na: &[DVec2], vb: &[DVec2]) -> (f64, usize) {
    let mut best = f64::NEG_INFINITY;
    let mut edge = 0;
    for (i, (v, n)) in va.iter().zip(na).enumerate() {
        let s = vb
            .iter()
            .map(|w| n.dot(*w - *v))
            .fold(f64::INFINITY, f64::min);
        if s > best {
            best = s;
            edge = i;
        }
    }
    (best, edge)
}

/// Keep the part of a segment with `normal . p <= offset`
fn clip_segment(segment: [DVec2; 2], normal: DVec2, offset: f64) -> Option<[DVec2; 2]> {
    let d0 = normal.dot(segment[0]) - offset;
    let d1 = normal.dot(segment[1]) - offset;

    let mut out = [DVec2::ZERO; 2];
    let mut count = 0;
    if d0 <= 0.0 {
        out[count] = segment[0];
        count += 1;
    }
    if d1 <= 0.0 {
        out[count] = segment[1];
        count += 1;
    }
    if d0 * d1 < 0.0 && count < 2 {
        let t = d0 / (d0 - d1);
        out[count] = segment[0] + (segment[1] - segment[0]) * t;
        count += 1;
    }
    (count == 2).then_some(out)
}

/// Two counter-clockwise polygons
pub fn polygon_polygon(
    va: &[DVec2],
    na: &[DVec2],
    vb: &[DVec2],
    nb: &[DVec2],
) -> Option<Manifold> {
    let (sep_a, edge_a) = max_separation(va, na, vb);
    if sep_a > 0.0 {
        return None;
    }
    let (sep_b, edge_b) = max_separation(vb, nb, va);
    if sep_b > 0.0 {
        return None;
    }

    let flip = sep_b > sep_a + 0.1 * LINEAR_SLOP;
    let (ref_v, ref_n, inc_v, inc_n, ref_edge) = if flip {
        (vb, nb, va, na, edge_b)
    } else {
        (va, na, vb, nb, edge_a)
    };

    let ref_normal = ref_n[ref_edge];
    let inc_edge = inc_n
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_i, best_d), (i, n)| {
            let d = n.dot(ref_normal);
            if d < best_d {
                (i, d)
            } else {
                (best_i, best_d)
            }
        })
        .0;
    let incident = [inc_v[inc_edge], inc_v[(inc_edge + 1) % inc_v.len()]];

    let v1 = ref_v[ref_edge];
    let v2 = ref_v[(ref_edge + 1) % ref_v.len()];
    let tangent = (v2 - v1).normalize_or_zero();
    if tangent == DVec2::ZERO {
        return None;
    }

    let clipped = clip_segment(incident, -tangent, -tangent.dot(v1))?;
    let clipped = clip_segment(clipped, tangent, tangent.dot(v2))?;

    let normal = if flip { -ref_normal } else { ref_normal };
    let mut manifold = Manifold {
        normal,
        points: [(DVec2::ZERO, 0.0); 2],
        len: 0,
    };
    for p in clipped {
        let separation = ref_normal.dot(p - v1);
        if separation <= 0.0 {
            manifold.points[manifold.len] = (p - ref_normal * (0.5 * separation), separation);
            manifold.len += 1;
        }
    }

    (manifold.len > 0).then_some(manifold)
}
