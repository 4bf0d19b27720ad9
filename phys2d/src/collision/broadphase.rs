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
//! Candidate pair generation
//!
//! The broadphase writes two parallel lists: entry `k` of `pairs_a` is
//! tested against entry `k` of `pairs_b` by the narrowphase. A candidate is
//! either a specific shape of a body, or the bare body treated as a point
//! when it has no shapes.

use crate::objects::Body;

/// One side of a candidate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Index into the body slice
    pub body: usize,
    /// Index into the body's shape list; `None` for a shapeless body
    pub shape: Option<usize>,
}

impl Candidate {
    /// A specific shape of a body
    pub fn shape(body: usize, shape: usize) -> Self {
        Candidate {
            body,
            shape: Some(shape),
        }
    }

    /// A shapeless body treated as a point
    pub fn point(body: usize) -> Self {
        Candidate { body, shape: None }
    }
}

/// Candidate pair generation strategy
pub trait Broadphase: Send {
    /// Replace the contents of `pairs_a` and `pairs_b` with this step's candidates
    fn collisions(
        &mut self,
        bodies: &[Body],
        pairs_a: &mut Vec<Candidate>,
        pairs_b: &mut Vec<Candidate>,
    );
}

/// All-pairs broadphase
///
/// Bodies are visited as `i` from last to first and `j` from first to `i`.
/// A body pair is dropped when both bodies sleep, when neither is Dynamic,
/// or when their boxes are disjoint. Surviving pairs expand into shape
/// pairs (shapes in reverse order) whose boxes also overlap.
#[derive(Debug, Clone, Default)]
pub struct BruteForceBroadphase;

impl BruteForceBroadphase {
    /// Create the broadphase
    pub fn new() -> Self {
        BruteForceBroadphase
    }
}

/// Whether a body pair can be skipped without looking at shapes
pub fn prune_pair(a: &Body, b: &Body) -> bool {
    (a.is_sleeping() && b.is_sleeping())
        || (!a.is_dynamic() && !b.is_dynamic())
        || !a.aabb().intersects(&b.aabb())
}

impl Broadphase for BruteForceBroadphase {
    fn collisions(
        &mut self,
        bodies: &[Body],
        pairs_a: &mut Vec<Candidate>,
        pairs_b: &mut Vec<Candidate>,
    ) {
        pairs_a.clear();
        pairs_b.clear();

        for i in (0..bodies.len()).rev() {
            let bi = &bodies[i];
            for (j, bj) in bodies.iter().enumerate().take(i) {
                if prune_pair(bi, bj) {
                    continue;
                }

                match (bi.has_shapes(), bj.has_shapes()) {
                    (true, true) => {
                        for (k, (_, si)) in bi.shapes().enumerate().rev() {
                            for (l, (_, sj)) in bj.shapes().enumerate().rev() {
                                if si.aabb().intersects(&sj.aabb()) {
                                    pairs_a.push(Candidate::shape(i, k));
                                    pairs_b.push(Candidate::shape(j, l));
                                }
                            }
                        }
                    }
                    (false, true) => {
                        for l in (0..bj.shape_count()).rev() {
                            pairs_a.push(Candidate::point(i));
                            pairs_b.push(Candidate::shape(j, l));
                        }
                    }
                    (true, false) => {
                        for k in (0..bi.shape_count()).rev() {
                            pairs_a.push(Candidate::shape(i, k));
                            pairs_b.push(Candidate::point(j));
                        }
                    }
                    (false, false) => {}
                }
            }
        }

        log::trace!("broadphase: {} candidate pairs", pairs_a.len());
    }
}
