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
//! Contact records produced by the narrowphase

use crate::handle::ShapeId;
use crate::math::DVec2;

/// One contact point between two bodies
///
/// `normal` points from body A toward body B. `separation` is negative when
/// the shapes overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World contact point
    pub point: DVec2,
    /// Unit normal from A to B
    pub normal: DVec2,
    /// Signed distance along the normal (negative when penetrating)
    pub separation: f64,
    /// Combined restitution, `e_a * e_b`
    pub restitution: f64,
    /// Combined friction, `u_a * u_b`
    pub friction: f64,
    /// Index of body A in [`Space::bodies`](crate::Space::bodies)
    pub body_a: usize,
    /// Index of body B
    pub body_b: usize,
    /// Shape of body A, `None` when A is treated as a point
    pub shape_a: Option<ShapeId>,
    /// Shape of body B, `None` when B is treated as a point
    pub shape_b: Option<ShapeId>,
}

impl Contact {
    /// Whether the shapes overlap at this point
    pub fn is_penetrating(&self) -> bool {
        self.separation < 0.0
    }

    /// Penetration depth, zero when not overlapping
    pub fn depth(&self) -> f64 {
        (-self.separation).max(0.0)
    }
}
