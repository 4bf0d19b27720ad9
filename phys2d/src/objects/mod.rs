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
//! Simulated objects: particles, bodies and their shapes

pub mod body;
pub mod circle;
pub mod convex;
pub mod hull;
pub mod particle;
pub mod shape;

pub use body::Body;
pub use circle::Circle;
pub use convex::Convex;
pub use hull::{convex_hull, signed_area, validate_vertices};
pub use particle::{MotionType, Particle, SleepState};
pub use shape::{Shape, ShapeCommon, ShapeParams};
